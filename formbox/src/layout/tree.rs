//! The layout tree.
//!
//! Nodes live in a flat arena and are addressed by `NodeId`. A node is either
//! an element (sized by a constraint or by its intrinsic sizes), a fixed gap,
//! or a box that lays its children out along one axis. Boxes nest to build
//! two-dimensional forms: rows inside columns inside rows.
//!
//! Detached nodes stay in the arena; they are simply unreachable from any
//! root until they are attached again.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

use super::axis::{Axis, Direction, Insets};
use super::constraint::Constraint;
use super::max_grow::{inherit_from_ancestors, MaxGrow};
use super::resolve::{Intrinsic, SizeSource};

/// Stable handle to a node in a `FormTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of this node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A leaf participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// When absent, `intrinsic` is used verbatim.
    pub constraint: Option<Constraint>,
    pub intrinsic: Intrinsic,
}

impl ElementNode {
    /// Where this element's sizes come from.
    pub fn source(&self) -> SizeSource<'_> {
        match &self.constraint {
            Some(constraint) => SizeSource::Constraint(constraint),
            None => SizeSource::Intrinsic(&self.intrinsic),
        }
    }
}

/// A container laying its children out along `axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxNode {
    pub axis: Axis,
    pub direction: Direction,
    pub insets: Insets,
    pub max_grow: MaxGrow,
    /// Report the sizes of this node instead of aggregating the children.
    pub mirror: Option<NodeId>,
    children: Vec<NodeId>,
}

impl BoxNode {
    fn new(axis: Axis) -> Self {
        Self {
            axis,
            direction: Direction::default(),
            insets: Insets::default(),
            max_grow: MaxGrow::NONE,
            mirror: None,
            children: Vec::new(),
        }
    }

    /// Children in list order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementNode),
    /// Exactly one gap long along `axis`, one pixel across.
    Gap { axis: Axis },
    Box(BoxNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Invisible nodes take no space and receive no rectangle.
    pub visible: bool,
    parent: Option<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn as_box(&self) -> Option<&BoxNode> {
        match &self.kind {
            NodeKind::Box(bx) => Some(bx),
            _ => None,
        }
    }
}

/// Arena of layout nodes.
#[derive(Debug, Clone, Default)]
pub struct FormTree {
    nodes: Vec<Node>,
}

impl FormTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            visible: true,
            parent: None,
        });
        id
    }

    /// Add an element sized by `constraint`.
    pub fn add_element(&mut self, constraint: Constraint) -> NodeId {
        self.push(NodeKind::Element(ElementNode {
            constraint: Some(constraint),
            intrinsic: Intrinsic::default(),
        }))
    }

    /// Add an element sized by its own intrinsic sizes.
    pub fn add_intrinsic(&mut self, intrinsic: Intrinsic) -> NodeId {
        self.push(NodeKind::Element(ElementNode {
            constraint: None,
            intrinsic,
        }))
    }

    /// Add a fixed gap for a box laid out along `axis`.
    pub fn add_gap(&mut self, axis: Axis) -> NodeId {
        self.push(NodeKind::Gap { axis })
    }

    /// Add an empty box.
    pub fn add_box(&mut self, axis: Axis) -> NodeId {
        self.push(NodeKind::Box(BoxNode::new(axis)))
    }

    /// Add an empty horizontal box.
    pub fn add_row(&mut self) -> NodeId {
        self.add_box(Axis::Horizontal)
    }

    /// Add an empty vertical box.
    pub fn add_column(&mut self) -> NodeId {
        self.add_box(Axis::Vertical)
    }

    /// Add a box that reports the sizes of `target`.
    ///
    /// Children attached to a mirror box are still laid out inside it.
    pub fn add_mirror(&mut self, target: NodeId, axis: Axis) -> Result<NodeId, LayoutError> {
        self.node(target)?;
        let mut bx = BoxNode::new(axis);
        bx.mirror = Some(target);
        Ok(self.push(NodeKind::Box(bx)))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, LayoutError> {
        self.nodes.get(id.index()).ok_or(LayoutError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, LayoutError> {
        self.nodes.get_mut(id.index()).ok_or(LayoutError::UnknownNode(id))
    }

    pub fn box_node(&self, id: NodeId) -> Result<&BoxNode, LayoutError> {
        self.node(id)?.as_box().ok_or(LayoutError::NotABox(id))
    }

    pub fn box_node_mut(&mut self, id: NodeId) -> Result<&mut BoxNode, LayoutError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Box(bx) => Ok(bx),
            _ => Err(LayoutError::NotABox(id)),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], LayoutError> {
        Ok(self.box_node(id)?.children())
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Append `child` to `parent` without touching any max-grow limits.
    ///
    /// Use this to build a tree whose limits are settled afterwards by
    /// [`propagate_max_grow`](super::max_grow::propagate_max_grow).
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.box_node(parent)?;
        if self.node(child)?.parent.is_some() {
            return Err(LayoutError::AlreadyAttached(child));
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(LayoutError::Cycle { parent, child });
        }
        self.box_node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Append `child` to `parent` and tighten the child's max-grow limits to
    /// those of its new ancestors.
    ///
    /// The tightening happens once, here. Changing an ancestor's limit later
    /// does not reach children that are already attached.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.push_child(parent, child)?;
        if self.node(child)?.as_box().is_some() {
            inherit_from_ancestors(self, child)?;
        }
        Ok(())
    }

    /// Remove `child` from `parent`. The child stays in the arena.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let bx = self.box_node_mut(parent)?;
        let pos = bx
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(LayoutError::NotAChild { parent, child })?;
        bx.children.remove(pos);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), LayoutError> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Replace an element's constraint; `None` falls back to intrinsic sizes.
    pub fn set_constraint(
        &mut self,
        id: NodeId,
        constraint: Option<Constraint>,
    ) -> Result<(), LayoutError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => {
                element.constraint = constraint;
                Ok(())
            }
            _ => Err(LayoutError::NotAnElement(id)),
        }
    }

    pub fn set_intrinsic(&mut self, id: NodeId, intrinsic: Intrinsic) -> Result<(), LayoutError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => {
                element.intrinsic = intrinsic;
                Ok(())
            }
            _ => Err(LayoutError::NotAnElement(id)),
        }
    }

    pub fn set_insets(&mut self, id: NodeId, insets: Insets) -> Result<(), LayoutError> {
        self.box_node_mut(id)?.insets = insets;
        Ok(())
    }

    pub fn set_direction(&mut self, id: NodeId, direction: Direction) -> Result<(), LayoutError> {
        self.box_node_mut(id)?.direction = direction;
        Ok(())
    }

    /// Set a box's max-grow factor along `axis` (normalized like a grow factor).
    pub fn set_max_grow(&mut self, id: NodeId, axis: Axis, factor: f64) -> Result<(), LayoutError> {
        let bx = self.box_node_mut(id)?;
        bx.max_grow = bx.max_grow.with(axis, factor);
        Ok(())
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a FormTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
