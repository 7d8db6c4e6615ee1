//! JSON form descriptions.
//!
//! A form is a tree of nodes, each an externally tagged object:
//!
//! ```json
//! { "box": { "axis": "vertical", "children": [
//!     { "box": { "axis": "horizontal", "children": [
//!         { "element": { "constraint": "sizex:1" } },
//!         { "element": { "constraint": "growx:0,shrinkx:0", "name": "field" } }
//!     ] } },
//!     { "gap": "vertical" },
//!     { "box": { "axis": "horizontal", "mirror": "field" } }
//! ] } }
//! ```
//!
//! Malformed constraint strings fall back to the default constraint with a
//! warning. Max-grow limits are settled by one propagation pass once the
//! whole tree is built.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use formbox::layout::{
    propagate_max_grow, Axis, Constraint, Direction, FormTree, Insets, Intrinsic, NodeId,
};
use formbox::LayoutConfig;

/// One node of a form description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormNode {
    Element(ElementDef),
    Gap(Axis),
    Box(BoxDef),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ElementDef {
    pub name: Option<String>,
    /// Constraint mini-language; wins over `intrinsic` when both are given.
    pub constraint: Option<String>,
    pub intrinsic: Option<Intrinsic>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoxDef {
    pub axis: Axis,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub insets: Insets,
    #[serde(default)]
    pub max_grow: MaxGrowDef,
    /// Name of a node whose sizes this box reports.
    #[serde(default)]
    pub mirror: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub children: Vec<FormNode>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct MaxGrowDef {
    pub x: f64,
    pub y: f64,
}

/// A decoded form: the tree and its root box.
#[derive(Debug)]
pub struct Form {
    pub tree: FormTree,
    pub root: NodeId,
}

impl Form {
    pub fn from_json(text: &str) -> Result<Self> {
        let root: FormNode = serde_json::from_str(text).context("invalid form description")?;
        Self::build(&root)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read form {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn build(root: &FormNode) -> Result<Self> {
        if !matches!(root, FormNode::Box(_)) {
            bail!("the root of a form must be a box");
        }
        let mut builder = Builder::default();
        let id = builder.add(root)?;
        let mut tree = builder.tree;

        for (id, target) in builder.mirrors {
            let Some(&target_id) = builder.names.get(&target) else {
                bail!("mirror target {target:?} is not a named node");
            };
            tree.box_node_mut(id)?.mirror = Some(target_id);
        }
        propagate_max_grow(&mut tree, id)?;
        Ok(Self { tree, root: id })
    }
}

#[derive(Default)]
struct Builder {
    tree: FormTree,
    names: HashMap<String, NodeId>,
    mirrors: Vec<(NodeId, String)>,
}

impl Builder {
    fn add(&mut self, node: &FormNode) -> Result<NodeId> {
        let (id, name, hidden) = match node {
            FormNode::Element(def) => {
                let id = match (&def.constraint, def.intrinsic) {
                    (Some(text), _) => self.tree.add_element(Constraint::parse_or_default(text)),
                    (None, Some(intrinsic)) => self.tree.add_intrinsic(intrinsic),
                    (None, None) => self.tree.add_element(Constraint::DEFAULT),
                };
                (id, def.name.as_ref(), def.hidden)
            }
            FormNode::Gap(axis) => (self.tree.add_gap(*axis), None, false),
            FormNode::Box(def) => {
                let id = self.tree.add_box(def.axis);
                self.tree.set_direction(id, def.direction)?;
                self.tree.set_insets(id, def.insets)?;
                self.tree.set_max_grow(id, Axis::Horizontal, def.max_grow.x)?;
                self.tree.set_max_grow(id, Axis::Vertical, def.max_grow.y)?;
                if let Some(target) = &def.mirror {
                    self.mirrors.push((id, target.clone()));
                }
                for child in &def.children {
                    let child_id = self.add(child)?;
                    self.tree.push_child(id, child_id)?;
                }
                (id, def.name.as_ref(), def.hidden)
            }
        };
        if hidden {
            self.tree.set_visible(id, false)?;
        }
        if let Some(name) = name {
            if self.names.insert(name.clone(), id).is_some() {
                bail!("duplicate node name {name:?}");
            }
        }
        Ok(id)
    }
}

/// Read a `LayoutConfig` from a JSON file.
pub fn load_config(path: &Path) -> Result<LayoutConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
