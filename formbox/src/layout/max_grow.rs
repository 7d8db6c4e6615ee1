//! Max-grow limits on boxes and their propagation down the tree.
//!
//! A box may cap how far it grows along each axis, expressed as a multiple of
//! the base unit. A nested box must never be allowed to grow past an
//! ancestor's cap, so caps are pushed down the tree:
//!
//! - `FormTree::attach_child` tightens a box to its ancestors' caps once, at
//!   the moment it is attached;
//! - [`propagate_max_grow`] does the same for a whole tree in one top-down
//!   pass, for trees that were assembled with `push_child`.
//!
//! Neither is retroactive: raising or lowering a cap afterwards does not reach
//! boxes that were already processed.

use crate::error::LayoutError;
use crate::units::UnitContext;

use super::axis::Axis;
use super::resolve::round_up;
use super::tree::{FormTree, NodeId};

/// Per-axis max-grow factors. `0` means "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaxGrow {
    x: f64,
    y: f64,
}

impl MaxGrow {
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: normalize(x),
            y: normalize(y),
        }
    }

    /// The factor along `axis`; `0` when unlimited.
    #[inline]
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn with(mut self, axis: Axis, factor: f64) -> Self {
        let factor = normalize(factor);
        match axis {
            Axis::Horizontal => self.x = factor,
            Axis::Vertical => self.y = factor,
        }
        self
    }

    /// The cap in pixels along `axis`, if any.
    pub fn limit(&self, axis: Axis, units: &UnitContext) -> Option<i32> {
        let factor = self.get(axis);
        (factor > 0.0)
            .then(|| units.within_ceiling(axis, round_up(f64::from(units.base(axis)) * factor)))
    }

    /// Tighten each axis to `ancestor`'s cap where that cap is stricter.
    pub fn tightened_by(self, ancestor: MaxGrow) -> Self {
        Self {
            x: tighten(self.x, ancestor.x),
            y: tighten(self.y, ancestor.y),
        }
    }
}

#[inline]
fn tighten(own: f64, ancestor: f64) -> f64 {
    if ancestor > 0.0 && (own <= 0.0 || own > ancestor) {
        ancestor
    } else {
        own
    }
}

/// Same rule as grow factors: invalid means unlimited, `(0, 1)` is inverted.
#[inline]
fn normalize(factor: f64) -> f64 {
    if !factor.is_finite() || factor <= 0.0 {
        0.0
    } else if factor < 1.0 {
        1.0 / factor
    } else {
        factor
    }
}

/// Tighten box `id` to the caps of all its current ancestors.
pub(crate) fn inherit_from_ancestors(tree: &mut FormTree, id: NodeId) -> Result<(), LayoutError> {
    let inherited = tree
        .ancestors(id)
        .filter_map(|a| tree.node(a).ok().and_then(|n| n.as_box()).map(|bx| bx.max_grow))
        .fold(MaxGrow::NONE, MaxGrow::tightened_by);
    let bx = tree.box_node_mut(id)?;
    let before = bx.max_grow;
    bx.max_grow = before.tightened_by(inherited);
    if bx.max_grow != before {
        tracing::trace!(node = %id, ?before, after = ?bx.max_grow, "inherited max-grow");
    }
    Ok(())
}

/// Push max-grow caps from `root` down to every box beneath it.
///
/// Each box ends up with, per axis, the smallest positive cap found on the
/// path from `root` to itself.
pub fn propagate_max_grow(tree: &mut FormTree, root: NodeId) -> Result<(), LayoutError> {
    tree.box_node(root)?;
    let mut stack = vec![(root, MaxGrow::NONE)];
    while let Some((id, inherited)) = stack.pop() {
        let bx = tree.box_node_mut(id)?;
        bx.max_grow = bx.max_grow.tightened_by(inherited);
        let own = bx.max_grow;
        let children = bx.children().to_vec();
        for child in children {
            if tree.node(child)?.as_box().is_some() {
                stack.push((child, own));
            }
        }
    }
    Ok(())
}
