//! Container-level sizes from the sizes of the children.
//!
//! Along the box's own axis the children's extents are summed, with one gap
//! between each pair of visible children. Across it, the largest extent wins.
//! Insets are added on both axes afterwards.

use crate::units::UnitContext;

use super::axis::{Axis, Insets};
use super::cache::{Measured, SizeCache};
use super::max_grow::MaxGrow;
use super::resolve::SizeTriple;
use super::tree::{FormTree, NodeId};

/// Aggregate the measured sizes of a box's visible children.
///
/// A max-grow limit below the preferred size has no effect: the maximum
/// never drops under `pref`.
pub fn aggregate(
    children: &[Measured],
    axis: Axis,
    insets: &Insets,
    max_grow: MaxGrow,
    units: &UnitContext,
) -> Measured {
    let cross = axis.cross();

    let mut main = SizeTriple::default();
    let mut across = SizeTriple::default();
    for child in children {
        let m = child.along(axis);
        main.min = main.min.saturating_add(m.min);
        main.pref = main.pref.saturating_add(m.pref);
        main.max = main.max.saturating_add(m.max);

        let c = child.along(cross);
        across.min = across.min.max(c.min);
        across.pref = across.pref.max(c.pref);
        across.max = across.max.max(c.max);
    }

    if children.len() > 1 {
        let gaps = units.gap(axis).saturating_mul(children.len() as i32 - 1);
        main = pad(main, gaps);
    }
    main = pad(main, insets.along(axis));
    across = pad(across, insets.along(cross));

    let mut measured = Measured::from_axes(axis, main, across);
    for a in [Axis::Horizontal, Axis::Vertical] {
        if let Some(limit) = max_grow.limit(a, units) {
            let triple = match a {
                Axis::Horizontal => &mut measured.width,
                Axis::Vertical => &mut measured.height,
            };
            triple.max = triple.max.min(limit).max(triple.pref);
        }
    }
    measured
}

#[inline]
fn pad(triple: SizeTriple, amount: i32) -> SizeTriple {
    SizeTriple::new(
        triple.min.saturating_add(amount),
        triple.pref.saturating_add(amount),
        triple.max.saturating_add(amount),
    )
}

/// Measure box `id` by aggregating its visible children through `cache`.
pub(crate) fn aggregate_box(
    tree: &FormTree,
    units: &UnitContext,
    id: NodeId,
    cache: &mut SizeCache,
) -> Measured {
    let Ok(bx) = tree.box_node(id) else {
        return Measured::ZERO;
    };
    let children: Vec<Measured> = bx
        .children()
        .iter()
        .filter(|&&child| tree.node(child).is_ok_and(|n| n.visible))
        .map(|&child| cache.get(tree, units, child))
        .collect();
    let measured = aggregate(&children, bx.axis, &bx.insets, bx.max_grow, units);
    tracing::debug!(
        node = %id,
        axis = ?bx.axis,
        children = children.len(),
        width = ?measured.width,
        height = ?measured.height,
        "aggregated box"
    );
    measured
}
