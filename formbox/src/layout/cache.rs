//! Size cache for memoizing resolved sizes.
//!
//! The cache is a flat arena indexed by `NodeId`: one slot per node holding
//! the node's horizontal and vertical `SizeTriple`. Slots are filled lazily
//! the first time a node is measured and dropped wholesale by
//! `invalidate_all`, which must happen whenever the tree, a constraint or the
//! unit context changes.
//!
//! Caching is purely an optimization: a disabled cache produces identical
//! results, it just measures nodes again every time they are asked for.

use crate::primitives::Size;
use crate::units::UnitContext;

use super::aggregate::aggregate_box;
use super::axis::Axis;
use super::resolve::{resolve, SizeTriple};
use super::tree::{FormTree, NodeId, NodeKind};

/// Horizontal and vertical size triples of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measured {
    pub width: SizeTriple,
    pub height: SizeTriple,
}

impl Measured {
    pub const ZERO: Self = Self {
        width: SizeTriple::fixed(0),
        height: SizeTriple::fixed(0),
    };

    #[inline]
    pub fn along(&self, axis: Axis) -> SizeTriple {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    #[inline]
    pub fn from_axes(axis: Axis, main: SizeTriple, cross: SizeTriple) -> Self {
        match axis {
            Axis::Horizontal => Self { width: main, height: cross },
            Axis::Vertical => Self { width: cross, height: main },
        }
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.width.min, self.height.min)
    }

    pub fn pref_size(&self) -> Size {
        Size::new(self.width.pref, self.height.pref)
    }

    pub fn max_size(&self) -> Size {
        Size::new(self.width.max, self.height.max)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Slot {
    #[default]
    Empty,
    /// Measurement of this node is underway further up the call stack.
    Measuring,
    Ready(Measured),
}

/// Arena of measured sizes, valid until the next `invalidate_all`.
#[derive(Debug, Clone)]
pub struct SizeCache {
    slots: Vec<Slot>,
    enabled: bool,
    /// Set when a lookup hit a `Measuring` slot during the current measurement.
    cycle_seen: bool,

    /// Stats for debugging
    #[cfg(debug_assertions)]
    pub hits: u64,
    #[cfg(debug_assertions)]
    pub misses: u64,
}

impl Default for SizeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            enabled: true,
            cycle_seen: false,
            #[cfg(debug_assertions)]
            hits: 0,
            #[cfg(debug_assertions)]
            misses: 0,
        }
    }

    /// A cache that never keeps anything. Results are identical, only slower.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Measure `id`, reusing a stored result when there is one.
    ///
    /// A node that is reached again while it is still being measured (a
    /// mirror box pointing at its own ancestor, say) measures as zero. Any
    /// result that depended on such a zero is returned but never stored, so
    /// a later lookup starting from a different node measures it afresh.
    pub fn get(&mut self, tree: &FormTree, units: &UnitContext, id: NodeId) -> Measured {
        let idx = id.index();
        if idx >= self.slots.len() {
            self.slots.resize(tree.len().max(idx + 1), Slot::Empty);
        }
        match self.slots[idx] {
            Slot::Ready(measured) => {
                #[cfg(debug_assertions)]
                {
                    self.hits += 1;
                }
                return measured;
            }
            Slot::Measuring => {
                tracing::warn!(node = %id, "mirror cycle while measuring, using zero size");
                self.cycle_seen = true;
                return Measured::ZERO;
            }
            Slot::Empty => {}
        }
        #[cfg(debug_assertions)]
        {
            self.misses += 1;
        }

        let outer_cycle = std::mem::take(&mut self.cycle_seen);
        self.slots[idx] = Slot::Measuring;
        let measured = measure_node(tree, units, id, self);
        let tainted = self.cycle_seen;
        self.slots[idx] = if self.enabled && !tainted {
            Slot::Ready(measured)
        } else {
            Slot::Empty
        };
        self.cycle_seen = outer_cycle || tainted;
        measured
    }

    /// Drop every stored measurement.
    pub fn invalidate_all(&mut self) {
        self.slots.clear();
        self.cycle_seen = false;
        tracing::debug!("size cache invalidated");
    }

    /// Number of nodes with a stored measurement.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache stats (debug builds only).
    #[cfg(debug_assertions)]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// Measure one node from scratch. Children come from `cache`.
fn measure_node(tree: &FormTree, units: &UnitContext, id: NodeId, cache: &mut SizeCache) -> Measured {
    let Ok(node) = tree.node(id) else {
        return Measured::ZERO;
    };
    match &node.kind {
        NodeKind::Element(element) => Measured {
            width: resolve(element.source(), Axis::Horizontal, units),
            height: resolve(element.source(), Axis::Vertical, units),
        },
        NodeKind::Gap { axis } => Measured::from_axes(
            *axis,
            SizeTriple::fixed(units.gap(*axis)),
            SizeTriple::fixed(1),
        ),
        NodeKind::Box(bx) => match bx.mirror {
            Some(target) => cache.get(tree, units, target),
            None => aggregate_box(tree, units, id, cache),
        },
    }
}
