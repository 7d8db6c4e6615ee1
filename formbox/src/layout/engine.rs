//! The layout engine: one lock around the tree, its size cache and the
//! configuration.
//!
//! Every public call takes the lock once and does all of its work inside that
//! critical section, nested boxes included. Mutations go through
//! [`LayoutEngine::update`], which clears the cache before the lock is
//! released, so no pass can ever observe stale sizes.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::primitives::{Rect, Size};
use crate::units::{LayoutConfig, UnitContext};

use super::aggregate::aggregate;
use super::bounds::assign;
use super::cache::{Measured, SizeCache};
use super::distribute::{distribute, DistributionPolicy};
use super::resolve::SizeTriple;
use super::tree::{FormTree, NodeId};

/// How long measured sizes are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// A fresh cache per call, dropped when the call returns.
    #[default]
    PerPass,
    /// Keep measurements across calls until the tree or units change.
    Retained,
    /// Measure everything from scratch, every time.
    Disabled,
}

/// The rectangle assigned to one node, in the coordinates of the bounds
/// passed to [`LayoutEngine::layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub node: NodeId,
    pub bounds: Rect,
}

#[derive(Debug)]
struct EngineState {
    tree: FormTree,
    cache: SizeCache,
    config: LayoutConfig,
}

/// Thread-safe owner of a [`FormTree`].
#[derive(Debug)]
pub struct LayoutEngine {
    state: Mutex<EngineState>,
    mode: CacheMode,
}

impl LayoutEngine {
    pub fn new(tree: FormTree, config: LayoutConfig) -> Self {
        Self::with_mode(tree, config, CacheMode::default())
    }

    pub fn with_mode(tree: FormTree, config: LayoutConfig, mode: CacheMode) -> Self {
        Self {
            state: Mutex::new(EngineState {
                tree,
                cache: SizeCache::new(),
                config,
            }),
            mode,
        }
    }

    /// An engine that never caches. Handy as a reference in tests.
    pub fn uncached(tree: FormTree, config: LayoutConfig) -> Self {
        Self::with_mode(tree, config, CacheMode::Disabled)
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Lock the state. A poisoned lock is recovered and the cache cleared,
    /// since every cached value can be measured again.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("layout lock poisoned, clearing size cache");
            let mut state = poisoned.into_inner();
            state.cache.invalidate_all();
            state
        })
    }

    /// Run `f` under the lock with the cache for this call.
    fn pass<R>(&self, f: impl FnOnce(&FormTree, &LayoutConfig, &mut SizeCache) -> R) -> R {
        let mut guard = self.lock();
        let state = &mut *guard;
        match self.mode {
            CacheMode::Retained => f(&state.tree, &state.config, &mut state.cache),
            CacheMode::PerPass => f(&state.tree, &state.config, &mut SizeCache::new()),
            CacheMode::Disabled => f(&state.tree, &state.config, &mut SizeCache::disabled()),
        }
    }

    /// Min, preferred and max sizes of `id` on both axes.
    pub fn measure(&self, id: NodeId) -> Result<Measured, LayoutError> {
        self.pass(|tree, config, cache| {
            tree.node(id)?;
            Ok(cache.get(tree, &config.units, id))
        })
    }

    pub fn measure_min(&self, id: NodeId) -> Result<Size, LayoutError> {
        Ok(self.measure(id)?.min_size())
    }

    pub fn measure_preferred(&self, id: NodeId) -> Result<Size, LayoutError> {
        Ok(self.measure(id)?.pref_size())
    }

    pub fn measure_max(&self, id: NodeId) -> Result<Size, LayoutError> {
        Ok(self.measure(id)?.max_size())
    }

    /// Lay out box `id` inside `bounds`.
    ///
    /// Returns a placement for every visible descendant, nested boxes
    /// included, parents before their children.
    pub fn layout(&self, id: NodeId, bounds: Rect) -> Result<Vec<Placement>, LayoutError> {
        self.pass(|tree, config, cache| {
            tree.box_node(id)?;
            tracing::debug!(node = %id, ?bounds, policy = ?config.policy, "layout pass");
            let mut placements = Vec::new();
            layout_box(tree, config, cache, id, bounds, &mut placements)?;
            Ok(placements)
        })
    }

    /// Drop cached measurements after `id` (or anything under it) changed.
    ///
    /// The cache is a flat arena, so everything goes, not just `id`.
    pub fn invalidate(&self, id: NodeId) -> Result<(), LayoutError> {
        let mut state = self.lock();
        state.tree.node(id)?;
        state.cache.invalidate_all();
        Ok(())
    }

    /// Mutate the tree under the lock. The cache is cleared before the lock
    /// is released.
    pub fn update<R>(&self, f: impl FnOnce(&mut FormTree) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut state.tree);
        state.cache.invalidate_all();
        result
    }

    /// Read the tree under the lock.
    pub fn with_tree<R>(&self, f: impl FnOnce(&FormTree) -> R) -> R {
        f(&self.lock().tree)
    }

    pub fn config(&self) -> LayoutConfig {
        self.lock().config
    }

    /// Replace the unit context. Cached sizes are dropped.
    pub fn set_units(&self, units: UnitContext) {
        let mut state = self.lock();
        state.config.units = units;
        state.cache.invalidate_all();
    }

    pub fn set_policy(&self, policy: DistributionPolicy) {
        self.lock().config.policy = policy;
    }

    /// Number of nodes with a retained measurement.
    pub fn cached_len(&self) -> usize {
        self.lock().cache.len()
    }
}

fn layout_box(
    tree: &FormTree,
    config: &LayoutConfig,
    cache: &mut SizeCache,
    id: NodeId,
    bounds: Rect,
    placements: &mut Vec<Placement>,
) -> Result<(), LayoutError> {
    let units = &config.units;
    let bx = tree.box_node(id)?;
    let mut visible = Vec::with_capacity(bx.children().len());
    for &child in bx.children() {
        if tree.node(child)?.visible {
            visible.push(child);
        }
    }
    let items: Vec<Measured> = visible
        .iter()
        .map(|&child| cache.get(tree, units, child))
        .collect();

    // A mirror box reports its target's sizes, but its own children are
    // spread against what they themselves need.
    let own = aggregate(&items, bx.axis, &bx.insets, bx.max_grow, units);
    let target = bx.axis.extent(bounds.size());
    let pref = own.along(bx.axis).pref;
    let triples: Vec<SizeTriple> = items.iter().map(|m| m.along(bx.axis)).collect();
    let distribution = distribute(&triples, target, pref, config.policy);
    if !distribution.is_exact() {
        tracing::debug!(
            node = %id,
            target,
            pref,
            unabsorbed = distribution.unabsorbed,
            "space left unabsorbed"
        );
    }

    let rects = assign(
        &items,
        &distribution.deltas,
        bx.axis,
        bounds,
        &bx.insets,
        units.gap(bx.axis),
        bx.direction,
    );
    for (&child, rect) in visible.iter().zip(rects) {
        placements.push(Placement { node: child, bounds: rect });
        if tree.node(child)?.as_box().is_some() {
            layout_box(tree, config, cache, child, rect, placements)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::axis::{Axis, Direction, Insets};
    use crate::layout::constraint::Constraint;

    fn config() -> LayoutConfig {
        LayoutConfig {
            units: UnitContext::new((100, 30), (10, 5), (2000, 2000)).unwrap(),
            policy: DistributionPolicy::EqualStep,
        }
    }

    fn row_of(constraints: &[Constraint]) -> (FormTree, NodeId, Vec<NodeId>) {
        let mut tree = FormTree::new();
        let row = tree.add_row();
        let ids = constraints
            .iter()
            .map(|c| {
                let id = tree.add_element(*c);
                tree.attach_child(row, id).unwrap();
                id
            })
            .collect();
        (tree, row, ids)
    }

    #[test]
    fn test_measure_row() {
        let (tree, row, _) = row_of(&[Constraint::DEFAULT, Constraint::FILLER_X]);
        let engine = LayoutEngine::new(tree, config());
        assert_eq!(engine.measure_preferred(row).unwrap(), Size::new(210, 30));
        assert_eq!(engine.measure_min(row).unwrap(), Size::new(110, 30));
        assert_eq!(engine.measure_max(row).unwrap(), Size::new(2110, 30));
    }

    #[test]
    fn test_layout_fills_with_filler() {
        let (tree, row, ids) = row_of(&[Constraint::DEFAULT, Constraint::FILLER_X]);
        let engine = LayoutEngine::new(tree, config());
        let placements = engine.layout(row, Rect::new(0, 0, 400, 30)).unwrap();
        assert_eq!(
            placements,
            vec![
                Placement { node: ids[0], bounds: Rect::new(0, 0, 100, 30) },
                Placement { node: ids[1], bounds: Rect::new(110, 0, 290, 30) },
            ]
        );
    }

    #[test]
    fn test_layout_requires_box() {
        let (tree, _, ids) = row_of(&[Constraint::DEFAULT]);
        let engine = LayoutEngine::new(tree, config());
        assert_eq!(
            engine.layout(ids[0], Rect::new(0, 0, 10, 10)),
            Err(LayoutError::NotABox(ids[0]))
        );
    }

    #[test]
    fn test_update_invalidates_retained_cache() {
        let (tree, row, ids) = row_of(&[Constraint::DEFAULT]);
        let engine = LayoutEngine::with_mode(tree, config(), CacheMode::Retained);
        assert_eq!(engine.measure_preferred(row).unwrap().width, 100);
        assert!(engine.cached_len() > 0);

        engine
            .update(|tree| tree.set_constraint(ids[0], Some(Constraint::parse("sizex:2").unwrap())))
            .unwrap();
        assert_eq!(engine.cached_len(), 0);
        assert_eq!(engine.measure_preferred(row).unwrap().width, 200);
    }

    #[test]
    fn test_per_pass_cache_is_dropped() {
        let (tree, row, _) = row_of(&[Constraint::DEFAULT, Constraint::DEFAULT]);
        let engine = LayoutEngine::new(tree, config());
        engine.measure(row).unwrap();
        assert_eq!(engine.cached_len(), 0);
    }

    #[test]
    fn test_set_units_rescales() {
        let (tree, row, _) = row_of(&[Constraint::DEFAULT]);
        let engine = LayoutEngine::with_mode(tree, config(), CacheMode::Retained);
        assert_eq!(engine.measure_preferred(row).unwrap(), Size::new(100, 30));
        engine.set_units(UnitContext::new((50, 20), (1, 1), (500, 500)).unwrap());
        assert_eq!(engine.measure_preferred(row).unwrap(), Size::new(50, 20));
    }

    #[test]
    fn test_invalidate_unknown_node() {
        let engine = LayoutEngine::new(FormTree::new(), config());
        let mut other = FormTree::new();
        let ghost = other.add_row();
        assert_eq!(engine.invalidate(ghost), Err(LayoutError::UnknownNode(ghost)));
    }

    #[test]
    fn test_nested_layout_is_absolute() {
        let mut tree = FormTree::new();
        let column = tree.add_column();
        tree.set_insets(column, Insets::all(2)).unwrap();
        let row = tree.add_row();
        tree.attach_child(column, row).unwrap();
        let a = tree.add_element(Constraint::DEFAULT);
        let b = tree.add_element(Constraint::FILLER_X);
        tree.attach_child(row, a).unwrap();
        tree.attach_child(row, b).unwrap();

        let engine = LayoutEngine::new(tree, config());
        let placements = engine.layout(column, Rect::new(10, 10, 304, 34)).unwrap();
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0], Placement { node: row, bounds: Rect::new(12, 12, 300, 30) });
        assert_eq!(placements[1], Placement { node: a, bounds: Rect::new(12, 12, 100, 30) });
        assert_eq!(placements[2], Placement { node: b, bounds: Rect::new(122, 12, 190, 30) });
    }

    #[test]
    fn test_rtl_row() {
        let (mut tree, row, ids) = row_of(&[Constraint::DEFAULT, Constraint::DEFAULT]);
        tree.set_direction(row, Direction::RightToLeft).unwrap();
        let engine = LayoutEngine::new(tree, config());
        let placements = engine.layout(row, Rect::new(0, 0, 210, 30)).unwrap();
        assert_eq!(placements[0].bounds, Rect::new(110, 0, 100, 30));
        assert_eq!(placements[1].bounds, Rect::new(0, 0, 100, 30));
        assert_eq!(placements[0].node, ids[0]);
    }

    #[test]
    fn test_mirror_box_lays_out_own_children() {
        let mut tree = FormTree::new();
        let wide = tree.add_element(Constraint::parse("sizex:3").unwrap());
        let mirror = tree.add_mirror(wide, Axis::Horizontal).unwrap();
        let inner = tree.add_element(Constraint::FILLER_X);
        tree.attach_child(mirror, inner).unwrap();

        let engine = LayoutEngine::new(tree, config());
        assert_eq!(engine.measure_preferred(mirror).unwrap(), Size::new(300, 30));
        let placements = engine.layout(mirror, Rect::new(0, 0, 300, 30)).unwrap();
        assert_eq!(placements, vec![Placement { node: inner, bounds: Rect::new(0, 0, 300, 30) }]);
    }

    #[test]
    fn test_mirror_of_ancestor_measures_same_with_any_cache() {
        let build = || {
            let mut tree = FormTree::new();
            let column = tree.add_column();
            let label = tree.add_element(Constraint::DEFAULT);
            let mirror = tree.add_mirror(column, Axis::Vertical).unwrap();
            tree.attach_child(column, label).unwrap();
            tree.attach_child(column, mirror).unwrap();
            (tree, column, mirror)
        };

        let (tree, column, mirror) = build();
        let retained = LayoutEngine::with_mode(tree, config(), CacheMode::Retained);
        retained.measure(column).unwrap();
        let after_column = retained.measure(mirror).unwrap();

        let (tree, _, _) = build();
        let uncached = LayoutEngine::with_mode(tree, config(), CacheMode::Disabled);
        let expected = uncached.measure(mirror).unwrap();

        assert_eq!(after_column, expected);
        assert_eq!(expected.pref_size(), Size::new(100, 35));
    }

    #[test]
    fn test_concurrent_measure_and_update() {
        let (tree, row, _) = row_of(&[Constraint::FILLER_X, Constraint::FILLER_X]);
        let engine = LayoutEngine::with_mode(tree, config(), CacheMode::Retained);

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..50 {
                    engine.update(|tree| {
                        let e = tree.add_element(Constraint::DEFAULT);
                        tree.attach_child(row, e).unwrap();
                    });
                }
            });
            s.spawn(|| {
                for _ in 0..50 {
                    let pref = engine.measure_preferred(row).unwrap().width;
                    let count = engine.with_tree(|tree| tree.children(row).unwrap().len()) as i32;
                    // Widths only ever grow, so a later child count bounds the earlier width.
                    assert!(pref <= count * 100 + (count - 1) * 10);
                }
            });
        });

        let expected = 52 * 100 + 51 * 10;
        assert_eq!(engine.measure_preferred(row).unwrap().width, expected);
    }
}
