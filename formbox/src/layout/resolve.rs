//! Turning a constraint into concrete pixel extents.
//!
//! For one axis:
//!
//! ```text
//! exact = base × size
//! pref  = round_up(exact)
//! min   = round_up(exact × shrink_multiplier)
//! max   = ceiling                         if grow is unbounded
//!       = round_up(exact × grow)          otherwise
//! ```
//!
//! Every result is clamped to `[0, ceiling]`. Resolution is total: the
//! constraint was normalized when it was built, so there is nothing left to
//! reject here.

use serde::{Deserialize, Serialize};

use crate::primitives::Size;
use crate::units::UnitContext;

use super::axis::Axis;
use super::constraint::Constraint;

/// Tolerance used by `round_up` so values sitting on an integer stay there.
const ROUND_EPSILON: f64 = 0.001;

/// Minimum, preferred and maximum extent along one axis.
///
/// Invariant (for constraint-derived triples): `0 <= min <= pref <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeTriple {
    pub min: i32,
    pub pref: i32,
    pub max: i32,
}

impl SizeTriple {
    #[inline]
    pub const fn new(min: i32, pref: i32, max: i32) -> Self {
        Self { min, pref, max }
    }

    /// A triple with no give in either direction.
    #[inline]
    pub const fn fixed(extent: i32) -> Self {
        Self::new(extent, extent, extent)
    }

    /// Room to grow beyond the preferred extent.
    #[inline]
    pub fn grow_room(&self) -> i32 {
        (self.max - self.pref).max(0)
    }

    /// Room to shrink below the preferred extent.
    #[inline]
    pub fn shrink_room(&self) -> i32 {
        (self.pref - self.min).max(0)
    }

    /// Clamp `extent` to this triple's bounds.
    ///
    /// The maximum is checked first, so a malformed triple with `min > max`
    /// yields `max` for oversized input.
    #[inline]
    pub fn clamp(&self, extent: i32) -> i32 {
        if extent > self.max {
            self.max
        } else if extent < self.min {
            self.min
        } else {
            extent
        }
    }
}

/// Intrinsic sizes reported by the rendering side for an unconstrained element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intrinsic {
    pub min: Size,
    pub pref: Size,
    pub max: Size,
}

impl Intrinsic {
    pub fn new(min: Size, pref: Size, max: Size) -> Self {
        Self { min, pref, max }
    }

    /// An element that is exactly `size` and never stretches.
    pub fn fixed(size: Size) -> Self {
        Self::new(size, size, size)
    }

    /// The intrinsic triple along `axis`, taken verbatim.
    pub fn along(&self, axis: Axis) -> SizeTriple {
        SizeTriple::new(
            axis.extent(self.min),
            axis.extent(self.pref),
            axis.extent(self.max),
        )
    }
}

/// Where an element's sizes come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSource<'a> {
    Constraint(&'a Constraint),
    Intrinsic(&'a Intrinsic),
}

/// Resolve one axis of an element into a `SizeTriple`.
pub fn resolve(source: SizeSource<'_>, axis: Axis, units: &UnitContext) -> SizeTriple {
    match source {
        SizeSource::Intrinsic(intrinsic) => intrinsic.along(axis),
        SizeSource::Constraint(constraint) => resolve_constraint(constraint, axis, units),
    }
}

/// Resolve one axis of a constraint against `units`.
pub fn resolve_constraint(constraint: &Constraint, axis: Axis, units: &UnitContext) -> SizeTriple {
    let exact = f64::from(units.base(axis)) * constraint.size(axis);
    let pref = units.within_ceiling(axis, round_up(exact));
    let min = units.within_ceiling(axis, round_up(exact * constraint.shrink_multiplier(axis)));
    let max = match constraint.grow_multiplier(axis) {
        None => units.ceiling(axis),
        Some(grow) => units.within_ceiling(axis, round_up(exact * grow)),
    };
    SizeTriple::new(min, pref, max)
}

/// Round up to a whole pixel, e.g. `1.1 -> 2`, but `2.0000001 -> 2`.
#[inline]
pub fn round_up(value: f64) -> i32 {
    let rounded = (value - ROUND_EPSILON).ceil();
    // Saturating float-to-int conversion; the caller clamps to the ceiling.
    rounded as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> UnitContext {
        UnitContext::new((100, 30), (10, 5), (2000, 2000)).unwrap()
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(1.1), 2);
        assert_eq!(round_up(2.0), 2);
        assert_eq!(round_up(2.0000001), 2);
        assert_eq!(round_up(0.0), 0);
        assert_eq!(round_up(99.9999), 100);
        assert_eq!(round_up(f64::INFINITY), i32::MAX);
    }

    #[test]
    fn test_default_constraint_is_fixed() {
        let t = resolve_constraint(&Constraint::DEFAULT, Axis::Horizontal, &units());
        assert_eq!(t, SizeTriple::fixed(100));
        let t = resolve_constraint(&Constraint::DEFAULT, Axis::Vertical, &units());
        assert_eq!(t, SizeTriple::fixed(30));
    }

    #[test]
    fn test_grow_and_shrink_factors() {
        let c = Constraint::parse("sizex:1.5,growx:2,shrinkx:3").unwrap();
        let t = resolve_constraint(&c, Axis::Horizontal, &units());
        assert_eq!(t, SizeTriple::new(50, 150, 300));
    }

    #[test]
    fn test_unbounded_sentinels() {
        let t = resolve_constraint(&Constraint::FILLER_X, Axis::Horizontal, &units());
        assert_eq!(t, SizeTriple::new(0, 100, 2000));
        // FILLER_X leaves the other axis fixed.
        let t = resolve_constraint(&Constraint::FILLER_X, Axis::Vertical, &units());
        assert_eq!(t, SizeTriple::fixed(30));
    }

    #[test]
    fn test_clamped_to_ceiling() {
        let c = Constraint::parse("sizex:30,growx:2").unwrap();
        let t = resolve_constraint(&c, Axis::Horizontal, &units());
        assert_eq!(t, SizeTriple::new(2000, 2000, 2000));
    }

    #[test]
    fn test_fractional_size_rounds_up() {
        // 30 × 0.333 = 9.99 -> 10
        let c = Constraint::parse("sizey:0.333").unwrap();
        let t = resolve_constraint(&c, Axis::Vertical, &units());
        assert_eq!(t.pref, 10);
    }

    #[test]
    fn test_intrinsic_taken_verbatim() {
        let intrinsic = Intrinsic::new(Size::new(5, 6), Size::new(50, 60), Size::new(500, 600));
        let t = resolve(SizeSource::Intrinsic(&intrinsic), Axis::Vertical, &units());
        assert_eq!(t, SizeTriple::new(6, 60, 600));
    }

    #[test]
    fn test_inversion_symmetry() {
        let u = units();
        for f in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let small = Constraint::new((1.0, 1.0), (f, f), (f, f));
            let large = Constraint::new((1.0, 1.0), (1.0 / f, 1.0 / f), (1.0 / f, 1.0 / f));
            for axis in [Axis::Horizontal, Axis::Vertical] {
                assert_eq!(
                    resolve_constraint(&small, axis, &u),
                    resolve_constraint(&large, axis, &u),
                    "factor {f} on {axis:?}"
                );
            }
        }
    }

    #[test]
    fn test_ordering_invariant() {
        let u = units();
        let factors = [0.0, 0.1, 0.5, 1.0, 1.7, 3.0, 25.0, -1.0];
        for &size in &[0.0, 0.3, 1.0, 2.5, 40.0] {
            for &grow in &factors {
                for &shrink in &factors {
                    let c = Constraint::new((size, size), (grow, grow), (shrink, shrink));
                    for axis in [Axis::Horizontal, Axis::Vertical] {
                        let t = resolve_constraint(&c, axis, &u);
                        assert!(
                            0 <= t.min && t.min <= t.pref && t.pref <= t.max && t.max <= u.ceiling(axis),
                            "{c} on {axis:?} gave {t:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_triple_helpers() {
        let t = SizeTriple::new(10, 20, 50);
        assert_eq!(t.grow_room(), 30);
        assert_eq!(t.shrink_room(), 10);
        assert_eq!(t.clamp(5), 10);
        assert_eq!(t.clamp(60), 50);
        assert_eq!(t.clamp(25), 25);
    }
}
