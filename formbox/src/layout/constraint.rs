//! Per-element sizing constraints and the constraint mini-language.
//!
//! A constraint holds a size, grow and shrink factor for each axis. The size
//! factor scales the base unit of the `UnitContext` to give the preferred
//! extent; grow and shrink bound how far the element may stretch or collapse
//! from there.
//!
//! Grow and shrink factors are normalized on the way in:
//! - a factor in `(0, 1)` is inverted, so `0.5` and `2` mean the same thing;
//! - `0`, negative and non-finite factors become `0`, the "unbounded"
//!   sentinel (grow to the ceiling, or shrink to nothing).
//!
//! # Mini-language
//!
//! ```text
//! sizex:2, growx:shrinkx:0, sizexy:1.5
//! ```
//!
//! Clauses are separated by `,`. Each clause is one or more names followed by
//! a value, all separated by `:`. A name is `size`, `grow` or `shrink` with an
//! optional `x`, `y` or `xy` suffix; a bare name applies to both axes. Later
//! clauses override earlier ones.

use std::fmt;
use std::str::FromStr;

use crate::error::ConstraintError;

use super::axis::Axis;

/// Symbolic sizing rule for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    size_x: f64,
    size_y: f64,
    grow_x: f64,
    grow_y: f64,
    shrink_x: f64,
    shrink_y: f64,
}

/// Which factor a clause name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Factor {
    Size,
    Grow,
    Shrink,
}

/// Which axes a clause name applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axes {
    X,
    Y,
    Both,
}

impl Constraint {
    /// One base unit in both directions, no growing, no shrinking.
    pub const DEFAULT: Self = Self {
        size_x: 1.0,
        size_y: 1.0,
        grow_x: 1.0,
        grow_y: 1.0,
        shrink_x: 1.0,
        shrink_y: 1.0,
    };

    /// Takes up whatever horizontal space is left (`growx:0,shrinkx:0`).
    pub const FILLER_X: Self = Self {
        grow_x: 0.0,
        shrink_x: 0.0,
        ..Self::DEFAULT
    };

    /// Takes up whatever vertical space is left (`growy:0,shrinky:0`).
    pub const FILLER_Y: Self = Self {
        grow_y: 0.0,
        shrink_y: 0.0,
        ..Self::DEFAULT
    };

    /// Takes up whatever space is left in both directions.
    pub const FILLER_XY: Self = Self {
        grow_x: 0.0,
        grow_y: 0.0,
        shrink_x: 0.0,
        shrink_y: 0.0,
        ..Self::DEFAULT
    };

    /// Build a constraint from raw factors, normalizing each one.
    pub fn new(size: (f64, f64), grow: (f64, f64), shrink: (f64, f64)) -> Self {
        Self {
            size_x: normalize_size(size.0),
            size_y: normalize_size(size.1),
            grow_x: normalize_rate(grow.0),
            grow_y: normalize_rate(grow.1),
            shrink_x: normalize_rate(shrink.0),
            shrink_y: normalize_rate(shrink.1),
        }
    }

    /// Parse the mini-language, rejecting the whole string on any error.
    pub fn parse(input: &str) -> Result<Self, ConstraintError> {
        let mut constraint = Self::DEFAULT;
        for clause in input.split(',') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let mut parts: Vec<&str> = clause.split(':').map(str::trim).collect();
            let raw_value = parts.pop().unwrap_or_default();
            if parts.is_empty() {
                return Err(ConstraintError::MissingValue(clause.to_string()));
            }
            let value: f64 = raw_value.parse().map_err(|_| ConstraintError::InvalidNumber {
                clause: clause.to_string(),
                value: raw_value.to_string(),
            })?;
            for name in parts {
                let (factor, axes) = parse_name(name)?;
                tracing::trace!(name, value, "constraint clause");
                constraint.set(factor, axes, value);
            }
        }
        Ok(constraint)
    }

    /// Parse the mini-language, falling back to `DEFAULT` when it is malformed.
    ///
    /// The rejection is reported on the `warn` channel.
    pub fn parse_or_default(input: &str) -> Self {
        match Self::parse(input) {
            Ok(constraint) => constraint,
            Err(e) => {
                tracing::warn!("Unable to parse constraints {:?}: {}", input, e);
                Self::DEFAULT
            }
        }
    }

    /// Size factor along `axis` (multiplier of the base unit).
    #[inline]
    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.size_x,
            Axis::Vertical => self.size_y,
        }
    }

    /// Normalized grow factor along `axis`; `0` means unbounded.
    #[inline]
    pub fn grow(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.grow_x,
            Axis::Vertical => self.grow_y,
        }
    }

    /// Normalized shrink factor along `axis`; `0` means "may collapse to zero".
    #[inline]
    pub fn shrink(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.shrink_x,
            Axis::Vertical => self.shrink_y,
        }
    }

    /// Multiplier applied to the exact preferred extent to get the maximum.
    ///
    /// `None` when growth is unbounded.
    #[inline]
    pub fn grow_multiplier(&self, axis: Axis) -> Option<f64> {
        let grow = self.grow(axis);
        (grow > 0.0).then_some(grow)
    }

    /// Multiplier applied to the exact preferred extent to get the minimum.
    ///
    /// Always in `[0, 1]`.
    #[inline]
    pub fn shrink_multiplier(&self, axis: Axis) -> f64 {
        let shrink = self.shrink(axis);
        if shrink > 0.0 { 1.0 / shrink } else { 0.0 }
    }

    pub fn with_size(mut self, axis: Axis, factor: f64) -> Self {
        let factor = normalize_size(factor);
        match axis {
            Axis::Horizontal => self.size_x = factor,
            Axis::Vertical => self.size_y = factor,
        }
        self
    }

    pub fn with_grow(mut self, axis: Axis, factor: f64) -> Self {
        let factor = normalize_rate(factor);
        match axis {
            Axis::Horizontal => self.grow_x = factor,
            Axis::Vertical => self.grow_y = factor,
        }
        self
    }

    pub fn with_shrink(mut self, axis: Axis, factor: f64) -> Self {
        let factor = normalize_rate(factor);
        match axis {
            Axis::Horizontal => self.shrink_x = factor,
            Axis::Vertical => self.shrink_y = factor,
        }
        self
    }

    fn set(&mut self, factor: Factor, axes: Axes, value: f64) {
        let axes: &[Axis] = match axes {
            Axes::X => &[Axis::Horizontal],
            Axes::Y => &[Axis::Vertical],
            Axes::Both => &[Axis::Horizontal, Axis::Vertical],
        };
        for &axis in axes {
            *self = match factor {
                Factor::Size => self.with_size(axis, value),
                Factor::Grow => self.with_grow(axis, value),
                Factor::Shrink => self.with_shrink(axis, value),
            };
        }
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sizexy: {} / {} growxy: {} / {} shrinkxy: {} / {}",
            Decimal(self.size_x),
            Decimal(self.size_y),
            Decimal(self.grow_x),
            Decimal(self.grow_y),
            Decimal(self.shrink_x),
            Decimal(self.shrink_y),
        )
    }
}

/// Formats a factor with at most two decimals and no trailing zeros.
struct Decimal(f64);

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.2}", self.0);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        f.write_str(text)
    }
}

fn parse_name(name: &str) -> Result<(Factor, Axes), ConstraintError> {
    let (factor, suffix) = if let Some(rest) = name.strip_prefix("size") {
        (Factor::Size, rest)
    } else if let Some(rest) = name.strip_prefix("grow") {
        (Factor::Grow, rest)
    } else if let Some(rest) = name.strip_prefix("shrink") {
        (Factor::Shrink, rest)
    } else {
        return Err(ConstraintError::UnknownName(name.to_string()));
    };
    let axes = match suffix {
        "" | "xy" => Axes::Both,
        "x" => Axes::X,
        "y" => Axes::Y,
        _ => return Err(ConstraintError::UnknownName(name.to_string())),
    };
    Ok((factor, axes))
}

/// Grow/shrink normalization: invert `(0, 1)`, map invalid values to the sentinel.
#[inline]
fn normalize_rate(factor: f64) -> f64 {
    if !factor.is_finite() || factor <= 0.0 {
        0.0
    } else if factor < 1.0 {
        1.0 / factor
    } else {
        factor
    }
}

/// Size factors are taken literally; invalid values collapse to zero.
#[inline]
fn normalize_size(factor: f64) -> f64 {
    if !factor.is_finite() || factor < 0.0 { 0.0 } else { factor }
}
