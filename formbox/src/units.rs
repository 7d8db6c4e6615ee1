//! Unit context and layout configuration.
//!
//! A `UnitContext` holds the base unit every constraint is scaled by: the
//! nominal element width and height, the gaps placed between elements and the
//! ceiling no single extent may exceed. It is an ordinary value that is passed
//! to every layout call. Sub-trees that need different gaps get a modified
//! copy (`with_gaps`), never a mutated shared instance.

use serde::{Deserialize, Serialize};

use crate::error::UnitError;
use crate::layout::axis::Axis;
use crate::layout::distribute::DistributionPolicy;

const DEFAULT_BASE_HEIGHT: i32 = 24;
/// Roughly button-sized: five line heights wide.
const DEFAULT_BASE_WIDTH: i32 = DEFAULT_BASE_HEIGHT * 5;
const DEFAULT_H_GAP: i32 = 3;
const DEFAULT_V_GAP: i32 = 2;
const DEFAULT_MAX_WIDTH: i32 = 7680;
const DEFAULT_MAX_HEIGHT: i32 = 4320;

/// Shared base unit for one layout pass.
///
/// Invariant: base sizes and ceilings are positive, gaps are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUnits", into = "RawUnits")]
pub struct UnitContext {
    base_width: i32,
    base_height: i32,
    h_gap: i32,
    v_gap: i32,
    max_width: i32,
    max_height: i32,
}

impl UnitContext {
    /// Create a validated unit context.
    pub fn new(
        base: (i32, i32),
        gaps: (i32, i32),
        ceiling: (i32, i32),
    ) -> Result<Self, UnitError> {
        positive("base_width", base.0)?;
        positive("base_height", base.1)?;
        non_negative("h_gap", gaps.0)?;
        non_negative("v_gap", gaps.1)?;
        positive("max_width", ceiling.0)?;
        positive("max_height", ceiling.1)?;
        Ok(Self {
            base_width: base.0,
            base_height: base.1,
            h_gap: gaps.0,
            v_gap: gaps.1,
            max_width: ceiling.0,
            max_height: ceiling.1,
        })
    }

    /// A copy of this context with different gaps.
    pub fn with_gaps(&self, h_gap: i32, v_gap: i32) -> Result<Self, UnitError> {
        non_negative("h_gap", h_gap)?;
        non_negative("v_gap", v_gap)?;
        Ok(Self {
            h_gap,
            v_gap,
            ..*self
        })
    }

    pub fn base_width(&self) -> i32 {
        self.base_width
    }

    pub fn base_height(&self) -> i32 {
        self.base_height
    }

    pub fn h_gap(&self) -> i32 {
        self.h_gap
    }

    pub fn v_gap(&self) -> i32 {
        self.v_gap
    }

    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    pub fn max_height(&self) -> i32 {
        self.max_height
    }

    /// Base unit along `axis`.
    #[inline]
    pub fn base(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.base_width,
            Axis::Vertical => self.base_height,
        }
    }

    /// Gap between consecutive elements laid out along `axis`.
    #[inline]
    pub fn gap(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.h_gap,
            Axis::Vertical => self.v_gap,
        }
    }

    /// Largest extent any element may have along `axis`.
    #[inline]
    pub fn ceiling(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.max_width,
            Axis::Vertical => self.max_height,
        }
    }

    /// Clamp `value` to `[0, ceiling(axis)]`.
    #[inline]
    pub fn within_ceiling(&self, axis: Axis, value: i32) -> i32 {
        value.clamp(0, self.ceiling(axis))
    }
}

impl Default for UnitContext {
    fn default() -> Self {
        Self {
            base_width: DEFAULT_BASE_WIDTH,
            base_height: DEFAULT_BASE_HEIGHT,
            h_gap: DEFAULT_H_GAP,
            v_gap: DEFAULT_V_GAP,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

fn positive(field: &'static str, value: i32) -> Result<(), UnitError> {
    if value > 0 {
        Ok(())
    } else {
        Err(UnitError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<(), UnitError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(UnitError::Negative { field, value })
    }
}

/// Unvalidated wire form of `UnitContext`. Missing fields take the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct RawUnits {
    base_width: i32,
    base_height: i32,
    h_gap: i32,
    v_gap: i32,
    max_width: i32,
    max_height: i32,
}

impl Default for RawUnits {
    fn default() -> Self {
        UnitContext::default().into()
    }
}

impl TryFrom<RawUnits> for UnitContext {
    type Error = UnitError;

    fn try_from(raw: RawUnits) -> Result<Self, Self::Error> {
        UnitContext::new(
            (raw.base_width, raw.base_height),
            (raw.h_gap, raw.v_gap),
            (raw.max_width, raw.max_height),
        )
    }
}

impl From<UnitContext> for RawUnits {
    fn from(units: UnitContext) -> Self {
        Self {
            base_width: units.base_width,
            base_height: units.base_height,
            h_gap: units.h_gap,
            v_gap: units.v_gap,
            max_width: units.max_width,
            max_height: units.max_height,
        }
    }
}

/// Everything a layout engine needs besides the tree itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    pub units: UnitContext,
    pub policy: DistributionPolicy,
}
