//! Axis, reading direction and insets.

use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Size};

/// The axis a box lays its children out along.
///
/// A row flows horizontally, a column flows vertically. Everything that
/// differs between the two is a branch on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Component of `size` along this axis.
    #[inline]
    pub fn extent(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    /// Build a size from a main-axis and cross-axis extent.
    #[inline]
    pub fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    /// Build a point from a main-axis and cross-axis offset.
    #[inline]
    pub fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Axis::Horizontal => Point::new(main, cross),
            Axis::Vertical => Point::new(cross, main),
        }
    }
}

/// Reading direction of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::RightToLeft)
    }
}

/// Padding between a box's edge and its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    /// Create insets with explicit values for each side.
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self { top, left, bottom, right }
    }

    /// Uniform insets on all sides.
    pub fn all(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Symmetric insets: `vertical` top and bottom, `horizontal` left and right.
    pub fn symmetric(vertical: i32, horizontal: i32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Total horizontal insets.
    pub fn horizontal(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical insets.
    pub fn vertical(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    /// Total insets along `axis`.
    #[inline]
    pub fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Inset at the start of `axis` (left or top).
    #[inline]
    pub fn leading(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Inset at the end of `axis` (right or bottom).
    #[inline]
    pub fn trailing(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_axis() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }

    #[test]
    fn test_axis_size_and_point() {
        assert_eq!(Axis::Horizontal.size(10, 20), Size::new(10, 20));
        assert_eq!(Axis::Vertical.size(10, 20), Size::new(20, 10));
        assert_eq!(Axis::Vertical.point(3, 4), Point::new(4, 3));
        assert_eq!(Axis::Vertical.extent(Size::new(7, 9)), 9);
    }

    #[test]
    fn test_insets_along() {
        let insets = Insets::new(1, 2, 3, 4);
        assert_eq!(insets.along(Axis::Horizontal), 6);
        assert_eq!(insets.along(Axis::Vertical), 4);
        assert_eq!(insets.leading(Axis::Horizontal), 2);
        assert_eq!(insets.trailing(Axis::Vertical), 3);
        assert_eq!(Insets::symmetric(5, 7), Insets::new(5, 7, 5, 7));
    }
}
