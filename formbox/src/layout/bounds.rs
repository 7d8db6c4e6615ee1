//! Assigning rectangles to the children of a box.

use crate::primitives::Rect;

use super::axis::{Axis, Direction, Insets};
use super::cache::Measured;

/// Place `items` inside `container` along `axis`.
///
/// `items` are the visible children in list order and `deltas` the matching
/// output of the distribution. Each child gets `pref + delta` along the axis
/// and the container's inner cross extent clamped to its own `[min, max]`
/// across it. Children are separated by `gap`, with no gap after the last.
///
/// Right-to-left rows are filled from the right inset leftwards; right-to-left
/// columns anchor their children to the right inset.
pub fn assign(
    items: &[Measured],
    deltas: &[i32],
    axis: Axis,
    container: Rect,
    insets: &Insets,
    gap: i32,
    direction: Direction,
) -> Vec<Rect> {
    let cross_axis = axis.cross();
    let main_extent = axis.extent(container.size());
    let cross_extent = cross_axis.extent(container.size());
    let inner_cross = cross_extent.saturating_sub(insets.along(cross_axis)).max(0);
    // Only the horizontal axis flips, whichever role it plays.
    let main_reversed = direction.is_reversed() && axis == Axis::Horizontal;
    let cross_reversed = direction.is_reversed() && cross_axis == Axis::Horizontal;

    let mut advance = 0i32;
    let mut rects = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let delta = deltas.get(i).copied().unwrap_or(0);
        let main = item.along(axis).pref.saturating_add(delta).max(0);
        let cross = item.along(cross_axis).clamp(inner_cross);

        let main_offset = if main_reversed {
            main_extent
                .saturating_sub(insets.trailing(axis))
                .saturating_sub(advance)
                .saturating_sub(main)
        } else {
            insets.leading(axis).saturating_add(advance)
        };
        let cross_offset = if cross_reversed {
            cross_extent
                .saturating_sub(insets.trailing(cross_axis))
                .saturating_sub(cross)
        } else {
            insets.leading(cross_axis)
        };

        let rect = Rect::from_origin_size(
            container.origin() + axis.point(main_offset, cross_offset),
            axis.size(main, cross),
        );
        tracing::trace!(index = i, ?rect, "assigned bounds");
        rects.push(rect);
        advance = advance.saturating_add(main).saturating_add(gap);
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolve::SizeTriple;

    fn item(width: SizeTriple, height: SizeTriple) -> Measured {
        Measured { width, height }
    }

    #[test]
    fn test_row_left_to_right() {
        let items = [
            item(SizeTriple::fixed(100), SizeTriple::fixed(30)),
            item(SizeTriple::new(0, 100, 2000), SizeTriple::new(0, 30, 2000)),
        ];
        let rects = assign(
            &items,
            &[0, 40],
            Axis::Horizontal,
            Rect::new(0, 0, 250, 50),
            &Insets::default(),
            10,
            Direction::LeftToRight,
        );
        assert_eq!(rects, vec![Rect::new(0, 0, 100, 30), Rect::new(110, 0, 140, 50)]);
    }

    #[test]
    fn test_row_right_to_left() {
        let items = [
            item(SizeTriple::fixed(100), SizeTriple::fixed(30)),
            item(SizeTriple::fixed(50), SizeTriple::fixed(30)),
        ];
        let rects = assign(
            &items,
            &[0, 0],
            Axis::Horizontal,
            Rect::new(0, 0, 200, 30),
            &Insets::new(0, 0, 0, 5),
            10,
            Direction::RightToLeft,
        );
        assert_eq!(rects, vec![Rect::new(95, 0, 100, 30), Rect::new(35, 0, 50, 30)]);
    }

    #[test]
    fn test_column_with_insets_and_offset() {
        let items = [
            item(SizeTriple::new(0, 100, 400), SizeTriple::fixed(30)),
            item(SizeTriple::fixed(80), SizeTriple::fixed(20)),
        ];
        let rects = assign(
            &items,
            &[0, 0],
            Axis::Vertical,
            Rect::new(10, 20, 300, 100),
            &Insets::all(4),
            5,
            Direction::LeftToRight,
        );
        assert_eq!(rects, vec![Rect::new(14, 24, 292, 30), Rect::new(14, 59, 80, 20)]);
    }

    #[test]
    fn test_column_right_to_left_anchors_right() {
        let items = [item(SizeTriple::fixed(80), SizeTriple::fixed(20))];
        let rects = assign(
            &items,
            &[0],
            Axis::Vertical,
            Rect::new(0, 0, 200, 20),
            &Insets::new(0, 0, 0, 10),
            5,
            Direction::RightToLeft,
        );
        assert_eq!(rects, vec![Rect::new(110, 0, 80, 20)]);
    }

    #[test]
    fn test_cross_clamped_to_min() {
        let items = [item(SizeTriple::fixed(100), SizeTriple::new(40, 40, 80))];
        let rects = assign(
            &items,
            &[0],
            Axis::Horizontal,
            Rect::new(0, 0, 100, 10),
            &Insets::default(),
            0,
            Direction::LeftToRight,
        );
        assert_eq!(rects[0].height, 40);
    }

    #[test]
    fn test_negative_extent_floored() {
        let items = [item(SizeTriple::new(0, 10, 10), SizeTriple::fixed(10))];
        let rects = assign(
            &items,
            &[-20],
            Axis::Horizontal,
            Rect::new(0, 0, 0, 10),
            &Insets::default(),
            0,
            Direction::LeftToRight,
        );
        assert_eq!(rects[0].width, 0);
    }

    #[test]
    fn test_right_to_left_near_coordinate_limit() {
        let items = [
            item(SizeTriple::fixed(50), SizeTriple::new(0, 30, 100)),
            item(SizeTriple::fixed(40), SizeTriple::new(0, 30, 100)),
        ];
        let rects = assign(
            &items,
            &[0, 0],
            Axis::Horizontal,
            Rect::new(i32::MAX - 10, i32::MAX - 5, 100, 30),
            &Insets::all(2),
            10,
            Direction::RightToLeft,
        );
        // Positions pin at the coordinate limit instead of overflowing.
        assert_eq!(rects[0], Rect::new(i32::MAX, i32::MAX - 3, 50, 26));
        assert_eq!(rects[1], Rect::new(i32::MAX - 12, i32::MAX - 3, 40, 26));
        assert_eq!(rects[0].right(), i32::MAX);
    }

    #[test]
    fn test_huge_extents_saturate() {
        let items = [
            item(SizeTriple::fixed(i32::MAX), SizeTriple::fixed(10)),
            item(SizeTriple::fixed(i32::MAX), SizeTriple::fixed(10)),
        ];
        let rects = assign(
            &items,
            &[i32::MAX, 0],
            Axis::Horizontal,
            Rect::new(0, 0, i32::MAX, 10),
            &Insets::new(0, i32::MAX, 0, i32::MAX),
            i32::MAX,
            Direction::LeftToRight,
        );
        assert_eq!(rects[0].width, i32::MAX);
        assert_eq!(rects[1].x, i32::MAX);
    }
}
