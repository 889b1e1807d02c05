//! Rectangle geometry shared by detection and annotation.

pub mod output_paths;

use opencv::core::Rect;

/// Intersect `rect` with `bounds`, returning `None` when nothing remains
#[must_use]
pub fn clip_rect(rect: Rect, bounds: Rect) -> Option<Rect> {
    let x1 = rect.x.max(bounds.x);
    let y1 = rect.y.max(bounds.y);
    let x2 = (rect.x + rect.width).min(bounds.x + bounds.width);
    let y2 = (rect.y + rect.height).min(bounds.y + bounds.height);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
}

/// Shift a rectangle by an offset, e.g. from ROI-local to frame coordinates
#[must_use]
pub fn translate(rect: Rect, dx: i32, dy: i32) -> Rect {
    Rect::new(rect.x + dx, rect.y + dy, rect.width, rect.height)
}

/// Lower half of a `width` x `height` region, in that region's local coordinates.
///
/// Starts at row `height / 2` (integer division) and runs to the bottom edge.
#[must_use]
pub fn lower_half(width: i32, height: i32) -> Rect {
    let top = height / 2;
    Rect::new(0, top, width, height - top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clip_rect_inside() {
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(clip_rect(Rect::new(10, 10, 20, 20), bounds), Some(Rect::new(10, 10, 20, 20)));
    }

    #[test]
    fn test_clip_rect_partial_overlap() {
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(clip_rect(Rect::new(90, -5, 20, 20), bounds), Some(Rect::new(90, 0, 10, 15)));
    }

    #[test]
    fn test_clip_rect_disjoint() {
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(clip_rect(Rect::new(150, 150, 10, 10), bounds), None);
        assert_eq!(clip_rect(Rect::new(10, 10, 0, 10), bounds), None);
    }

    #[test]
    fn test_lower_half_odd_height() {
        assert_eq!(lower_half(40, 41), Rect::new(0, 20, 40, 21));
    }

    proptest! {
        #[test]
        fn clipped_rect_stays_in_bounds(
            x in -200i32..200, y in -200i32..200,
            w in 0i32..300, h in 0i32..300,
        ) {
            let bounds = Rect::new(0, 0, 160, 120);
            if let Some(clipped) = clip_rect(Rect::new(x, y, w, h), bounds) {
                prop_assert!(clipped.x >= 0 && clipped.y >= 0);
                prop_assert!(clipped.width > 0 && clipped.height > 0);
                prop_assert!(clipped.x + clipped.width <= 160);
                prop_assert!(clipped.y + clipped.height <= 120);
            }
        }

        #[test]
        fn lower_half_covers_bottom_rows(w in 1i32..500, h in 1i32..500) {
            let half = lower_half(w, h);
            prop_assert_eq!(half.y, h / 2);
            prop_assert_eq!(half.y + half.height, h);
            prop_assert_eq!(half.width, w);
        }
    }
}
