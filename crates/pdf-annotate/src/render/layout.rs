//! Coordinate math for annotations
//!
//! Settings describe positions as percentages of the page; these helpers
//! turn them into absolute page-space geometry.

use crate::config::clamp_font_size;
use crate::constants::BORDER_MARGIN_MAX_FRACTION;
use crate::types::{Point, Position, Rect, finite_or_zero};

/// Effective border inset: the requested margin clamped to
/// `[0, min(width, height) / 4]`.
pub fn border_margin(requested: f32, page_width: f32, page_height: f32) -> f32 {
    let max = (page_width.min(page_height) * BORDER_MARGIN_MAX_FRACTION).max(0.0);
    finite_or_zero(requested).max(0.0).min(max)
}

/// Border rectangle inset by `margin` on all four sides
pub fn border_rect(page_width: f32, page_height: f32, margin: f32) -> Rect {
    Rect {
        x: margin,
        y: margin,
        width: page_width - 2.0 * margin,
        height: page_height - 2.0 * margin,
    }
}

/// Baseline origin for text of `text_width` horizontally centered on
/// `position`.
pub fn centered_text_origin(
    page_width: f32,
    page_height: f32,
    position: Position,
    text_width: f32,
) -> Point {
    let position = position.clamped();
    Point {
        x: page_width * (position.x / 100.0) - text_width / 2.0,
        y: page_height * (position.y / 100.0),
    }
}

/// Font size as drawn; sizes outside the accepted range are pulled back in
pub fn font_size(requested: f32) -> f32 {
    clamp_font_size(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_margin_clamped_to_quarter_of_short_side() {
        assert_eq!(border_margin(1000.0, 600.0, 800.0), 150.0);
        assert_eq!(border_margin(40.0, 600.0, 800.0), 40.0);
        assert_eq!(border_margin(-5.0, 600.0, 800.0), 0.0);
    }

    #[test]
    fn test_border_rect_insets_all_sides() {
        let rect = border_rect(600.0, 800.0, 40.0);
        assert_eq!(rect.x, 40.0);
        assert_eq!(rect.y, 40.0);
        assert_eq!(rect.right(), 560.0);
        assert_eq!(rect.top(), 760.0);
    }

    #[test]
    fn test_centered_text_origin() {
        let origin = centered_text_origin(600.0, 800.0, Position::new(50.0, 5.0), 30.0);
        assert_eq!(origin.x, 285.0);
        assert_eq!(origin.y, 40.0);
    }

    #[test]
    fn test_centered_text_origin_clamps_position() {
        let origin = centered_text_origin(600.0, 800.0, Position::new(150.0, -20.0), 0.0);
        assert_eq!(origin.x, 600.0);
        assert_eq!(origin.y, 0.0);
    }

    #[test]
    fn test_font_size_clamped() {
        assert_eq!(font_size(1.0), 6.0);
        assert_eq!(font_size(12.0), 12.0);
        assert_eq!(font_size(500.0), 72.0);
    }

    #[test]
    fn test_non_finite_input_reads_as_zero() {
        let origin =
            centered_text_origin(600.0, 800.0, Position::new(f32::NAN, f32::NEG_INFINITY), 10.0);
        assert_eq!(origin.x, -5.0);
        assert_eq!(origin.y, 0.0);
        assert_eq!(font_size(f32::NAN), 6.0);
        assert_eq!(border_margin(f32::NAN, 600.0, 800.0), 0.0);
    }
}
