//! Shared constants for page annotation
//!
//! This module centralizes the defaults and limits used by the
//! configuration model and the renderer.

use crate::types::Position;

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Border
// =============================================================================

/// Border inset used when a page has no explicit setting (points)
pub const DEFAULT_BORDER_MARGIN: f32 = 40.0;

/// Largest margin the configuration accepts (points)
pub const MAX_BORDER_MARGIN: f32 = 100.0;

/// Stroke width of the border rectangle (points)
pub const BORDER_LINE_WIDTH: f32 = 1.0;

/// Stroke opacity of the border rectangle
pub const BORDER_OPACITY: f32 = 0.5;

/// The border margin never exceeds this fraction of the shorter page side
pub const BORDER_MARGIN_MAX_FRACTION: f32 = 0.25;

// =============================================================================
// Text
// =============================================================================

pub const MIN_FONT_SIZE: f32 = 6.0;
pub const MAX_FONT_SIZE: f32 = 72.0;

pub const DEFAULT_PAGE_NUMBER_POSITION: Position = Position::new(50.0, 5.0);
pub const DEFAULT_PAGE_NUMBER_SIZE: f32 = 12.0;

pub const DEFAULT_FOOTER_POSITION: Position = Position::new(50.0, 2.0);
pub const DEFAULT_FOOTER_SIZE: f32 = 10.0;

// =============================================================================
// Input
// =============================================================================

/// Advisory upper bound for input files. Larger files are still accepted.
pub const ADVISORY_MAX_INPUT_BYTES: usize = 100 * 1024 * 1024;

/// Prefix added to the original file name on export
pub const OUTPUT_FILE_PREFIX: &str = "modified_";
