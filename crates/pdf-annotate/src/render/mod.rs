//! Annotation rendering
//!
//! This module turns page configurations into drawing calls:
//! - `layout` maps percentage positions to page-space coordinates
//! - `page` implements [`Canvas`] on top of an lopdf document
//!
//! The renderer only decides *what* to draw and where. Glyph metrics come
//! from the standard fonts, and the canvas owns the document bytes.

pub mod layout;
mod page;

pub use page::{PdfCanvas, get_page_dimensions};

use crate::config::PageConfig;
use crate::fonts::{FontHandle, StandardFont};
use crate::types::*;
use std::collections::HashMap;

/// Stroke settings for an outline rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub line_width: f32,
    pub opacity: f32,
}

/// Text settings for a single draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontHandle,
    pub size: f32,
}

/// The drawing surface the renderer works against
pub trait Canvas {
    fn page_count(&self) -> usize;

    /// Page size `(width, height)` in points
    fn page_size(&self, index: usize) -> Result<(f32, f32)>;

    /// Make a standard font available for drawing
    fn embed_font(&mut self, font: StandardFont) -> Result<FontHandle>;

    /// Stroke an unfilled rectangle
    fn draw_rectangle(&mut self, index: usize, rect: &Rect, style: &StrokeStyle) -> Result<()>;

    /// Draw `text` with its baseline starting at `origin`
    fn draw_text(&mut self, index: usize, text: &str, origin: Point, style: &TextStyle)
    -> Result<()>;
}

/// Draw border, page number and footer on every page that has a config.
///
/// Pages beyond the end of `configs` are left untouched. Fonts are
/// registered with the canvas on first use.
pub fn render_annotations<C: Canvas>(canvas: &mut C, configs: &[PageConfig]) -> Result<RenderSummary> {
    let page_count = canvas.page_count();
    if page_count == 0 {
        return Err(AnnotateError::EmptyDocument);
    }

    let mut fonts: HashMap<StandardFont, FontHandle> = HashMap::new();
    let mut summary = RenderSummary {
        pages: page_count,
        ..Default::default()
    };

    for (index, config) in configs.iter().enumerate().take(page_count) {
        let settings = &config.settings;
        let (width, height) = canvas.page_size(index)?;

        if settings.has_border {
            let margin = layout::border_margin(settings.border_margin, width, height);
            let rect = layout::border_rect(width, height, margin);
            let style = StrokeStyle {
                line_width: crate::constants::BORDER_LINE_WIDTH,
                opacity: crate::constants::BORDER_OPACITY,
            };
            canvas.draw_rectangle(index, &rect, &style)?;
            summary.borders += 1;
        }

        if settings.has_page_number {
            if let Some(number) = config.sequential_number.get() {
                let font = font_for(canvas, &mut fonts, settings.page_number_weight)?;
                draw_centered(
                    canvas,
                    index,
                    &number.to_string(),
                    settings.page_number_position,
                    font,
                    settings.page_number_size,
                    (width, height),
                )?;
                summary.page_numbers += 1;
            }
        }

        if settings.has_footer {
            if let Some(text) = settings.footer_text_trimmed() {
                let font = font_for(canvas, &mut fonts, settings.footer_weight)?;
                draw_centered(
                    canvas,
                    index,
                    text,
                    settings.footer_position,
                    font,
                    settings.footer_size,
                    (width, height),
                )?;
                summary.footers += 1;
            }
        }
    }

    if configs.len() < page_count {
        log::debug!(
            "{} of {} pages have no configuration and were left unchanged",
            page_count - configs.len(),
            page_count
        );
    }
    log::debug!("Rendered annotations: {:?}", summary);

    Ok(summary)
}

fn font_for<C: Canvas>(
    canvas: &mut C,
    fonts: &mut HashMap<StandardFont, FontHandle>,
    weight: FontWeight,
) -> Result<FontHandle> {
    let font = StandardFont::for_weight(weight);
    if let Some(handle) = fonts.get(&font) {
        return Ok(*handle);
    }
    let handle = canvas.embed_font(font)?;
    fonts.insert(font, handle);
    Ok(handle)
}

fn draw_centered<C: Canvas>(
    canvas: &mut C,
    index: usize,
    text: &str,
    position: Position,
    font: FontHandle,
    size: f32,
    (width, height): (f32, f32),
) -> Result<()> {
    let size = layout::font_size(size);
    let text_width = font.width_of_text_at_size(text, size)?;
    let origin = layout::centered_text_origin(width, height, position, text_width);
    canvas.draw_text(index, text, origin, &TextStyle { font, size })
}
