use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The annotation fields of a page: border, page number and footer.
///
/// This is also the shape of the batch template that gets applied to every
/// selected page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnotationSettings {
    // Border
    pub has_border: bool,
    pub border_margin: f32,

    // Page number
    pub has_page_number: bool,
    pub page_number_position: Position,
    pub page_number_weight: FontWeight,
    pub page_number_size: f32,

    // Footer
    pub has_footer: bool,
    pub footer_text: String,
    pub footer_position: Position,
    pub footer_weight: FontWeight,
    pub footer_size: f32,
}

/// Settings applied en masse to every selected page
pub type BatchTemplate = AnnotationSettings;

impl Default for AnnotationSettings {
    /// The neutral state: every annotation disabled
    fn default() -> Self {
        Self {
            has_border: false,
            border_margin: DEFAULT_BORDER_MARGIN,
            has_page_number: false,
            page_number_position: DEFAULT_PAGE_NUMBER_POSITION,
            page_number_weight: FontWeight::Regular,
            page_number_size: DEFAULT_PAGE_NUMBER_SIZE,
            has_footer: false,
            footer_text: String::new(),
            footer_position: DEFAULT_FOOTER_POSITION,
            footer_weight: FontWeight::Regular,
            footer_size: DEFAULT_FOOTER_SIZE,
        }
    }
}

impl AnnotationSettings {
    /// The batch template a fresh session starts with: border and page
    /// number on, footer off.
    pub fn template() -> Self {
        Self {
            has_border: true,
            has_page_number: true,
            ..Self::default()
        }
    }

    /// Clamp every numeric field into the range the editor accepts
    pub fn clamped(mut self) -> Self {
        self.border_margin = finite_or_zero(self.border_margin).clamp(0.0, MAX_BORDER_MARGIN);
        self.page_number_position = self.page_number_position.clamped();
        self.page_number_size = clamp_font_size(self.page_number_size);
        self.footer_position = self.footer_position.clamped();
        self.footer_size = clamp_font_size(self.footer_size);
        self
    }

    /// Footer text with surrounding whitespace removed, or `None` when
    /// nothing would be drawn.
    pub fn footer_text_trimmed(&self) -> Option<&str> {
        let text = self.footer_text.trim();
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn is_disabled(&self) -> bool {
        !self.has_border && !self.has_page_number && !self.has_footer
    }

    /// Load a template from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let settings: Self = serde_json::from_slice(&bytes)
            .map_err(|e| AnnotateError::Config(format!("Failed to parse template: {}", e)))?;
        Ok(settings.clamped())
    }

    /// Save the template to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnnotateError::Config(format!("Failed to serialize template: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

pub(crate) fn clamp_font_size(size: f32) -> f32 {
    finite_or_zero(size).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// The full annotation configuration for one page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageConfig {
    /// 1-based position of the page in the document, fixed once assigned
    pub page_number: usize,
    pub settings: AnnotationSettings,
    pub sequential_number: SequentialNumber,
}

impl PageConfig {
    /// A disabled configuration for the page at `index` (0-based)
    pub fn new(index: usize) -> Self {
        Self {
            page_number: index + 1,
            settings: AnnotationSettings::default(),
            sequential_number: SequentialNumber::Unassigned,
        }
    }

    /// Default configurations for a freshly loaded document
    pub fn defaults_for(page_count: usize) -> Vec<Self> {
        (0..page_count).map(Self::new).collect()
    }

    /// Overwrite the annotation fields, keeping page and sequential numbers
    pub fn merge(&mut self, template: &BatchTemplate) {
        self.settings = template.clone();
    }

    /// Return to the disabled state and drop the sequential number
    pub fn reset(&mut self) {
        self.settings = AnnotationSettings::default();
        self.sequential_number = SequentialNumber::Unassigned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_limits_every_field() {
        let settings = AnnotationSettings {
            border_margin: 250.0,
            page_number_position: Position::new(-10.0, 140.0),
            page_number_size: 2.0,
            footer_position: Position::new(50.0, 101.0),
            footer_size: 300.0,
            ..AnnotationSettings::default()
        }
        .clamped();

        assert_eq!(settings.border_margin, MAX_BORDER_MARGIN);
        assert_eq!(settings.page_number_position, Position::new(0.0, 100.0));
        assert_eq!(settings.page_number_size, MIN_FONT_SIZE);
        assert_eq!(settings.footer_position, Position::new(50.0, 100.0));
        assert_eq!(settings.footer_size, MAX_FONT_SIZE);
    }

    #[test]
    fn test_footer_text_trimmed() {
        let mut settings = AnnotationSettings::default();
        assert_eq!(settings.footer_text_trimmed(), None);

        settings.footer_text = "  \t ".to_string();
        assert_eq!(settings.footer_text_trimmed(), None);

        settings.footer_text = "  Draft copy ".to_string();
        assert_eq!(settings.footer_text_trimmed(), Some("Draft copy"));
    }

    #[test]
    fn test_merge_keeps_numbers() {
        let mut config = PageConfig::new(3);
        config.sequential_number = SequentialNumber::Assigned(2);
        config.merge(&AnnotationSettings::template());

        assert_eq!(config.page_number, 4);
        assert_eq!(config.sequential_number, SequentialNumber::Assigned(2));
        assert!(config.settings.has_border);
    }
}
