use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Failed to load PDF: {0}")]
    Load(String),
    #[error("The PDF file appears to be empty")]
    EmptyDocument,
    #[error("Page index {index} is out of range (document has {page_count} pages)")]
    PageOutOfRange { index: usize, page_count: usize },
    #[error("Character {0:?} cannot be drawn with the standard fonts")]
    UnsupportedCharacter(char),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Failed to serialize PDF: {0}")]
    Serialize(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Error code reported to whoever triggered the failing action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FileLoad,
    Processing,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::FileLoad => "FILE_LOAD_ERROR",
            ErrorCode::Processing => "PROCESSING_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnnotateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnnotateError::Load(_) => ErrorCode::FileLoad,
            _ => ErrorCode::Processing,
        }
    }

    /// Human-readable message suitable for showing to the end user
    pub fn user_message(&self) -> String {
        match self {
            AnnotateError::Load(_) => {
                "Failed to load PDF file. Please ensure it is a valid PDF document.".to_string()
            }
            AnnotateError::EmptyDocument => "The PDF file appears to be empty.".to_string(),
            AnnotateError::PageOutOfRange { .. }
            | AnnotateError::UnsupportedCharacter(_)
            | AnnotateError::Config(_) => self.to_string(),
            _ => "Failed to process PDF. Please try again or use a different file.".to_string(),
        }
    }
}

/// A point given as percentages of the page width and height.
///
/// `x` runs left to right, `y` bottom to top (PDF user space).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates into [0, 100]; non-finite values become 0
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }
}

pub(crate) fn clamp_percent(value: f32) -> f32 {
    finite_or_zero(value).clamp(0.0, 100.0)
}

/// NaN and infinities are read as 0 so they never reach a content stream
pub(crate) fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Font weight used for a text annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    pub fn from_bold(bold: bool) -> Self {
        if bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        }
    }

    pub fn is_bold(self) -> bool {
        self == FontWeight::Bold
    }
}

/// The displayed number of a page: its 1-based rank in the selection order.
///
/// Only selected pages carry an assigned number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequentialNumber {
    #[default]
    Unassigned,
    Assigned(usize),
}

impl SequentialNumber {
    pub fn get(self) -> Option<usize> {
        match self {
            SequentialNumber::Unassigned => None,
            SequentialNumber::Assigned(n) => Some(n),
        }
    }

    pub fn is_assigned(self) -> bool {
        matches!(self, SequentialNumber::Assigned(_))
    }
}

/// Rectangle in page space (points), origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Absolute point in page space (points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Counts of what the renderer drew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub pages: usize,
    pub borders: usize,
    pub page_numbers: usize,
    pub footers: usize,
}

impl RenderSummary {
    pub fn is_empty(&self) -> bool {
        self.borders == 0 && self.page_numbers == 0 && self.footers == 0
    }
}
