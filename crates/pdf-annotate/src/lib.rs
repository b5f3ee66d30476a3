pub mod document;
mod config;
pub mod constants;
mod fonts;
pub mod render;
mod selection;
mod session;
mod types;

pub use config::*;
pub use document::{export_document, load_document, load_pdf, output_file_name, process, save_pdf};
pub use fonts::{FontHandle, StandardFont};
pub use render::{Canvas, PdfCanvas, StrokeStyle, TextStyle, render_annotations};
pub use selection::Selection;
pub use session::{Action, ExportedDocument, SelectionSummary, Session, SessionState, reduce};
pub use types::*;
