//! Document load and export
//!
//! Parsing and serialization are delegated to lopdf and run on the blocking
//! pool. Both are one-shot: they either complete or fail as a whole.

use crate::config::PageConfig;
use crate::constants::OUTPUT_FILE_PREFIX;
use crate::render::{PdfCanvas, render_annotations};
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Parse raw PDF bytes into a document
pub async fn load_document(bytes: Vec<u8>) -> Result<Document> {
    tokio::task::spawn_blocking(move || parse_document(&bytes)).await?
}

/// Read and parse a PDF file. An unreadable file is a load error.
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AnnotateError::Load(format!("{}: {}", path.display(), e)))?;
    load_document(bytes).await
}

/// Serialize a document to PDF bytes
pub async fn export_document(doc: Document) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || serialize_document(doc)).await?
}

/// Serialize a document and write it to `path`
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = export_document(doc).await?;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Load `bytes`, draw the annotations described by `configs` and serialize
/// the result. Nothing is returned unless every step succeeds.
pub async fn process(bytes: Vec<u8>, configs: Vec<PageConfig>) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || process_sync(&bytes, &configs)).await?
}

fn process_sync(bytes: &[u8], configs: &[PageConfig]) -> Result<Vec<u8>> {
    let doc = parse_document(bytes)?;
    let mut canvas = PdfCanvas::new(doc);
    let summary = render_annotations(&mut canvas, configs)?;
    log::info!(
        "Annotated {} pages: {} borders, {} page numbers, {} footers",
        summary.pages,
        summary.borders,
        summary.page_numbers,
        summary.footers
    );
    serialize_document(canvas.into_document())
}

fn parse_document(bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| AnnotateError::Load(e.to_string()))?;
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(AnnotateError::Load("document is encrypted".to_string()));
    }
    log::debug!("Parsed PDF {} with {} pages", doc.version, doc.get_pages().len());
    Ok(doc)
}

fn serialize_document(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)
        .map_err(|e| AnnotateError::Serialize(e.to_string()))?;
    log::debug!("Serialized PDF ({} bytes)", writer.len());
    Ok(writer)
}

/// Download name for an exported file: `modified_<original-name>`
pub fn output_file_name(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(original);
    format!("{}{}", OUTPUT_FILE_PREFIX, name)
}
