//! lopdf-backed canvas
//!
//! Annotations are appended to a page as extra content streams. The first
//! time a page is drawn on, its original content is wrapped in `q`/`Q` so
//! that any graphics state it leaves behind cannot leak into the overlay.

use super::{Canvas, StrokeStyle, TextStyle};
use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::fonts::{FontHandle, StandardFont, encode_literal};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{HashMap, HashSet};

/// Limit when walking up the page tree, guards against cyclic Parent links
const MAX_TREE_DEPTH: usize = 32;

/// A loaded document that annotations can be drawn onto
pub struct PdfCanvas {
    doc: Document,
    page_ids: Vec<ObjectId>,
    fonts: Vec<ObjectId>,
    graphics_states: HashMap<u32, (String, ObjectId)>,
    wrapper_streams: Option<(ObjectId, ObjectId)>,
    wrapped_pages: HashSet<ObjectId>,
}

impl PdfCanvas {
    pub fn new(doc: Document) -> Self {
        let page_ids = doc.get_pages().values().copied().collect();
        Self {
            doc,
            page_ids,
            fonts: Vec::new(),
            graphics_states: HashMap::new(),
            wrapper_streams: None,
            wrapped_pages: HashSet::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(AnnotateError::PageOutOfRange {
                index,
                page_count: self.page_ids.len(),
            })
    }

    // =========================================================================
    // Content streams
    // =========================================================================

    /// Append `ops` as a new content stream at the end of the page
    fn append_content(&mut self, page_id: ObjectId, ops: String) -> Result<()> {
        let mut contents = if self.wrapped_pages.contains(&page_id) {
            self.existing_contents(page_id)?
        } else {
            self.wrap_existing_contents(page_id)?
        };

        let stream_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), ops.into_bytes()));
        contents.push(Object::Reference(stream_id));

        self.doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Contents", Object::Array(contents));
        Ok(())
    }

    /// Surround the page's current content with save/restore operators
    fn wrap_existing_contents(&mut self, page_id: ObjectId) -> Result<Vec<Object>> {
        let existing = self.existing_contents(page_id)?;
        self.wrapped_pages.insert(page_id);
        if existing.is_empty() {
            return Ok(existing);
        }

        let (save_id, restore_id) = match self.wrapper_streams {
            Some(ids) => ids,
            None => {
                let save = self
                    .doc
                    .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
                let restore = self
                    .doc
                    .add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
                self.wrapper_streams = Some((save, restore));
                (save, restore)
            }
        };

        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        contents.push(Object::Reference(restore_id));
        Ok(contents)
    }

    /// The page's content streams as a flat list of references
    fn existing_contents(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let page = self.doc.get_dictionary(page_id)?;
        let contents = match page.get(b"Contents") {
            Ok(c) => c,
            Err(_) => return Ok(Vec::new()), // No content = blank page
        };

        Ok(match contents {
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(Object::Array(arr)) => arr.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Object::Array(arr) => arr.clone(),
            _ => Vec::new(),
        })
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Add `name -> target` to the page's resource `category` (Font, ExtGState)
    fn register_resource(
        &mut self,
        page_id: ObjectId,
        category: &str,
        name: &str,
        target: ObjectId,
    ) -> Result<()> {
        let resources_id = self.own_resources(page_id)?;
        let existing = self
            .resources_mut(page_id, resources_id)?
            .get(category.as_bytes())
            .ok()
            .cloned();

        let entries = match existing {
            Some(Object::Reference(id)) => self.doc.get_object_mut(id)?.as_dict_mut()?,
            Some(Object::Dictionary(_)) => self
                .resources_mut(page_id, resources_id)?
                .get_mut(category.as_bytes())?
                .as_dict_mut()?,
            _ => {
                let resources = self.resources_mut(page_id, resources_id)?;
                resources.set(category, Dictionary::new());
                resources.get_mut(category.as_bytes())?.as_dict_mut()?
            }
        };
        entries.set(name, Object::Reference(target));
        Ok(())
    }

    /// Make sure the page carries its own /Resources entry.
    ///
    /// Returns the object id when the resources live in an indirect object,
    /// `None` when they are inline in the page dictionary. Inherited
    /// resources are copied down so that adding entries does not hide them.
    fn own_resources(&mut self, page_id: ObjectId) -> Result<Option<ObjectId>> {
        let page = self.doc.get_dictionary(page_id)?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => return Ok(Some(*id)),
            Ok(Object::Dictionary(_)) => return Ok(None),
            _ => {}
        }

        let inherited = self.inherited_resources(page_id);
        self.doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Resources", Object::Dictionary(inherited));
        Ok(None)
    }

    fn resources_mut(
        &mut self,
        page_id: ObjectId,
        resources_id: Option<ObjectId>,
    ) -> Result<&mut Dictionary> {
        let dict = match resources_id {
            Some(id) => self.doc.get_object_mut(id)?.as_dict_mut()?,
            None => self
                .doc
                .get_object_mut(page_id)?
                .as_dict_mut()?
                .get_mut(b"Resources")?
                .as_dict_mut()?,
        };
        Ok(dict)
    }

    fn inherited_resources(&self, page_id: ObjectId) -> Dictionary {
        let mut current = parent_of(&self.doc, page_id);
        for _ in 0..MAX_TREE_DEPTH {
            let Some(node_id) = current else { break };
            let Ok(node) = self.doc.get_dictionary(node_id) else {
                break;
            };
            if let Ok(resources) = node.get(b"Resources") {
                if let Some(dict) = resolve_dictionary(&self.doc, resources) {
                    return dict.clone();
                }
            }
            current = parent_of(&self.doc, node_id);
        }
        Dictionary::new()
    }

    /// Name and object of an ExtGState with the given stroke/fill opacity
    fn graphics_state(&mut self, opacity: f32) -> (String, ObjectId) {
        let key = opacity.to_bits();
        if let Some(entry) = self.graphics_states.get(&key) {
            return entry.clone();
        }

        let mut gs = Dictionary::new();
        gs.set("Type", Object::Name(b"ExtGState".to_vec()));
        gs.set("CA", Object::Real(opacity));
        gs.set("ca", Object::Real(opacity));
        let id = self.doc.add_object(gs);
        let entry = (format!("PdfaGS{}", self.graphics_states.len()), id);
        self.graphics_states.insert(key, entry.clone());
        entry
    }
}

fn font_resource_name(slot: usize) -> String {
    format!("PdfaF{}", slot)
}

impl Canvas for PdfCanvas {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        get_page_dimensions(&self.doc, self.page_id(index)?)
    }

    fn embed_font(&mut self, font: StandardFont) -> Result<FontHandle> {
        let mut font_dict = Dictionary::new();
        font_dict.set("Type", Object::Name(b"Font".to_vec()));
        font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        font_dict.set("BaseFont", Object::Name(font.base_font().as_bytes().to_vec()));
        font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        let font_id = self.doc.add_object(font_dict);

        self.fonts.push(font_id);
        Ok(FontHandle {
            font,
            slot: self.fonts.len() - 1,
        })
    }

    fn draw_rectangle(&mut self, index: usize, rect: &Rect, style: &StrokeStyle) -> Result<()> {
        let page_id = self.page_id(index)?;
        let (gs_name, gs_id) = self.graphics_state(style.opacity);
        self.register_resource(page_id, "ExtGState", &gs_name, gs_id)?;

        let ops = format!(
            "q\n/{} gs\n0 0 0 RG\n{} w\n[] 0 d\n{} {} {} {} re\nS\nQ\n",
            gs_name, style.line_width, rect.x, rect.y, rect.width, rect.height
        );
        self.append_content(page_id, ops)
    }

    fn draw_text(
        &mut self,
        index: usize,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> Result<()> {
        let page_id = self.page_id(index)?;
        let font_id = *self.fonts.get(style.font.slot).ok_or_else(|| {
            AnnotateError::Config(format!("Font slot {} is not registered", style.font.slot))
        })?;
        let font_name = font_resource_name(style.font.slot);
        self.register_resource(page_id, "Font", &font_name, font_id)?;

        let ops = format!(
            "q\n0 0 0 rg\nBT\n/{} {} Tf\n{} {} Td\n({}) Tj\nET\nQ\n",
            font_name,
            style.size,
            origin.x,
            origin.y,
            encode_literal(text)?
        );
        self.append_content(page_id, ops)
    }
}

// =============================================================================
// Page Tree Helpers
// =============================================================================

fn parent_of(doc: &Document, id: ObjectId) -> Option<ObjectId> {
    doc.get_dictionary(id)
        .ok()?
        .get(b"Parent")
        .ok()?
        .as_reference()
        .ok()
}

fn resolve_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        _ => None,
    }
}

/// Get page dimensions (width, height) in points.
///
/// The MediaBox may be inherited from an ancestor in the page tree or stored
/// as an indirect array. Pages without one fall back to US Letter.
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = current else { break };
        let node = doc.get_dictionary(node_id)?;
        if let Some(media_box) = node.get(b"MediaBox").ok().and_then(|mb| resolve_array(doc, mb)) {
            if let Some(dims) = box_dimensions(media_box) {
                return Ok(dims);
            }
        }
        current = parent_of(doc, node_id);
    }
    Ok(DEFAULT_PAGE_DIMENSIONS)
}

fn resolve_array<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Vec<Object>> {
    match obj {
        Object::Array(arr) => Some(arr),
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok(),
        _ => None,
    }
}

fn box_dimensions(media_box: &[Object]) -> Option<(f32, f32)> {
    if media_box.len() != 4 {
        return None;
    }
    let x0 = extract_number(&media_box[0])?;
    let y0 = extract_number(&media_box[1])?;
    let x1 = extract_number(&media_box[2])?;
    let y1 = extract_number(&media_box[3])?;
    Some(((x1 - x0).abs(), (y1 - y0).abs()))
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
