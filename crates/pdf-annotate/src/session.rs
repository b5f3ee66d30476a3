//! Editing session: selection and batch state as a pure reducer
//!
//! Every user action maps to an [`Action`], and [`reduce`] derives the next
//! [`SessionState`] from the current one. The reducer never touches a
//! document, so it can be tested without rendering anything. [`Session`]
//! adds the loaded source file on top and drives load and export.

use crate::config::{AnnotationSettings, BatchTemplate, PageConfig};
use crate::constants::ADVISORY_MAX_INPUT_BYTES;
use crate::document;
use crate::selection::Selection;
use crate::types::*;

/// Everything the editor knows about the pages of the loaded document
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub configs: Vec<PageConfig>,
    pub selection: Selection,
    pub template: BatchTemplate,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            configs: Vec::new(),
            selection: Selection::default(),
            template: AnnotationSettings::template(),
        }
    }
}

impl SessionState {
    pub fn page_count(&self) -> usize {
        self.configs.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A document with `page_count` pages was loaded
    Load { page_count: usize },
    /// Select or deselect a page (0-based)
    Toggle(usize),
    /// Replace the batch template and reapply it to the selection
    SetTemplate(BatchTemplate),
    /// Override the settings of a single page
    EditPage {
        index: usize,
        settings: AnnotationSettings,
    },
    /// Drop the document and everything derived from it
    Clear,
}

/// Apply `action` to `state`, returning the next state.
///
/// The template survives `Load` and `Clear`; configs and selection do not.
pub fn reduce(mut state: SessionState, action: Action) -> Result<SessionState> {
    match action {
        Action::Load { page_count } => {
            state.configs = PageConfig::defaults_for(page_count);
            state.selection = Selection::new(page_count);
        }
        Action::Toggle(index) => {
            state.selection.toggle(index)?;
            resync_configs(&mut state);
        }
        Action::SetTemplate(template) => {
            let page_count = state.page_count();
            state.template = template;
            for &index in state.selection.as_slice() {
                state
                    .configs
                    .get_mut(index)
                    .ok_or(AnnotateError::PageOutOfRange { index, page_count })?
                    .merge(&state.template);
            }
        }
        Action::EditPage { index, settings } => {
            let page_count = state.page_count();
            let config = state
                .configs
                .get_mut(index)
                .ok_or(AnnotateError::PageOutOfRange { index, page_count })?;
            config.settings = settings;
        }
        Action::Clear => {
            state.configs.clear();
            state.selection = Selection::default();
        }
    }
    Ok(state)
}

/// Re-derive every config from the selection: selected pages take the
/// template and their rank, everything else is reset.
fn resync_configs(state: &mut SessionState) {
    for (index, config) in state.configs.iter_mut().enumerate() {
        match state.selection.sequential_number(index) {
            SequentialNumber::Assigned(n) => {
                config.merge(&state.template);
                config.sequential_number = SequentialNumber::Assigned(n);
            }
            SequentialNumber::Unassigned => config.reset(),
        }
    }
}

/// "N of M pages selected"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub selected: usize,
    pub total: usize,
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {} pages selected", self.selected, self.total)
    }
}

/// Output of a successful export
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

struct LoadedSource {
    name: String,
    bytes: Vec<u8>,
}

/// An editing session over one loaded document
#[derive(Default)]
pub struct Session {
    source: Option<LoadedSource>,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn configs(&self) -> &[PageConfig] {
        &self.state.configs
    }

    pub fn selection(&self) -> &[usize] {
        self.state.selection.as_slice()
    }

    pub fn template(&self) -> &BatchTemplate {
        &self.state.template
    }

    pub fn file_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name.as_str())
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            selected: self.state.selection.len(),
            total: self.state.page_count(),
        }
    }

    /// Load `bytes` as the session's document.
    ///
    /// On failure the session is left cleared.
    pub async fn open(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<usize> {
        let name = name.into();
        self.clear();

        if bytes.len() > ADVISORY_MAX_INPUT_BYTES {
            log::warn!(
                "{} is {} bytes, above the advised maximum of {} bytes",
                name,
                bytes.len(),
                ADVISORY_MAX_INPUT_BYTES
            );
        }

        let doc = document::load_document(bytes.clone()).await?;
        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(AnnotateError::EmptyDocument);
        }

        self.dispatch(Action::Load { page_count })?;
        log::info!("Loaded {} ({} pages)", name, page_count);
        self.source = Some(LoadedSource { name, bytes });
        Ok(page_count)
    }

    pub fn toggle(&mut self, index: usize) -> Result<&[usize]> {
        self.dispatch(Action::Toggle(index))?;
        Ok(self.selection())
    }

    pub fn set_template(&mut self, template: BatchTemplate) -> Result<()> {
        self.dispatch(Action::SetTemplate(template))
    }

    pub fn edit_page(&mut self, index: usize, settings: AnnotationSettings) -> Result<()> {
        self.dispatch(Action::EditPage { index, settings })
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.state.configs.clear();
        self.state.selection = Selection::default();
    }

    /// Run `action` through the reducer. The state is only replaced when the
    /// action succeeds.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        log::debug!("Session action: {:?}", action);
        let next = reduce(self.state.clone(), action)?;
        self.state = next;
        Ok(())
    }

    /// Annotate the loaded document with the current configs and serialize it
    pub async fn process(&self) -> Result<ExportedDocument> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| AnnotateError::Config("No document loaded".to_string()))?;

        let bytes = document::process(source.bytes.clone(), self.state.configs.clone()).await?;
        Ok(ExportedDocument {
            file_name: document::output_file_name(&source.name),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(page_count: usize) -> SessionState {
        reduce(SessionState::default(), Action::Load { page_count }).unwrap()
    }

    #[test]
    fn test_load_creates_disabled_configs() {
        let state = loaded(3);
        assert_eq!(state.configs.len(), 3);
        for (i, config) in state.configs.iter().enumerate() {
            assert_eq!(config.page_number, i + 1);
            assert!(config.settings.is_disabled());
            assert_eq!(config.sequential_number, SequentialNumber::Unassigned);
        }
    }

    #[test]
    fn test_failed_action_leaves_state_untouched() {
        let mut session = Session::new();
        session.dispatch(Action::Load { page_count: 2 }).unwrap();
        session.toggle(1).unwrap();
        let before = session.state().clone();

        assert!(session.toggle(7).is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_clear_keeps_template() {
        let mut state = loaded(2);
        let mut template = AnnotationSettings::template();
        template.footer_text = "kept".to_string();
        state = reduce(state, Action::SetTemplate(template.clone())).unwrap();
        state = reduce(state, Action::Clear).unwrap();

        assert!(state.configs.is_empty());
        assert!(state.selection.is_empty());
        assert_eq!(state.template, template);
    }

    #[test]
    fn test_summary_display() {
        let mut session = Session::new();
        session.dispatch(Action::Load { page_count: 4 }).unwrap();
        session.toggle(2).unwrap();
        assert_eq!(session.summary().to_string(), "1 of 4 pages selected");
    }
}
