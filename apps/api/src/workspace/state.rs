//! Ephemeral builder and dashboard UI state.
//!
//! Setters are plain field writes: no validation, no derived updates, last write wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Builder form sections, in display order.
pub const BUILDER_SECTIONS: [&str; 6] = [
    "personal_info",
    "professional_summary",
    "experience",
    "education",
    "projects",
    "skills",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderState {
    pub active_section_index: usize,
    pub is_saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub preview_mode: bool,
}

impl BuilderState {
    pub fn set_active_section_index(&mut self, index: usize) {
        self.active_section_index = index;
    }

    pub fn set_is_saving(&mut self, saving: bool) {
        self.is_saving = saving;
    }

    pub fn set_last_saved_at(&mut self, at: Option<DateTime<Utc>>) {
        self.last_saved_at = at;
    }

    pub fn set_preview_mode(&mut self, preview: bool) {
        self.preview_mode = preview;
    }

    pub fn reset(&mut self) {
        *self = BuilderState::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalType {
    Create,
    Upload,
    Edit,
    Download,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalState {
    /// `None` means no modal is open.
    #[serde(rename = "type", default)]
    pub modal_type: Option<ModalType>,
    #[serde(default)]
    pub resume_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub modal: ModalState,
    pub edit_title: String,
    pub view_mode: ViewMode,
    pub search_query: String,
}

impl DashboardState {
    /// Replaces the whole modal state with exactly what is given.
    pub fn set_modal_state(&mut self, modal: ModalState) {
        self.modal = modal;
    }

    pub fn set_edit_title(&mut self, title: String) {
        self.edit_title = title;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
    }
}

/// One builder setter invocation, as sent by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BuilderAction {
    SetActiveSectionIndex { index: usize },
    SetIsSaving { saving: bool },
    SetLastSavedAt { at: Option<DateTime<Utc>> },
    SetPreviewMode { preview: bool },
    Reset,
}

impl BuilderAction {
    pub fn apply(self, state: &mut BuilderState) {
        match self {
            BuilderAction::SetActiveSectionIndex { index } => state.set_active_section_index(index),
            BuilderAction::SetIsSaving { saving } => state.set_is_saving(saving),
            BuilderAction::SetLastSavedAt { at } => state.set_last_saved_at(at),
            BuilderAction::SetPreviewMode { preview } => state.set_preview_mode(preview),
            BuilderAction::Reset => state.reset(),
        }
    }
}

/// One dashboard setter invocation, as sent by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DashboardAction {
    SetModalState { modal: ModalState },
    SetEditTitle { title: String },
    SetViewMode { mode: ViewMode },
    SetSearchQuery { query: String },
}

impl DashboardAction {
    pub fn apply(self, state: &mut DashboardState) {
        match self {
            DashboardAction::SetModalState { modal } => state.set_modal_state(modal),
            DashboardAction::SetEditTitle { title } => state.set_edit_title(title),
            DashboardAction::SetViewMode { mode } => state.set_view_mode(mode),
            DashboardAction::SetSearchQuery { query } => state.set_search_query(query),
        }
    }
}
