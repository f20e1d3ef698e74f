//! Application state and the action pipeline that mutates it.
//!
//! [`App`] is the parent of the three view components. It owns the single
//! upload state (through [`ImageUploader`]), the prompt field, the result
//! viewer, and the conversation history sent with each generation request.
//! All mutations flow through [`actions::apply_actions`], which may return
//! [`actions::AppCommand`]s for the event loop to run in the background.

pub mod actions;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand, GenerationParams,
};
pub use session::SessionContext;
pub use ui_state::{Status, StatusKind, UiFocus, UiMode, UiState};

use crate::core::history::HistoryItem;
use crate::core::prompt::{PromptInput, PromptLabels};
use crate::core::result::ResultViewer;
use crate::core::upload::{ImageUploader, UploadListener};

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    pub uploader: ImageUploader,
    pub prompt: PromptInput,
    pub result: Option<ResultViewer>,
    pub history: Vec<HistoryItem>,
}

impl App {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            ui: UiState::default(),
            uploader: ImageUploader::new(),
            prompt: PromptInput::new(),
            result: None,
            history: Vec::new(),
        }
    }

    /// Editing mode applies whenever there is an image to edit.
    pub fn is_editing(&self) -> bool {
        self.uploader.current_image().is_some()
    }

    pub fn is_generating(&self) -> bool {
        self.session.is_generating()
    }

    pub fn prompt_labels(&self) -> PromptLabels {
        PromptLabels::for_mode(self.is_editing())
    }

    pub fn can_submit(&self) -> bool {
        self.prompt.can_submit(self.is_generating())
    }

    /// Listener that reports upload outcomes on the status line.
    pub(crate) fn upload_listener(ui: &mut UiState) -> StatusUploadListener<'_> {
        StatusUploadListener { ui }
    }
}

pub(crate) struct StatusUploadListener<'a> {
    ui: &'a mut UiState,
}

impl UploadListener for StatusUploadListener<'_> {
    fn on_image_select(&mut self, image: String) {
        if image.is_empty() {
            self.ui.set_status(StatusKind::Info, "Image removed");
        } else {
            self.ui.set_status(StatusKind::Info, "Image ready");
        }
    }

    fn on_error(&mut self, message: String) {
        self.ui.set_status(StatusKind::Error, message);
    }
}
