use std::time::{Duration, Instant};

use ratatui::prelude::Size;
use tui_textarea::TextArea;

/// How long an informational status stays on screen.
const INFO_STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFocus {
    /// Image upload panel (drop target).
    Uploader,
    /// Prompt field.
    Prompt,
    /// Generated image and history.
    Result,
}

#[derive(Debug, Clone)]
pub enum UiMode {
    Normal,
    /// Path entry used as the file picker.
    FilePicker(TextArea<'static>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: UiFocus,
    pub mode: UiMode,
    pub status: Option<Status>,
    pub status_set_at: Option<Instant>,
    pub exit_requested: bool,
    pub last_term_size: Size,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: UiFocus::Uploader,
            mode: UiMode::Normal,
            status: None,
            status_set_at: None,
            exit_requested: false,
            last_term_size: Size::default(),
        }
    }
}

impl UiState {
    /// Cycles focus between the panels. The result panel only takes focus
    /// while a result is shown.
    pub fn focus_next(&mut self, has_result: bool) {
        self.focus = match self.focus {
            UiFocus::Uploader => UiFocus::Prompt,
            UiFocus::Prompt if has_result => UiFocus::Result,
            UiFocus::Prompt | UiFocus::Result => UiFocus::Uploader,
        };
    }

    pub fn is_file_picker_open(&self) -> bool {
        matches!(self.mode, UiMode::FilePicker(_))
    }

    pub fn open_file_picker(&mut self) {
        self.mode = UiMode::FilePicker(TextArea::default());
    }

    /// Closes the picker and returns whatever path was typed.
    pub fn close_file_picker(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.mode, UiMode::Normal) {
            UiMode::FilePicker(textarea) => Some(textarea.lines().join("")),
            UiMode::Normal => None,
        }
    }

    pub fn file_picker_mut(&mut self) -> Option<&mut TextArea<'static>> {
        match &mut self.mode {
            UiMode::FilePicker(textarea) => Some(textarea),
            UiMode::Normal => None,
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_set_at = None;
    }

    /// Drops informational statuses once they have been visible long
    /// enough. Errors stay until replaced. Returns whether anything changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        let expired = matches!(
            (&self.status, self.status_set_at),
            (Some(Status { kind: StatusKind::Info, .. }), Some(set_at))
                if now.duration_since(set_at) >= INFO_STATUS_TTL
        );
        if expired {
            self.clear_status();
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_skips_result_when_absent() {
        let mut ui = UiState::default();
        ui.focus_next(false);
        assert_eq!(ui.focus, UiFocus::Prompt);
        ui.focus_next(false);
        assert_eq!(ui.focus, UiFocus::Uploader);

        ui.focus_next(true);
        ui.focus_next(true);
        assert_eq!(ui.focus, UiFocus::Result);
        ui.focus_next(true);
        assert_eq!(ui.focus, UiFocus::Uploader);
    }

    #[test]
    fn file_picker_returns_typed_path() {
        let mut ui = UiState::default();
        ui.open_file_picker();
        assert!(ui.is_file_picker_open());
        ui.file_picker_mut().unwrap().insert_str("/tmp/cat.png");

        assert_eq!(ui.close_file_picker().as_deref(), Some("/tmp/cat.png"));
        assert!(!ui.is_file_picker_open());
        assert_eq!(ui.close_file_picker(), None);
    }

    #[test]
    fn info_status_expires_but_errors_persist() {
        let mut ui = UiState::default();
        ui.set_status(StatusKind::Info, "saved");
        let later = Instant::now() + INFO_STATUS_TTL;
        assert!(ui.expire_status(later));
        assert!(ui.status.is_none());

        ui.set_status(StatusKind::Error, "boom");
        assert!(!ui.expire_status(later + INFO_STATUS_TTL));
        assert_eq!(ui.status.as_ref().map(|s| s.text.as_str()), Some("boom"));
    }
}
