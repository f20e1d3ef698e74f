//! Mapping from terminal input to app actions.
//!
//! Resolution is focus-aware: the same key can edit the prompt, remove the
//! uploaded image, or trigger a download depending on which panel is active.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction, UiFocus};
use crate::utils::paste::{parse_dropped_paths, sanitize_pasted_text};

pub(super) fn actions_for_key(app: &App, key: KeyEvent) -> Vec<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return vec![AppAction::Quit];
    }

    if app.ui.is_file_picker_open() {
        return match key.code {
            KeyCode::Esc => vec![AppAction::CancelFilePicker],
            KeyCode::Enter => vec![AppAction::ConfirmFilePicker],
            _ => vec![AppAction::EditFilePicker {
                input: TAInput::from(key),
            }],
        };
    }

    match key.code {
        KeyCode::Tab => return vec![AppAction::FocusNext],
        KeyCode::Esc => return vec![AppAction::ClearStatus],
        KeyCode::Char('o') if ctrl => return vec![AppAction::OpenFilePicker],
        _ => {}
    }

    match app.ui.focus {
        UiFocus::Uploader => uploader_keys(app, key, ctrl),
        UiFocus::Prompt => prompt_keys(key),
        UiFocus::Result => result_keys(app, key),
    }
}

fn uploader_keys(app: &App, key: KeyEvent, ctrl: bool) -> Vec<AppAction> {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => vec![AppAction::OpenFilePicker],
        KeyCode::Delete | KeyCode::Backspace if app.uploader.current_image().is_some() => {
            vec![AppAction::RemoveImage]
        }
        KeyCode::Char('x') if ctrl && app.uploader.current_image().is_some() => {
            vec![AppAction::RemoveImage]
        }
        _ => Vec::new(),
    }
}

fn prompt_keys(key: KeyEvent) -> Vec<AppAction> {
    match key.code {
        // Single-line field.
        KeyCode::Enter => vec![AppAction::SubmitPrompt],
        _ => vec![AppAction::EditPrompt {
            input: TAInput::from(key),
        }],
    }
}

fn result_keys(app: &App, key: KeyEvent) -> Vec<AppAction> {
    let Some(viewer) = app.result.as_ref() else {
        return Vec::new();
    };
    match key.code {
        KeyCode::Char('d') => vec![AppAction::Download],
        KeyCode::Char('r') => vec![AppAction::Reset],
        KeyCode::Char('h') if viewer.can_toggle_history() => vec![AppAction::ToggleHistory],
        _ => Vec::new(),
    }
}

/// Pastes onto the uploader are file drops; elsewhere they are prompt text.
pub(super) fn actions_for_paste(app: &App, text: &str) -> Vec<AppAction> {
    let sanitized = sanitize_pasted_text(text);
    if sanitized.trim().is_empty() {
        return Vec::new();
    }

    if app.ui.is_file_picker_open() {
        let paths = parse_dropped_paths(&sanitized);
        if paths.is_empty() {
            return Vec::new();
        }
        return vec![AppAction::CancelFilePicker, AppAction::DropFiles { paths }];
    }

    match app.ui.focus {
        UiFocus::Uploader => {
            let paths = parse_dropped_paths(&sanitized);
            if paths.is_empty() {
                Vec::new()
            } else {
                vec![AppAction::DropFiles { paths }]
            }
        }
        UiFocus::Prompt | UiFocus::Result => {
            vec![AppAction::InsertIntoPrompt { text: sanitized }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::ResultViewer;
    use crate::utils::test_utils::create_test_app;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = create_test_app();
        assert!(matches!(actions_for_key(&app, ctrl('c'))[..], [AppAction::Quit]));
        app.ui.open_file_picker();
        assert!(matches!(actions_for_key(&app, ctrl('c'))[..], [AppAction::Quit]));
    }

    #[test]
    fn file_picker_captures_keys() {
        let mut app = create_test_app();
        app.ui.open_file_picker();
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Char('a')))[..],
            [AppAction::EditFilePicker { .. }]
        ));
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Enter))[..],
            [AppAction::ConfirmFilePicker]
        ));
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Esc))[..],
            [AppAction::CancelFilePicker]
        ));
    }

    #[test]
    fn delete_removes_only_when_image_present() {
        let mut app = create_test_app();
        assert!(actions_for_key(&app, key(KeyCode::Delete)).is_empty());

        app.uploader.set_external_image("data:image/png;base64,AAAA");
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Delete))[..],
            [AppAction::RemoveImage]
        ));
        assert!(matches!(
            actions_for_key(&app, ctrl('x'))[..],
            [AppAction::RemoveImage]
        ));
    }

    #[test]
    fn prompt_focus_edits_and_submits() {
        let mut app = create_test_app();
        app.ui.focus = UiFocus::Prompt;
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Char('d')))[..],
            [AppAction::EditPrompt { .. }]
        ));
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Enter))[..],
            [AppAction::SubmitPrompt]
        ));
    }

    #[test]
    fn result_keys_need_a_result() {
        let mut app = create_test_app();
        app.ui.focus = UiFocus::Result;
        assert!(actions_for_key(&app, key(KeyCode::Char('d'))).is_empty());

        app.result = Some(ResultViewer::new("data:x", None, Vec::new()));
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Char('d')))[..],
            [AppAction::Download]
        ));
        assert!(matches!(
            actions_for_key(&app, key(KeyCode::Char('r')))[..],
            [AppAction::Reset]
        ));
        // No history, so no toggle.
        assert!(actions_for_key(&app, key(KeyCode::Char('h'))).is_empty());
    }

    #[test]
    fn paste_on_uploader_is_a_drop() {
        let app = create_test_app();
        match &actions_for_paste(&app, "'/tmp/a b.png'")[..] {
            [AppAction::DropFiles { paths }] => {
                assert_eq!(paths, &vec![PathBuf::from("/tmp/a b.png")])
            }
            _ => panic!("expected drop"),
        }
    }

    #[test]
    fn paste_on_prompt_inserts_text() {
        let mut app = create_test_app();
        app.ui.focus = UiFocus::Prompt;
        match &actions_for_paste(&app, "a red\tballoon")[..] {
            [AppAction::InsertIntoPrompt { text }] => assert_eq!(text, "a red    balloon"),
            _ => panic!("expected insert"),
        }
        assert!(actions_for_paste(&app, "\x07").is_empty());
    }
}
