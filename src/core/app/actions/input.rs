use super::{App, AppAction, AppCommand};
use crate::core::app::StatusKind;

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::EditPrompt { input } => {
            app.prompt.apply_edit(|textarea| {
                textarea.input(input);
            });
            None
        }
        AppAction::InsertIntoPrompt { text } => {
            app.prompt.insert_str(&text);
            None
        }
        AppAction::FocusNext => {
            app.ui.focus_next(app.result.is_some());
            None
        }
        AppAction::SetStatus { message } => {
            app.ui.set_status(StatusKind::Info, message);
            None
        }
        AppAction::ClearStatus => {
            app.ui.clear_status();
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::apply_action;
    use super::*;
    use crate::core::app::UiFocus;
    use crate::core::result::ResultViewer;
    use crate::utils::test_utils::create_test_app;

    #[test]
    fn pasted_text_lands_on_one_line() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::InsertIntoPrompt {
                text: "a pig\nwith wings".into(),
            },
        );
        assert_eq!(app.prompt.text(), "a pig with wings");
    }

    #[test]
    fn focus_reaches_result_only_when_shown() {
        let mut app = create_test_app();
        apply_action(&mut app, AppAction::FocusNext);
        apply_action(&mut app, AppAction::FocusNext);
        assert_eq!(app.ui.focus, UiFocus::Uploader);

        app.result = Some(ResultViewer::new("data:x", None, Vec::new()));
        apply_action(&mut app, AppAction::FocusNext);
        apply_action(&mut app, AppAction::FocusNext);
        assert_eq!(app.ui.focus, UiFocus::Result);
    }

    #[test]
    fn status_and_quit() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::SetStatus {
                message: "hello".into(),
            },
        );
        assert_eq!(app.ui.status.as_ref().map(|s| s.text.as_str()), Some("hello"));
        apply_action(&mut app, AppAction::ClearStatus);
        assert!(app.ui.status.is_none());

        apply_action(&mut app, AppAction::Quit);
        assert!(app.ui.exit_requested);
    }
}
