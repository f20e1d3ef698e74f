use std::path::PathBuf;

use super::{App, AppAction, AppCommand};
use crate::core::upload::UploadError;
use crate::utils::paste::parse_dropped_paths;

pub(super) fn handle_upload_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::DropFiles { paths } => drop_files(app, &paths),
        AppAction::EncodeFinished {
            message,
            request_id,
        } => {
            let result: Result<String, UploadError> = message.into_result();
            let mut listener = App::upload_listener(&mut app.ui);
            app.uploader.complete(request_id, result, &mut listener);
            None
        }
        AppAction::RemoveImage => {
            let mut listener = App::upload_listener(&mut app.ui);
            app.uploader.remove(&mut listener);
            None
        }
        AppAction::OpenFilePicker => {
            app.ui.open_file_picker();
            None
        }
        AppAction::CancelFilePicker => {
            app.ui.close_file_picker();
            None
        }
        AppAction::ConfirmFilePicker => {
            let typed = app.ui.close_file_picker()?;
            let paths = parse_dropped_paths(&typed);
            drop_files(app, &paths)
        }
        AppAction::EditFilePicker { input } => {
            if let Some(textarea) = app.ui.file_picker_mut() {
                textarea.input(input);
            }
            None
        }
        _ => None,
    }
}

fn drop_files(app: &mut App, paths: &[PathBuf]) -> Option<AppCommand> {
    let mut listener = App::upload_listener(&mut app.ui);
    let request = app.uploader.drop_files(paths, &mut listener)?;
    app.ui.clear_status();
    Some(AppCommand::SpawnEncode(request))
}
