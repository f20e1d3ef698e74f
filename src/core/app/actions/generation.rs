use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use tracing::debug;

use super::{App, AppAction, AppCommand, GenerationParams};
use crate::api::{GenerationError, GenerationRequest, GenerationResponse};
use crate::core::app::{StatusKind, UiFocus};
use crate::core::history::HistoryItem;
use crate::core::result::ResultViewer;

pub(super) fn handle_generation_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitPrompt => submit_prompt(app),
        AppAction::GenerationFinished { result, request_id } => {
            if !app.session.finish_generation(request_id) {
                debug!(request_id, "Discarding stale generation result");
                return None;
            }
            let user_turn = app.session.pending_user_turn.take();
            match result {
                Ok(response) => apply_generation_response(app, response, user_turn),
                Err(message) => app.ui.set_status(StatusKind::Error, message),
            }
            None
        }
        AppAction::Download => {
            let viewer = app.result.as_ref()?;
            let millis = chrono::Utc::now().timestamp_millis();
            let request = viewer.download_request(&app.session.download_dir, millis);
            app.ui.set_status(StatusKind::Info, "Saving image...");
            Some(AppCommand::SpawnDownload(request))
        }
        AppAction::DownloadFinished { result } => {
            match result {
                Ok(path) => app
                    .ui
                    .set_status(StatusKind::Info, format!("Saved {}", display_path(&path))),
                Err(message) => app.ui.set_status(StatusKind::Error, message),
            }
            None
        }
        AppAction::Reset => {
            reset(app);
            None
        }
        AppAction::ToggleHistory => {
            if let Some(viewer) = app.result.as_mut() {
                viewer.toggle_history();
            }
            None
        }
        _ => None,
    }
}

fn submit_prompt(app: &mut App) -> Option<AppCommand> {
    let prompt = app.prompt.submit(app.session.is_generating())?;

    if app.session.generator.is_none() {
        app.ui
            .set_status(StatusKind::Error, GenerationError::NotConfigured.to_string());
        return None;
    }

    let request = GenerationRequest {
        prompt,
        image: app.uploader.current_image().map(str::to_string),
        history: app.history.clone(),
    };
    let request_id = app.session.begin_generation();
    app.session.pending_user_turn = Some(HistoryItem::user_turn(
        &request.prompt,
        request.image.as_deref(),
    ));
    app.ui.set_status(StatusKind::Info, "Generating...");

    Some(AppCommand::SpawnGeneration(GenerationParams {
        request_id,
        request,
    }))
}

/// Shows the generated image, records the exchange, and makes the new image
/// the one subsequent prompts edit.
fn apply_generation_response(
    app: &mut App,
    response: GenerationResponse,
    user_turn: Option<HistoryItem>,
) {
    let GenerationResponse {
        image,
        description,
        history,
    } = response;

    if history.is_empty() {
        // No transcript from the backend; record this turn locally.
        app.history.extend(user_turn);
        app.history
            .push(HistoryItem::model_turn(description.as_deref(), &image));
    } else {
        app.history = history;
    }

    app.uploader.set_external_image(image.clone());
    app.result = Some(ResultViewer::new(image, description, app.history.clone()));
    app.ui.focus = UiFocus::Result;
    app.ui.set_status(StatusKind::Info, "Image generated");
}

fn reset(app: &mut App) {
    app.result = None;
    app.history.clear();
    app.uploader.clear();
    app.session.abandon_generation();
    app.ui.focus = UiFocus::Uploader;
    app.ui.clear_status();
}

fn display_path(path: &Path) -> String {
    crate::core::config::path_display(path)
}
