mod generation;
mod input;
mod upload;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tui_textarea::Input;

use super::App;
use crate::api::{GenerationRequest, GenerationResponse};
use crate::core::encoder::EncodeMessage;
use crate::core::result::DownloadRequest;
use crate::core::upload::EncodeRequest;

pub enum AppAction {
    DropFiles {
        paths: Vec<PathBuf>,
    },
    EncodeFinished {
        message: EncodeMessage,
        request_id: u64,
    },
    RemoveImage,
    OpenFilePicker,
    CancelFilePicker,
    ConfirmFilePicker,
    EditFilePicker {
        input: Input,
    },
    EditPrompt {
        input: Input,
    },
    InsertIntoPrompt {
        text: String,
    },
    SubmitPrompt,
    GenerationFinished {
        result: Result<GenerationResponse, String>,
        request_id: u64,
    },
    Download,
    DownloadFinished {
        result: Result<PathBuf, String>,
    },
    Reset,
    ToggleHistory,
    FocusNext,
    SetStatus {
        message: String,
    },
    ClearStatus,
    Quit,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(action);
        }
    }
}

#[derive(Debug)]
pub struct GenerationParams {
    pub request_id: u64,
    pub request: GenerationRequest,
}

#[derive(Debug)]
pub enum AppCommand {
    SpawnEncode(EncodeRequest),
    SpawnGeneration(GenerationParams),
    SpawnDownload(DownloadRequest),
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::DropFiles { .. }
        | AppAction::EncodeFinished { .. }
        | AppAction::RemoveImage
        | AppAction::OpenFilePicker
        | AppAction::CancelFilePicker
        | AppAction::ConfirmFilePicker
        | AppAction::EditFilePicker { .. } => upload::handle_upload_action(app, action),

        AppAction::SubmitPrompt
        | AppAction::GenerationFinished { .. }
        | AppAction::Download
        | AppAction::DownloadFinished { .. }
        | AppAction::Reset
        | AppAction::ToggleHistory => generation::handle_generation_action(app, action),

        AppAction::EditPrompt { .. }
        | AppAction::InsertIntoPrompt { .. }
        | AppAction::FocusNext
        | AppAction::SetStatus { .. }
        | AppAction::ClearStatus
        | AppAction::Quit => input::handle_input_action(app, action),
    }
}
