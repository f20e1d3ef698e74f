//! Event polling, dispatching, and UI rendering loop.
//!
//! The loop owns the [`App`] directly. Terminal events are resolved into
//! [`AppAction`]s by the keybinding layer and queued on the dispatcher;
//! background tasks (encodes, generations, downloads) report back through the
//! same queue or the encoder's channel, tagged with the request id that
//! produced them so stale results can be discarded.

use std::{
    error::Error,
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ImageGenerator;
use crate::core::app::{
    apply_actions, App, AppAction, AppActionDispatcher, AppCommand, GenerationParams,
    SessionContext,
};
use crate::core::encoder::{EncodeMessage, EncodeService};
use crate::core::result::{save_image, DownloadRequest};
use crate::ui::renderer::ui;

use super::keybindings::{actions_for_key, actions_for_paste};
use super::lifecycle::{restore_terminal, setup_terminal, AppTerminal};

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_generation(
    generator: Arc<dyn ImageGenerator>,
    dispatcher: AppActionDispatcher,
    params: GenerationParams,
) {
    tokio::spawn(async move {
        let GenerationParams {
            request_id,
            request,
        } = params;
        debug!(request_id, has_image = request.image.is_some(), "Starting generation");

        let result = generator.generate(&request).await.map_err(|err| {
            warn!(request_id, error = %err, "Generation failed");
            err.to_string()
        });

        dispatcher.dispatch_many([AppAction::GenerationFinished { result, request_id }]);
    });
}

fn spawn_download(client: reqwest::Client, dispatcher: AppActionDispatcher, request: DownloadRequest) {
    tokio::spawn(async move {
        let result = save_image(&client, &request).await.map_err(|err| {
            warn!(path = %request.target.display(), error = %err, "Download failed");
            err.to_string()
        });
        dispatcher.dispatch_many([AppAction::DownloadFinished { result }]);
    });
}

fn try_draw_frame(
    app: &App,
    terminal: &mut AppTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    terminal.draw(|f| ui(f, app))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Resolves queued terminal events into actions. Returns whether any event
/// was seen.
fn process_ui_events(
    app: &App,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let mut events_processed = false;

    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                dispatcher.dispatch_many(actions_for_key(app, key));
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                dispatcher.dispatch_many(actions_for_paste(app, &text));
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    events_processed
}

fn process_encode_updates(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(EncodeMessage, u64)>,
) -> bool {
    let mut received_any = false;
    while let Ok((message, request_id)) = rx.try_recv() {
        dispatcher.dispatch_many([AppAction::EncodeFinished {
            message,
            request_id,
        }]);
        received_any = true;
    }
    received_any
}

fn drain_action_queue(
    app: &mut App,
    dispatcher: &AppActionDispatcher,
    encode_service: &EncodeService,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = apply_actions(app, pending);
    for cmd in commands {
        match cmd {
            AppCommand::SpawnEncode(request) => encode_service.spawn_encode(request),
            AppCommand::SpawnGeneration(params) => match app.session.generator.clone() {
                Some(generator) => spawn_generation(generator, dispatcher.clone(), params),
                None => {
                    app.session.abandon_generation();
                }
            },
            AppCommand::SpawnDownload(request) => {
                spawn_download(app.session.client.clone(), dispatcher.clone(), request);
            }
        }
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Runs the interactive UI until the user quits. `initial_image` is handled
/// as if it had been dropped onto the uploader.
pub async fn run_app(
    session: SessionContext,
    initial_image: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(session);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    if let Some(path) = initial_image {
        dispatcher.dispatch_many([AppAction::DropFiles { paths: vec![path] }]);
    }

    let (encode_service, mut encode_rx) = EncodeService::new();

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.ui.exit_requested {
            break Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &mut terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        ) {
            break Err(err.into());
        }

        match terminal.size() {
            Ok(size) if size != app.ui.last_term_size => {
                app.ui.last_term_size = size;
                request_redraw = true;
            }
            _ => {}
        }

        let events_processed = process_ui_events(&app, &mut event_rx, &dispatcher);
        let encodes_received = process_encode_updates(&dispatcher, &mut encode_rx);
        let actions_applied =
            drain_action_queue(&mut app, &dispatcher, &encode_service, &mut action_rx);
        let status_expired = app.ui.expire_status(Instant::now());

        if events_processed || encodes_received || actions_applied || status_expired {
            request_redraw = true;
        }

        let idle = !events_processed && !encodes_received && !actions_applied && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        } else {
            tokio::task::yield_now().await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, create_test_app_with_generator};
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn new_dispatcher() -> (AppActionDispatcher, mpsc::UnboundedReceiver<AppAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppActionDispatcher::new(tx), rx)
    }

    #[test]
    fn key_events_become_actions() {
        let app = create_test_app();
        let (dispatcher, mut action_rx) = new_dispatcher();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event_tx
            .send(UiEvent::Crossterm(Event::Key(KeyEvent::new(
                KeyCode::Tab,
                KeyModifiers::NONE,
            ))))
            .unwrap();

        assert!(process_ui_events(&app, &mut event_rx, &dispatcher));
        assert!(matches!(action_rx.try_recv(), Ok(AppAction::FocusNext)));
        assert!(!process_ui_events(&app, &mut event_rx, &dispatcher));
    }

    #[test]
    fn encode_updates_are_forwarded_with_ids() {
        let (dispatcher, mut action_rx) = new_dispatcher();
        let (service, mut encode_rx) = EncodeService::new();
        service.send_for_test(EncodeMessage::Failed, 7);

        assert!(process_encode_updates(&dispatcher, &mut encode_rx));
        match action_rx.try_recv() {
            Ok(AppAction::EncodeFinished {
                message,
                request_id,
            }) => {
                assert_eq!(message, EncodeMessage::Failed);
                assert_eq!(request_id, 7);
            }
            _ => panic!("expected encode action"),
        }
    }

    #[tokio::test]
    async fn dropped_file_is_encoded_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, b"png").unwrap();

        let mut app = create_test_app();
        let (dispatcher, mut action_rx) = new_dispatcher();
        let (service, mut encode_rx) = EncodeService::new();

        dispatcher.dispatch_many([AppAction::DropFiles { paths: vec![path] }]);
        assert!(drain_action_queue(&mut app, &dispatcher, &service, &mut action_rx));
        assert!(app.uploader.is_loading());

        let (message, request_id) = encode_rx.recv().await.expect("encode result");
        dispatcher.dispatch_many([AppAction::EncodeFinished {
            message,
            request_id,
        }]);
        drain_action_queue(&mut app, &dispatcher, &service, &mut action_rx);

        assert_eq!(app.uploader.current_image(), Some("data:image/png;base64,cG5n"));
        assert!(app.is_editing());
    }

    #[tokio::test]
    async fn generation_result_returns_through_dispatcher() {
        let mut app = create_test_app_with_generator();
        let (dispatcher, mut action_rx) = new_dispatcher();
        let (service, _encode_rx) = EncodeService::new();

        app.prompt.set_text("a pig");
        dispatcher.dispatch_many([AppAction::SubmitPrompt]);
        drain_action_queue(&mut app, &dispatcher, &service, &mut action_rx);
        assert!(app.is_generating());

        let action = action_rx.recv().await.expect("generation result");
        assert!(matches!(action, AppAction::GenerationFinished { .. }));
        crate::core::app::apply_action(&mut app, action);

        assert!(!app.is_generating());
        assert_eq!(
            app.result.as_ref().map(|r| r.image_url()),
            Some("data:image/png;base64,c3R1Yg==")
        );
    }
}
