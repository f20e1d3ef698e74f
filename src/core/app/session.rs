use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;

use crate::api::{HttpImageGenerator, ImageGenerator};
use crate::core::config::Config;
use crate::core::constants::API_KEY_ENV;
use crate::core::history::HistoryItem;

/// Backend-facing state: the generation client and the request currently in
/// flight.
pub struct SessionContext {
    pub client: Client,
    pub generator: Option<Arc<dyn ImageGenerator>>,
    pub download_dir: PathBuf,
    /// Id of the generation whose result will be accepted; 0 when idle.
    pub current_generation_id: u64,
    /// User turn recorded locally if the backend returns no transcript.
    pub pending_user_turn: Option<HistoryItem>,
    next_generation_id: u64,
}

impl SessionContext {
    pub fn new(
        client: Client,
        generator: Option<Arc<dyn ImageGenerator>>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            generator,
            download_dir,
            current_generation_id: 0,
            pending_user_turn: None,
            next_generation_id: 0,
        }
    }

    /// Builds a session from configuration, with the CLI endpoint taking
    /// precedence over the configured one.
    pub fn from_config(config: &Config, endpoint_override: Option<String>) -> Self {
        let client = Client::new();
        let endpoint = endpoint_override
            .filter(|endpoint| !endpoint.trim().is_empty())
            .or_else(|| {
                config
                    .endpoint
                    .clone()
                    .filter(|endpoint| !endpoint.trim().is_empty())
            });
        let api_key = std::env::var(API_KEY_ENV).ok();

        let generator = endpoint.map(|endpoint| {
            Arc::new(HttpImageGenerator::new(client.clone(), endpoint, api_key))
                as Arc<dyn ImageGenerator>
        });

        Self::new(client, generator, config.resolved_download_dir())
    }

    pub fn is_generating(&self) -> bool {
        self.current_generation_id != 0
    }

    pub fn begin_generation(&mut self) -> u64 {
        self.next_generation_id += 1;
        self.current_generation_id = self.next_generation_id;
        self.current_generation_id
    }

    /// Ends the generation with `request_id`; returns false for stale ids.
    pub fn finish_generation(&mut self, request_id: u64) -> bool {
        if request_id == 0 || request_id != self.current_generation_id {
            return false;
        }
        self.current_generation_id = 0;
        true
    }

    pub fn abandon_generation(&mut self) {
        self.current_generation_id = 0;
        self.pending_user_turn = None;
    }
}
