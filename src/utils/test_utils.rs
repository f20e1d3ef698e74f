use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{GenerationError, GenerationRequest, GenerationResponse, ImageGenerator};
use crate::core::app::{App, SessionContext};

/// Generator that echoes a fixed image back.
pub struct StubGenerator {
    pub image: String,
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        Ok(GenerationResponse {
            image: self.image.clone(),
            description: None,
            history: Vec::new(),
        })
    }
}

/// App with no generation endpoint configured.
pub fn create_test_app() -> App {
    App::new(SessionContext::new(
        reqwest::Client::new(),
        None,
        ".".into(),
    ))
}

pub fn create_test_app_with_generator() -> App {
    let generator: Arc<dyn ImageGenerator> = Arc::new(StubGenerator {
        image: "data:image/png;base64,c3R1Yg==".to_string(),
    });
    App::new(SessionContext::new(
        reqwest::Client::new(),
        Some(generator),
        ".".into(),
    ))
}
