use async_trait::async_trait;
use tracing::debug;

use super::{GenerationError, GenerationRequest, GenerationResponse, ImageGenerator};

/// Posts generation requests as JSON to a single endpoint.
#[derive(Clone)]
pub struct HttpImageGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpImageGenerator {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        debug!(
            endpoint = %self.endpoint,
            editing = request.image.is_some(),
            history_len = request.history.len(),
            "Sending generation request"
        );

        let mut http_request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {key}"));
        }

        let response = http_request
            .json(request)
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(GenerationError::Transport)?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        parse_response(&body)
    }
}

pub(crate) fn parse_response(body: &str) -> Result<GenerationResponse, GenerationError> {
    let response: GenerationResponse =
        serde_json::from_str(body).map_err(|err| GenerationError::Decode(err.to_string()))?;
    if response.image.is_empty() {
        return Err(GenerationError::Decode(
            "response did not contain an image".to_string(),
        ));
    }
    Ok(response)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
}

pub(crate) fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .unwrap_or_else(|| trimmed.to_string());

    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}
