//! Payloads and client seam for the image generation backend.

pub mod client;

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::history::HistoryItem;

pub use client::HttpImageGenerator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Data URL of the image being edited, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResponse {
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Full conversation after this turn, when the backend tracks it.
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

#[derive(Debug)]
pub enum GenerationError {
    /// No endpoint was configured for generation requests.
    NotConfigured,
    Transport(reqwest::Error),
    Status { status: u16, summary: String },
    Decode(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NotConfigured => f.write_str(
                "No generation endpoint configured. Use --endpoint or `imagewand set endpoint <url>`.",
            ),
            GenerationError::Transport(err) => write!(f, "Request failed: {err}"),
            GenerationError::Status { status, summary } => {
                write!(f, "API Error ({status}): {summary}")
            }
            GenerationError::Decode(message) => write!(f, "Invalid response: {message}"),
        }
    }
}

impl StdError for GenerationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            GenerationError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Backend that turns a prompt (and optionally an image) into a new image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::{HistoryPart, HistoryRole};

    #[test]
    fn request_omits_empty_optional_fields() {
        let request = GenerationRequest {
            prompt: "a cat".into(),
            image: None,
            history: Vec::new(),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"prompt":"a cat"}"#
        );
    }

    #[test]
    fn request_serializes_history() {
        let request = GenerationRequest {
            prompt: "bluer".into(),
            image: Some("data:image/png;base64,AA==".into()),
            history: vec![HistoryItem::new(
                HistoryRole::User,
                vec![HistoryPart::text("a cat")],
            )],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["image"], "data:image/png;base64,AA==");
        assert_eq!(value["history"][0]["role"], "user");
    }

    #[test]
    fn response_defaults_optional_fields() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"image":"data:image/png;base64,AA=="}"#).unwrap();
        assert_eq!(response.description, None);
        assert!(response.history.is_empty());
    }
}
