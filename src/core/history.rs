use serde::{Deserialize, Serialize};

/// Speaker of a recorded conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Model,
}

impl HistoryRole {
    /// Label shown above the turn in the history panel.
    pub fn display_name(self) -> &'static str {
        match self {
            HistoryRole::User => "You",
            HistoryRole::Model => "Gemini",
        }
    }
}

/// A single piece of a turn. Text and image are independent; either, both or
/// neither may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl HistoryPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn image(image: impl Into<String>) -> Self {
        Self {
            text: None,
            image: Some(image.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image.is_none()
    }
}

/// One turn of a recorded exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub role: HistoryRole,
    #[serde(default)]
    pub parts: Vec<HistoryPart>,
}

impl HistoryItem {
    pub fn new(role: HistoryRole, parts: Vec<HistoryPart>) -> Self {
        Self { role, parts }
    }

    /// Builds the user turn for a submitted prompt, attaching the image that
    /// was being edited, if any.
    pub fn user_turn(prompt: &str, image: Option<&str>) -> Self {
        let mut parts = vec![HistoryPart::text(prompt)];
        if let Some(image) = image.filter(|image| !image.is_empty()) {
            parts.push(HistoryPart::image(image));
        }
        Self::new(HistoryRole::User, parts)
    }

    pub fn model_turn(description: Option<&str>, image: &str) -> Self {
        let mut parts = Vec::new();
        if let Some(description) = description {
            parts.push(HistoryPart::text(description));
        }
        parts.push(HistoryPart::image(image));
        Self::new(HistoryRole::Model, parts)
    }
}
