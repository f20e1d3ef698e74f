//! Generated image viewer state and downloads.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use tracing::debug;

use crate::core::constants::DOWNLOAD_FILE_PREFIX;
use crate::core::history::HistoryItem;

/// A rendered line of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLine {
    Speaker(&'static str),
    Text(String),
    Image { item: usize, part: usize },
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultViewer {
    image_url: String,
    description: Option<String>,
    history: Vec<HistoryItem>,
    show_history: bool,
}

impl ResultViewer {
    pub fn new(
        image_url: impl Into<String>,
        description: Option<String>,
        history: Vec<HistoryItem>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            description: description.filter(|text| !text.is_empty()),
            history,
            show_history: false,
        }
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    /// History can only be toggled when there is something to show.
    pub fn can_toggle_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_history_visible(&self) -> bool {
        self.show_history && self.can_toggle_history()
    }

    pub fn toggle_history(&mut self) {
        if self.can_toggle_history() {
            self.show_history = !self.show_history;
        }
    }

    pub fn history_toggle_label(&self) -> &'static str {
        if self.show_history {
            "隱藏對話紀錄"
        } else {
            "顯示對話紀錄"
        }
    }

    /// Flattens the history in order: items in sequence, parts in sequence,
    /// each part contributing its text and image independently.
    pub fn history_lines(&self) -> Vec<HistoryLine> {
        let mut lines = Vec::new();
        for (item_index, item) in self.history.iter().enumerate() {
            if item_index > 0 {
                lines.push(HistoryLine::Separator);
            }
            lines.push(HistoryLine::Speaker(item.role.display_name()));
            for (part_index, part) in item.parts.iter().enumerate() {
                if let Some(text) = part.text.as_deref().filter(|text| !text.is_empty()) {
                    lines.push(HistoryLine::Text(text.to_string()));
                }
                if part.image.as_deref().is_some_and(|image| !image.is_empty()) {
                    lines.push(HistoryLine::Image {
                        item: item_index,
                        part: part_index,
                    });
                }
            }
        }
        lines
    }

    pub fn download_request(&self, dir: &Path, epoch_millis: i64) -> DownloadRequest {
        DownloadRequest {
            image_url: self.image_url.clone(),
            target: dir.join(download_filename(epoch_millis)),
        }
    }
}

pub fn download_filename(epoch_millis: i64) -> String {
    format!("{DOWNLOAD_FILE_PREFIX}{epoch_millis}.png")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub image_url: String,
    pub target: PathBuf,
}

#[derive(Debug)]
pub enum DownloadError {
    /// The image reference is neither a data URL nor an http(s) URL.
    UnsupportedSource(String),
    /// The data URL payload is not valid base64.
    Decode(base64::DecodeError),
    Fetch(reqwest::Error),
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::UnsupportedSource(source) => {
                write!(f, "Unsupported image source: {source}")
            }
            DownloadError::Decode(err) => write!(f, "Invalid image data: {err}"),
            DownloadError::Fetch(err) => write!(f, "Failed to fetch image: {err}"),
            DownloadError::Write { path, source } => {
                write!(f, "Failed to save image to {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for DownloadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DownloadError::UnsupportedSource(_) => None,
            DownloadError::Decode(err) => Some(err),
            DownloadError::Fetch(err) => Some(err),
            DownloadError::Write { source, .. } => Some(source),
        }
    }
}

/// Extracts the payload of a base64 data URL.
pub fn decode_data_url(url: &str) -> Option<Result<Vec<u8>, base64::DecodeError>> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    Some(base64::engine::general_purpose::STANDARD.decode(payload.trim()))
}

async fn resolve_image_bytes(
    client: &reqwest::Client,
    image_url: &str,
) -> Result<Vec<u8>, DownloadError> {
    if let Some(decoded) = decode_data_url(image_url) {
        return decoded.map_err(DownloadError::Decode);
    }

    if image_url.starts_with("http://") || image_url.starts_with("https://") {
        let response = client
            .get(image_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(DownloadError::Fetch)?;
        let bytes = response.bytes().await.map_err(DownloadError::Fetch)?;
        return Ok(bytes.to_vec());
    }

    let preview: String = image_url.chars().take(32).collect();
    Err(DownloadError::UnsupportedSource(preview))
}

/// Saves the image to the request's target path.
pub async fn save_image(
    client: &reqwest::Client,
    request: &DownloadRequest,
) -> Result<PathBuf, DownloadError> {
    let bytes = resolve_image_bytes(client, &request.image_url).await?;

    if let Some(dir) = request
        .target
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| DownloadError::Write {
                path: request.target.clone(),
                source,
            })?;
    }

    tokio::fs::write(&request.target, &bytes)
        .await
        .map_err(|source| DownloadError::Write {
            path: request.target.clone(),
            source,
        })?;

    debug!(path = %request.target.display(), bytes = bytes.len(), "Saved generated image");
    Ok(request.target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::{HistoryPart, HistoryRole};
    use tempfile::TempDir;

    fn sample_history() -> Vec<HistoryItem> {
        vec![
            HistoryItem::new(
                HistoryRole::User,
                vec![HistoryPart::text("draw a cat"), HistoryPart::default()],
            ),
            HistoryItem::new(
                HistoryRole::Model,
                vec![
                    HistoryPart {
                        text: Some("here it is".into()),
                        image: Some("data:image/png;base64,AAAA".into()),
                    },
                    HistoryPart::image("data:image/png;base64,BBBB"),
                ],
            ),
        ]
    }

    #[test]
    fn filename_uses_epoch_millis() {
        assert_eq!(download_filename(1700000000123), "gemini-image-1700000000123.png");
    }

    #[test]
    fn toggle_twice_restores_visibility() {
        let mut viewer = ResultViewer::new("data:x", None, sample_history());
        assert!(!viewer.is_history_visible());
        viewer.toggle_history();
        assert!(viewer.is_history_visible());
        viewer.toggle_history();
        assert!(!viewer.is_history_visible());
    }

    #[test]
    fn toggle_is_unavailable_without_history() {
        let mut viewer = ResultViewer::new("data:x", Some("desc".into()), Vec::new());
        assert!(!viewer.can_toggle_history());
        viewer.toggle_history();
        assert!(!viewer.is_history_visible());
    }

    #[test]
    fn empty_description_is_treated_as_absent() {
        let viewer = ResultViewer::new("data:x", Some(String::new()), Vec::new());
        assert_eq!(viewer.description(), None);
    }

    #[test]
    fn history_lines_preserve_item_and_part_order() {
        let viewer = ResultViewer::new("data:x", None, sample_history());
        assert_eq!(
            viewer.history_lines(),
            vec![
                HistoryLine::Speaker("You"),
                HistoryLine::Text("draw a cat".into()),
                HistoryLine::Separator,
                HistoryLine::Speaker("Gemini"),
                HistoryLine::Text("here it is".into()),
                HistoryLine::Image { item: 1, part: 0 },
                HistoryLine::Image { item: 1, part: 1 },
            ]
        );
    }

    #[test]
    fn decode_data_url_requires_base64_marker() {
        assert_eq!(
            decode_data_url("data:image/png;base64,YWJj").map(|r| r.unwrap()),
            Some(b"abc".to_vec())
        );
        assert!(decode_data_url("data:text/plain,hello").is_none());
        assert!(decode_data_url("https://example.com/a.png").is_none());
        assert!(matches!(decode_data_url("data:image/png;base64,@@"), Some(Err(_))));
    }

    #[tokio::test]
    async fn save_image_writes_decoded_bytes() {
        let dir = TempDir::new().unwrap();
        let viewer = ResultViewer::new("data:image/png;base64,YWJj", None, Vec::new());
        let request = viewer.download_request(&dir.path().join("out"), 42);

        let path = save_image(&reqwest::Client::new(), &request).await.unwrap();

        assert_eq!(path, dir.path().join("out").join("gemini-image-42.png"));
        assert_eq!(std::fs::read(path).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn save_image_rejects_unknown_sources() {
        let dir = TempDir::new().unwrap();
        let viewer = ResultViewer::new("ftp://example.com/a.png", None, Vec::new());
        let request = viewer.download_request(dir.path(), 1);

        let err = save_image(&reqwest::Client::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::UnsupportedSource(_)));
    }
}
