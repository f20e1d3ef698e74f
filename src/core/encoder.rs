use std::path::Path;

use base64::Engine as _;
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::upload::{EncodeRequest, ImageMime, UploadError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeMessage {
    Encoded(String),
    Failed,
}

impl EncodeMessage {
    pub fn into_result(self) -> Result<String, UploadError> {
        match self {
            EncodeMessage::Encoded(data_url) => Ok(data_url),
            EncodeMessage::Failed => Err(UploadError::ReadFailure),
        }
    }
}

pub fn encode_data_url(mime: ImageMime, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime.as_str(), payload)
}

/// Reads a file and converts it to a base64 data URL.
pub async fn encode_file(path: &Path, mime: ImageMime) -> Result<String, UploadError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        debug!(path = %path.display(), error = %err, "Failed to read upload");
        UploadError::ReadFailure
    })?;
    Ok(encode_data_url(mime, &bytes))
}

/// Runs encodes on the Tokio runtime and reports each result tagged with the
/// id of the request that produced it.
#[derive(Clone)]
pub struct EncodeService {
    tx: mpsc::UnboundedSender<(EncodeMessage, u64)>,
}

impl EncodeService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(EncodeMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_encode(&self, request: EncodeRequest) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let EncodeRequest {
                request_id,
                path,
                file,
            } = request;

            debug!(request_id, name = %file.name, size = file.size_bytes, "Encoding upload");
            let message = match encode_file(&path, file.mime).await {
                Ok(data_url) => EncodeMessage::Encoded(data_url),
                Err(_) => EncodeMessage::Failed,
            };
            let _ = tx.send((message, request_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: EncodeMessage, request_id: u64) {
        let _ = self.tx.send((message, request_id));
    }
}
