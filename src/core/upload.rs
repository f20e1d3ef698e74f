//! Image upload state and validation.
//!
//! The uploader owns the single upload state value for the application:
//! `Empty`, `Loading` while a file is being encoded, or `Ready` once a data URL
//! is available. Results are reported through an [`UploadListener`], which
//! stands in for the image-selected and error callbacks of the caller.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::byte_size::format_file_size;
use crate::core::constants::{
    INVALID_TYPE_REASON, MAX_UPLOAD_BYTES, READ_FAILURE_MESSAGE, REJECTION_MESSAGE_PREFIX,
};

/// Image types accepted by the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Png,
    Jpeg,
}

impl ImageMime {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }

    /// Resolves the MIME type from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(ImageMime::Png),
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }
}

/// Metadata of a file that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime: ImageMime,
}

impl UploadedFile {
    pub fn display_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// Failure of a single upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The file failed type or size validation; carries the reason.
    Rejected(String),
    /// Reading or encoding the accepted file failed.
    ReadFailure,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Rejected(reason) => write!(f, "{REJECTION_MESSAGE_PREFIX}: {reason}"),
            UploadError::ReadFailure => f.write_str(READ_FAILURE_MESSAGE),
        }
    }
}

impl StdError for UploadError {}

/// Receives the outcome of upload attempts.
///
/// `on_image_select` is called with a data URL when an encode succeeds and
/// with an empty string when the image is removed. The default `on_error`
/// drops the message, matching a caller that registered no error handler.
pub trait UploadListener {
    fn on_image_select(&mut self, image: String);

    fn on_error(&mut self, _message: String) {}
}

/// Work item handed to the encoder for an accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub request_id: u64,
    pub path: PathBuf,
    pub file: UploadedFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyUpload {
    /// Absent when the image was supplied by the caller rather than a file.
    pub file: Option<UploadedFile>,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Empty,
    Loading {
        file: UploadedFile,
        request_id: u64,
        /// Upload restored if this read fails.
        previous: Option<ReadyUpload>,
    },
    Ready(ReadyUpload),
}

/// Checks a candidate file against the accepted types and size limit.
pub fn validate_file(path: &Path) -> Result<UploadedFile, UploadError> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| UploadError::Rejected(format!("File not found: {}", path.display())))?;

    let mime = ImageMime::from_path(path)
        .filter(|_| metadata.is_file())
        .ok_or_else(|| UploadError::Rejected(INVALID_TYPE_REASON.to_string()))?;

    let size_bytes = metadata.len();
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::Rejected(format!(
            "File is larger than {MAX_UPLOAD_BYTES} bytes"
        )));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadedFile {
        name,
        size_bytes,
        mime,
    })
}

#[derive(Debug, Default)]
pub struct ImageUploader {
    state: UploadState,
    next_request_id: u64,
}

impl ImageUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, UploadState::Loading { .. })
    }

    /// The image an edit would apply to. While a replacement is loading this
    /// is still the image that was ready before the drop.
    pub fn current_image(&self) -> Option<&str> {
        match &self.state {
            UploadState::Ready(ready) => Some(ready.image.as_str()),
            UploadState::Loading { previous, .. } => {
                previous.as_ref().map(|ready| ready.image.as_str())
            }
            UploadState::Empty => None,
        }
    }

    /// Metadata shown next to the current or loading image.
    pub fn current_file(&self) -> Option<&UploadedFile> {
        match &self.state {
            UploadState::Loading { file, .. } => Some(file),
            UploadState::Ready(ready) => ready.file.as_ref(),
            UploadState::Empty => None,
        }
    }

    /// Handles a drop or picker selection. Only the first path is considered.
    ///
    /// Returns the encode request for an accepted file. A rejected file
    /// reports one error and leaves the state untouched.
    pub fn drop_files<L: UploadListener + ?Sized>(
        &mut self,
        paths: &[PathBuf],
        listener: &mut L,
    ) -> Option<EncodeRequest> {
        let path = paths.first()?;

        let file = match validate_file(path) {
            Ok(file) => file,
            Err(err) => {
                listener.on_error(err.to_string());
                return None;
            }
        };

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let previous = match std::mem::take(&mut self.state) {
            UploadState::Ready(ready) => Some(ready),
            UploadState::Loading { previous, .. } => previous,
            UploadState::Empty => None,
        };

        self.state = UploadState::Loading {
            file: file.clone(),
            request_id,
            previous,
        };

        Some(EncodeRequest {
            request_id,
            path: path.clone(),
            file,
        })
    }

    /// Applies the result of an encode. Completions for any request other
    /// than the one in flight are stale and ignored; returns whether the
    /// result was applied.
    pub fn complete<L: UploadListener + ?Sized>(
        &mut self,
        request_id: u64,
        result: Result<String, UploadError>,
        listener: &mut L,
    ) -> bool {
        let in_flight =
            matches!(self.state, UploadState::Loading { request_id: id, .. } if id == request_id);
        if !in_flight {
            return false;
        }

        let UploadState::Loading { file, previous, .. } = std::mem::take(&mut self.state) else {
            return false;
        };

        match result {
            Ok(image) => {
                self.state = UploadState::Ready(ReadyUpload {
                    file: Some(file),
                    image: image.clone(),
                });
                listener.on_image_select(image);
            }
            Err(err) => {
                self.state = previous.map(UploadState::Ready).unwrap_or_default();
                listener.on_error(err.to_string());
            }
        }
        true
    }

    /// User-initiated removal. Always ends empty and signals "no image".
    pub fn remove<L: UploadListener + ?Sized>(&mut self, listener: &mut L) {
        self.state = UploadState::Empty;
        listener.on_image_select(String::new());
    }

    /// Clears the current image on behalf of the caller, dropping any file
    /// metadata with it.
    pub fn clear(&mut self) {
        self.state = UploadState::Empty;
    }

    /// Installs an image that did not come from a file. An empty string
    /// clears the uploader.
    pub fn set_external_image(&mut self, image: impl Into<String>) {
        let image = image.into();
        if image.is_empty() {
            self.clear();
        } else {
            self.state = UploadState::Ready(ReadyUpload { file: None, image });
        }
    }
}
