//! Shared constants used across the application

/// Largest upload accepted by the image uploader (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Prefix of every validation rejection reported to the uploader's listener.
pub const REJECTION_MESSAGE_PREFIX: &str = "檔案類型錯誤或過大";

/// Fixed message reported when a file cannot be read or encoded.
pub const READ_FAILURE_MESSAGE: &str = "讀取檔案時發生錯誤";

/// Reason attached to rejections of unsupported file types.
pub const INVALID_TYPE_REASON: &str = "File type must be image/png,.png,image/jpeg,.jpg,.jpeg";

/// Prefix of generated download filenames; the epoch-millis timestamp and
/// `.png` extension follow.
pub const DOWNLOAD_FILE_PREFIX: &str = "gemini-image-";

/// Environment variable consulted for the generation endpoint's bearer key.
pub const API_KEY_ENV: &str = "IMAGEWAND_API_KEY";
