//! `imagewand encode`: run a file through upload validation and print its
//! data URL.

use std::error::Error;
use std::path::Path;

use crate::core::encoder::encode_file;
use crate::core::upload::validate_file;

pub async fn encode_to_data_url(path: &Path) -> Result<String, Box<dyn Error>> {
    let file = validate_file(path)?;
    let data_url = encode_file(path, file.mime).await?;
    Ok(data_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::REJECTION_MESSAGE_PREFIX;
    use tempfile::TempDir;

    #[tokio::test]
    async fn encodes_accepted_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.JPG");
        std::fs::write(&path, b"jpg").unwrap();

        let url = encode_to_data_url(&path).await.unwrap();
        assert_eq!(url, "data:image/jpeg;base64,anBn");
    }

    #[tokio::test]
    async fn rejection_message_is_surfaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.gif");
        std::fs::write(&path, b"gif").unwrap();

        let err = encode_to_data_url(&path).await.unwrap_err();
        assert!(err.to_string().starts_with(REJECTION_MESSAGE_PREFIX));
    }
}
