use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL that generation requests are posted to
    pub endpoint: Option<String>,
    /// Directory generated images are downloaded into
    pub download_dir: Option<PathBuf>,
}

/// Keys accepted by `imagewand set` and `imagewand unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    DownloadDir,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::Endpoint, ConfigKey::DownloadDir];

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "endpoint" => Some(ConfigKey::Endpoint),
            "download-dir" | "download_dir" => Some(ConfigKey::DownloadDir),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::DownloadDir => "download-dir",
        }
    }
}

impl Config {
    pub fn set(&mut self, key: ConfigKey, value: &str) {
        let value = value.trim();
        match key {
            ConfigKey::Endpoint => self.endpoint = Some(value.to_string()),
            ConfigKey::DownloadDir => self.download_dir = Some(PathBuf::from(value)),
        }
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Endpoint => self.endpoint = None,
            ConfigKey::DownloadDir => self.download_dir = None,
        }
    }

    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Endpoint => self.endpoint.clone(),
            ConfigKey::DownloadDir => self.download_dir.as_ref().map(path_display),
        }
    }

    /// Download directory, falling back to the current directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for key in ConfigKey::ALL {
            match self.get(key) {
                Some(value) => println!("  {}: {}", key.as_str(), value),
                None => println!("  {}: (unset)", key.as_str()),
            }
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
