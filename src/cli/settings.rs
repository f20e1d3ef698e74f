//! `imagewand set` and `imagewand unset`.

use std::fmt;

use crate::core::config::{Config, ConfigKey};

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, PartialEq, Eq)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The value is empty or not valid for the key.
    InvalidValue { key: &'static str, reason: String },
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                eprintln!("   Known keys: {}", known.join(", "));
            }
            SettingError::InvalidValue { .. } => eprintln!("❌ {self}"),
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for SettingError {}

fn parse_key(key: &str) -> Result<ConfigKey, SettingError> {
    ConfigKey::parse(key).ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

/// Applies `set <key> <value...>`, joining multi-word values with spaces.
pub fn set_value(config: &mut Config, key: &str, value: &[String]) -> Result<String, SettingError> {
    let key = parse_key(key)?;
    let joined = value.join(" ");
    let joined = joined.trim();
    if joined.is_empty() {
        return Err(SettingError::InvalidValue {
            key: key.as_str(),
            reason: "value must not be empty".to_string(),
        });
    }
    if key == ConfigKey::Endpoint
        && !(joined.starts_with("http://") || joined.starts_with("https://"))
    {
        return Err(SettingError::InvalidValue {
            key: key.as_str(),
            reason: "expected an http:// or https:// URL".to_string(),
        });
    }

    config.set(key, joined);
    Ok(format!("✅ Set {} to: {}", key.as_str(), joined))
}

pub fn unset_value(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let key = parse_key(key)?;
    config.unset(key);
    Ok(format!("✅ Unset {}", key.as_str()))
}
