use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "imagewand=debug";

/// Installs a tracing subscriber writing to `log_file`.
///
/// The terminal belongs to the UI, so without a log file nothing is
/// installed and events are discarded.
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    test_file_access(path)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| format!("Failed to initialize logging: {err}"))?;
    Ok(())
}

fn test_file_access(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(format!("Log directory does not exist: {}", parent.display()).into());
        }
    }
    if path.is_dir() {
        return Err(format!("Log path is a directory: {}", path.display()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_log_file_is_a_no_op() {
        assert!(init_tracing(None).is_ok());
    }

    #[test]
    fn rejects_directory_and_missing_parent() {
        let dir = TempDir::new().unwrap();
        assert!(test_file_access(dir.path()).is_err());
        assert!(test_file_access(&dir.path().join("missing/app.log")).is_err());
        assert!(test_file_access(&dir.path().join("app.log")).is_ok());
    }
}
