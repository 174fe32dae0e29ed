use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use apipool_engine::FetchSettings;
use engine_logging::engine_warn;
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "pool.ron";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PoolConfig {
    pub endpoints: Vec<String>,
    pub log_file: PathBuf,
    pub request_timeout_secs: u64,
    pub max_in_flight: Option<usize>,
    pub diagnostics: LogDestination,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            log_file: PathBuf::from("api_pool.log"),
            request_timeout_secs: 10,
            max_in_flight: None,
            diagnostics: LogDestination::Terminal,
        }
    }
}

impl PoolConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_in_flight: self.max_in_flight,
            ..FetchSettings::default()
        }
    }
}

/// Reads a RON config. `Ok(None)` means the file does not exist.
pub(crate) fn load(path: &Path) -> Result<Option<PoolConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

/// Like [`load`], but falls back to the defaults for a missing file.
///
/// The warning is emitted by the caller once logging is up, which needs the
/// config's diagnostics destination first.
pub(crate) fn load_or_default(path: &Path) -> Result<(PoolConfig, bool), ConfigError> {
    Ok(match load(path)? {
        Some(config) => (config, true),
        None => (PoolConfig::default(), false),
    })
}

pub(crate) fn warn_defaulted(path: &Path) {
    engine_warn!("No config at {:?}; using defaults with no endpoints", path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        assert!(load(&path).unwrap().is_none());

        let (config, found) = load_or_default(&path).unwrap();
        assert!(!found);
        assert_eq!(config, PoolConfig::default());
        assert_eq!(
            config.fetch_settings().request_timeout,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pool.ron");
        fs::write(
            &path,
            r#"(
                endpoints: ["https://api.example.com/a", "https://api.example.com/b"],
                max_in_flight: Some(4),
                diagnostics: Both,
            )"#,
        )
        .unwrap();

        let (config, found) = load_or_default(&path).unwrap();
        assert!(found);
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.log_file, PathBuf::from("api_pool.log"));
        assert_eq!(config.diagnostics, LogDestination::Both);
        assert_eq!(config.fetch_settings().max_in_flight, Some(4));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pool.ron");
        fs::write(&path, "(endpoints: [").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
