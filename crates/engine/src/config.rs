//! Store configuration
//!
//! A store needs two things: where its snapshot lives and how often the
//! background worker checks for changes. Both can come from code or from a
//! small TOML file:
//!
//! ```toml
//! snapshot_path = "/var/lib/agenda/events.snap"
//! # Optional, default 5000
//! flush_interval_ms = 5000
//! ```

use crate::error::OpenError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default snapshot file name, relative to the working directory
pub const DEFAULT_SNAPSHOT_FILE: &str = "event_storage.snap";

/// Default time between background flush checks
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest flush interval the TOML form can express
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(1);

fn default_flush_interval_ms() -> u64 {
    interval_to_ms(DEFAULT_FLUSH_INTERVAL)
}

/// Whole milliseconds, rounded up so a valid interval never becomes zero
fn interval_to_ms(interval: Duration) -> u64 {
    let ms = interval.as_millis();
    let ms = if interval.subsec_nanos() % 1_000_000 != 0 {
        ms + 1
    } else {
        ms
    };
    u64::try_from(ms).unwrap_or(u64::MAX)
}

/// On-disk form of [`StoreConfig`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    snapshot_path: PathBuf,
    #[serde(default = "default_flush_interval_ms")]
    flush_interval_ms: u64,
}

/// Immutable settings supplied when a store is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Where the snapshot file is read from and written to
    pub snapshot_path: PathBuf,
    /// Period of the background flush timer
    pub flush_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Config with the default flush interval
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    /// Replace the flush interval
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Reject settings the store cannot run with
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero flush interval or an empty path.
    pub fn validate(&self) -> Result<(), OpenError> {
        if self.flush_interval < MIN_FLUSH_INTERVAL {
            return Err(OpenError::InvalidConfig(format!(
                "flush_interval must be at least {}ms",
                MIN_FLUSH_INTERVAL.as_millis()
            )));
        }
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(OpenError::InvalidConfig(
                "snapshot_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse config from TOML text
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the text does not parse or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, OpenError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| OpenError::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        let config = StoreConfig {
            snapshot_path: file.snapshot_path,
            flush_interval: Duration::from_millis(file.flush_interval_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `InvalidConfig` if it cannot
    /// be parsed.
    pub fn from_file(path: &Path) -> Result<Self, OpenError> {
        let content = std::fs::read_to_string(path).map_err(|e| OpenError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            OpenError::InvalidConfig(msg) => {
                OpenError::InvalidConfig(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize this config to TOML
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the path is not valid UTF-8.
    pub fn to_toml_string(&self) -> Result<String, OpenError> {
        let file = ConfigFile {
            snapshot_path: self.snapshot_path.clone(),
            flush_interval_ms: interval_to_ms(self.flush_interval),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| OpenError::InvalidConfig(format!("Failed to serialize config: {}", e)))
    }
}
