//! Startup errors
//!
//! Only conditions that prevent the store from even attempting to load its
//! snapshot are fatal. Damaged snapshot content is logged and ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`Store::open`](crate::Store::open)
#[derive(Debug, Error)]
pub enum OpenError {
    /// Filesystem failure on a path the store needs
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration rejected before touching the filesystem
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The snapshot path exists but is not a regular file
    #[error("Snapshot path '{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),

    /// The snapshot worker thread could not be started
    #[error("Failed to spawn snapshot worker: {0}")]
    Spawn(#[source] std::io::Error),
}

impl OpenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OpenError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_path() {
        let err = OpenError::io(
            "/var/lib/agenda",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/var/lib/agenda"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_not_a_file_display() {
        let err = OpenError::NotAFile(PathBuf::from("/tmp/events"));
        assert_eq!(
            err.to_string(),
            "Snapshot path '/tmp/events' is not a regular file"
        );
    }
}
