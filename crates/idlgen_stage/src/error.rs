//! Error types for staging operations.
//!
//! Only fatal conditions live here. Recoverable anomalies (an unreadable
//! archive, a timestamp that cannot be set) are logged and skipped by the
//! stage that hits them.

use std::path::PathBuf;

/// Errors that abort staging.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// An I/O error occurred while copying or creating staged files.
    #[error("staging I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading an entry of an opened archive failed.
    #[error("failed to read archive {path}: {source}")]
    Archive {
        /// The archive being extracted.
        path: PathBuf,
        /// The underlying zip error.
        source: zip::result::ZipError,
    },

    /// A canonical file URI could not be formed or relativized.
    #[error("error forming URI for {path}: {reason}")]
    Uri {
        /// The file or directory being converted.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Enumerating IDL files failed.
    #[error(transparent)]
    Source(#[from] idlgen_source::SourceError),
}

impl StageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = StageError::io(
            "/tmp/stage/a/x.thrift",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("staging I/O error"));
        assert!(msg.contains("x.thrift"));
    }

    #[test]
    fn uri_error_display() {
        let err = StageError::Uri {
            path: PathBuf::from("relative/dir"),
            reason: "not an absolute path".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "error forming URI for relative/dir: not an absolute path"
        );
    }

    #[test]
    fn source_error_is_transparent() {
        let err: StageError = idlgen_source::SourceError::NotADirectory {
            path: PathBuf::from("/x"),
        }
        .into();
        assert_eq!(err.to_string(), "/x is not a directory");
    }
}
