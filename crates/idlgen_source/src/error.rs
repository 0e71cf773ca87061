//! Error types for source discovery.

use std::path::PathBuf;

/// Errors raised while enumerating IDL files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The directory handed to the matcher does not exist or is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// An include or exclude pattern could not be compiled.
    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Why the glob compiler rejected it.
        reason: String,
    },

    /// Walking the directory tree failed.
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// The root being walked.
        path: PathBuf,
        /// The underlying walk error.
        source: walkdir::Error,
    },

    /// Reading a file's metadata failed.
    #[error("failed to read metadata of {path}: {source}")]
    Io {
        /// The file whose metadata was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
