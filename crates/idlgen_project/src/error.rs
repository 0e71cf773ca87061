//! Error types for loading the host project model.

use std::path::PathBuf;

/// Errors raised while assembling the project model.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// A referenced project directory does not exist.
    #[error("referenced project '{name}' not found at {path}")]
    MissingReference {
        /// Reference name as configured.
        name: String,
        /// Directory that was expected to hold the project.
        path: PathBuf,
    },

    /// A referenced project's configuration could not be loaded.
    #[error("failed to load {path}: {source}")]
    Config {
        /// The configuration file that failed.
        path: PathBuf,
        /// The underlying configuration error.
        source: idlgen_config::ConfigError,
    },
}
