//! Errors raised while reading an `idlgen.toml`.

/// Why an `idlgen.toml` was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read idlgen.toml: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("malformed idlgen.toml: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A name that becomes a directory below the staging or output area
    /// is not a single plain path segment.
    #[error("{field} '{value}' must be a single directory name")]
    InvalidName {
        /// Field the name came from, e.g. `artifacts.id`.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// A namespace or include mapping is incomplete.
    #[error("invalid {kind} mapping '{from}' -> '{to}'")]
    InvalidMapping {
        /// `namespace` or `include`.
        kind: &'static str,
        /// Left-hand side as configured.
        from: String,
        /// Right-hand side as configured.
        to: String,
    },

    /// Any other value that failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
