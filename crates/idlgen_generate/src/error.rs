//! Error types for the generation pipeline.

use std::path::PathBuf;

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Clearing or creating the generator output directory failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// No generator command is configured.
    #[error("no generator command configured; set `generator.command` in idlgen.toml")]
    MissingCommand,

    /// The generator process could not be started.
    #[error("failed to run generator `{command}`: {source}")]
    Spawn {
        /// The configured command.
        command: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The generator ran and reported failure.
    #[error("generator `{command}` failed: {status}")]
    GeneratorFailed {
        /// The configured command.
        command: String,
        /// Exit status description.
        status: String,
    },

    /// Enumerating inputs or outputs failed.
    #[error(transparent)]
    Source(#[from] idlgen_source::SourceError),

    /// Staging dependency or reference IDL files failed.
    #[error(transparent)]
    Stage(#[from] idlgen_stage::StageError),

    /// The host project model could not be loaded.
    #[error(transparent)]
    Project(#[from] idlgen_project::ProjectError),
}

impl GenerateError {
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
    fn generator_failed_display() {
        let err = GenerateError::GeneratorFailed {
            command: "scrooge".to_string(),
            status: "exit status: 2".to_string(),
        };
        assert_eq!(err.to_string(), "generator `scrooge` failed: exit status: 2");
    }

    #[test]
    fn missing_command_mentions_key() {
        assert!(GenerateError::MissingCommand
            .to_string()
            .contains("generator.command"));
    }

    #[test]
    fn stage_error_is_transparent() {
        let stage = idlgen_stage::StageError::Uri {
            path: PathBuf::from("x"),
            reason: "bad".to_string(),
        };
        let err: GenerateError = stage.into();
        assert_eq!(err.to_string(), "error forming URI for x: bad");
    }
}
