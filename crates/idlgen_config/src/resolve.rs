//! Phase resolution: merging per-phase overrides with phase defaults.

use crate::types::{PhaseOverrides, ProjectConfig};
use std::fmt;
use std::path::{Path, PathBuf};

/// The build phase a run belongs to.
///
/// Main and test generation read different source roots and write to
/// different output and staging directories, so they never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Production sources.
    Main,
    /// Test sources.
    Test,
}

impl Phase {
    /// Default source root, output dir, staging dir, and reference output name.
    fn defaults(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Phase::Main => (
                "src/main/thrift",
                "target/generated-sources",
                "target/generated-resources",
                "thrift",
            ),
            Phase::Test => (
                "src/test/thrift",
                "target/generated-test-sources",
                "target/generated-test-resources",
                "thrift-test",
            ),
        }
    }

    fn overrides(self, config: &ProjectConfig) -> &PhaseOverrides {
        match self {
            Phase::Main => &config.phases.main,
            Phase::Test => &config.phases.test,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Main => write!(f, "main"),
            Phase::Test => write!(f, "test"),
        }
    }
}

/// Absolute directories for one phase of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPhase {
    /// Which phase these directories belong to.
    pub phase: Phase,
    /// Local IDL source root (may not exist).
    pub source_root: PathBuf,
    /// Root of generated sources; the generator writes into a subdirectory.
    pub output_dir: PathBuf,
    /// Staging directory for dependency and reference IDL files.
    pub staging_dir: PathBuf,
    /// Directory name under a reference project's `target/` holding its IDL.
    pub reference_output: String,
}

/// Resolves the directories of `phase` against `project_dir`.
///
/// Configured overrides win over phase defaults. Relative paths are joined
/// onto the project directory; absolute paths are kept as-is.
pub fn resolve_phase(config: &ProjectConfig, project_dir: &Path, phase: Phase) -> ResolvedPhase {
    let (source_root, output_dir, staging_dir, reference_output) = phase.defaults();
    let overrides = phase.overrides(config);

    let dir = |configured: &Option<String>, default: &str| {
        project_dir.join(configured.as_deref().unwrap_or(default))
    };

    ResolvedPhase {
        phase,
        source_root: dir(&overrides.source_root, source_root),
        output_dir: dir(&overrides.output_dir, output_dir),
        staging_dir: dir(&overrides.resources_dir, staging_dir),
        reference_output: overrides
            .reference_output
            .clone()
            .unwrap_or_else(|| reference_output.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn main_phase_defaults() {
        let config = load_config_from_str("[project]\nname = \"svc\"\n").unwrap();
        let resolved = resolve_phase(&config, Path::new("/work/svc"), Phase::Main);
        assert_eq!(resolved.source_root, PathBuf::from("/work/svc/src/main/thrift"));
        assert_eq!(
            resolved.output_dir,
            PathBuf::from("/work/svc/target/generated-sources")
        );
        assert_eq!(
            resolved.staging_dir,
            PathBuf::from("/work/svc/target/generated-resources")
        );
        assert_eq!(resolved.reference_output, "thrift");
    }

    #[test]
    fn test_phase_defaults() {
        let config = load_config_from_str("[project]\nname = \"svc\"\n").unwrap();
        let resolved = resolve_phase(&config, Path::new("/work/svc"), Phase::Test);
        assert_eq!(resolved.source_root, PathBuf::from("/work/svc/src/test/thrift"));
        assert_eq!(
            resolved.staging_dir,
            PathBuf::from("/work/svc/target/generated-test-resources")
        );
        assert_eq!(resolved.reference_output, "thrift-test");
    }

    #[test]
    fn overrides_replace_defaults() {
        let toml = r#"
[project]
name = "svc"

[phases.main]
source_root = "idl"
output_dir = "/abs/gen"
reference_output = "idl-out"
"#;
        let config = load_config_from_str(toml).unwrap();
        let resolved = resolve_phase(&config, Path::new("/work/svc"), Phase::Main);
        assert_eq!(resolved.source_root, PathBuf::from("/work/svc/idl"));
        assert_eq!(resolved.output_dir, PathBuf::from("/abs/gen"));
        assert_eq!(
            resolved.staging_dir,
            PathBuf::from("/work/svc/target/generated-resources")
        );
        assert_eq!(resolved.reference_output, "idl-out");
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Main.to_string(), "main");
        assert_eq!(Phase::Test.to_string(), "test");
    }
}
