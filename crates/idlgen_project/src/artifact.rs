//! Resolved dependency artifacts.

use std::path::{Path, PathBuf};

use idlgen_config::ArtifactSpec;

/// A dependency artifact supplied by the host project model.
///
/// Ordering and equality cover every field, so a resolved and a declared
/// entry for the same archive collapse in a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactRef {
    /// Artifact id, used as the staging subdirectory name.
    pub id: String,
    /// Backing archive or directory.
    pub path: PathBuf,
    /// Dependency scope, e.g. `compile` or `test`.
    pub scope: String,
}

impl ArtifactRef {
    /// Creates an artifact reference.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, scope: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            scope: scope.into(),
        }
    }

    /// Builds a reference from a config entry, resolving its path against `base`.
    pub fn from_spec(spec: &ArtifactSpec, base: &Path) -> Self {
        Self::new(&spec.id, base.join(&spec.path), &spec.scope)
    }
}
