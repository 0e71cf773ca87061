//! Index of staged files keyed by artifact id.
//!
//! The staging layout is `<staging>/<artifact id>/<relative path>`, so the
//! first component below the staging directory names the artifact a file came
//! from. Indexing on that component makes artifact isolation structural and
//! turns include lookups into a map access.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use idlgen_source::FilePatterns;

use crate::error::StageError;

/// Staged IDL files grouped by the artifact that contributed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingIndex {
    by_artifact: BTreeMap<String, BTreeSet<PathBuf>>,
}

impl StagingIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path` under the artifact id taken from its first component
    /// below `staging_dir`.
    ///
    /// Returns `false` and ignores the path if it isn't inside an artifact
    /// subdirectory of `staging_dir`.
    pub fn insert(&mut self, staging_dir: &Path, path: PathBuf) -> bool {
        let Some(id) = artifact_of(staging_dir, &path) else {
            return false;
        };
        self.by_artifact.entry(id).or_default().insert(path);
        true
    }

    /// Adds every IDL file currently present below `staging_dir`.
    ///
    /// This picks up copies left by earlier runs as well as this one's.
    pub fn scan(&mut self, staging_dir: &Path) -> Result<(), StageError> {
        let patterns = FilePatterns::idl_default()?;
        for path in patterns.match_files(staging_dir)? {
            self.insert(staging_dir, path);
        }
        Ok(())
    }

    /// Finds the staged file named `file_name` contributed by `artifact_id`.
    ///
    /// Nested directories are allowed; the first match in path order wins.
    pub fn find(&self, artifact_id: &str, file_name: &str) -> Option<&Path> {
        self.files(artifact_id)
            .find(|p| p.file_name().is_some_and(|n| n == file_name))
    }

    /// Files contributed by `artifact_id`, in path order.
    pub fn files(&self, artifact_id: &str) -> impl Iterator<Item = &Path> {
        self.by_artifact
            .get(artifact_id)
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }

    /// Artifact ids with at least one staged file.
    pub fn artifact_ids(&self) -> impl Iterator<Item = &str> {
        self.by_artifact.keys().map(String::as_str)
    }

    /// Every indexed file, grouped by artifact then in path order.
    pub fn all_files(&self) -> impl Iterator<Item = &Path> {
        self.by_artifact.values().flatten().map(PathBuf::as_path)
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.by_artifact.values().map(BTreeSet::len).sum()
    }

    /// Returns `true` if no file is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_artifact.is_empty()
    }
}

fn artifact_of(staging_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(staging_dir).ok()?;
    let mut components = relative.components();
    let first = match components.next()? {
        Component::Normal(name) => name.to_str()?.to_string(),
        _ => return None,
    };
    // A file directly in the staging dir belongs to no artifact.
    components.next()?;
    Some(first)
}
