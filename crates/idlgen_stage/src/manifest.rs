//! Staging manifest that records what each artifact contributed.
//!
//! The manifest is stored as `.idlgen-staging.json` in the staging directory.
//! It turns the staging area into a cache keyed by artifact id: archives whose
//! hash and timestamp are unchanged are not re-extracted, and artifacts that
//! disappeared from a run can be pruned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use idlgen_common::{ContentHash, Millis};
use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// Name of the manifest file within the staging directory.
pub const MANIFEST_FILE: &str = ".idlgen-staging.json";

/// Current manifest layout version. Mismatches are treated as a cache miss.
const MANIFEST_VERSION: u32 = 1;

/// Per-artifact record of staged files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingManifest {
    /// Layout version of this manifest.
    pub version: u32,
    /// Staged artifacts keyed by artifact id.
    pub artifacts: BTreeMap<String, StagedArtifact>,
}

/// What one artifact put into the staging area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedArtifact {
    /// Where the files came from.
    pub origin: StagedOrigin,
    /// Staged files, relative to `<staging>/<artifact id>`.
    pub files: Vec<PathBuf>,
}

/// Origin of a staged artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StagedOrigin {
    /// Extracted from a dependency archive.
    Archive {
        /// Content hash of the archive at extraction time.
        hash: ContentHash,
        /// Modification time of the archive at extraction time.
        modified: Millis,
    },
    /// Copied from a reference project's output directory.
    Reference,
}

impl StagingManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self {
            version: MANIFEST_VERSION,
            artifacts: BTreeMap::new(),
        }
    }

    /// Loads the manifest from the staging directory, returning `None` if
    /// the file doesn't exist, can't be parsed, or has another layout version.
    pub fn load(staging_dir: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(staging_dir.join(MANIFEST_FILE)).ok()?;
        let manifest: Self = serde_json::from_str(&content).ok()?;
        (manifest.version == MANIFEST_VERSION).then_some(manifest)
    }

    /// Saves the manifest, creating the staging directory if needed.
    pub fn save(&self, staging_dir: &Path) -> Result<(), StageError> {
        std::fs::create_dir_all(staging_dir).map_err(|e| StageError::io(staging_dir, e))?;
        let path = staging_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StageError::io(&path, std::io::Error::other(e)))?;
        std::fs::write(&path, json).map_err(|e| StageError::io(path, e))
    }

    /// Returns the staged files of `id` if its archive is unchanged.
    ///
    /// The archive must have been recorded with the same hash and timestamp,
    /// and every recorded file must still exist under `staging_dir`.
    pub fn reusable_archive(
        &self,
        staging_dir: &Path,
        id: &str,
        hash: ContentHash,
        modified: Millis,
    ) -> Option<Vec<PathBuf>> {
        let staged = self.artifacts.get(id)?;
        if staged.origin != (StagedOrigin::Archive { hash, modified }) {
            return None;
        }
        let root = staging_dir.join(id);
        let files: Vec<PathBuf> = staged.files.iter().map(|f| root.join(f)).collect();
        files.iter().all(|f| f.is_file()).then_some(files)
    }

    /// Records what `id` contributed in this run, replacing older entries.
    pub fn record(&mut self, id: &str, origin: StagedOrigin, files: Vec<PathBuf>) {
        self.artifacts
            .insert(id.to_string(), StagedArtifact { origin, files });
    }
}

impl Default for StagingManifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_origin() -> StagedOrigin {
        StagedOrigin::Archive {
            hash: ContentHash::from_bytes(b"jar bytes"),
            modified: Millis::new(1_000),
        }
    }

    #[test]
    fn new_manifest_is_empty() {
        let m = StagingManifest::new();
        assert_eq!(m.version, MANIFEST_VERSION);
        assert!(m.artifacts.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = StagingManifest::new();
        m.record("finagle-thrift", archive_origin(), vec![PathBuf::from("a.thrift")]);
        m.record("common", StagedOrigin::Reference, vec![PathBuf::from("x/b.thrift")]);
        m.save(dir.path()).unwrap();

        let loaded = StagingManifest::load(dir.path()).unwrap();
        assert_eq!(loaded.artifacts.len(), 2);
        assert_eq!(loaded.artifacts["finagle-thrift"].origin, archive_origin());
        assert_eq!(loaded.artifacts["common"].origin, StagedOrigin::Reference);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StagingManifest::load(dir.path()).is_none());
    }

    #[test]
    fn load_corrupt_json_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "not valid json {{{").unwrap();
        assert!(StagingManifest::load(dir.path()).is_none());
    }

    #[test]
    fn load_other_version_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = StagingManifest::new();
        m.version = MANIFEST_VERSION + 1;
        m.save(dir.path()).unwrap();
        assert!(StagingManifest::load(dir.path()).is_none());
    }

    #[test]
    fn reusable_when_unchanged_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("lib").join("a.thrift");
        std::fs::create_dir_all(staged.parent().unwrap()).unwrap();
        std::fs::write(&staged, "struct A {}").unwrap();

        let mut m = StagingManifest::new();
        m.record("lib", archive_origin(), vec![PathBuf::from("a.thrift")]);

        let StagedOrigin::Archive { hash, modified } = archive_origin() else {
            unreachable!()
        };
        let files = m.reusable_archive(dir.path(), "lib", hash, modified).unwrap();
        assert_eq!(files, vec![staged]);
    }

    #[test]
    fn not_reusable_when_hash_differs() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = StagingManifest::new();
        m.record("lib", archive_origin(), Vec::new());

        let other = ContentHash::from_bytes(b"new jar bytes");
        assert!(m
            .reusable_archive(dir.path(), "lib", other, Millis::new(1_000))
            .is_none());
    }

    #[test]
    fn not_reusable_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = StagingManifest::new();
        m.record("lib", archive_origin(), vec![PathBuf::from("gone.thrift")]);

        let StagedOrigin::Archive { hash, modified } = archive_origin() else {
            unreachable!()
        };
        assert!(m.reusable_archive(dir.path(), "lib", hash, modified).is_none());
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("target").join("generated-resources");
        StagingManifest::new().save(&nested).unwrap();
        assert!(nested.join(MANIFEST_FILE).exists());
    }
}
