//! Extraction of IDL entries from dependency archives.
//!
//! Each extracted copy is stamped with the archive's modification time, not
//! the entry's: packaging tools often normalize or drop entry timestamps,
//! while the archive file itself changes exactly when the dependency does.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use idlgen_common::{is_idl_name, modified_millis, set_modified_millis, ContentHash, Millis, ARCHIVE_SUFFIX};
use idlgen_project::ArtifactRef;
use tracing::{debug, info, warn};

use crate::error::StageError;
use crate::manifest::{StagedOrigin, StagingManifest};

/// Outcome of staging one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Entries were copied out of the archive.
    Extracted(Vec<PathBuf>),
    /// The archive was unchanged since the last run; staged copies were kept.
    Reused(Vec<PathBuf>),
    /// The artifact had no usable archive and was skipped.
    Skipped,
}

impl Extraction {
    /// Staged files produced or kept, empty when skipped.
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Extraction::Extracted(files) | Extraction::Reused(files) => files,
            Extraction::Skipped => &[],
        }
    }
}

/// Copies IDL entries of dependency archives into `<staging>/<artifact id>/`.
pub struct ArchiveExtractor<'a> {
    staging_dir: &'a Path,
}

impl<'a> ArchiveExtractor<'a> {
    /// Creates an extractor writing below `staging_dir`.
    pub fn new(staging_dir: &'a Path) -> Self {
        Self { staging_dir }
    }

    /// Stages the IDL entries of `artifact`.
    ///
    /// Missing, unreadable, or non-archive backing files are skipped with a
    /// warning. Failing to set a copy's timestamp is also only a warning; the
    /// copy then carries its extraction time, which can only make it look
    /// newer. Errors reading an entry or writing its copy are fatal.
    pub fn extract(
        &self,
        artifact: &ArtifactRef,
        manifest: &mut StagingManifest,
    ) -> Result<Extraction, StageError> {
        let archive_path = &artifact.path;
        info!("extracting IDL files from {}", archive_path.display());

        if !is_archive(archive_path) {
            warn!(
                "dependency {} ({}) isn't a readable archive, skipping",
                artifact.id,
                archive_path.display()
            );
            return Ok(Extraction::Skipped);
        }

        let (file, modified, hash) = match open_archive(archive_path) {
            Ok(opened) => opened,
            Err(e) => {
                warn!(
                    "dependency {} ({}) can't be read: {e}",
                    artifact.id,
                    archive_path.display()
                );
                return Ok(Extraction::Skipped);
            }
        };

        if let Some(files) = manifest.reusable_archive(self.staging_dir, &artifact.id, hash, modified) {
            debug!(artifact = %artifact.id, count = files.len(), "archive unchanged, reusing staged files");
            return Ok(Extraction::Reused(files));
        }

        let mut archive = match zip::ZipArchive::new(file) {
            Ok(archive) => archive,
            Err(e) => {
                warn!(
                    "dependency {} ({}) isn't a valid archive: {e}",
                    artifact.id,
                    archive_path.display()
                );
                return Ok(Extraction::Skipped);
            }
        };

        let dest_root = self.staging_dir.join(&artifact.id);
        fs::create_dir_all(&dest_root).map_err(|e| StageError::io(&dest_root, e))?;

        let mut relative_files = Vec::new();
        let mut files = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| StageError::Archive {
                path: archive_path.clone(),
                source: e,
            })?;
            if entry.is_dir() || !is_idl_name(entry.name()) {
                continue;
            }
            let name = entry.name().to_string();
            let Some(relative) = entry.enclosed_name() else {
                warn!("skipping entry {name} of {}: path escapes the staging area", archive_path.display());
                continue;
            };

            let destination = dest_root.join(&relative);
            info!("extracting {name} to {}", destination.display());
            write_entry(&mut entry, &destination)?;
            stamp(&destination, modified);

            relative_files.push(relative.to_path_buf());
            files.push(destination);
        }

        manifest.record(
            &artifact.id,
            StagedOrigin::Archive { hash, modified },
            relative_files,
        );
        Ok(Extraction::Extracted(files))
    }
}

fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(ARCHIVE_SUFFIX))
}

fn open_archive(path: &Path) -> io::Result<(File, Millis, ContentHash)> {
    let file = File::open(path)?;
    let modified = modified_millis(path)?;
    let hash = ContentHash::from_file(path)?;
    Ok((file, modified, hash))
}

fn write_entry(entry: &mut impl io::Read, destination: &Path) -> Result<(), StageError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| StageError::io(parent, e))?;
    }
    let mut out = File::create(destination).map_err(|e| StageError::io(destination, e))?;
    io::copy(entry, &mut out).map_err(|e| StageError::io(destination, e))?;
    Ok(())
}

/// Propagates `modified` onto a staged copy, warning on failure.
pub(crate) fn stamp(path: &Path, modified: Millis) {
    if let Err(e) = set_modified_millis(path, modified) {
        warn!("fail to set last modified time for {}: {e}", path.display());
    }
}
