//! Staging of IDL outputs from referenced projects.
//!
//! The walk starts at the graph root and visits every project reachable
//! through references. The whitelist is checked per project, so a project
//! that isn't whitelisted still has its references visited.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use idlgen_common::modified_millis;
use idlgen_project::{ProjectGraph, ProjectIdx, ProjectNode};
use idlgen_source::FilePatterns;
use percent_encoding::percent_decode_str;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::StageError;
use crate::extract::stamp;
use crate::manifest::{StagedOrigin, StagingManifest};

/// Copies whitelisted reference outputs into `<staging>/<project id>/`.
pub struct ReferenceWalker<'a> {
    graph: &'a ProjectGraph,
    whitelist: &'a BTreeSet<String>,
    output_name: &'a str,
    staging_dir: &'a Path,
    patterns: &'a FilePatterns,
}

impl<'a> ReferenceWalker<'a> {
    /// Creates a walker over `graph`.
    ///
    /// `output_name` is the directory below `<project>/target/` that holds a
    /// project's IDL outputs for the current phase.
    pub fn new(
        graph: &'a ProjectGraph,
        whitelist: &'a BTreeSet<String>,
        output_name: &'a str,
        staging_dir: &'a Path,
        patterns: &'a FilePatterns,
    ) -> Self {
        Self {
            graph,
            whitelist,
            output_name,
            staging_dir,
            patterns,
        }
    }

    /// Walks the graph from its root and returns every staged copy.
    ///
    /// Each project is visited at most once, so a cyclic graph terminates.
    pub fn walk(&self, manifest: &mut StagingManifest) -> Result<Vec<PathBuf>, StageError> {
        let mut visited = HashSet::new();
        let mut staged = Vec::new();
        self.visit(self.graph.root(), &mut visited, &mut staged, manifest)?;
        Ok(staged)
    }

    fn visit(
        &self,
        idx: ProjectIdx,
        visited: &mut HashSet<ProjectIdx>,
        staged: &mut Vec<PathBuf>,
        manifest: &mut StagingManifest,
    ) -> Result<(), StageError> {
        if !visited.insert(idx) {
            return Ok(());
        }

        let project = self.graph.project(idx);
        if self.whitelist.contains(&project.id) {
            self.stage_project(project, staged, manifest)?;
        }

        for (name, reference) in self.graph.references(idx) {
            debug!(from = %project.id, reference = name, "following project reference");
            self.visit(reference, visited, staged, manifest)?;
        }
        Ok(())
    }

    fn stage_project(
        &self,
        project: &ProjectNode,
        staged: &mut Vec<PathBuf>,
        manifest: &mut StagingManifest,
    ) -> Result<(), StageError> {
        let output_dir = project.target_dir(self.output_name);
        if !output_dir.is_dir() {
            debug!(
                project = %project.id,
                dir = %output_dir.display(),
                "reference output directory doesn't exist"
            );
            return Ok(());
        }

        let dest_root = self.staging_dir.join(&project.id);
        let mut relative_files = Vec::new();
        for file in self.patterns.match_files(&output_dir)? {
            let relative = relative_path(&output_dir, &file)?;
            let destination = dest_root.join(&relative);
            info!("copying {} to {}", file.display(), destination.display());
            copy_preserving_mtime(&file, &destination)?;
            relative_files.push(relative);
            staged.push(destination);
        }

        manifest.record(&project.id, StagedOrigin::Reference, relative_files);
        Ok(())
    }
}

/// Derives the path of `file` relative to `root` by relativizing their
/// `file:` URIs.
///
/// Symlinks are not resolved, so a linked file keeps the path it was found
/// under even when its target lives elsewhere.
fn relative_path(root: &Path, file: &Path) -> Result<PathBuf, StageError> {
    let base = directory_uri(root)?;
    let target = file_uri(file)?;

    let relative = base.make_relative(&target).ok_or_else(|| StageError::Uri {
        path: file.to_path_buf(),
        reason: format!("cannot be made relative to {base}"),
    })?;
    if relative.is_empty() || relative.starts_with("../") {
        return Err(StageError::Uri {
            path: file.to_path_buf(),
            reason: format!("not inside {base}"),
        });
    }

    let decoded = percent_decode_str(&relative)
        .decode_utf8()
        .map_err(|e| StageError::Uri {
            path: file.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(PathBuf::from(decoded.as_ref()))
}

fn directory_uri(dir: &Path) -> Result<Url, StageError> {
    let absolute = absolute(dir)?;
    Url::from_directory_path(&absolute).map_err(|()| StageError::Uri {
        path: absolute,
        reason: "not an absolute path".to_string(),
    })
}

fn file_uri(file: &Path) -> Result<Url, StageError> {
    let absolute = absolute(file)?;
    Url::from_file_path(&absolute).map_err(|()| StageError::Uri {
        path: absolute,
        reason: "not an absolute path".to_string(),
    })
}

fn absolute(path: &Path) -> Result<PathBuf, StageError> {
    std::path::absolute(path).map_err(|e| StageError::Uri {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn copy_preserving_mtime(from: &Path, to: &Path) -> Result<(), StageError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| StageError::io(parent, e))?;
    }
    fs::copy(from, to).map_err(|e| StageError::io(to, e))?;
    match modified_millis(from) {
        Ok(modified) => stamp(to, modified),
        Err(e) => warn!("fail to read last modified time of {}: {e}", from.display()),
    }
    Ok(())
}
