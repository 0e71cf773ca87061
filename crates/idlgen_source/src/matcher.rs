//! Include/exclude pattern matching over a directory tree.
//!
//! Patterns use Ant-style globs relative to the walked root: `*` stays inside
//! one path segment and `**/` matches zero or more directories, so the
//! default `**/*.thrift` picks up IDL files at any depth including the root.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use idlgen_common::DEFAULT_INCLUDE;
use walkdir::WalkDir;

use crate::error::SourceError;

/// Patterns excluded from every scan regardless of configuration
/// (version-control metadata and editor leftovers).
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.svn/**",
    "**/.hg/**",
    "**/CVS/**",
    "**/*~",
    "**/.#*",
    "**/.DS_Store",
];

/// A compiled pair of include and exclude glob sets.
#[derive(Debug, Clone)]
pub struct FilePatterns {
    includes: GlobSet,
    excludes: GlobSet,
    match_all: bool,
}

impl FilePatterns {
    /// Compiles include and exclude patterns.
    ///
    /// An empty include list matches every file. [`DEFAULT_EXCLUDES`] are
    /// always added to the configured excludes.
    pub fn new<I, E>(includes: I, excludes: E) -> Result<Self, SourceError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let includes: Vec<String> = includes.into_iter().map(|p| p.as_ref().to_string()).collect();
        let mut all_excludes: Vec<String> =
            DEFAULT_EXCLUDES.iter().map(|p| (*p).to_string()).collect();
        all_excludes.extend(excludes.into_iter().map(|p| p.as_ref().to_string()));

        Ok(Self {
            match_all: includes.is_empty(),
            includes: compile_globset(&includes)?,
            excludes: compile_globset(&all_excludes)?,
        })
    }

    /// The default IDL patterns: `**/*.thrift`, no configured excludes.
    pub fn idl_default() -> Result<Self, SourceError> {
        Self::new([DEFAULT_INCLUDE], std::iter::empty::<&str>())
    }

    /// Returns `true` if a root-relative path passes the include and exclude sets.
    pub fn is_match(&self, relative: &Path) -> bool {
        (self.match_all || self.includes.is_match(relative)) && !self.excludes.is_match(relative)
    }

    /// Enumerates every regular file below `root` that passes the patterns.
    ///
    /// `root` must exist and be a directory; anything else is a precondition
    /// violation rather than an empty result.
    pub fn match_files(&self, root: &Path) -> Result<BTreeSet<PathBuf>, SourceError> {
        if !root.is_dir() {
            return Err(SourceError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut files = BTreeSet::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| SourceError::Walk {
                path: root.to_path_buf(),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if self.is_match(relative) {
                files.insert(entry.path().to_path_buf());
            }
        }
        tracing::debug!(root = %root.display(), count = files.len(), "matched files");
        Ok(files)
    }
}

/// Enumerates files below `root` matching `includes` and not `excludes`.
pub fn match_files(
    root: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<BTreeSet<PathBuf>, SourceError> {
    FilePatterns::new(includes, excludes)?.match_files(root)
}

fn compile_globset(patterns: &[String]) -> Result<GlobSet, SourceError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| SourceError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| SourceError::InvalidPattern {
        pattern: patterns.join(","),
        reason: e.to_string(),
    })
}
