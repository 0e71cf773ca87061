//! Union of IDL files from the local tree, dependency archives, and
//! referenced projects.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use idlgen_project::HostProject;
use idlgen_source::FilePatterns;
use tracing::{debug, info, warn};

use crate::error::StageError;
use crate::extract::{ArchiveExtractor, Extraction};
use crate::filter::filter_dependencies;
use crate::index::StagingIndex;
use crate::manifest::StagingManifest;
use crate::walker::ReferenceWalker;

/// Directories and settings for one aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct AggregateRequest<'a> {
    /// Local IDL source root. Skipped if it doesn't exist.
    pub source_root: &'a Path,
    /// Staging directory shared by archive extraction and reference copies.
    pub staging_dir: &'a Path,
    /// Include/exclude patterns for the local root and reference outputs.
    pub patterns: &'a FilePatterns,
    /// Artifact and project ids eligible for staging.
    pub whitelist: &'a BTreeSet<String>,
    /// Name of the reference output directory below `<project>/target/`.
    pub reference_output: &'a str,
    /// Delete staged artifacts that this run didn't produce.
    pub prune_staging: bool,
}

/// The aggregated input set of one run.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Every input file, deduplicated by path.
    pub files: BTreeSet<PathBuf>,
    /// Staged files keyed by artifact id.
    pub index: StagingIndex,
}

impl Aggregation {
    /// Returns `true` if there is nothing to compile.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Stages dependencies and references, then collects every input file.
///
/// Two origins reaching the same logical file through different paths stay
/// distinct entries; only identical paths collapse.
pub fn aggregate(host: &HostProject, request: &AggregateRequest<'_>) -> Result<Aggregation, StageError> {
    let mut files = BTreeSet::new();

    if request.source_root.exists() {
        let local = request.patterns.match_files(request.source_root)?;
        debug!(count = local.len(), root = %request.source_root.display(), "found local IDL files");
        files.extend(local);
    } else {
        debug!(root = %request.source_root.display(), "local source root doesn't exist");
    }

    let staging_dir = request.staging_dir;
    let mut manifest = StagingManifest::load(staging_dir).unwrap_or_default();
    let mut index = StagingIndex::new();
    let mut touched: HashSet<String> = HashSet::new();

    let dependencies = filter_dependencies(request.whitelist, host.all_artifacts());
    if !dependencies.is_empty() {
        info!("staging IDL files from {} dependencies", dependencies.len());
    }
    let extractor = ArchiveExtractor::new(staging_dir);
    for artifact in &dependencies {
        let extraction = extractor.extract(artifact, &mut manifest)?;
        if extraction != Extraction::Skipped {
            touched.insert(artifact.id.clone());
        }
        for path in extraction.files() {
            index.insert(staging_dir, path.clone());
        }
    }

    let walker = ReferenceWalker::new(
        &host.graph,
        request.whitelist,
        request.reference_output,
        staging_dir,
        request.patterns,
    );
    for path in walker.walk(&mut manifest)? {
        index.insert(staging_dir, path.clone());
        files.insert(path);
    }
    touched.extend(index.artifact_ids().map(str::to_string));

    if request.prune_staging {
        prune(staging_dir, &mut manifest, &touched)?;
    }

    if !manifest.artifacts.is_empty() || staging_dir.exists() {
        if let Err(e) = manifest.save(staging_dir) {
            warn!("failed to write staging manifest: {e}");
        }
    }

    if staging_dir.is_dir() {
        index.scan(staging_dir)?;
    }
    files.extend(index.all_files().map(Path::to_path_buf));

    info!("aggregated {} IDL files", files.len());
    Ok(Aggregation { files, index })
}

/// Removes artifact subdirectories recorded by an earlier run but not
/// produced by this one.
fn prune(
    staging_dir: &Path,
    manifest: &mut StagingManifest,
    touched: &HashSet<String>,
) -> Result<(), StageError> {
    let stale: Vec<String> = manifest
        .artifacts
        .keys()
        .filter(|id| !touched.contains(*id))
        .cloned()
        .collect();
    for id in stale {
        let dir = staging_dir.join(&id);
        if dir.exists() {
            info!("pruning staged files of {id}");
            fs::remove_dir_all(&dir).map_err(|e| StageError::io(&dir, e))?;
        }
        manifest.artifacts.remove(&id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use crate::testutil::{touch, write_jar};
    use idlgen_project::{ArtifactRef, ProjectGraph, ProjectNode};
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
        host: HostProject,
        whitelist: BTreeSet<String>,
        patterns: FilePatterns,
        prune: bool,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let root = ProjectNode::new("svc", tmp.path().join("svc/idlgen.toml"));
            Self {
                host: HostProject {
                    artifacts: Vec::new(),
                    declared_artifacts: Vec::new(),
                    graph: ProjectGraph::new(root),
                },
                tmp,
                whitelist: BTreeSet::new(),
                patterns: FilePatterns::idl_default().unwrap(),
                prune: false,
            }
        }

        fn dir(&self, rel: &str) -> PathBuf {
            self.tmp.path().join(rel)
        }

        fn jar(&mut self, id: &str, entries: &[(&str, &str)]) {
            let path = self.dir(&format!("m2/{id}.jar"));
            write_jar(&path, entries);
            self.host.artifacts.push(ArtifactRef::new(id, path, "compile"));
            self.whitelist.insert(id.to_string());
        }

        fn run(&self) -> Result<Aggregation, StageError> {
            let source_root = self.dir("svc/src/main/thrift");
            let staging_dir = self.dir("svc/target/generated-resources");
            aggregate(
                &self.host,
                &AggregateRequest {
                    source_root: &source_root,
                    staging_dir: &staging_dir,
                    patterns: &self.patterns,
                    whitelist: &self.whitelist,
                    reference_output: "thrift",
                    prune_staging: self.prune,
                },
            )
        }
    }

    #[test]
    fn nothing_configured_yields_empty_set() {
        let fx = Fixture::new();
        let agg = fx.run().unwrap();
        assert!(agg.is_empty());
        assert!(agg.index.is_empty());
        assert!(!fx.dir("svc/target/generated-resources").exists());
    }

    #[test]
    fn unions_all_three_origins() {
        let mut fx = Fixture::new();
        touch(&fx.dir("svc/src/main/thrift"), "svc.thrift", "service Svc {}");
        fx.jar("finagle-thrift", &[("finagle.thrift", "")]);

        let common = fx.host.graph.add_project(ProjectNode::new(
            "common",
            fx.dir("common/idlgen.toml"),
        ));
        let root = fx.host.graph.root();
        fx.host.graph.add_reference(root, "common", common);
        touch(&fx.dir("common/target/thrift"), "common.thrift", "");
        fx.whitelist.insert("common".to_string());

        let agg = fx.run().unwrap();
        let staging = fx.dir("svc/target/generated-resources");
        let expected: BTreeSet<PathBuf> = [
            fx.dir("svc/src/main/thrift/svc.thrift"),
            staging.join("finagle-thrift/finagle.thrift"),
            staging.join("common/common.thrift"),
        ]
        .into_iter()
        .collect();
        assert_eq!(agg.files, expected);
        assert!(agg.index.find("common", "common.thrift").is_some());
        assert!(staging.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn unlisted_artifacts_are_not_extracted() {
        let mut fx = Fixture::new();
        fx.jar("wanted", &[("a.thrift", "")]);
        fx.jar("unwanted", &[("b.thrift", "")]);
        fx.whitelist.remove("unwanted");

        let agg = fx.run().unwrap();
        assert_eq!(agg.files.len(), 1);
        assert!(agg.index.find("unwanted", "b.thrift").is_none());
    }

    #[test]
    fn declared_artifacts_are_consulted() {
        let mut fx = Fixture::new();
        let path = fx.dir("m2/declared.jar");
        write_jar(&path, &[("d.thrift", "")]);
        fx.host
            .declared_artifacts
            .push(ArtifactRef::new("declared", path, "compile"));
        fx.whitelist.insert("declared".to_string());

        let agg = fx.run().unwrap();
        assert!(agg.index.find("declared", "d.thrift").is_some());
    }

    #[test]
    fn source_root_that_is_a_file_is_rejected() {
        let fx = Fixture::new();
        touch(&fx.dir("svc/src/main"), "thrift", "oops");
        assert!(matches!(fx.run(), Err(StageError::Source(_))));
    }

    #[test]
    fn staging_is_additive_by_default() {
        let mut fx = Fixture::new();
        fx.jar("old", &[("old.thrift", "")]);
        fx.run().unwrap();

        fx.whitelist.remove("old");
        let agg = fx.run().unwrap();
        assert!(agg.index.find("old", "old.thrift").is_some());
    }

    #[test]
    fn prune_removes_artifacts_dropped_from_whitelist() {
        let mut fx = Fixture::new();
        fx.jar("old", &[("old.thrift", "")]);
        fx.jar("kept", &[("kept.thrift", "")]);
        fx.run().unwrap();

        fx.whitelist.remove("old");
        fx.prune = true;
        let agg = fx.run().unwrap();

        let staging = fx.dir("svc/target/generated-resources");
        assert!(!staging.join("old").exists());
        assert!(agg.index.find("kept", "kept.thrift").is_some());
        let manifest = StagingManifest::load(&staging).unwrap();
        assert!(!manifest.artifacts.contains_key("old"));
        assert!(manifest.artifacts.contains_key("kept"));
    }

    #[test]
    fn second_run_reuses_unchanged_archives() {
        let mut fx = Fixture::new();
        fx.jar("lib", &[("a.thrift", "struct A {}")]);
        let first = fx.run().unwrap();

        let staged = fx.dir("svc/target/generated-resources/lib/a.thrift");
        fs::write(&staged, "locally edited").unwrap();
        let second = fx.run().unwrap();

        assert_eq!(first.files, second.files);
        assert_eq!(fs::read_to_string(staged).unwrap(), "locally edited");
    }
}
