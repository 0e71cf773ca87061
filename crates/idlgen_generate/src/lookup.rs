//! Resolution of include mappings to concrete files.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

use idlgen_stage::{Aggregation, StagingIndex};

/// Finds the file named `name` that came from artifact `id`.
///
/// Staged files are looked up through the staging index. Files outside the
/// staging area (local sources) match when one of their directory components
/// equals the artifact id; that index is built once up front.
pub struct ArtifactLookup<'a> {
    index: &'a StagingIndex,
    by_component: HashMap<&'a str, Vec<&'a Path>>,
}

impl<'a> ArtifactLookup<'a> {
    /// Builds the lookup over an aggregated input set.
    pub fn new(aggregation: &'a Aggregation) -> Self {
        let staged: HashSet<&Path> = aggregation.index.all_files().collect();
        let mut by_component: HashMap<&'a str, Vec<&'a Path>> = HashMap::new();
        for file in &aggregation.files {
            if staged.contains(file.as_path()) {
                continue;
            }
            let Some(parent) = file.parent() else { continue };
            for component in parent.components() {
                if let Component::Normal(name) = component {
                    if let Some(name) = name.to_str() {
                        by_component.entry(name).or_default().push(file.as_path());
                    }
                }
            }
        }
        Self {
            index: &aggregation.index,
            by_component,
        }
    }

    /// Returns the first file named `file_name` under artifact `artifact_id`.
    pub fn find(&self, artifact_id: &str, file_name: &str) -> Option<&'a Path> {
        let index: &'a StagingIndex = self.index;
        index.find(artifact_id, file_name).or_else(|| {
            self.by_component
                .get(artifact_id)?
                .iter()
                .find(|p| p.file_name().is_some_and(|n| n == file_name))
                .copied()
        })
    }
}
