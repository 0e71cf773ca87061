//! The single guarded generator invocation of a phase.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use idlgen_config::{ProjectConfig, ResolvedPhase};
use idlgen_stage::Aggregation;
use tracing::{debug, info};

use crate::error::GenerateError;
use crate::generator::{GenerationRequest, Generator};
use crate::lock::GeneratorLock;
use crate::lookup::ArtifactLookup;

/// Prepares and performs generator invocations under a [`GeneratorLock`].
pub struct GenerationCoordinator<G> {
    generator: G,
    lock: Arc<GeneratorLock>,
}

impl<G: Generator> GenerationCoordinator<G> {
    /// Creates a coordinator using the process-wide lock.
    pub fn new(generator: G) -> Self {
        Self::with_lock(generator, GeneratorLock::shared())
    }

    /// Creates a coordinator using `lock`.
    pub fn with_lock(generator: G, lock: Arc<GeneratorLock>) -> Self {
        Self { generator, lock }
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Clears the generator output directory and runs the generator once
    /// over `aggregation`.
    ///
    /// Returns the compile roots the caller should register, which is the
    /// generator output directory.
    pub fn generate(
        &self,
        config: &ProjectConfig,
        project_dir: &Path,
        phase: &ResolvedPhase,
        aggregation: &Aggregation,
    ) -> Result<Vec<PathBuf>, GenerateError> {
        let _guard = self.lock.acquire();

        let output_dir = generator_output_dir(config, phase);
        recreate_dir(&output_dir)?;

        let request = GenerationRequest {
            output_dir: output_dir.clone(),
            inputs: aggregation.files.clone(),
            include_dirs: include_dirs(config, project_dir, phase),
            namespace_map: namespace_map(config),
            include_map: include_map(config, aggregation),
            language: config.generator.language.clone(),
            opts: config.generator.effective_opts(),
        };
        self.generator.compile(&request)?;

        info!("generated {} sources into {}", phase.phase, output_dir.display());
        Ok(vec![output_dir])
    }
}

/// The directory the generator writes into: `<output dir>/<generator name>`.
pub fn generator_output_dir(config: &ProjectConfig, phase: &ResolvedPhase) -> PathBuf {
    phase.output_dir.join(&config.generator.name)
}

fn recreate_dir(dir: &Path) -> Result<(), GenerateError> {
    if dir.exists() {
        debug!(dir = %dir.display(), "clearing generator output");
        fs::remove_dir_all(dir).map_err(|e| GenerateError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| GenerateError::io(dir, e))
}

fn include_dirs(config: &ProjectConfig, project_dir: &Path, phase: &ResolvedPhase) -> BTreeSet<PathBuf> {
    config
        .generator
        .thrift_includes
        .iter()
        .map(|dir| project_dir.join(dir))
        .chain(std::iter::once(phase.staging_dir.clone()))
        .collect()
}

/// Later mappings for the same namespace win.
fn namespace_map(config: &ProjectConfig) -> BTreeMap<String, String> {
    config
        .namespace_mappings
        .iter()
        .map(|m| (m.from.clone(), m.to.clone()))
        .collect()
}

/// Unresolved mappings are left out of the map.
fn include_map(config: &ProjectConfig, aggregation: &Aggregation) -> BTreeMap<String, PathBuf> {
    let lookup = ArtifactLookup::new(aggregation);
    let mut map = BTreeMap::new();
    for mapping in &config.include_mappings {
        match lookup.find(&mapping.artifact_id, &mapping.include) {
            Some(path) => {
                map.insert(mapping.include.clone(), path.to_path_buf());
            }
            None => debug!(
                include = %mapping.include,
                artifact = %mapping.artifact_id,
                "include mapping not found in inputs, omitting"
            ),
        }
    }
    map
}
