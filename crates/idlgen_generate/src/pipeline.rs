//! The end-to-end run of one phase: stage, aggregate, decide, generate.

use std::path::{Path, PathBuf};

use idlgen_config::{resolve_phase, Phase, ProjectConfig, ResolvedPhase};
use idlgen_project::HostProject;
use idlgen_source::FilePatterns;
use idlgen_stage::{aggregate, AggregateRequest, Aggregation};
use tracing::info;

use crate::coordinator::{generator_output_dir, GenerationCoordinator};
use crate::error::GenerateError;
use crate::generator::Generator;
use crate::staleness::{generated_outputs, Decision, StalenessOracle};

/// The aggregated inputs of one phase.
#[derive(Debug, Clone)]
pub struct PhaseInputs {
    /// Directories of the phase.
    pub phase: ResolvedPhase,
    /// Every IDL input plus the staging index.
    pub aggregation: Aggregation,
}

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No IDL inputs were found.
    NothingToCompile,
    /// Existing outputs were newer than every input. The compile roots
    /// from the previous run are still reported.
    UpToDate(Vec<PathBuf>),
    /// The generator ran; these compile roots should be registered.
    Generated(Vec<PathBuf>),
}

impl Outcome {
    /// Compile roots the caller should register, empty if nothing was compiled.
    pub fn compile_roots(&self) -> &[PathBuf] {
        match self {
            Outcome::NothingToCompile => &[],
            Outcome::UpToDate(roots) | Outcome::Generated(roots) => roots,
        }
    }
}

/// Loads the host project and aggregates the inputs of `phase`.
///
/// Staging happens here, outside the generator lock.
pub fn collect_inputs(
    project_dir: &Path,
    config: &ProjectConfig,
    phase: Phase,
) -> Result<PhaseInputs, GenerateError> {
    let resolved = resolve_phase(config, project_dir, phase);
    let host = HostProject::load(project_dir, config)?;
    let patterns = FilePatterns::new(&config.sources.includes, &config.sources.excludes)?;

    let aggregation = aggregate(
        &host,
        &AggregateRequest {
            source_root: &resolved.source_root,
            staging_dir: &resolved.staging_dir,
            patterns: &patterns,
            whitelist: &config.dependencies.includes,
            reference_output: &resolved.reference_output,
            prune_staging: config.dependencies.prune_staging,
        },
    )?;

    Ok(PhaseInputs {
        phase: resolved,
        aggregation,
    })
}

/// Compares `inputs` against what the generator produced last time.
pub fn assess(
    config: &ProjectConfig,
    inputs: &PhaseInputs,
    oracle: &StalenessOracle,
) -> Result<Decision, GenerateError> {
    let outputs = generated_outputs(
        &generator_output_dir(config, &inputs.phase),
        &config.generator.generated_suffixes,
    )?;
    oracle.decide(&inputs.aggregation.files, &outputs)
}

/// Runs `phase` of the project at `project_dir`.
///
/// With `force`, the staleness check is bypassed and a non-empty input set
/// is always regenerated.
pub fn run<G: Generator>(
    project_dir: &Path,
    config: &ProjectConfig,
    phase: Phase,
    force: bool,
    coordinator: &GenerationCoordinator<G>,
) -> Result<Outcome, GenerateError> {
    let inputs = collect_inputs(project_dir, config, phase)?;
    run_collected(project_dir, config, &inputs, force, coordinator)
}

/// Like [`run`], over inputs already gathered by [`collect_inputs`].
pub fn run_collected<G: Generator>(
    project_dir: &Path,
    config: &ProjectConfig,
    inputs: &PhaseInputs,
    force: bool,
    coordinator: &GenerationCoordinator<G>,
) -> Result<Outcome, GenerateError> {
    let oracle = if force {
        StalenessOracle::always()
    } else {
        StalenessOracle::from_config(&config.staleness)
    };
    let phase = inputs.phase.phase;

    match assess(config, inputs, &oracle)? {
        Decision::NothingToCompile => Ok(Outcome::NothingToCompile),
        Decision::UpToDate => {
            let output_dir = generator_output_dir(config, &inputs.phase);
            info!("{} sources are up to date in {}", phase, output_dir.display());
            Ok(Outcome::UpToDate(vec![output_dir]))
        }
        Decision::Generate => {
            info!(
                "compiling {} IDL files for the {} phase",
                inputs.aggregation.files.len(),
                phase
            );
            let roots = coordinator.generate(config, project_dir, &inputs.phase, &inputs.aggregation)?;
            Ok(Outcome::Generated(roots))
        }
    }
}
