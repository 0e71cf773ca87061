//! `idlgen clean`: remove staged IDL files and generator output.

use std::fs;
use std::path::Path;

use idlgen_config::resolve_phase;
use idlgen_generate::generator_output_dir;
use tracing::info;

use crate::pipeline::load_project;
use crate::{GlobalArgs, PhaseArgs};

/// Runs the `idlgen clean` command.
///
/// Deletes the phase's staging directory and the generator's output
/// subdirectory. Other files in the output root are left alone.
pub fn run(args: &PhaseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let phase = resolve_phase(&config, &project_dir, args.phase.into());

    remove(&phase.staging_dir)?;
    remove(&generator_output_dir(&config, &phase))?;
    Ok(0)
}

fn remove(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() {
        info!("removing {}", dir.display());
        fs::remove_dir_all(dir).map_err(|e| format!("failed to remove {}: {e}", dir.display()))?;
    }
    Ok(())
}
