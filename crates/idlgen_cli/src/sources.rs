//! `idlgen sources`: list the aggregated IDL set.

use idlgen_generate::collect_inputs;

use crate::pipeline::load_project;
use crate::{GlobalArgs, PhaseArgs};

/// Runs the `idlgen sources` command.
///
/// Stages dependencies and references like `generate` would, then prints
/// every input path on its own line.
pub fn run(args: &PhaseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let inputs = collect_inputs(&project_dir, &config, args.phase.into())?;
    for file in &inputs.aggregation.files {
        println!("{}", file.display());
    }
    Ok(0)
}
