//! `idlgen generate`: the full staging and generation pipeline.

use idlgen_generate::{collect_inputs, run_collected, CommandGenerator, GenerationCoordinator};
use tracing::info;

use crate::pipeline::load_project;
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `idlgen generate` command.
///
/// Prints the compile roots, one per line, whether the generator ran or the
/// previous outputs were current. A project without IDL inputs needs no
/// generator command. Returns exit code 0 whether or not generation was needed.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let inputs = collect_inputs(&project_dir, &config, args.phase.into())?;
    if inputs.aggregation.is_empty() {
        info!("nothing to compile for the {} phase", inputs.phase.phase);
        return Ok(0);
    }

    let generator = CommandGenerator::from_config(&config.generator)?;
    let coordinator = GenerationCoordinator::new(generator);
    let outcome = run_collected(&project_dir, &config, &inputs, args.force, &coordinator)?;

    for root in outcome.compile_roots() {
        println!("{}", root.display());
    }
    Ok(0)
}
