//! `idlgen status`: staleness check without generating.

use idlgen_generate::{assess, collect_inputs, Decision, StalenessOracle};

use crate::pipeline::load_project;
use crate::{GlobalArgs, PhaseArgs};

/// Runs the `idlgen status` command.
///
/// Returns exit code 0 when outputs are current or there is nothing to
/// compile, 1 when the generator would run.
pub fn run(args: &PhaseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let inputs = collect_inputs(&project_dir, &config, args.phase.into())?;
    let decision = assess(&config, &inputs, &StalenessOracle::from_config(&config.staleness))?;

    println!("{}", describe(decision));
    Ok(exit_code(decision))
}

fn describe(decision: Decision) -> &'static str {
    match decision {
        Decision::NothingToCompile => "no sources",
        Decision::UpToDate => "up to date",
        Decision::Generate => "stale",
    }
}

fn exit_code(decision: Decision) -> i32 {
    match decision {
        Decision::Generate => 1,
        Decision::NothingToCompile | Decision::UpToDate => 0,
    }
}
