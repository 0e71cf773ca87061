//! idlgen CLI: stages IDL files and runs the code generator when they change.
//!
//! Provides `idlgen generate` for the full pipeline, `idlgen sources` to list
//! the aggregated IDL set, `idlgen status` to check staleness without
//! generating, and `idlgen clean` to remove staged and generated files.

#![warn(missing_docs)]

mod clean;
mod generate;
mod pipeline;
mod sources;
mod status;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use idlgen_config::Phase;

/// idlgen: IDL aggregation and generator orchestration.
#[derive(Parser, Debug)]
#[command(name = "idlgen", version, about = "IDL staging and code generation")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `idlgen.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage IDL files and run the generator if outputs are stale.
    Generate(GenerateArgs),
    /// List the aggregated IDL files of a phase.
    Sources(PhaseArgs),
    /// Report whether generated sources are up to date.
    Status(PhaseArgs),
    /// Remove staged IDL files and generator output.
    Clean(PhaseArgs),
}

/// Phase selection shared by every subcommand.
#[derive(Args, Debug)]
pub struct PhaseArgs {
    /// Build phase to operate on.
    #[arg(short, long, value_enum, default_value_t = CliPhase::Main)]
    pub phase: CliPhase,
}

/// Arguments for the `idlgen generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Build phase to generate.
    #[arg(short, long, value_enum, default_value_t = CliPhase::Main)]
    pub phase: CliPhase,

    /// Regenerate even if outputs are newer than every input.
    #[arg(short, long)]
    pub force: bool,
}

/// Build phase selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliPhase {
    /// Production sources.
    Main,
    /// Test sources.
    Test,
}

impl From<CliPhase> for Phase {
    fn from(phase: CliPhase) -> Self {
        match phase {
            CliPhase::Main => Phase::Main,
            CliPhase::Test => Phase::Test,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Sources(ref args) => sources::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
