//! Staleness checking and guarded generator invocation.
//!
//! [`pipeline::run`] drives one phase: it aggregates the inputs, asks the
//! [`StalenessOracle`] whether the previous outputs are still current, and if
//! not hands the inputs to a [`GenerationCoordinator`], which runs the
//! [`Generator`] exactly once while holding the process-wide
//! [`GeneratorLock`].

#![warn(missing_docs)]

pub mod coordinator;
pub mod error;
pub mod generator;
pub mod lock;
pub mod lookup;
pub mod pipeline;
pub mod staleness;

pub use coordinator::{generator_output_dir, GenerationCoordinator};
pub use error::GenerateError;
pub use generator::{CommandGenerator, GenerationRequest, Generator};
pub use lock::GeneratorLock;
pub use lookup::ArtifactLookup;
pub use pipeline::{assess, collect_inputs, run, run_collected, Outcome, PhaseInputs};
pub use staleness::{generated_outputs, Decision, StalenessOracle};
