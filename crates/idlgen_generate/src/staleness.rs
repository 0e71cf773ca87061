//! Timestamp-based decision whether the generator must run again.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use idlgen_common::Millis;
use idlgen_config::StalenessConfig;
use idlgen_source::{FilePatterns, SourceFile};
use tracing::{debug, info};

use crate::error::GenerateError;

/// What to do with a phase's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The input set is empty.
    NothingToCompile,
    /// Existing outputs are newer than every input.
    UpToDate,
    /// The generator must run.
    Generate,
}

/// Compares newest input and output timestamps.
///
/// Generation is skipped iff checking is enabled and
/// `newest_input + stale_millis < newest_output`. The grace delta absorbs
/// coarse timestamp granularity of copies; raising it can only turn skips
/// into regenerations, never the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessOracle {
    check: bool,
    stale_millis: u64,
}

impl StalenessOracle {
    /// Creates an oracle.
    pub fn new(check: bool, stale_millis: u64) -> Self {
        Self { check, stale_millis }
    }

    /// Creates an oracle from the `[staleness]` config section.
    pub fn from_config(config: &StalenessConfig) -> Self {
        Self::new(config.check, config.stale_millis)
    }

    /// An oracle that always regenerates non-empty input sets.
    pub fn always() -> Self {
        Self::new(false, 0)
    }

    /// Returns `true` if outputs at `newest_output` cover inputs at `newest_input`.
    pub fn is_up_to_date(&self, newest_input: Millis, newest_output: Millis) -> bool {
        self.check && newest_input.saturating_add(self.stale_millis) < newest_output
    }

    /// Decides for the given input and previously generated output files.
    pub fn decide(
        &self,
        inputs: &BTreeSet<PathBuf>,
        outputs: &BTreeSet<PathBuf>,
    ) -> Result<Decision, GenerateError> {
        if inputs.is_empty() {
            info!("no IDL files to compile");
            return Ok(Decision::NothingToCompile);
        }
        if !self.check {
            return Ok(Decision::Generate);
        }

        let newest_input = SourceFile::newest(inputs)?;
        let newest_output = SourceFile::newest(outputs)?;
        debug!(%newest_input, %newest_output, stale_millis = self.stale_millis, "comparing timestamps");

        if self.is_up_to_date(newest_input, newest_output) {
            info!("generated sources are up to date");
            Ok(Decision::UpToDate)
        } else {
            Ok(Decision::Generate)
        }
    }
}

/// Lists previously generated files below `dir` ending in one of `suffixes`.
///
/// A missing directory has no outputs.
pub fn generated_outputs(dir: &Path, suffixes: &[String]) -> Result<BTreeSet<PathBuf>, GenerateError> {
    if !dir.is_dir() {
        return Ok(BTreeSet::new());
    }
    let includes: Vec<String> = suffixes.iter().map(|s| format!("**/*.{s}")).collect();
    if includes.is_empty() {
        return Ok(BTreeSet::new());
    }
    let patterns = FilePatterns::new(&includes, std::iter::empty::<&str>())?;
    Ok(patterns.match_files(dir)?)
}
