//! The generator contract and its external-command implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use idlgen_config::GeneratorConfig;
use tracing::{debug, info, warn};

use crate::error::GenerateError;

/// Everything a generator needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Freshly cleared directory the generator writes into.
    pub output_dir: PathBuf,
    /// Every IDL input of the phase.
    pub inputs: BTreeSet<PathBuf>,
    /// Directories searched for `include` statements.
    pub include_dirs: BTreeSet<PathBuf>,
    /// Namespace remappings, `from` to `to`.
    pub namespace_map: BTreeMap<String, String>,
    /// Include file names resolved to concrete files.
    pub include_map: BTreeMap<String, PathBuf>,
    /// Target language selector.
    pub language: String,
    /// Free-form generator options, passed through verbatim.
    pub opts: BTreeSet<String>,
}

/// A code generator invoked once per phase.
///
/// Implementations need not be thread-safe internally; the coordinator
/// serializes calls.
pub trait Generator: Send + Sync {
    /// Runs the generator for `request`.
    fn compile(&self, request: &GenerationRequest) -> Result<(), GenerateError>;
}

/// Runs the configured generator executable.
///
/// The command line is the configured leading arguments followed by
/// `--dest <dir>`, `--language <lang>`, one `-i <dir>` per include directory,
/// one `-n <from>=<to>` per namespace mapping, one
/// `--include-map <name>=<path>` per resolved include, the free-form options,
/// and finally the input files. Output lines are forwarded to the log.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    /// Creates a generator running `program` with leading `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Creates a generator from the `[generator]` config section.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerateError> {
        let program = config
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerateError::MissingCommand)?;
        Ok(Self::new(program, config.args.clone()))
    }

    /// Builds the argument list for `request`.
    pub fn command_args(&self, request: &GenerationRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push("--dest".into());
        args.push(request.output_dir.clone().into_os_string());
        args.push("--language".into());
        args.push(request.language.clone().into());
        for dir in &request.include_dirs {
            args.push("-i".into());
            args.push(dir.clone().into_os_string());
        }
        for (from, to) in &request.namespace_map {
            args.push("-n".into());
            args.push(format!("{from}={to}").into());
        }
        for (name, path) in &request.include_map {
            let mut mapping = OsString::from(format!("{name}="));
            mapping.push(path);
            args.push("--include-map".into());
            args.push(mapping);
        }
        args.extend(request.opts.iter().map(OsString::from));
        args.extend(request.inputs.iter().map(|p| p.clone().into_os_string()));
        args
    }
}

impl Generator for CommandGenerator {
    fn compile(&self, request: &GenerationRequest) -> Result<(), GenerateError> {
        let args = self.command_args(request);
        debug!(program = %self.program, ?args, "invoking generator");
        info!(
            "generating {} sources from {} IDL files into {}",
            request.language,
            request.inputs.len(),
            request.output_dir.display()
        );

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| GenerateError::Spawn {
                command: self.program.clone(),
                source: e,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            info!(target: "idlgen::generator", "{line}");
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            warn!(target: "idlgen::generator", "{line}");
        }

        if !output.status.success() {
            return Err(GenerateError::GeneratorFailed {
                command: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        Ok(())
    }
}
