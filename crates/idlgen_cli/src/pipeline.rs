//! Shared helpers for CLI commands: logging setup, project root resolution,
//! and config loading.

use std::path::{Path, PathBuf};

use idlgen_config::{load_config, load_config_file, ProjectConfig, CONFIG_FILE};
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Environment variable that overrides the log filter.
const LOG_ENV: &str = "IDLGEN_LOG";

/// Installs the stderr log subscriber.
///
/// `IDLGEN_LOG` takes precedence; otherwise `--quiet` selects `error`,
/// `--verbose` selects `debug`, and the default is `info`.
pub fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn default_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Walks up from `start` looking for the nearest directory containing `idlgen.toml`.
///
/// Returns the directory containing `idlgen.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project directory and loads its configuration.
///
/// If `--config` names a file, that file is loaded and its parent is the
/// project directory; a directory is treated as the project directory.
/// Otherwise walks up from the current directory looking for `idlgen.toml`.
pub fn load_project(global: &GlobalArgs) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            let dir = p
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let config = load_config_file(&p)?;
            return Ok((dir, config));
        }
        let config = load_config(&p)?;
        return Ok((p, config));
    }
    let dir = find_project_root(&std::env::current_dir()?)?;
    let config = load_config(&dir)?;
    Ok((dir, config))
}
