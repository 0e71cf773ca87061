//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "idlgen.toml";

/// Loads and validates an `idlgen.toml` configuration from a project directory.
///
/// Reads `<project_dir>/idlgen.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `idlgen.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    // Referenced projects are staged under their name.
    check_dir_name("project.name", &config.project.name)?;
    if config.sources.includes.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::ValidationError(
            "sources.includes contains an empty pattern".to_string(),
        ));
    }
    if config.generator.language.is_empty() {
        return Err(ConfigError::ValidationError(
            "generator.language is empty".to_string(),
        ));
    }
    check_dir_name("generator.name", &config.generator.name)?;
    if let Some(bad) = config
        .generator
        .generated_suffixes
        .iter()
        .find(|s| s.is_empty() || s.contains(|c: char| matches!(c, '/' | '\\' | '.')))
    {
        return Err(ConfigError::ValidationError(format!(
            "generated suffix '{bad}' must be a bare extension"
        )));
    }
    for mapping in &config.namespace_mappings {
        if mapping.from.is_empty() {
            return Err(ConfigError::InvalidMapping {
                kind: "namespace",
                from: mapping.from.clone(),
                to: mapping.to.clone(),
            });
        }
    }
    for mapping in &config.include_mappings {
        if mapping.include.is_empty() || mapping.artifact_id.is_empty() {
            return Err(ConfigError::InvalidMapping {
                kind: "include",
                from: mapping.include.clone(),
                to: mapping.artifact_id.clone(),
            });
        }
        check_dir_name("include_mappings.artifact_id", &mapping.artifact_id)?;
    }
    for artifact in config.artifacts.iter().chain(&config.declared_artifacts) {
        if artifact.id.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "artifacts.id (path '{}')",
                artifact.path
            )));
        }
        check_dir_name("artifacts.id", &artifact.id)?;
    }
    Ok(())
}

/// Rejects names that would not stay one directory below their parent.
fn check_dir_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let plain = !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
    if plain {
        Ok(())
    } else {
        Err(ConfigError::InvalidName {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
