//! Configuration types deserialized from `idlgen.toml`.

use idlgen_common::DEFAULT_INCLUDE;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

/// The top-level project configuration parsed from `idlgen.toml`.
///
/// Besides generator settings this also carries the host project model the
/// pipeline reads: resolved and declared artifacts plus sibling references.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata; `name` doubles as this project's artifact id.
    pub project: ProjectMeta,
    /// Local IDL discovery patterns.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Generator invocation settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Timestamp-based skip settings.
    #[serde(default)]
    pub staleness: StalenessConfig,
    /// Dependency whitelist and staging-area policy.
    #[serde(default)]
    pub dependencies: DependenciesConfig,
    /// IDL namespace remaps handed verbatim to the generator.
    #[serde(default)]
    pub namespace_mappings: Vec<NamespaceMapping>,
    /// Include remaps resolved against staged artifacts.
    #[serde(default)]
    pub include_mappings: Vec<IncludeMapping>,
    /// Resolved dependency artifacts.
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
    /// Declared dependency artifacts (possibly unresolved).
    #[serde(default)]
    pub declared_artifacts: Vec<ArtifactSpec>,
    /// Sibling projects in the build graph, name to directory.
    #[serde(default)]
    pub references: BTreeMap<String, String>,
    /// Per-phase directory overrides.
    #[serde(default)]
    pub phases: PhasesConfig,
}

/// Core project metadata required in every `idlgen.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project's artifact id.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Include and exclude globs for the local source root.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Include patterns (default `**/*.thrift`).
    #[serde(default = "default_includes", deserialize_with = "deserialize_string_or_vec")]
    pub includes: Vec<String>,
    /// Exclude patterns (default none).
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub excludes: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            excludes: Vec::new(),
        }
    }
}

fn default_includes() -> Vec<String> {
    vec![DEFAULT_INCLUDE.to_string()]
}

/// Settings for the external generator.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Executable to run. Required only when generation actually happens.
    #[serde(default)]
    pub command: Option<String>,
    /// Fixed leading arguments passed before everything else.
    #[serde(default)]
    pub args: Vec<String>,
    /// Target language selector (default `"scala"`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Output subdirectory and compile-root name (default `"scrooge"`).
    #[serde(default = "default_generator_name")]
    pub name: String,
    /// Free-form options forwarded to the generator.
    #[serde(default, deserialize_with = "deserialize_string_or_set")]
    pub opts: BTreeSet<String>,
    /// Extra include directories for IDL `include` resolution.
    #[serde(default)]
    pub thrift_includes: BTreeSet<String>,
    /// Ask the generator to emit non-zero hash codes.
    #[serde(default)]
    pub fix_hashcode: bool,
    /// Suffixes (without the dot) of files the generator produces.
    #[serde(default = "default_generated_suffixes")]
    pub generated_suffixes: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            language: default_language(),
            name: default_generator_name(),
            opts: BTreeSet::new(),
            thrift_includes: BTreeSet::new(),
            fix_hashcode: false,
            generated_suffixes: default_generated_suffixes(),
        }
    }
}

/// Option appended when `fix_hashcode` is set.
pub const FIX_HASHCODE_OPT: &str = "--fix-hashcode";

impl GeneratorConfig {
    /// Returns the configured opts plus any flag-derived options.
    pub fn effective_opts(&self) -> BTreeSet<String> {
        let mut opts = self.opts.clone();
        if self.fix_hashcode {
            opts.insert(FIX_HASHCODE_OPT.to_string());
        }
        opts
    }
}

fn default_language() -> String {
    "scala".to_string()
}

fn default_generator_name() -> String {
    "scrooge".to_string()
}

fn default_generated_suffixes() -> Vec<String> {
    vec!["java".to_string(), "scala".to_string()]
}

/// Staleness check settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StalenessConfig {
    /// Skip generation when outputs are newer than inputs (default `true`).
    #[serde(default = "default_true")]
    pub check: bool,
    /// Grace delta in milliseconds added to the newest input time.
    #[serde(default)]
    pub stale_millis: u64,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            check: true,
            stale_millis: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Which dependencies contribute IDL files, and how the staging area is kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependenciesConfig {
    /// Artifact ids whose archives or reference outputs are staged.
    #[serde(default)]
    pub includes: BTreeSet<String>,
    /// Delete staged artifacts that are no longer whitelisted or present.
    #[serde(default)]
    pub prune_staging: bool,
}

/// A `from` → `to` namespace remap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct NamespaceMapping {
    /// Namespace as written in the IDL.
    pub from: String,
    /// Namespace to generate into.
    pub to: String,
}

/// Maps an `include` file name to the artifact that provides it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct IncludeMapping {
    /// File name as it appears in `include` statements.
    pub include: String,
    /// Artifact id expected to carry the file.
    pub artifact_id: String,
}

/// A dependency artifact entry from the host project model.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSpec {
    /// Artifact id.
    pub id: String,
    /// Archive or directory backing the artifact, relative to the project dir.
    pub path: String,
    /// Dependency scope (default `"compile"`).
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_scope() -> String {
    "compile".to_string()
}

/// Directory overrides for both build phases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhasesConfig {
    /// Overrides for the main phase.
    #[serde(default)]
    pub main: PhaseOverrides,
    /// Overrides for the test phase.
    #[serde(default)]
    pub test: PhaseOverrides,
}

/// Optional per-phase directories; unset fields fall back to phase defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseOverrides {
    /// Local IDL source root.
    pub source_root: Option<String>,
    /// Root of generated sources.
    pub output_dir: Option<String>,
    /// Staging directory for dependency and reference IDL files.
    pub resources_dir: Option<String>,
    /// Directory name under a reference project's `target/` holding its IDL.
    pub reference_output: Option<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `includes = "**/*.thrift"` as well as `includes = ["a/**", "b/**"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

fn deserialize_string_or_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_string_or_vec(deserializer).map(|v| v.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const MINIMAL: &str = r#"
[project]
name = "svc"
"#;

    #[test]
    fn defaults_match_plugin_defaults() {
        let config = load_config_from_str(MINIMAL).unwrap();
        assert_eq!(config.sources.includes, vec!["**/*.thrift"]);
        assert!(config.sources.excludes.is_empty());
        assert_eq!(config.generator.language, "scala");
        assert_eq!(config.generator.name, "scrooge");
        assert!(!config.generator.fix_hashcode);
        assert_eq!(config.generator.generated_suffixes, vec!["java", "scala"]);
        assert!(config.staleness.check);
        assert_eq!(config.staleness.stale_millis, 0);
        assert!(config.dependencies.includes.is_empty());
        assert!(!config.dependencies.prune_staging);
    }

    #[test]
    fn includes_single_string() {
        let toml = r#"
[project]
name = "svc"

[sources]
includes = "api/**/*.thrift"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sources.includes, vec!["api/**/*.thrift"]);
    }

    #[test]
    fn opts_list_collapses_duplicates() {
        let toml = r#"
[project]
name = "svc"

[generator]
opts = ["--finagle", "--ostrich", "--finagle"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.generator.opts.len(), 2);
        assert!(config.generator.opts.contains("--ostrich"));
    }

    #[test]
    fn fix_hashcode_adds_opt() {
        let toml = r#"
[project]
name = "svc"

[generator]
opts = "--finagle"
fix_hashcode = true
"#;
        let config = load_config_from_str(toml).unwrap();
        let opts = config.generator.effective_opts();
        assert!(opts.contains("--finagle"));
        assert!(opts.contains(FIX_HASHCODE_OPT));
        assert!(!config.generator.opts.contains(FIX_HASHCODE_OPT));
    }

    #[test]
    fn artifact_scope_defaults_to_compile() {
        let toml = r#"
[project]
name = "svc"

[[artifacts]]
id = "finagle-thrift"
path = "lib/finagle-thrift.jar"

[[declared_artifacts]]
id = "util-core"
path = "lib/util-core.jar"
scope = "test"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.artifacts[0].scope, "compile");
        assert_eq!(config.declared_artifacts[0].scope, "test");
    }

    #[test]
    fn mappings_parse() {
        let toml = r#"
[project]
name = "svc"

[[namespace_mappings]]
from = "com.twitter"
to = "com.twitter.thriftscala"

[[include_mappings]]
include = "external.thrift"
artifact_id = "some-external-project"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.namespace_mappings,
            vec![NamespaceMapping {
                from: "com.twitter".to_string(),
                to: "com.twitter.thriftscala".to_string(),
            }]
        );
        assert_eq!(config.include_mappings[0].artifact_id, "some-external-project");
    }

    #[test]
    fn phase_overrides_are_optional() {
        let toml = r#"
[project]
name = "svc"

[phases.test]
source_root = "idl/test"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.phases.test.source_root.as_deref(), Some("idl/test"));
        assert!(config.phases.test.output_dir.is_none());
        assert!(config.phases.main.source_root.is_none());
    }
}
