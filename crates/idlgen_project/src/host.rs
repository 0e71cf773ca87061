//! Assembling the host project model from configuration files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use idlgen_config::{load_config_file, ProjectConfig, CONFIG_FILE};

use crate::artifact::ArtifactRef;
use crate::error::ProjectError;
use crate::graph::{ProjectGraph, ProjectIdx, ProjectNode};

/// Read-only view of the project being built.
#[derive(Debug, Clone)]
pub struct HostProject {
    /// Resolved dependency artifacts.
    pub artifacts: Vec<ArtifactRef>,
    /// Declared dependency artifacts; some may lack a usable file.
    pub declared_artifacts: Vec<ArtifactRef>,
    /// The reference graph rooted at this project.
    pub graph: ProjectGraph,
}

impl HostProject {
    /// Builds the model for the project at `project_dir` described by `config`.
    ///
    /// Every reference is followed to its own `idlgen.toml`. A project reached
    /// twice (through a diamond or a cycle) is loaded once and shared.
    pub fn load(project_dir: &Path, config: &ProjectConfig) -> Result<Self, ProjectError> {
        let artifacts = config
            .artifacts
            .iter()
            .map(|spec| ArtifactRef::from_spec(spec, project_dir))
            .collect();
        let declared_artifacts = config
            .declared_artifacts
            .iter()
            .map(|spec| ArtifactRef::from_spec(spec, project_dir))
            .collect();

        let root = ProjectNode::new(&config.project.name, project_dir.join(CONFIG_FILE));
        let mut graph = ProjectGraph::new(root);

        let root_key = std::fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
        let mut seen: HashMap<PathBuf, ProjectIdx> = HashMap::new();
        seen.insert(root_key, graph.root());

        let mut pending = vec![(graph.root(), project_dir.to_path_buf(), config.references.clone())];
        while let Some((from, dir, references)) = pending.pop() {
            for (name, relative) in references {
                let ref_dir = dir.join(&relative);
                let Ok(canonical) = std::fs::canonicalize(&ref_dir) else {
                    return Err(ProjectError::MissingReference {
                        name,
                        path: ref_dir,
                    });
                };

                if let Some(&idx) = seen.get(&canonical) {
                    graph.add_reference(from, name, idx);
                    continue;
                }

                let declaration = canonical.join(CONFIG_FILE);
                let ref_config =
                    load_config_file(&declaration).map_err(|e| ProjectError::Config {
                        path: declaration.clone(),
                        source: e,
                    })?;
                tracing::debug!(
                    reference = %name,
                    project = %ref_config.project.name,
                    dir = %canonical.display(),
                    "loaded referenced project"
                );

                let idx = graph.add_project(ProjectNode::new(&ref_config.project.name, &declaration));
                seen.insert(canonical.clone(), idx);
                graph.add_reference(from, name, idx);
                pending.push((idx, canonical, ref_config.references));
            }
        }

        tracing::debug!(
            project = %config.project.name,
            projects = graph.project_count(),
            "loaded project graph"
        );
        Ok(Self {
            artifacts,
            declared_artifacts,
            graph,
        })
    }

    /// Resolved artifacts followed by declared artifacts.
    pub fn all_artifacts(&self) -> impl Iterator<Item = &ArtifactRef> {
        self.artifacts.iter().chain(&self.declared_artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgen_config::load_config;
    use std::fs;
    use tempfile::TempDir;

    fn write_project(dir: &Path, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), body).unwrap();
    }

    #[test]
    fn loads_artifacts_relative_to_project() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("svc");
        write_project(
            &root,
            r#"
[project]
name = "svc"

[[artifacts]]
id = "finagle-thrift"
path = "lib/finagle-thrift.jar"

[[declared_artifacts]]
id = "util-core"
path = "lib/util-core.jar"
"#,
        );
        let config = load_config(&root).unwrap();
        let host = HostProject::load(&root, &config).unwrap();

        assert_eq!(host.artifacts.len(), 1);
        assert_eq!(host.artifacts[0].path, root.join("lib/finagle-thrift.jar"));
        let ids: Vec<_> = host.all_artifacts().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["finagle-thrift", "util-core"]);
    }

    #[test]
    fn follows_transitive_references() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        write_project(
            &root,
            "[project]\nname = \"root\"\n[references]\na = \"../a\"\n",
        );
        write_project(
            &tmp.path().join("a"),
            "[project]\nname = \"a\"\n[references]\nb = \"../b\"\n",
        );
        write_project(&tmp.path().join("b"), "[project]\nname = \"b\"\n");

        let config = load_config(&root).unwrap();
        let host = HostProject::load(&root, &config).unwrap();
        let graph = &host.graph;
        assert_eq!(graph.project_count(), 3);

        let (_, a) = graph.references(graph.root())[0];
        assert_eq!(graph.project(a).id, "a");
        let (_, b) = graph.references(a)[0];
        assert_eq!(graph.project(b).id, "b");
        assert!(graph.references(b).is_empty());
    }

    #[test]
    fn cyclic_references_load_once() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        write_project(
            &root,
            "[project]\nname = \"root\"\n[references]\na = \"../a\"\n",
        );
        write_project(
            &tmp.path().join("a"),
            "[project]\nname = \"a\"\n[references]\nback = \"../root\"\n",
        );

        let config = load_config(&root).unwrap();
        let host = HostProject::load(&root, &config).unwrap();
        assert_eq!(host.graph.project_count(), 2);
        let (_, a) = host.graph.references(host.graph.root())[0];
        assert_eq!(host.graph.references(a), vec![("back", host.graph.root())]);
    }

    #[test]
    fn missing_reference_dir_errors() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "[project]\nname = \"root\"\n[references]\nghost = \"../does-not-exist\"\n",
        );
        let config = load_config(tmp.path()).unwrap();
        let err = HostProject::load(tmp.path(), &config).unwrap_err();
        assert!(matches!(err, ProjectError::MissingReference { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn reference_without_config_errors() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        write_project(
            &root,
            "[project]\nname = \"root\"\n[references]\nbare = \"../bare\"\n",
        );
        fs::create_dir_all(tmp.path().join("bare")).unwrap();

        let config = load_config(&root).unwrap();
        let err = HostProject::load(&root, &config).unwrap_err();
        assert!(matches!(err, ProjectError::Config { .. }));
    }
}
