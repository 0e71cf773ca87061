//! Dependency whitelist filtering.

use std::collections::BTreeSet;

use idlgen_project::ArtifactRef;

/// Returns the artifacts whose id appears in `whitelist`.
///
/// Callers pass resolved and declared artifacts together; duplicates
/// collapse. Empty inputs yield an empty set.
pub fn filter_dependencies<'a>(
    whitelist: &BTreeSet<String>,
    artifacts: impl IntoIterator<Item = &'a ArtifactRef>,
) -> BTreeSet<ArtifactRef> {
    artifacts
        .into_iter()
        .filter(|a| whitelist.contains(&a.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_only_whitelisted() {
        let resolved = vec![
            ArtifactRef::new("finagle-thrift", "/m2/finagle-thrift.jar", "compile"),
            ArtifactRef::new("guava", "/m2/guava.jar", "compile"),
        ];
        let out = filter_dependencies(&whitelist(&["finagle-thrift"]), &resolved);
        assert_eq!(out.len(), 1);
        assert_eq!(out.iter().next().unwrap().id, "finagle-thrift");
    }

    #[test]
    fn resolved_and_declared_collapse() {
        let resolved = vec![ArtifactRef::new("a", "/m2/a.jar", "compile")];
        let declared = vec![
            ArtifactRef::new("a", "/m2/a.jar", "compile"),
            ArtifactRef::new("b", "/m2/b.jar", "compile"),
        ];
        let out = filter_dependencies(&whitelist(&["a", "b"]), resolved.iter().chain(&declared));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_whitelist_yields_nothing() {
        let resolved = vec![ArtifactRef::new("a", "/m2/a.jar", "compile")];
        assert!(filter_dependencies(&BTreeSet::new(), &resolved).is_empty());
    }

    #[test]
    fn empty_artifacts_yield_nothing() {
        let none: Vec<ArtifactRef> = Vec::new();
        assert!(filter_dependencies(&whitelist(&["a"]), &none).is_empty());
    }
}
