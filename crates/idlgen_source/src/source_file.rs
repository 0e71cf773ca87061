//! Source file identity: an absolute path plus its modification time.

use std::path::{Path, PathBuf};

use idlgen_common::{modified_millis, Millis};

use crate::error::SourceError;

/// An IDL file discovered during a run.
///
/// Never mutated once discovered. Copying a file to a new location yields a
/// new `SourceFile` whose timestamp was propagated from the origin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceFile {
    /// Filesystem path of the file.
    pub path: PathBuf,
    /// Modification time at discovery.
    pub modified: Millis,
}

impl SourceFile {
    /// Reads the modification time of `path` and builds its identity.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let modified = modified_millis(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            modified,
        })
    }

    /// Loads every path and returns the newest modification time.
    ///
    /// Returns [`Millis::ZERO`] for an empty iterator.
    pub fn newest<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Result<Millis, SourceError> {
        let times = paths
            .into_iter()
            .map(|path| Self::load(path).map(|file| file.modified))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Millis::newest(times))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgen_common::set_modified_millis;

    #[test]
    fn load_reads_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.thrift");
        std::fs::write(&path, "struct Foo {}").unwrap();
        set_modified_millis(&path, Millis::new(100_000)).unwrap();

        let file = SourceFile::load(&path).unwrap();
        assert_eq!(file.modified, Millis::new(100_000));
    }

    #[test]
    fn load_missing_file_errors() {
        let err = SourceFile::load(Path::new("/nonexistent/foo.thrift")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn newest_over_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.thrift");
        let b = dir.path().join("b.thrift");
        std::fs::write(&a, "").unwrap();
        std::fs::write(&b, "").unwrap();
        set_modified_millis(&a, Millis::new(5_000)).unwrap();
        set_modified_millis(&b, Millis::new(9_000)).unwrap();

        let paths = vec![a, b];
        assert_eq!(SourceFile::newest(&paths).unwrap(), Millis::new(9_000));
    }

    #[test]
    fn newest_of_nothing_is_zero() {
        let paths: Vec<PathBuf> = Vec::new();
        assert_eq!(SourceFile::newest(&paths).unwrap(), Millis::ZERO);
    }
}
