//! Fixture helpers shared by the staging tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

/// Writes a jar at `path` containing `entries` as `(name, body)` pairs.
///
/// Every entry carries a 2001-01-01 timestamp so tests can tell entry
/// metadata apart from the archive's own modification time.
pub fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let stamp = zip::DateTime::from_date_and_time(2001, 1, 1, 0, 0, 0).unwrap();
    let options = SimpleFileOptions::default().last_modified_time(stamp);
    for (name, body) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// Writes `body` to `root/rel`, creating parent directories.
pub fn touch(root: &Path, rel: &str, body: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, body).unwrap();
    path
}
