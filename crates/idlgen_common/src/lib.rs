//! Shared foundational types used across the idlgen workspace.
//!
//! This crate provides millisecond file timestamps, content hashing for the
//! staging cache, and the file-suffix constants every stage agrees on.

#![warn(missing_docs)]

pub mod hash;
pub mod time;

pub use hash::ContentHash;
pub use time::{modified_millis, set_modified_millis, Millis};

/// Suffix of interface-definition files consumed by the generator.
pub const IDL_SUFFIX: &str = ".thrift";

/// Suffix of dependency archives that may carry IDL files.
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// Default include pattern for IDL discovery below a source root.
pub const DEFAULT_INCLUDE: &str = "**/*.thrift";

/// Returns `true` if `name` ends with the IDL suffix.
pub fn is_idl_name(name: &str) -> bool {
    name.ends_with(IDL_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idl_name_detection() {
        assert!(is_idl_name("foo.thrift"));
        assert!(is_idl_name("nested/dir/bar.thrift"));
        assert!(!is_idl_name("foo.thrift.bak"));
        assert!(!is_idl_name("Foo.scala"));
    }
}
