//! IDL source discovery.
//!
//! This crate provides the [`SourceFile`] identity used by every stage and
//! [`match_files`], the include/exclude pattern matcher that enumerates IDL
//! files below a directory.

#![warn(missing_docs)]

pub mod error;
pub mod matcher;
pub mod source_file;

pub use error::SourceError;
pub use matcher::{match_files, FilePatterns, DEFAULT_EXCLUDES};
pub use source_file::SourceFile;
