//! Staging and aggregation of IDL files from every origin.
//!
//! Dependency archives are filtered against the whitelist and extracted into
//! the staging area, whitelisted reference projects have their IDL outputs
//! copied next to them, and the local source root is scanned. The result is
//! one deduplicated file set plus an index of staged files by artifact id.

#![warn(missing_docs)]

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod filter;
pub mod index;
pub mod manifest;
pub mod walker;

#[cfg(test)]
pub(crate) mod testutil;

pub use aggregate::{aggregate, AggregateRequest, Aggregation};
pub use error::StageError;
pub use extract::{ArchiveExtractor, Extraction};
pub use filter::filter_dependencies;
pub use index::StagingIndex;
pub use manifest::{StagedArtifact, StagedOrigin, StagingManifest, MANIFEST_FILE};
pub use walker::ReferenceWalker;
