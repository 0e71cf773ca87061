//! The host project model: dependency artifacts and the reference graph.
//!
//! Everything here is read-only input to the staging pipeline. A
//! [`HostProject`] is assembled from the root `idlgen.toml` plus the
//! `idlgen.toml` of every transitively referenced sibling project.

#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod graph;
pub mod host;

pub use artifact::ArtifactRef;
pub use error::ProjectError;
pub use graph::{ProjectGraph, ProjectIdx, ProjectNode};
pub use host::HostProject;
