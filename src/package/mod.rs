// src/package/mod.rs

//! Package records.
//!
//! - [`metadata`] holds the per-package metadata and repository records.
//! - [`registry`] indexes what the target repository already contains.

pub mod metadata;
pub mod registry;

pub use metadata::{ExistingPackageRecord, PackageMetadata};
pub use registry::ExistingRegistry;
