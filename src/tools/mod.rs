// src/tools/mod.rs

//! External collaborators of the scheduling pass.
//!
//! The pass never talks to packaging tools directly; it goes through these
//! traits so tests (and other front-ends) can plug in their own answers.
//! Production implementations shell out to small helper programs:
//!
//! - [`extractor`]: `spec-nvr`, `spec-provides`, `spec-requires`
//! - [`nvr`]: `srpm-nvr`, or a local filename parser
//! - [`compare`]: `needs-rebuild`
//! - [`scanner`]: a recursive walk over the [`FileSystem`](crate::fs::FileSystem)
//!
//! All calls are blocking; the pass makes them one at a time.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::package::{ExistingPackageRecord, PackageMetadata};
use crate::types::Evr;

pub mod compare;
pub mod extractor;
pub mod helper;
pub mod nvr;
pub mod scanner;

pub use compare::{Comparison, HelperEvrComparator};
pub use extractor::HelperMetadataExtractor;
pub use nvr::{FilenameNvrResolver, HelperNvrResolver};
pub use scanner::FsRepositoryScanner;

/// Reads a package manifest into a [`PackageMetadata`].
pub trait MetadataExtractor {
    fn extract(&self, manifest: &Path) -> Result<PackageMetadata>;
}

/// Lists the artifacts currently present in a repository.
pub trait RepositoryScanner {
    fn scan(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Turns one artifact path into the record it represents.
pub trait NvrResolver {
    fn resolve(&self, artifact: &Path) -> Result<ExistingPackageRecord>;
}

/// Decides whether an existing build is older than the source.
///
/// `package` is only used for diagnostics.
pub trait EvrComparator {
    fn compare(&self, package: &str, source: &Evr, existing: &Evr) -> Result<Comparison>;
}
