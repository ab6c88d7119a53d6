// src/package/metadata.rs

//! Typed package records produced by the metadata extractor and the
//! repository scan.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::types::{Epoch, Evr, PackageName};

/// Everything the scheduler needs to know about one source package.
///
/// Created once per pass by the extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: PackageName,
    pub epoch: Epoch,
    pub version: String,
    pub release: String,
    /// Capabilities this package offers (its own name is implied).
    pub provides: BTreeSet<String>,
    /// Capabilities this package needs before it can be built.
    pub requires: BTreeSet<String>,
    /// Directory holding the package's packaging sources.
    pub source_location: String,
    /// Manifest the record was extracted from, if any.
    pub manifest: Option<PathBuf>,
}

impl PackageMetadata {
    pub fn evr(&self) -> Evr {
        Evr::new(self.epoch.clone(), self.version.clone(), self.release.clone())
    }

    /// Every capability this package satisfies: its name first, then the
    /// explicit `provides` entries.
    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.provides.iter().map(String::as_str))
    }
}

/// One artifact already present in the target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingPackageRecord {
    pub name: PackageName,
    pub epoch: Epoch,
    pub version: String,
    pub release: String,
}

impl ExistingPackageRecord {
    pub fn evr(&self) -> Evr {
        Evr::new(self.epoch.clone(), self.version.clone(), self.release.clone())
    }
}

/// Reduce one line of provides/requires output to its capability name.
///
/// `"pkgconfig(Qt5Core) >= 5.4"` becomes `"pkgconfig(Qt5Core)"`; blank lines
/// yield `None`.
pub fn capability_name(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Collect capability names from multi-line tool output.
pub fn parse_capabilities(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(capability_name)
        .map(str::to_string)
        .collect()
}

/// Split a `name epoch version release` line into its four tokens.
///
/// Returns `None` unless there are exactly four tokens.
pub fn parse_nevr_tokens(line: &str) -> Option<(&str, Epoch, &str, &str)> {
    let mut it = line.split_whitespace();
    let name = it.next()?;
    let epoch = it.next()?;
    let version = it.next()?;
    let release = it.next()?;
    if it.next().is_some() {
        return None;
    }
    Some((name, Epoch::parse(epoch), version, release))
}
