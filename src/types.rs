// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical package name type used throughout the crate.
pub type PackageName = String;

/// Sentinel the metadata tools print for a package without an epoch.
pub const EPOCH_NONE: &str = "(none)";

/// Package epoch, with the `(none)` sentinel modelled explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Epoch {
    #[default]
    Unset,
    Value(String),
}

impl Epoch {
    /// Parse a raw epoch token. `(none)` and the empty string mean "unset".
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token == EPOCH_NONE {
            Epoch::Unset
        } else {
            Epoch::Value(token.to_string())
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Epoch::Unset)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Epoch::Unset => f.write_str(EPOCH_NONE),
            Epoch::Value(v) => f.write_str(v),
        }
    }
}

/// Epoch, version and release of one package build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Evr {
    pub epoch: Epoch,
    pub version: String,
    pub release: String,
}

impl Evr {
    pub fn new(epoch: Epoch, version: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            epoch,
            version: version.into(),
            release: release.into(),
        }
    }
}

/// Renders `version-release`, prefixed with `epoch:` only when an epoch is set.
impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.epoch {
            Epoch::Unset => write!(f, "{}-{}", self.version, self.release),
            Epoch::Value(e) => write!(f, "{}:{}-{}", e, self.version, self.release),
        }
    }
}

/// What to do with a `requires` token that no package in the pass provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedRequires {
    /// Assume the base system satisfies it and drop it.
    #[default]
    System,
    /// Abort the pass.
    Error,
}

impl FromStr for UnresolvedRequires {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(UnresolvedRequires::System),
            "error" => Ok(UnresolvedRequires::Error),
            other => Err(format!(
                "invalid unresolved_requires: {other} (expected \"system\" or \"error\")"
            )),
        }
    }
}

/// How artifact filenames found in the repository are turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NvrSource {
    /// Ask the `srpm-nvr` helper (sees the real epoch).
    #[default]
    Helper,
    /// Parse `name-version-release.src.rpm` locally (epoch unset).
    Filename,
}

/// Kind of build step emitted for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    BuildSource,
    BuildBinary,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::BuildSource => "build-source",
            StepKind::BuildBinary => "build-binary",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
