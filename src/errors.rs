// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Every variant is fatal to the scheduling pass: the pass either produces a
//! complete ordered step list or one of these, never a partial plan.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PkgdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("cannot read metadata of package '{package}' from {path:?}: {reason}")]
    Metadata {
        package: String,
        path: PathBuf,
        reason: String,
    },

    #[error("package '{0}' appears more than once in this pass")]
    DuplicatePackage(String),

    #[error("{0}")]
    Cycle(CycleReport),

    #[error("package '{package}' requires '{requirement}' which no package in this pass provides")]
    UnresolvedRequirement {
        package: String,
        requirement: String,
    },

    #[error("cannot decide whether '{package}' needs a rebuild: {reason}")]
    Comparison { package: String, reason: String },

    #[error("repository scan failed at {path:?}: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("build step '{step}' failed with exit code {code}")]
    StepFailed { step: String, code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Packages that could not be placed in a build order.
///
/// `cycles` holds each strongly connected group (in input order), `blocked`
/// the packages that are not on a cycle themselves but depend on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycles: Vec<Vec<String>>,
    pub blocked: Vec<String>,
}

impl CycleReport {
    /// All packages that sit on some cycle.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.cycles.iter().flatten().map(|s| s.as_str())
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency cycle detected")?;
        for (i, cycle) in self.cycles.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}[{}]", cycle.join(", "))?;
        }
        if !self.blocked.is_empty() {
            write!(f, " (also blocked: {})", self.blocked.join(", "))?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, PkgdagError>;
