// src/tools/compare.rs

use std::path::PathBuf;

use tracing::debug;

use crate::errors::{PkgdagError, Result};
use crate::tools::helper::run_helper;
use crate::tools::EvrComparator;
use crate::types::Evr;

/// Answer of an EVR comparison, from the point of view of the existing build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The existing build is older than the source: build needed.
    Older,
    /// The existing build is the same or newer: skip.
    NotOlder,
}

impl Comparison {
    /// Interpret the `needs-rebuild` helper's answer.
    pub fn from_helper_output(output: &str) -> Option<Self> {
        match output.trim() {
            "yes" => Some(Comparison::Older),
            "no" => Some(Comparison::NotOlder),
            _ => None,
        }
    }
}

/// Runs `needs-rebuild <source-evr> <existing-evr>`, which prints `yes` or `no`.
#[derive(Debug, Clone)]
pub struct HelperEvrComparator {
    pub needs_rebuild: PathBuf,
}

impl HelperEvrComparator {
    pub fn new(needs_rebuild: impl Into<PathBuf>) -> Self {
        Self {
            needs_rebuild: needs_rebuild.into(),
        }
    }
}

impl EvrComparator for HelperEvrComparator {
    fn compare(&self, package: &str, source: &Evr, existing: &Evr) -> Result<Comparison> {
        let out = run_helper(
            &self.needs_rebuild,
            [source.to_string(), existing.to_string()],
        )
        .map_err(|e| PkgdagError::Comparison {
            package: package.to_string(),
            reason: format!("{e:#}"),
        })?;

        let answer = Comparison::from_helper_output(&out).ok_or_else(|| PkgdagError::Comparison {
            package: package.to_string(),
            reason: format!("unexpected answer {:?} (expected \"yes\" or \"no\")", out.trim()),
        })?;

        debug!(%package, %source, %existing, ?answer, "compared EVRs");
        Ok(answer)
    }
}
