// src/plan/filter.rs

use std::collections::HashMap;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::dag::Schedule;
use crate::errors::Result;
use crate::package::{ExistingRegistry, PackageMetadata};
use crate::tools::{Comparison, EvrComparator};
use crate::types::{Evr, PackageName};

/// Ordered list of packages that actually need building.
///
/// Read-only once created; the expander only walks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    packages: Vec<PackageMetadata>,
}

impl BuildPlan {
    pub fn new(packages: Vec<PackageMetadata>) -> Self {
        Self { packages }
    }

    pub fn packages(&self) -> &[PackageMetadata] {
        &self.packages
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// A package left out because the repository already has it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPackage {
    pub name: PackageName,
    pub source: Evr,
    pub existing: Evr,
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub plan: BuildPlan,
    pub skipped: Vec<SkippedPackage>,
}

/// Drops packages whose existing build is not older than the source.
///
/// Packages with no record in the registry are always kept. The comparator
/// is consulted exactly once per name-matched package; any error from it
/// aborts instead of guessing.
pub struct NecessityFilter<'a> {
    registry: &'a ExistingRegistry,
    comparator: &'a dyn EvrComparator,
}

impl<'a> NecessityFilter<'a> {
    pub fn new(registry: &'a ExistingRegistry, comparator: &'a dyn EvrComparator) -> Self {
        Self {
            registry,
            comparator,
        }
    }

    pub fn filter(&self, schedule: &Schedule, packages: &[PackageMetadata]) -> Result<FilterOutcome> {
        let by_name: HashMap<&str, &PackageMetadata> =
            packages.iter().map(|p| (p.name.as_str(), p)).collect();

        let mut kept = Vec::with_capacity(schedule.len());
        let mut skipped = Vec::new();

        for name in schedule.sequence() {
            let pkg = by_name
                .get(name.as_str())
                .copied()
                .ok_or_else(|| anyhow!("scheduled package '{name}' has no metadata"))?;

            let Some(existing) = self.registry.get(name) else {
                debug!(package = %name, "not in repository; building");
                kept.push(pkg.clone());
                continue;
            };

            let source = pkg.evr();
            let existing = existing.evr();
            match self.comparator.compare(name, &source, &existing)? {
                Comparison::Older => {
                    info!(package = %name, %source, %existing, "repository build is older; rebuilding");
                    kept.push(pkg.clone());
                }
                Comparison::NotOlder => {
                    info!(package = %name, %source, %existing, "already built, skipping");
                    skipped.push(SkippedPackage {
                        name: name.clone(),
                        source,
                        existing,
                    });
                }
            }
        }

        Ok(FilterOutcome {
            plan: BuildPlan::new(kept),
            skipped,
        })
    }
}
