// src/engine/pass.rs

//! The scheduling pass.
//!
//! One pass turns the configured package list into the ordered list of
//! build steps for a single arch/distro:
//!
//! 1. metadata for every package (inline, or extracted from its manifest)
//! 2. repository scan, one record per artifact
//! 3. graph -> build order -> necessity filter -> steps ([`plan_pass`])
//!
//! The first error aborts the whole pass; no partial plan is produced.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::{ConfigFile, PackageConfig};
use crate::dag::{BuildGraph, Schedule, Scheduler, UnresolvedRequirement};
use crate::errors::{PkgdagError, Result};
use crate::package::{ExistingRegistry, PackageMetadata};
use crate::plan::{
    BuildPlan, BuildStep, BuildTarget, NecessityFilter, PlanExpander, SkippedPackage,
};
use crate::tools::{EvrComparator, MetadataExtractor, NvrResolver, RepositoryScanner};
use crate::types::UnresolvedRequires;

/// Inputs of a pass besides the package list.
#[derive(Debug, Clone)]
pub struct PassContext {
    pub arch: String,
    pub distro: String,
    pub repository: PathBuf,
    pub unresolved_requires: UnresolvedRequires,
}

impl PassContext {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            arch: cfg.config.arch.clone(),
            distro: cfg.config.distro.clone(),
            repository: cfg.config.repository.clone(),
            unresolved_requires: cfg.config.unresolved_requires,
        }
    }

    fn target(&self) -> BuildTarget {
        BuildTarget {
            arch: self.arch.clone(),
            distro: self.distro.clone(),
        }
    }
}

/// Everything a successful pass produced.
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// Full build order, before filtering.
    pub schedule: Schedule,
    /// Packages that still need building, in build order.
    pub plan: BuildPlan,
    pub skipped: Vec<SkippedPackage>,
    pub steps: Vec<BuildStep>,
    /// Requirements dropped as system-provided.
    pub unresolved: Vec<UnresolvedRequirement>,
}

/// Runs passes against a fixed set of collaborators.
pub struct SchedulingPass<'a> {
    ctx: PassContext,
    extractor: &'a dyn MetadataExtractor,
    scanner: &'a dyn RepositoryScanner,
    resolver: &'a dyn NvrResolver,
    comparator: &'a dyn EvrComparator,
}

impl<'a> SchedulingPass<'a> {
    pub fn new(
        ctx: PassContext,
        extractor: &'a dyn MetadataExtractor,
        scanner: &'a dyn RepositoryScanner,
        resolver: &'a dyn NvrResolver,
        comparator: &'a dyn EvrComparator,
    ) -> Self {
        Self {
            ctx,
            extractor,
            scanner,
            resolver,
            comparator,
        }
    }

    pub fn context(&self) -> &PassContext {
        &self.ctx
    }

    pub fn run(&self, packages: &[PackageConfig]) -> Result<PassOutcome> {
        info!(
            packages = packages.len(),
            arch = %self.ctx.arch,
            distro = %self.ctx.distro,
            "starting scheduling pass"
        );
        let metadata = self.collect_metadata(packages)?;
        self.run_with_metadata(&metadata)
    }

    /// Pass over metadata the caller already has.
    pub fn run_with_metadata(&self, metadata: &[PackageMetadata]) -> Result<PassOutcome> {
        let registry = self.scan_repository()?;
        plan_pass(metadata, &registry, self.comparator, &self.ctx)
    }

    pub fn collect_metadata(&self, packages: &[PackageConfig]) -> Result<Vec<PackageMetadata>> {
        packages
            .iter()
            .map(|pkg| self.metadata_for(pkg))
            .collect()
    }

    fn metadata_for(&self, pkg: &PackageConfig) -> Result<PackageMetadata> {
        let Some(manifest) = &pkg.manifest else {
            return pkg.inline_metadata().ok_or_else(|| {
                PkgdagError::ConfigError(format!(
                    "package '{}' has neither a manifest nor complete inline metadata",
                    pkg.label()
                ))
            });
        };

        let mut meta = self.extractor.extract(manifest)?;
        if let Some(source) = &pkg.source {
            debug!(package = %meta.name, %source, "using configured source location");
            meta.source_location = source.clone();
        }
        Ok(meta)
    }

    pub fn scan_repository(&self) -> Result<ExistingRegistry> {
        let artifacts = self.scanner.scan(&self.ctx.repository)?;
        let records = artifacts
            .iter()
            .map(|path| self.resolver.resolve(path))
            .collect::<Result<Vec<_>>>()?;

        let registry = ExistingRegistry::from_records(records, self.comparator)?;
        info!(existing = registry.len(), "loaded existing package records");
        Ok(registry)
    }
}

/// Graph, order, filter and expand; no I/O beyond the comparator.
pub fn plan_pass(
    packages: &[PackageMetadata],
    registry: &ExistingRegistry,
    comparator: &dyn EvrComparator,
    ctx: &PassContext,
) -> Result<PassOutcome> {
    let graph = BuildGraph::build(packages, ctx.unresolved_requires)?;
    let schedule = Scheduler::new(&graph).schedule()?;
    debug!(order = ?schedule.sequence(), "scheduled packages");

    let filtered = NecessityFilter::new(registry, comparator).filter(&schedule, packages)?;
    let steps = PlanExpander::new(ctx.target()).expand(&filtered.plan);

    info!(
        to_build = filtered.plan.len(),
        skipped = filtered.skipped.len(),
        steps = steps.len(),
        "scheduling pass complete"
    );

    Ok(PassOutcome {
        schedule,
        plan: filtered.plan,
        skipped: filtered.skipped,
        steps,
        unresolved: graph.unresolved().to_vec(),
    })
}
