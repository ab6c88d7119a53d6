// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod package;
pub mod plan;
pub mod tools;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, EmitFormat};
use crate::config::loader::load_from_path;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::{PassContext, PassOutcome, Pipeline, SchedulingPass};
use crate::exec::RealStepRunner;
use crate::fs::RealFileSystem;
use crate::plan::BuildStep;
use crate::tools::{
    FilenameNvrResolver, FsRepositoryScanner, HelperEvrComparator, HelperMetadataExtractor,
    HelperNvrResolver, NvrResolver,
};
use crate::types::NvrSource;

/// High-level entry point used by `main.rs`.
///
/// Loads the config, runs one scheduling pass, then either prints the
/// result (`--dry-run`, `--emit`) or executes the steps in order.
pub async fn run(args: CliArgs) -> Result<()> {
    let raw = load_from_path(&args.config)?;
    let cfg = ConfigFile::try_from(apply_overrides(raw, &args))?;

    let outcome = run_pass(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &outcome);
        return Ok(());
    }

    if let Some(format) = args.emit {
        emit_steps(&outcome.steps, format)?;
        return Ok(());
    }

    if outcome.steps.is_empty() {
        info!("nothing to build");
        return Ok(());
    }

    let runner = RealStepRunner::from_config(&cfg.steps)?;
    let report = Pipeline::new(outcome.steps, runner).run().await;
    let report = report.into_result()?;
    info!(built = report.completed().count(), "all build steps succeeded");
    Ok(())
}

/// Apply `--arch`, `--distro` and `--repository` before validation.
pub fn apply_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if let Some(arch) = &args.arch {
        raw.config.arch = arch.clone();
    }
    if let Some(distro) = &args.distro {
        raw.config.distro = distro.clone();
    }
    if let Some(repository) = &args.repository {
        raw.config.repository = repository.clone();
    }
    raw
}

/// One scheduling pass with the helper-backed collaborators from `cfg`.
pub fn run_pass(cfg: &ConfigFile) -> errors::Result<PassOutcome> {
    let helpers = &cfg.helpers;
    let extractor = HelperMetadataExtractor::new(
        &helpers.spec_nvr,
        &helpers.spec_provides,
        &helpers.spec_requires,
    );
    let scanner = FsRepositoryScanner::new(RealFileSystem, cfg.config.artifact_suffix.clone());
    let resolver: Box<dyn NvrResolver> = match cfg.config.nvr_resolver {
        NvrSource::Helper => Box::new(HelperNvrResolver::new(&helpers.srpm_nvr)),
        NvrSource::Filename => Box::new(FilenameNvrResolver::new(
            cfg.config.artifact_suffix.clone(),
        )),
    };
    let comparator = HelperEvrComparator::new(&helpers.needs_rebuild);

    SchedulingPass::new(
        PassContext::from_config(cfg),
        &extractor,
        &scanner,
        resolver.as_ref(),
        &comparator,
    )
    .run(&cfg.packages)
}

fn emit_steps(steps: &[BuildStep], format: EmitFormat) -> Result<()> {
    match format {
        EmitFormat::Text => {
            for step in steps {
                println!("{}\t{}\t{}", step.kind, step.package, step.workdir);
            }
        }
        EmitFormat::Json => println!("{}", serde_json::to_string_pretty(steps)?),
    }
    Ok(())
}

/// Human-readable plan: build order, skipped packages, steps.
fn print_dry_run(cfg: &ConfigFile, outcome: &PassOutcome) {
    println!("pkgdag dry-run");
    println!("  target = {}/{}", cfg.config.distro, cfg.config.arch);
    println!("  repository = {}", cfg.config.repository.display());
    println!();

    println!("build order ({}):", outcome.schedule.len());
    for name in outcome.schedule.sequence() {
        let rank = outcome.schedule.rank_of(name).unwrap_or_default();
        let skipped = outcome.skipped.iter().any(|s| &s.name == name);
        let marker = if skipped { " (up to date)" } else { "" };
        println!("  - [{rank}] {name}{marker}");
    }

    if !outcome.skipped.is_empty() {
        println!();
        println!("skipped ({}):", outcome.skipped.len());
        for s in &outcome.skipped {
            println!("  - {}: source {} / repository {}", s.name, s.source, s.existing);
        }
    }

    if !outcome.unresolved.is_empty() {
        println!();
        println!("assumed system-provided ({}):", outcome.unresolved.len());
        for u in &outcome.unresolved {
            println!("  - {} requires {}", u.package, u.requirement);
        }
    }

    println!();
    println!("steps ({}):", outcome.steps.len());
    for (i, step) in outcome.steps.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, step);
    }

    debug!("dry-run complete (no execution)");
}
