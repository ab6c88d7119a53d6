// src/config/validate.rs

use std::collections::HashSet;

use regex::Regex;

use crate::config::model::{ConfigFile, PackageConfig, RawConfigFile};
use crate::errors::{PkgdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PkgdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.config,
            raw.helpers,
            raw.steps,
            raw.packages,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_packages(cfg)?;
    validate_global_config(cfg)?;
    validate_packages(cfg)?;
    validate_steps(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> PkgdagError {
    PkgdagError::ConfigError(msg.into())
}

fn ensure_has_packages(cfg: &RawConfigFile) -> Result<()> {
    if cfg.packages.is_empty() {
        return Err(config_error(
            "config must contain at least one [[package]] section",
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.arch.trim().is_empty() {
        return Err(config_error("[config].arch must not be empty"));
    }
    if cfg.config.distro.trim().is_empty() {
        return Err(config_error(
            "[config].distro must be set (or passed with --distro)",
        ));
    }
    if cfg.config.artifact_suffix.is_empty() {
        return Err(config_error("[config].artifact_suffix must not be empty"));
    }
    Ok(())
}

fn validate_packages(cfg: &RawConfigFile) -> Result<()> {
    let mut inline_names = HashSet::new();

    for (i, pkg) in cfg.packages.iter().enumerate() {
        validate_package(i, pkg)?;
        // Manifest names are only known after extraction; the graph
        // builder catches duplicates among those.
        if let (None, Some(name)) = (&pkg.manifest, &pkg.name) {
            if !inline_names.insert(name.as_str()) {
                return Err(PkgdagError::DuplicatePackage(name.clone()));
            }
        }
    }
    Ok(())
}

fn validate_package(position: usize, pkg: &PackageConfig) -> Result<()> {
    if pkg.manifest.is_some() {
        if pkg.version.is_some() || pkg.release.is_some() || pkg.epoch.is_some() {
            return Err(config_error(format!(
                "package '{}' has a manifest; version/release/epoch come from it and must not be set",
                pkg.label()
            )));
        }
        return Ok(());
    }

    for (field, value) in [
        ("name", &pkg.name),
        ("version", &pkg.version),
        ("release", &pkg.release),
    ] {
        if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
            return Err(config_error(format!(
                "package #{} ('{}') needs either `manifest` or a non-empty `{}`",
                position + 1,
                pkg.label(),
                field
            )));
        }
    }
    Ok(())
}

fn validate_steps(cfg: &RawConfigFile) -> Result<()> {
    if cfg.steps.build_source.trim().is_empty() || cfg.steps.build_binary.trim().is_empty() {
        return Err(config_error(
            "[steps].build_source and [steps].build_binary must not be empty",
        ));
    }

    let re = Regex::new(&cfg.steps.srpm_pattern).map_err(|e| {
        config_error(format!("[steps].srpm_pattern is not a valid regex: {e}"))
    })?;
    if re.captures_len() < 2 {
        return Err(config_error(
            "[steps].srpm_pattern must have a capture group for the artifact name",
        ));
    }
    Ok(())
}
