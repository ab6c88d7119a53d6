// src/tools/nvr.rs

use std::path::{Path, PathBuf};

use crate::errors::{PkgdagError, Result};
use crate::package::metadata::parse_nevr_tokens;
use crate::package::ExistingPackageRecord;
use crate::tools::helper::run_helper;
use crate::tools::NvrResolver;
use crate::types::Epoch;

/// Asks the `srpm-nvr` helper, which prints `name epoch version release`.
#[derive(Debug, Clone)]
pub struct HelperNvrResolver {
    pub srpm_nvr: PathBuf,
}

impl HelperNvrResolver {
    pub fn new(srpm_nvr: impl Into<PathBuf>) -> Self {
        Self {
            srpm_nvr: srpm_nvr.into(),
        }
    }
}

impl NvrResolver for HelperNvrResolver {
    fn resolve(&self, artifact: &Path) -> Result<ExistingPackageRecord> {
        let scan_error = |reason: String| PkgdagError::Scan {
            path: artifact.to_path_buf(),
            reason,
        };

        let out = run_helper(&self.srpm_nvr, [artifact])
            .map_err(|e| scan_error(format!("unable to determine NVR: {e:#}")))?;
        let (name, epoch, version, release) = parse_nevr_tokens(out.trim()).ok_or_else(|| {
            scan_error(format!(
                "expected 'name epoch version release', got {:?}",
                out.trim()
            ))
        })?;

        Ok(ExistingPackageRecord {
            name: name.to_string(),
            epoch,
            version: version.to_string(),
            release: release.to_string(),
        })
    }
}

/// Parses `name-version-release<suffix>` without running anything.
///
/// File names carry no epoch, so records come back with [`Epoch::Unset`].
#[derive(Debug, Clone)]
pub struct FilenameNvrResolver {
    suffix: String,
}

impl FilenameNvrResolver {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl NvrResolver for FilenameNvrResolver {
    fn resolve(&self, artifact: &Path) -> Result<ExistingPackageRecord> {
        let file_name = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        parse_artifact_name(file_name, &self.suffix).ok_or_else(|| PkgdagError::Scan {
            path: artifact.to_path_buf(),
            reason: format!("'{file_name}' is not of the form name-version-release{}", self.suffix),
        })
    }
}

/// Split `foo-bar-1.2-3.fc23.src.rpm` into `("foo-bar", "1.2", "3.fc23")`.
pub fn parse_artifact_name(file_name: &str, suffix: &str) -> Option<ExistingPackageRecord> {
    let stem = file_name.strip_suffix(suffix)?;
    let mut parts = stem.rsplitn(3, '-');
    let release = parts.next()?;
    let version = parts.next()?;
    let name = parts.next()?;

    if [name, version, release].iter().any(|s| s.is_empty()) {
        return None;
    }

    Some(ExistingPackageRecord {
        name: name.to_string(),
        epoch: Epoch::Unset,
        version: version.to_string(),
        release: release.to_string(),
    })
}
