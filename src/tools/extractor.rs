// src/tools/extractor.rs

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{PkgdagError, Result};
use crate::package::metadata::{parse_capabilities, parse_nevr_tokens};
use crate::package::PackageMetadata;
use crate::tools::helper::run_helper;
use crate::tools::MetadataExtractor;

/// Extracts metadata by running three helpers on the manifest:
/// `spec-nvr` (prints `name epoch version release`), `spec-provides` and
/// `spec-requires` (one capability per line).
#[derive(Debug, Clone)]
pub struct HelperMetadataExtractor {
    pub spec_nvr: PathBuf,
    pub spec_provides: PathBuf,
    pub spec_requires: PathBuf,
}

impl HelperMetadataExtractor {
    pub fn new(
        spec_nvr: impl Into<PathBuf>,
        spec_provides: impl Into<PathBuf>,
        spec_requires: impl Into<PathBuf>,
    ) -> Self {
        Self {
            spec_nvr: spec_nvr.into(),
            spec_provides: spec_provides.into(),
            spec_requires: spec_requires.into(),
        }
    }
}

/// Name used in diagnostics before the real package name is known.
fn manifest_label(manifest: &Path) -> String {
    manifest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| manifest.display().to_string())
}

impl MetadataExtractor for HelperMetadataExtractor {
    fn extract(&self, manifest: &Path) -> Result<PackageMetadata> {
        let fail = |package: String, reason: String| PkgdagError::Metadata {
            package,
            path: manifest.to_path_buf(),
            reason,
        };

        let nevr = run_helper(&self.spec_nvr, [manifest])
            .map_err(|e| fail(manifest_label(manifest), format!("{e:#}")))?;
        let (name, epoch, version, release) = parse_nevr_tokens(nevr.trim()).ok_or_else(|| {
            fail(
                manifest_label(manifest),
                format!("expected 'name epoch version release', got {:?}", nevr.trim()),
            )
        })?;
        let name = name.to_string();

        let provides = run_helper(&self.spec_provides, [manifest])
            .map_err(|e| fail(name.clone(), format!("provides: {e:#}")))?;
        let requires = run_helper(&self.spec_requires, [manifest])
            .map_err(|e| fail(name.clone(), format!("requires: {e:#}")))?;

        let source_location = manifest
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let meta = PackageMetadata {
            name,
            epoch,
            version: version.to_string(),
            release: release.to_string(),
            provides: parse_capabilities(&provides),
            requires: parse_capabilities(&requires),
            source_location,
            manifest: Some(manifest.to_path_buf()),
        };

        info!(
            package = %meta.name,
            evr = %meta.evr(),
            provides = meta.provides.len(),
            requires = meta.requires.len(),
            "extracted package metadata"
        );
        Ok(meta)
    }
}
