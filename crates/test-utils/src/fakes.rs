#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pkgdag::errors::{PkgdagError, Result};
use pkgdag::package::{ExistingPackageRecord, PackageMetadata};
use pkgdag::tools::{Comparison, EvrComparator, MetadataExtractor, NvrResolver, RepositoryScanner};
use pkgdag::types::{Epoch, Evr};

/// One recorded `compare` call: package, source EVR, existing EVR.
pub type ComparisonCall = (String, String, String);

/// A fake comparator that:
/// - answers per package, falling back to a default answer
/// - fails for packages registered with `fail_for`
/// - records every call in order.
#[derive(Debug)]
pub struct FakeComparator {
    default: Comparison,
    answers: HashMap<String, Comparison>,
    failing: HashSet<String>,
    calls: Arc<Mutex<Vec<ComparisonCall>>>,
}

impl FakeComparator {
    pub fn always(answer: Comparison) -> Self {
        Self {
            default: answer,
            answers: HashMap::new(),
            failing: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answer(mut self, package: &str, answer: Comparison) -> Self {
        self.answers.insert(package.to_string(), answer);
        self
    }

    pub fn fail_for(mut self, package: &str) -> Self {
        self.failing.insert(package.to_string());
        self
    }

    /// Handle on the call log, usable after the comparator is borrowed away.
    pub fn calls(&self) -> Arc<Mutex<Vec<ComparisonCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn called_packages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(pkg, _, _)| pkg.clone())
            .collect()
    }
}

impl EvrComparator for FakeComparator {
    fn compare(&self, package: &str, source: &Evr, existing: &Evr) -> Result<Comparison> {
        self.calls.lock().unwrap().push((
            package.to_string(),
            source.to_string(),
            existing.to_string(),
        ));

        if self.failing.contains(package) {
            return Err(PkgdagError::Comparison {
                package: package.to_string(),
                reason: "comparator unavailable".to_string(),
            });
        }
        Ok(self.answers.get(package).copied().unwrap_or(self.default))
    }
}

/// Metadata keyed by manifest path; unknown manifests fail like a broken
/// helper would.
#[derive(Debug, Default)]
pub struct FakeExtractor {
    manifests: HashMap<PathBuf, PackageMetadata>,
    extracted: Mutex<Vec<PathBuf>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, path: &str, meta: PackageMetadata) -> Self {
        self.manifests.insert(PathBuf::from(path), meta);
        self
    }

    pub fn extracted(&self) -> Vec<PathBuf> {
        self.extracted.lock().unwrap().clone()
    }
}

impl MetadataExtractor for FakeExtractor {
    fn extract(&self, manifest: &Path) -> Result<PackageMetadata> {
        self.extracted.lock().unwrap().push(manifest.to_path_buf());
        match self.manifests.get(manifest) {
            Some(meta) => {
                let mut meta = meta.clone();
                meta.manifest = Some(manifest.to_path_buf());
                Ok(meta)
            }
            None => Err(PkgdagError::Metadata {
                package: manifest
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: manifest.to_path_buf(),
                reason: "no such manifest".to_string(),
            }),
        }
    }
}

/// Returns a fixed artifact list, or a scan error when built with `missing`.
#[derive(Debug, Default)]
pub struct FakeScanner {
    artifacts: Vec<PathBuf>,
    missing: bool,
}

impl FakeScanner {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_artifacts<I, S>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        Self {
            artifacts: artifacts.into_iter().map(Into::into).collect(),
            missing: false,
        }
    }

    pub fn missing() -> Self {
        Self {
            artifacts: Vec::new(),
            missing: true,
        }
    }
}

impl RepositoryScanner for FakeScanner {
    fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if self.missing {
            return Err(PkgdagError::Scan {
                path: root.to_path_buf(),
                reason: "repository root does not exist".to_string(),
            });
        }
        Ok(self.artifacts.clone())
    }
}

/// Records keyed by artifact path.
#[derive(Debug, Default)]
pub struct FakeResolver {
    records: HashMap<PathBuf, ExistingPackageRecord>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` as an artifact of `name-version-release` (no epoch).
    pub fn with_record(mut self, path: &str, name: &str, version: &str, release: &str) -> Self {
        self.records.insert(
            PathBuf::from(path),
            ExistingPackageRecord {
                name: name.to_string(),
                epoch: Epoch::Unset,
                version: version.to_string(),
                release: release.to_string(),
            },
        );
        self
    }
}

impl NvrResolver for FakeResolver {
    fn resolve(&self, artifact: &Path) -> Result<ExistingPackageRecord> {
        self.records.get(artifact).cloned().ok_or_else(|| PkgdagError::Scan {
            path: artifact.to_path_buf(),
            reason: "unreadable artifact".to_string(),
        })
    }
}
