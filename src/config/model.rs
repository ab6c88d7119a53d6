// src/config/model.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::package::metadata::capability_name;
use crate::package::PackageMetadata;
use crate::tools::scanner::SOURCE_ARTIFACT_SUFFIX;
use crate::types::{Epoch, NvrSource, UnresolvedRequires};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// arch = "x86_64"
/// distro = "23"
/// repository = "repository/main/x86_64"
///
/// [[package]]
/// manifest = "libfoo/work/libfoo.spec"
///
/// [[package]]
/// name = "bar"
/// version = "1.0"
/// release = "1"
/// requires = ["libfoo"]
/// ```
///
/// Packages are an array of tables so their order survives parsing; that
/// order breaks ties in the build order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub helpers: HelpersSection,

    #[serde(default)]
    pub steps: StepsSection,

    #[serde(default, rename = "package")]
    pub packages: Vec<PackageConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub helpers: HelpersSection,
    pub steps: StepsSection,
    pub packages: Vec<PackageConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        helpers: HelpersSection,
        steps: StepsSection,
        packages: Vec<PackageConfig>,
    ) -> Self {
        Self {
            config,
            helpers,
            steps,
            packages,
        }
    }
}

/// `[config]` section: what to build for and where built packages live.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    #[serde(default = "default_arch")]
    pub arch: String,

    #[serde(default)]
    pub distro: String,

    /// Root of the output repository that is scanned for existing builds.
    #[serde(default = "default_repository")]
    pub repository: PathBuf,

    #[serde(default)]
    pub unresolved_requires: UnresolvedRequires,

    #[serde(default)]
    pub nvr_resolver: NvrSource,

    #[serde(default = "default_artifact_suffix")]
    pub artifact_suffix: String,
}

fn default_arch() -> String {
    "x86_64".to_string()
}

fn default_repository() -> PathBuf {
    PathBuf::from("repository")
}

fn default_artifact_suffix() -> String {
    SOURCE_ARTIFACT_SUFFIX.to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            arch: default_arch(),
            distro: String::new(),
            repository: default_repository(),
            unresolved_requires: UnresolvedRequires::default(),
            nvr_resolver: NvrSource::default(),
            artifact_suffix: default_artifact_suffix(),
        }
    }
}

/// `[helpers]` section: paths of the helper programs.
#[derive(Debug, Clone, Deserialize)]
pub struct HelpersSection {
    #[serde(default = "default_spec_nvr")]
    pub spec_nvr: PathBuf,
    #[serde(default = "default_spec_provides")]
    pub spec_provides: PathBuf,
    #[serde(default = "default_spec_requires")]
    pub spec_requires: PathBuf,
    #[serde(default = "default_srpm_nvr")]
    pub srpm_nvr: PathBuf,
    #[serde(default = "default_needs_rebuild")]
    pub needs_rebuild: PathBuf,
}

fn default_spec_nvr() -> PathBuf {
    PathBuf::from("helpers/spec-nvr")
}

fn default_spec_provides() -> PathBuf {
    PathBuf::from("helpers/spec-provides")
}

fn default_spec_requires() -> PathBuf {
    PathBuf::from("helpers/spec-requires")
}

fn default_srpm_nvr() -> PathBuf {
    PathBuf::from("helpers/srpm-nvr")
}

fn default_needs_rebuild() -> PathBuf {
    PathBuf::from("helpers/needs-rebuild")
}

impl Default for HelpersSection {
    fn default() -> Self {
        Self {
            spec_nvr: default_spec_nvr(),
            spec_provides: default_spec_provides(),
            spec_requires: default_spec_requires(),
            srpm_nvr: default_srpm_nvr(),
            needs_rebuild: default_needs_rebuild(),
        }
    }
}

/// `[steps]` section: how the emitted steps are executed.
///
/// Templates are run through `sh -c` after placeholder substitution; see
/// `exec::command` for the placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct StepsSection {
    /// Where the chroot builder drops its results.
    #[serde(default = "default_resultdir")]
    pub resultdir: String,

    /// Chroot name is `<root_prefix>-<distro>-<arch>`.
    #[serde(default = "default_root_prefix")]
    pub root_prefix: String,

    #[serde(default = "default_build_source")]
    pub build_source: String,

    #[serde(default = "default_build_binary")]
    pub build_binary: String,

    /// Regex applied to source-build stdout; capture group 1 is the file
    /// name of the produced source artifact.
    #[serde(default = "default_srpm_pattern")]
    pub srpm_pattern: String,
}

fn default_resultdir() -> String {
    "../results".to_string()
}

fn default_root_prefix() -> String {
    "fedora".to_string()
}

fn default_build_source() -> String {
    "mock --root {root} --resultdir {resultdir} --buildsrpm --spec {spec} --sources {workdir}"
        .to_string()
}

fn default_build_binary() -> String {
    "mock --root {root} --resultdir {resultdir} --rebuild {srpm}".to_string()
}

fn default_srpm_pattern() -> String {
    r"Wrote: .*/([^/]*\.src\.rpm)".to_string()
}

impl Default for StepsSection {
    fn default() -> Self {
        Self {
            resultdir: default_resultdir(),
            root_prefix: default_root_prefix(),
            build_source: default_build_source(),
            build_binary: default_build_binary(),
            srpm_pattern: default_srpm_pattern(),
        }
    }
}

/// One `[[package]]` entry.
///
/// Either points at a `manifest` (metadata is extracted by the helpers) or
/// carries the metadata inline (`name`, `version`, `release`, optionally
/// `epoch`, `provides`, `requires`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Packaging source directory; defaults to the manifest's directory.
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub epoch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
}

impl PackageConfig {
    /// Name for diagnostics: the inline name, else the manifest path.
    pub fn label(&self) -> String {
        match (&self.name, &self.manifest) {
            (Some(name), _) => name.clone(),
            (None, Some(manifest)) => manifest.display().to_string(),
            (None, None) => "<unnamed>".to_string(),
        }
    }

    /// Metadata for an inline entry; `None` when it must be extracted.
    pub fn inline_metadata(&self) -> Option<PackageMetadata> {
        if self.manifest.is_some() {
            return None;
        }
        Some(PackageMetadata {
            name: self.name.clone()?,
            epoch: self.epoch.as_deref().map(Epoch::parse).unwrap_or_default(),
            version: self.version.clone()?,
            release: self.release.clone()?,
            provides: capabilities(&self.provides),
            requires: capabilities(&self.requires),
            source_location: self.source.clone().unwrap_or_default(),
            manifest: None,
        })
    }
}

fn capabilities(tokens: &[String]) -> BTreeSet<String> {
    tokens
        .iter()
        .filter_map(|t| capability_name(t))
        .map(str::to_string)
        .collect()
}
