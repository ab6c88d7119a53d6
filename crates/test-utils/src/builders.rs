#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;

use pkgdag::config::{
    ConfigFile, ConfigSection, HelpersSection, PackageConfig, RawConfigFile, StepsSection,
};
use pkgdag::package::PackageMetadata;
use pkgdag::types::{Epoch, UnresolvedRequires};

/// Builder for `PackageMetadata`; defaults to version `1.0`, release `1`,
/// no epoch, source directory `<name>/work`.
pub struct PackageBuilder {
    meta: PackageMetadata,
}

impl PackageBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            meta: PackageMetadata {
                name: name.to_string(),
                epoch: Epoch::Unset,
                version: "1.0".to_string(),
                release: "1".to_string(),
                provides: BTreeSet::new(),
                requires: BTreeSet::new(),
                source_location: format!("{name}/work"),
                manifest: None,
            },
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.meta.version = version.to_string();
        self
    }

    pub fn release(mut self, release: &str) -> Self {
        self.meta.release = release.to_string();
        self
    }

    pub fn epoch(mut self, epoch: &str) -> Self {
        self.meta.epoch = Epoch::parse(epoch);
        self
    }

    pub fn provides(mut self, capability: &str) -> Self {
        self.meta.provides.insert(capability.to_string());
        self
    }

    pub fn requires(mut self, capability: &str) -> Self {
        self.meta.requires.insert(capability.to_string());
        self
    }

    pub fn source(mut self, location: &str) -> Self {
        self.meta.source_location = location.to_string();
        self
    }

    pub fn manifest(mut self, path: &str) -> Self {
        self.meta.manifest = Some(PathBuf::from(path));
        self
    }

    pub fn build(self) -> PackageMetadata {
        self.meta
    }
}

/// Builder for one `[[package]]` entry.
pub struct PackageConfigBuilder {
    pkg: PackageConfig,
}

impl PackageConfigBuilder {
    /// Entry whose metadata comes from a manifest.
    pub fn manifest(path: &str) -> Self {
        Self {
            pkg: PackageConfig {
                manifest: Some(PathBuf::from(path)),
                ..PackageConfig::default()
            },
        }
    }

    /// Entry with inline metadata, version `1.0`, release `1`.
    pub fn inline(name: &str) -> Self {
        Self {
            pkg: PackageConfig {
                name: Some(name.to_string()),
                version: Some("1.0".to_string()),
                release: Some("1".to_string()),
                ..PackageConfig::default()
            },
        }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.pkg.source = Some(source.to_string());
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.pkg.version = Some(version.to_string());
        self
    }

    pub fn release(mut self, release: &str) -> Self {
        self.pkg.release = Some(release.to_string());
        self
    }

    pub fn epoch(mut self, epoch: &str) -> Self {
        self.pkg.epoch = Some(epoch.to_string());
        self
    }

    pub fn provides(mut self, capability: &str) -> Self {
        self.pkg.provides.push(capability.to_string());
        self
    }

    pub fn requires(mut self, capability: &str) -> Self {
        self.pkg.requires.push(capability.to_string());
        self
    }

    pub fn build(self) -> PackageConfig {
        self.pkg
    }
}

/// Builder for `ConfigFile` to simplify test setup. Targets `23/x86_64`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection {
                    distro: "23".to_string(),
                    ..ConfigSection::default()
                },
                helpers: HelpersSection::default(),
                steps: StepsSection::default(),
                packages: Vec::new(),
            },
        }
    }

    pub fn with_package(mut self, pkg: PackageConfig) -> Self {
        self.config.packages.push(pkg);
        self
    }

    pub fn arch(mut self, arch: &str) -> Self {
        self.config.config.arch = arch.to_string();
        self
    }

    pub fn distro(mut self, distro: &str) -> Self {
        self.config.config.distro = distro.to_string();
        self
    }

    pub fn repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config.repository = path.into();
        self
    }

    pub fn unresolved_requires(mut self, policy: UnresolvedRequires) -> Self {
        self.config.config.unresolved_requires = policy;
        self
    }

    pub fn build_source(mut self, template: &str) -> Self {
        self.config.steps.build_source = template.to_string();
        self
    }

    pub fn build_binary(mut self, template: &str) -> Self {
        self.config.steps.build_binary = template.to_string();
        self
    }

    pub fn srpm_pattern(mut self, pattern: &str) -> Self {
        self.config.steps.srpm_pattern = pattern.to_string();
        self
    }

    pub fn resultdir(mut self, dir: &str) -> Self {
        self.config.steps.resultdir = dir.to_string();
        self
    }

    /// Unvalidated config, for validation tests.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
