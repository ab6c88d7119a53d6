// src/plan/step.rs

use std::fmt;

use serde::Serialize;

use crate::types::{PackageName, StepKind};

/// One unit of work for the pipeline. Opaque to this crate beyond its fields:
/// producing the artifact is up to whoever executes the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStep {
    pub kind: StepKind,
    #[serde(rename = "packageName")]
    pub package: PackageName,
    pub arch: String,
    pub distro: String,
    /// Directory holding the package's packaging sources.
    pub workdir: String,
}

impl BuildStep {
    /// Short human label, e.g. `srpm libfoo 23/x86_64`.
    pub fn display_name(&self) -> String {
        let prefix = match self.kind {
            StepKind::BuildSource => "srpm",
            StepKind::BuildBinary => "rpm",
        };
        format!("{} {} {}/{}", prefix, self.package, self.distro, self.arch)
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
