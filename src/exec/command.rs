// src/exec/command.rs

//! Rendering step command templates.
//!
//! Placeholders:
//! - `{package}`, `{arch}`, `{distro}`: straight from the step
//! - `{root}`: chroot name, `<root_prefix>-<distro>-<arch>`
//! - `{resultdir}`: `[steps].resultdir`
//! - `{workdir}`: the package's packaging source directory
//! - `{spec}`: `<package>.spec`
//! - `{srpm}`: source artifact captured from the package's source build

use anyhow::{Result, bail};

use crate::config::StepsSection;
use crate::plan::BuildStep;
use crate::types::StepKind;

const SRPM_PLACEHOLDER: &str = "{srpm}";

/// Command templates for both step kinds.
#[derive(Debug, Clone)]
pub struct StepTemplates {
    pub build_source: String,
    pub build_binary: String,
    pub resultdir: String,
    pub root_prefix: String,
}

impl StepTemplates {
    pub fn from_config(steps: &StepsSection) -> Self {
        Self {
            build_source: steps.build_source.clone(),
            build_binary: steps.build_binary.clone(),
            resultdir: steps.resultdir.clone(),
            root_prefix: steps.root_prefix.clone(),
        }
    }

    pub fn chroot_root(&self, step: &BuildStep) -> String {
        format!("{}-{}-{}", self.root_prefix, step.distro, step.arch)
    }

    /// Shell command for `step`.
    ///
    /// Fails when the template uses `{srpm}` and no artifact was captured.
    pub fn render(&self, step: &BuildStep, srpm: Option<&str>) -> Result<String> {
        let template = match step.kind {
            StepKind::BuildSource => &self.build_source,
            StepKind::BuildBinary => &self.build_binary,
        };

        let mut cmd = template
            .replace("{package}", &step.package)
            .replace("{arch}", &step.arch)
            .replace("{distro}", &step.distro)
            .replace("{root}", &self.chroot_root(step))
            .replace("{resultdir}", &self.resultdir)
            .replace("{workdir}", &step.workdir)
            .replace("{spec}", &format!("{}.spec", step.package));

        if cmd.contains(SRPM_PLACEHOLDER) {
            match srpm {
                Some(path) => cmd = cmd.replace(SRPM_PLACEHOLDER, path),
                None => bail!(
                    "step '{}' needs the source artifact of '{}' but none was recorded",
                    step,
                    step.package
                ),
            }
        }

        Ok(cmd)
    }
}
