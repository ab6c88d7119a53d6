// src/exec/backend.rs

//! Pluggable step runner abstraction.
//!
//! The pipeline talks to a `StepRunner` instead of spawning processes
//! itself, so tests can swap in a fake that records steps and scripts
//! outcomes. [`RealStepRunner`] is the production implementation.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use regex::Regex;
use tracing::{info, warn};

use crate::config::StepsSection;
use crate::engine::StepOutcome;
use crate::errors::{PkgdagError, Result};
use crate::plan::BuildStep;
use crate::types::{PackageName, StepKind};

use super::command::StepTemplates;
use super::process::run_shell;

/// Trait abstracting how a single build step is executed.
pub trait StepRunner: Send {
    /// Execute `step` to completion.
    ///
    /// `Err` means the step could not be run at all; a step that ran and
    /// failed is `Ok(StepOutcome::Failed(code))`.
    fn run_step(
        &mut self,
        step: BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>>;
}

/// Runs steps as shell commands rendered from the `[steps]` templates.
///
/// Source builds are watched for the produced artifact; the binary build
/// of the same package gets it as `{srpm}`.
#[derive(Debug)]
pub struct RealStepRunner {
    templates: StepTemplates,
    srpm_pattern: Regex,
    artifacts: HashMap<PackageName, String>,
}

impl RealStepRunner {
    pub fn new(templates: StepTemplates, srpm_pattern: Regex) -> Self {
        Self {
            templates,
            srpm_pattern,
            artifacts: HashMap::new(),
        }
    }

    pub fn from_config(steps: &StepsSection) -> Result<Self> {
        let pattern = Regex::new(&steps.srpm_pattern).map_err(|e| {
            PkgdagError::ConfigError(format!("[steps].srpm_pattern is not a valid regex: {e}"))
        })?;
        Ok(Self::new(StepTemplates::from_config(steps), pattern))
    }

    /// Source artifact recorded for `package`, if its source build ran.
    pub fn artifact_for(&self, package: &str) -> Option<&str> {
        self.artifacts.get(package).map(String::as_str)
    }
}

impl StepRunner for RealStepRunner {
    fn run_step(
        &mut self,
        step: BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>> {
        Box::pin(async move {
            let cmd = self
                .templates
                .render(&step, self.artifact_for(&step.package))?;

            let label = step.display_name();
            let pattern = match step.kind {
                StepKind::BuildSource => Some(&self.srpm_pattern),
                StepKind::BuildBinary => None,
            };
            let result = run_shell(&label, &cmd, None, pattern).await?;

            if step.kind == StepKind::BuildSource && result.success {
                match result.captured {
                    Some(file_name) => {
                        let path = Path::new(&self.templates.resultdir)
                            .join(file_name)
                            .display()
                            .to_string();
                        info!(step = %label, artifact = %path, "recorded source artifact");
                        self.artifacts.insert(step.package.clone(), path);
                    }
                    None => warn!(step = %label, "no source artifact found in step output"),
                }
            }

            Ok(if result.success {
                StepOutcome::Success
            } else {
                StepOutcome::Failed(result.exit_code)
            })
        })
    }
}
