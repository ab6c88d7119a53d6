// src/engine/runtime.rs

use std::fmt;

use tracing::{error, info};

use crate::engine::StepOutcome;
use crate::exec::StepRunner;
use crate::plan::BuildStep;

use super::core::{PipelineCore, PipelineReport};
use super::CoreCommand;

/// Drives a [`PipelineCore`] and delegates each step to a [`StepRunner`].
///
/// All ordering and halting rules live in the core; this shell only awaits
/// the runner and feeds outcomes back.
pub struct Pipeline<R: StepRunner> {
    core: PipelineCore,
    runner: R,
}

impl<R: StepRunner> fmt::Debug for Pipeline<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<R: StepRunner> Pipeline<R> {
    pub fn new(steps: Vec<BuildStep>, runner: R) -> Self {
        Self {
            core: PipelineCore::new(steps),
            runner,
        }
    }

    /// Run steps until the list is exhausted or one fails.
    ///
    /// A runner error (the step could not even be started) counts as a
    /// failure with exit code -1.
    pub async fn run(mut self) -> PipelineReport {
        info!(steps = self.core.len(), "build pipeline started");

        let mut command = self.core.start();
        loop {
            match command {
                CoreCommand::Run(index) => {
                    let Some(step) = self.core.step_at(index).cloned() else {
                        break;
                    };
                    let label = step.display_name();
                    let outcome = match self.runner.run_step(step).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            error!(step = %label, error = %err, "step execution error");
                            StepOutcome::Failed(-1)
                        }
                    };
                    command = self.core.record(outcome);
                }
                CoreCommand::Halt { index, code } => {
                    let label = self
                        .core
                        .step_at(index)
                        .map(BuildStep::display_name)
                        .unwrap_or_default();
                    error!(step = %label, exit_code = code, "build pipeline halted");
                    break;
                }
                CoreCommand::Finish => {
                    info!("build pipeline finished");
                    break;
                }
            }
        }

        self.core.into_report()
    }
}
