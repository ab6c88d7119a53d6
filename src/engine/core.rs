// src/engine/core.rs

//! Pure pipeline state machine.
//!
//! [`PipelineCore`] owns the ordered step list and the status of each step.
//! It decides what runs next and produces a [`CoreCommand`] for the IO
//! shell (`engine::runtime::Pipeline`). It has no Tokio types, spawns
//! nothing and does no IO, so every ordering rule is testable on its own.
//!
//! Rules:
//! - steps run strictly in list order, one at a time;
//! - the first failure halts the pipeline and every later step stays
//!   unstarted.

use tracing::debug;

use crate::engine::StepOutcome;
use crate::errors::{PkgdagError, Result};
use crate::plan::BuildStep;

/// Per-step state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Succeeded,
    Failed(i32),
    /// Never started because an earlier step failed.
    NotRun,
}

/// What the shell should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run the step at this index and report back.
    Run(usize),
    /// A step failed; nothing else will run.
    Halt { index: usize, code: i32 },
    /// Every step succeeded.
    Finish,
}

#[derive(Debug)]
pub struct PipelineCore {
    steps: Vec<BuildStep>,
    status: Vec<StepStatus>,
    in_flight: Option<usize>,
    failure: Option<(usize, i32)>,
}

impl PipelineCore {
    pub fn new(steps: Vec<BuildStep>) -> Self {
        let status = vec![StepStatus::Pending; steps.len()];
        Self {
            steps,
            status,
            in_flight: None,
            failure: None,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_at(&self, index: usize) -> Option<&BuildStep> {
        self.steps.get(index)
    }

    pub fn status_of(&self, index: usize) -> Option<StepStatus> {
        self.status.get(index).copied()
    }

    /// No step is running and none will be started.
    pub fn is_finished(&self) -> bool {
        self.in_flight.is_none()
            && (self.failure.is_some() || !self.status.contains(&StepStatus::Pending))
    }

    /// First command of the pipeline.
    pub fn start(&mut self) -> CoreCommand {
        self.advance()
    }

    /// Record the outcome of the running step and decide what comes next.
    ///
    /// Without a running step this only re-evaluates the current state.
    pub fn record(&mut self, outcome: StepOutcome) -> CoreCommand {
        let Some(index) = self.in_flight.take() else {
            return self.advance();
        };

        match outcome {
            StepOutcome::Success => {
                self.status[index] = StepStatus::Succeeded;
                debug!(step = %self.steps[index], "step succeeded");
                self.advance()
            }
            StepOutcome::Failed(code) => {
                self.status[index] = StepStatus::Failed(code);
                for status in &mut self.status[index + 1..] {
                    *status = StepStatus::NotRun;
                }
                self.failure = Some((index, code));
                debug!(
                    step = %self.steps[index],
                    exit_code = code,
                    not_run = self.steps.len() - index - 1,
                    "step failed; halting pipeline"
                );
                CoreCommand::Halt { index, code }
            }
        }
    }

    fn advance(&mut self) -> CoreCommand {
        if let Some((index, code)) = self.failure {
            return CoreCommand::Halt { index, code };
        }
        if let Some(index) = self.in_flight {
            return CoreCommand::Run(index);
        }
        match self.status.iter().position(|s| *s == StepStatus::Pending) {
            Some(index) => {
                self.status[index] = StepStatus::Running;
                self.in_flight = Some(index);
                CoreCommand::Run(index)
            }
            None => CoreCommand::Finish,
        }
    }

    pub fn into_report(self) -> PipelineReport {
        PipelineReport {
            entries: self.steps.into_iter().zip(self.status).collect(),
        }
    }
}

/// Final state of every step after a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    entries: Vec<(BuildStep, StepStatus)>,
}

impl PipelineReport {
    pub fn entries(&self) -> &[(BuildStep, StepStatus)] {
        &self.entries
    }

    pub fn completed(&self) -> impl Iterator<Item = &BuildStep> {
        self.with_status(|s| s == StepStatus::Succeeded)
    }

    pub fn not_run(&self) -> impl Iterator<Item = &BuildStep> {
        self.with_status(|s| s == StepStatus::NotRun)
    }

    pub fn failed(&self) -> Option<(&BuildStep, i32)> {
        self.entries.iter().find_map(|(step, status)| match status {
            StepStatus::Failed(code) => Some((step, *code)),
            _ => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, status)| *status == StepStatus::Succeeded)
    }

    /// `Err(StepFailed)` naming the failed step, if any.
    pub fn into_result(self) -> Result<Self> {
        if let Some((step, code)) = self.failed() {
            return Err(PkgdagError::StepFailed {
                step: step.display_name(),
                code,
            });
        }
        Ok(self)
    }

    fn with_status(&self, pred: impl Fn(StepStatus) -> bool) -> impl Iterator<Item = &BuildStep> {
        self.entries
            .iter()
            .filter(move |(_, status)| pred(*status))
            .map(|(step, _)| step)
    }
}
