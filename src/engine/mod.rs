// src/engine/mod.rs

//! Orchestration for pkgdag.
//!
//! - [`pass`] runs one scheduling pass: metadata, repository scan, graph,
//!   order, filter, steps.
//! - [`core`] is the pure state machine that walks the emitted steps one at
//!   a time and stops at the first failure.
//! - [`runtime`] is the async shell that hands those steps to a
//!   [`StepRunner`](crate::exec::StepRunner).

/// Outcome of one executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failed(i32),
}

pub mod core;
pub mod pass;
pub mod runtime;

pub use core::{CoreCommand, PipelineCore, PipelineReport, StepStatus};
pub use pass::{PassContext, PassOutcome, SchedulingPass, plan_pass};
pub use runtime::Pipeline;
