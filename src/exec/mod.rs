// src/exec/mod.rs

//! Step execution layer.
//!
//! - [`backend`] defines the `StepRunner` trait the pipeline talks to and
//!   the production `RealStepRunner`.
//! - [`command`] renders step command templates.
//! - [`process`] runs one command with `tokio::process::Command`.

pub mod backend;
pub mod command;
pub mod process;

pub use backend::{RealStepRunner, StepRunner};
pub use command::StepTemplates;
pub use process::{ProcessResult, run_shell};
