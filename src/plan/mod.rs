// src/plan/mod.rs

//! From build order to pipeline steps.
//!
//! - [`filter`] removes packages the repository already has up to date.
//! - [`expander`] emits the ordered [`BuildStep`]s for what is left.

pub mod expander;
pub mod filter;
pub mod step;

pub use expander::{BuildTarget, PlanExpander};
pub use filter::{BuildPlan, FilterOutcome, NecessityFilter, SkippedPackage};
pub use step::BuildStep;
