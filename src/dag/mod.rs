// src/dag/mod.rs

//! Dependency graph and build ordering.
//!
//! - [`graph`] resolves provides/requires into a [`BuildGraph`].
//! - [`scheduler`] turns the graph into a deterministic [`Schedule`] or
//!   reports the cycles that prevent one.

pub mod graph;
pub mod scheduler;

pub use graph::{BuildGraph, UnresolvedRequirement};
pub use scheduler::{Schedule, Scheduler};
