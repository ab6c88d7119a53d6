// src/plan/expander.rs

use tracing::debug;

use crate::plan::filter::BuildPlan;
use crate::plan::step::BuildStep;
use crate::types::StepKind;

/// Target the steps are built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub arch: String,
    pub distro: String,
}

/// Turns a [`BuildPlan`] into the ordered steps the pipeline runs.
///
/// Each package yields a source build followed by a binary build, and
/// packages keep the plan's order. Nothing is executed here.
#[derive(Debug, Clone)]
pub struct PlanExpander {
    target: BuildTarget,
}

impl PlanExpander {
    pub fn new(target: BuildTarget) -> Self {
        Self { target }
    }

    pub fn expand(&self, plan: &BuildPlan) -> Vec<BuildStep> {
        let mut steps = Vec::with_capacity(plan.len() * 2);

        for pkg in plan.packages() {
            for kind in [StepKind::BuildSource, StepKind::BuildBinary] {
                let step = BuildStep {
                    kind,
                    package: pkg.name.clone(),
                    arch: self.target.arch.clone(),
                    distro: self.target.distro.clone(),
                    workdir: pkg.source_location.clone(),
                };
                debug!(step = %step, position = steps.len(), "emitting build step");
                steps.push(step);
            }
        }

        steps
    }
}
