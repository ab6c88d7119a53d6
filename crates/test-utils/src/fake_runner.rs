use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pkgdag::engine::StepOutcome;
use pkgdag::errors::Result;
use pkgdag::exec::StepRunner;
use pkgdag::plan::BuildStep;

/// A fake step runner that:
/// - records the display name of every step it is asked to run
/// - succeeds unless the step was scripted to fail or to error out.
pub struct FakeStepRunner {
    executed: Arc<Mutex<Vec<String>>>,
    failures: HashMap<String, i32>,
    errors: HashSet<String>,
}

impl FakeStepRunner {
    pub fn new(executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            executed,
            failures: HashMap::new(),
            errors: HashSet::new(),
        }
    }

    /// Make the step with this display name exit with `code`.
    pub fn fail(mut self, step: &str, code: i32) -> Self {
        self.failures.insert(step.to_string(), code);
        self
    }

    /// Make the step with this display name fail to start.
    pub fn error(mut self, step: &str) -> Self {
        self.errors.insert(step.to_string());
        self
    }
}

impl StepRunner for FakeStepRunner {
    fn run_step(
        &mut self,
        step: BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let name = step.display_name();
        let failure = self.failures.get(&name).copied();
        let errors = self.errors.contains(&name);

        Box::pin(async move {
            executed.lock().unwrap().push(name.clone());
            if errors {
                return Err(anyhow::anyhow!("cannot start '{name}'").into());
            }
            Ok(match failure {
                Some(code) => StepOutcome::Failed(code),
                None => StepOutcome::Success,
            })
        })
    }
}
