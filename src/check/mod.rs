//! Checks on simulation results and the machinery sequencing them.
//!
//! A [`CheckHandler`] owns one simulation. [`CheckHandler::run`] applies the
//! study modifiers the checks need, runs the simulation exactly once and then
//! every check of a [`CheckList`] in insertion order, stopping at the first
//! failure. [`CheckHandler::teardown`] restores the study and removes the
//! results; it also runs when the handler is dropped.

pub mod annual_cost;
pub mod assertions;
pub mod handler;
/// Hourly area results: loss of load and unsupplied energy.
pub mod hourly;
pub mod optimal_value;
pub mod return_code;
pub mod simulation_time;
/// Unfeasible weekly problems.
pub mod unfeasible;

pub use annual_cost::AnnualCost;
pub use handler::{CheckHandler, CheckRecord, CheckStatus};
pub use hourly::{LoldDuration, UnsuppliedEnergy};
pub use optimal_value::OptimalValue;
pub use return_code::SimulationSuccess;
pub use simulation_time::SimulationTime;
pub use unfeasible::{UnfeasibleBehavior, UnfeasibleProblem, WeeksInYear};

use crate::error::Result;
use crate::run::RunOutcome;
use crate::study::StudyModifier;

/// A named assertion over the outcome of a completed simulation.
pub trait Check {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Study changes that must be in place while the simulation runs.
    fn study_modifiers(&self) -> Vec<StudyModifier> {
        Vec::new()
    }

    /// Verifies the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HarnessError::CheckFailed`] on a mismatch, or the
    /// error met while reading results.
    fn run(&self, outcome: &RunOutcome) -> Result<()>;
}

/// Ordered checks sharing one simulation.
#[derive(Default)]
pub struct CheckList {
    checks: Vec<Box<dyn Check>>,
}

impl CheckList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, check: impl Check + 'static) {
        self.checks.push(Box::new(check));
    }

    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.add(check);
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Study changes requested by all checks, in check order.
    pub fn study_modifiers(&self) -> Vec<StudyModifier> {
        self.checks
            .iter()
            .flat_map(|c| c.study_modifiers())
            .collect()
    }

    /// Runs every check in order and stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing check.
    pub fn run(&self, outcome: &RunOutcome) -> Result<()> {
        self.run_with(outcome, |_, _| {})
    }

    /// Like [`CheckList::run`], reporting each executed check to `observe`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing check.
    pub fn run_with(
        &self,
        outcome: &RunOutcome,
        mut observe: impl FnMut(&str, &Result<()>),
    ) -> Result<()> {
        for check in &self.checks {
            tracing::info!(check = check.name(), "running check");
            let result = check.run(outcome);
            match &result {
                Ok(()) => tracing::info!(check = check.name(), "check passed"),
                Err(e) => tracing::error!(check = check.name(), "{e}"),
            }
            observe(check.name(), &result);
            result?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CheckList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording {
        name: &'static str,
        pass: bool,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Check for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self, _outcome: &RunOutcome) -> Result<()> {
            self.log.borrow_mut().push(self.name);
            if self.pass {
                Ok(())
            } else {
                Err(HarnessError::check_failed(self.name, "forced failure"))
            }
        }
    }

    fn outcome() -> RunOutcome {
        RunOutcome {
            return_code: Some(0),
            stdout: Vec::new(),
            output_path: None,
        }
    }

    #[test]
    fn checks_run_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let list = CheckList::new()
            .with(Recording { name: "first", pass: true, log: Rc::clone(&log) })
            .with(Recording { name: "second", pass: true, log: Rc::clone(&log) });
        list.run(&outcome()).expect("all pass");
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn first_failure_stops_the_list() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let list = CheckList::new()
            .with(Recording { name: "ok", pass: true, log: Rc::clone(&log) })
            .with(Recording { name: "broken", pass: false, log: Rc::clone(&log) })
            .with(Recording { name: "never", pass: true, log: Rc::clone(&log) });
        let err = list.run(&outcome()).expect_err("second check fails");
        assert!(err.to_string().contains("broken"));
        assert_eq!(*log.borrow(), vec!["ok", "broken"]);
    }

    #[test]
    fn empty_list_passes() {
        assert!(CheckList::new().run(&outcome()).is_ok());
    }
}
