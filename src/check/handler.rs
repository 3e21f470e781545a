use serde::Serialize;

use crate::error::Result;
use crate::run::{RunOutcome, Simulation};
use crate::study::{ModifiedStudy, ResultsRemover};

use super::CheckList;

/// Result of one executed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed(String),
    /// Not run because an earlier check failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    pub name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

/// Runs a simulation once, checks its results, then cleans up.
///
/// Teardown restores every study file the checks modified and removes the
/// generated results. It runs at most once, either through
/// [`CheckHandler::teardown`] or when the handler is dropped.
pub struct CheckHandler<S: Simulation> {
    simulation: S,
    results_remover: ResultsRemover,
    checks: CheckList,
    modified: Vec<ModifiedStudy>,
    outcome: Option<RunOutcome>,
    records: Vec<CheckRecord>,
    torn_down: bool,
}

impl<S: Simulation> CheckHandler<S> {
    pub fn new(simulation: S, results_remover: ResultsRemover) -> Self {
        Self {
            simulation,
            results_remover,
            checks: CheckList::new(),
            modified: Vec::new(),
            outcome: None,
            records: Vec::new(),
            torn_down: false,
        }
    }

    pub fn get_simulation(&self) -> &S {
        &self.simulation
    }

    /// Outcome of the simulation, once [`CheckHandler::run`] reached it.
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// One record per check of the last list: executed ones first, then
    /// those skipped after a failure.
    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    /// Applies the checks' study modifiers, runs the simulation and then
    /// every check in order.
    ///
    /// # Errors
    ///
    /// Returns the first error met: a study that cannot be modified, a
    /// simulation that cannot be started, or the first failing check.
    pub fn run(&mut self, checks: CheckList) -> Result<()> {
        // kept for teardown even if anything below fails
        self.checks = checks;
        self.records.clear();
        self.outcome = None;
        // a new run has state of its own to clean up
        self.torn_down = false;

        for modifier in self.checks.study_modifiers() {
            self.modified.push(modifier.apply()?);
        }

        let outcome = self.simulation.run()?;
        let outcome = self.outcome.insert(outcome);

        let mut executed = Vec::new();
        let result = self.checks.run_with(outcome, |name, result| {
            let status = match result {
                Ok(()) => CheckStatus::Passed,
                Err(e) => CheckStatus::Failed(e.to_string()),
            };
            executed.push(CheckRecord {
                name: name.to_string(),
                status,
            });
        });
        let skipped = self.checks.names().into_iter().skip(executed.len());
        let skipped: Vec<CheckRecord> = skipped
            .map(|name| CheckRecord {
                name: name.to_string(),
                status: CheckStatus::Skipped,
            })
            .collect();
        self.records = executed;
        self.records.extend(skipped);
        result
    }

    /// Restores modified study files and deletes generated results.
    ///
    /// Every step is attempted even if an earlier one fails; the first error
    /// is returned. Calling it again before the next [`run`](Self::run) does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error met while cleaning up.
    pub fn teardown(&mut self) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        tracing::debug!(study = %self.simulation.study_path().display(), "teardown");

        let mut first_error = None;
        while let Some(modified) = self.modified.pop() {
            if let Err(e) = modified.back_to_initial_state() {
                tracing::error!(file = %modified.file().display(), "{e}");
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.results_remover.run() {
            tracing::error!("{e}");
            first_error.get_or_insert(e);
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl<S: Simulation> Drop for CheckHandler<S> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::error!("teardown failed: {e}");
        }
    }
}
