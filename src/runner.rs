use std::path::Path;

use crate::check::CheckHandler;
use crate::config::{HarnessConfig, RunKind, TestPlan};
use crate::error::HarnessError;
use crate::report::RunReport;
use crate::run::{ModelerRun, Simulation, SimulationRun};
use crate::study::ResultsRemover;

/// Runs one test plan end to end and reports the result.
///
/// The study is restored and its results removed before returning, whatever
/// the outcome.
///
/// # Errors
///
/// Returns `HarnessError::Format` when the binary the plan needs is not
/// configured. Every later failure is recorded in the report instead.
pub fn run_plan(config: &HarnessConfig, plan: &TestPlan) -> Result<RunReport, HarnessError> {
    let study = config.study_path(plan);
    let sim = &config.simulator;
    match plan.run {
        RunKind::Solver => {
            let solver_path = sim
                .solver_path
                .as_deref()
                .ok_or_else(|| missing_binary(&study, "solver"))?;
            let run = SimulationRun::new(&study, solver_path)
                .with_solver(&sim.solver)
                .with_use_ortools(sim.use_ortools)
                .with_named_mps_problems(sim.named_mps_problems)
                .with_parallel(sim.parallel);
            Ok(run_with(run, plan, &study))
        }
        RunKind::Modeler => {
            let modeler_path = sim
                .modeler_path
                .as_deref()
                .ok_or_else(|| missing_binary(&study, "modeler"))?;
            Ok(run_with(ModelerRun::new(&study, modeler_path), plan, &study))
        }
    }
}

fn missing_binary(study: &Path, which: &str) -> HarnessError {
    HarnessError::format(study, format!("no {which} binary configured"))
}

fn run_with<S: Simulation>(simulation: S, plan: &TestPlan, study: &Path) -> RunReport {
    tracing::info!(plan = %plan.name, study = %study.display(), "running test plan");
    let mut handler = CheckHandler::new(simulation, ResultsRemover::new(study));

    let result = handler.run(plan.build_checks(study));
    let teardown = handler.teardown();

    RunReport::new(&plan.name, study)
        .with_outcome(handler.outcome())
        .with_checks(handler.records())
        .with_error(run_error(result, teardown))
}

/// Message for the report's `error` field. Check failures are already in the
/// records and are left out.
fn run_error(
    result: Result<(), HarnessError>,
    teardown: Result<(), HarnessError>,
) -> Option<String> {
    let run = result.err().filter(|e| !e.is_check_failure());
    match (run, teardown.err()) {
        (Some(run), Some(td)) => Some(format!("{run}; teardown: {td}")),
        (Some(run), None) => Some(run.to_string()),
        (None, Some(td)) => Some(format!("teardown: {td}")),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_error(path: &str, msg: &str) -> HarnessError {
        HarnessError::io(Path::new(path), io::Error::other(msg.to_string()))
    }

    #[test]
    fn run_and_teardown_errors_are_both_reported() {
        let error = run_error(
            Err(io_error("study/settings/generaldata.ini", "read-only")),
            Err(io_error("study/output", "busy")),
        )
        .expect("both failed");
        assert!(error.contains("read-only"));
        assert!(error.contains("; teardown: "));
        assert!(error.contains("busy"));
    }

    #[test]
    fn check_failure_leaves_only_the_teardown_error() {
        let error = run_error(
            Err(HarnessError::check_failed("annual-cost", "off by 3")),
            Err(io_error("study/output", "busy")),
        );
        assert_eq!(error.as_deref().map(|e| e.starts_with("teardown: ")), Some(true));
        assert_eq!(run_error(Err(HarnessError::check_failed("a", "b")), Ok(())), None);
    }

    #[test]
    fn missing_solver_is_reported_before_running() {
        let config = HarnessConfig::default();
        let plan = TestPlan::from_toml_str("study = \"s\"\n").expect("plan parses");
        let err = run_plan(&config, &plan).expect_err("no solver configured");
        assert!(err.to_string().contains("no solver binary configured"));
    }
}
