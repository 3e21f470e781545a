use crate::error::{HarnessError, Result};
use crate::run::RunOutcome;

use super::Check;

/// Asserts that the simulator exited successfully, or that it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSuccess {
    expect_success: bool,
}

impl SimulationSuccess {
    pub fn succeeds() -> Self {
        Self {
            expect_success: true,
        }
    }

    pub fn fails() -> Self {
        Self {
            expect_success: false,
        }
    }
}

impl Check for SimulationSuccess {
    fn name(&self) -> &str {
        if self.expect_success {
            "simulation-succeeds"
        } else {
            "simulation-fails"
        }
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        if outcome.success() == self.expect_success {
            return Ok(());
        }
        let code = outcome
            .return_code
            .map_or_else(|| "killed by signal".to_string(), |c| c.to_string());
        Err(HarnessError::check_failed(
            self.name(),
            format!("simulator return code: {code}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(code: Option<i32>) -> RunOutcome {
        RunOutcome {
            return_code: code,
            stdout: Vec::new(),
            output_path: None,
        }
    }

    #[test]
    fn success_needs_zero_exit() {
        assert!(SimulationSuccess::succeeds().run(&outcome(Some(0))).is_ok());
        assert!(SimulationSuccess::succeeds().run(&outcome(Some(1))).is_err());
        assert!(SimulationSuccess::succeeds().run(&outcome(None)).is_err());
    }

    #[test]
    fn failure_accepts_any_non_zero_exit() {
        assert!(SimulationSuccess::fails().run(&outcome(Some(1))).is_ok());
        assert!(SimulationSuccess::fails().run(&outcome(None)).is_ok());
        let err = SimulationSuccess::fails()
            .run(&outcome(Some(0)))
            .expect_err("zero exit is a success");
        assert!(err.to_string().contains("return code: 0"));
    }
}
