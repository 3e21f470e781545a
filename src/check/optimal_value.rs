use crate::error::Result;
use crate::output::ModelerOutput;
use crate::run::RunOutcome;

use super::Check;
use super::assertions::{DEFAULT_TOLERANCE, assert_double_close};

/// Optimal value of a modeler variable equals `expected`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalValue {
    pub variable: String,
    pub expected: f64,
}

impl OptimalValue {
    pub fn new(variable: impl Into<String>, expected: f64) -> Self {
        Self {
            variable: variable.into(),
            expected,
        }
    }
}

impl Check for OptimalValue {
    fn name(&self) -> &str {
        "optimal-value"
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        let output = ModelerOutput::new(outcome.output_dir()?)?;
        let actual = output.get_optimal_value(&self.variable)?;
        assert_double_close(
            self.name(),
            &self.variable,
            self.expected,
            actual,
            DEFAULT_TOLERANCE,
        )
    }
}
