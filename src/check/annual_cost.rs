use crate::error::Result;
use crate::output::{AnnualSystemCost, CostStat};
use crate::run::RunOutcome;

use super::Check;
use super::assertions::{DEFAULT_TOLERANCE, assert_double_close};

/// Compares annual system cost statistics with expected values.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualCost {
    expected: Vec<(CostStat, f64)>,
    tolerance: f64,
}

impl AnnualCost {
    pub fn new(expected: Vec<(CostStat, f64)>) -> Self {
        Self {
            expected,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Expected value (`EXP`) of the annual system cost.
    pub fn expected(value: f64) -> Self {
        Self::new(vec![(CostStat::Exp, value)])
    }

    pub fn min(value: f64) -> Self {
        Self::new(vec![(CostStat::Min, value)])
    }

    pub fn max(value: f64) -> Self {
        Self::new(vec![(CostStat::Max, value)])
    }

    /// All four statistics at once.
    pub fn table(exp: f64, std: f64, min: f64, max: f64) -> Self {
        Self::new(vec![
            (CostStat::Exp, exp),
            (CostStat::Std, std),
            (CostStat::Min, min),
            (CostStat::Max, max),
        ])
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Check for AnnualCost {
    fn name(&self) -> &str {
        "annual-system-cost"
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        let cost = AnnualSystemCost::from_output(outcome.output_dir()?)?;
        for &(stat, expected) in &self.expected {
            let actual = cost.get(stat)?;
            assert_double_close(self.name(), stat.key(), expected, actual, self.tolerance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use crate::output::annual_cost::ANNUAL_SYSTEM_COST_FILE;
    use std::fs;

    fn outcome_with(content: &str) -> (tempfile::TempDir, RunOutcome) {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(ANNUAL_SYSTEM_COST_FILE), content).expect("write cost");
        let outcome = RunOutcome {
            return_code: Some(0),
            stdout: Vec::new(),
            output_path: Some(dir.path().to_path_buf()),
        };
        (dir, outcome)
    }

    #[test]
    fn within_tolerance_passes() {
        let (_dir, outcome) = outcome_with("EXP : 1000.0005\nSTD : 0\nMIN : 999\nMAX : 1001\n");
        AnnualCost::expected(1000.0).run(&outcome).expect("EXP within 0.001");
        AnnualCost::table(1000.0, 0.0, 999.0, 1001.0)
            .run(&outcome)
            .expect("table matches");
    }

    #[test]
    fn outside_tolerance_fails() {
        let (_dir, outcome) = outcome_with("EXP : 1000\nMIN : 998\nMAX : 1001\n");
        let err = AnnualCost::min(999.0).run(&outcome).expect_err("MIN differs by 1");
        assert!(err.is_check_failure());
        assert!(err.to_string().contains("MIN"));
    }

    #[test]
    fn missing_statistic_is_variable_not_found() {
        let (_dir, outcome) = outcome_with("EXP : 1000\n");
        let err = AnnualCost::max(1000.0).run(&outcome).expect_err("no MAX");
        assert!(matches!(err, HarnessError::VariableNotFound(_)));
    }

    #[test]
    fn wider_tolerance_is_honored() {
        let (_dir, outcome) = outcome_with("EXP : 1000.4\n");
        AnnualCost::expected(1000.0)
            .with_tolerance(0.5)
            .run(&outcome)
            .expect("0.4 within 0.5");
    }
}
