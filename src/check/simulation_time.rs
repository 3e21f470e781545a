use crate::error::{HarnessError, Result};
use crate::output::simulation_time;
use crate::run::RunOutcome;

use super::Check;

/// The simulation took at most `max_seconds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationTime {
    pub max_seconds: f64,
}

impl Check for SimulationTime {
    fn name(&self) -> &str {
        "simulation-time"
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        let actual = simulation_time(outcome.output_dir()?)?;
        if actual <= self.max_seconds {
            return Ok(());
        }
        Err(HarnessError::check_failed(
            self.name(),
            format!("took {actual} s, limit is {} s", self.max_seconds),
        ))
    }
}
