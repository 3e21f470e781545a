use crate::error::{HarnessError, Result};
use crate::output::HourlyValues;
use crate::output::hourly::{LOLD, UNSUPPLIED_ENERGY};
use crate::run::RunOutcome;

use super::Check;
use super::assertions::{DEFAULT_TOLERANCE, assert_double_close};

/// Loss of load in `area` during Monte-Carlo `year` lasts exactly `hours`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoldDuration {
    pub area: String,
    pub year: u32,
    pub hours: u32,
}

impl Check for LoldDuration {
    fn name(&self) -> &str {
        "lold-duration"
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        let values = HourlyValues::from_output(outcome.output_dir()?, &self.area, self.year)?;
        let actual = values.column_sum(LOLD)?;
        if actual == f64::from(self.hours) {
            return Ok(());
        }
        Err(HarnessError::check_failed(
            self.name(),
            format!(
                "area \"{}\", year {}: expected {} hours of loss of load, got {actual}",
                self.area, self.year, self.hours
            ),
        ))
    }
}

/// Unsupplied energy in `area` at `date` of Monte-Carlo `year` is `mw`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsuppliedEnergy {
    pub area: String,
    pub year: u32,
    /// `"<day> <MONTH> <hh:mm>"`, e.g. `"02 JAN 09:00"`.
    pub date: String,
    pub mw: f64,
}

impl Check for UnsuppliedEnergy {
    fn name(&self) -> &str {
        "unsupplied-energy"
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        let values = HourlyValues::from_output(outcome.output_dir()?, &self.area, self.year)?;
        let actual = values.column_sum_at(UNSUPPLIED_ENERGY, &self.date)?;
        let what = format!("area \"{}\" on \"{}\" of year {}", self.area, self.date, self.year);
        assert_double_close(self.name(), &what, self.mw, actual, DEFAULT_TOLERANCE)
    }
}
