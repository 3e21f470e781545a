//! Reader for `annualSystemCost.txt`.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

pub const ANNUAL_SYSTEM_COST_FILE: &str = "annualSystemCost.txt";

/// Statistic of the annual system cost across Monte-Carlo years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CostStat {
    Exp,
    Std,
    Min,
    Max,
}

impl CostStat {
    pub const ALL: [CostStat; 4] = [CostStat::Exp, CostStat::Std, CostStat::Min, CostStat::Max];

    pub fn key(self) -> &'static str {
        match self {
            CostStat::Exp => "EXP",
            CostStat::Std => "STD",
            CostStat::Min => "MIN",
            CostStat::Max => "MAX",
        }
    }
}

impl fmt::Display for CostStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CostStat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CostStat::ALL
            .into_iter()
            .find(|stat| stat.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown cost statistic \"{s}\", expected EXP, STD, MIN or MAX"))
    }
}

/// Annual system cost statistics of one simulation.
///
/// The file is a list of `KEY : value` lines. Lines that do not follow that
/// shape, or whose value is not a number, are ignored.
#[derive(Debug, Clone)]
pub struct AnnualSystemCost {
    entries: Vec<(String, f64)>,
}

impl AnnualSystemCost {
    /// Reads `annualSystemCost.txt` from a simulation output folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_output(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(ANNUAL_SYSTEM_COST_FILE);
        let text = fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| line.split_once(':'))
            .filter_map(|(key, value)| {
                let value = value.trim().parse::<f64>().ok()?;
                Some((key.trim().to_string(), value))
            })
            .collect();
        Self { entries }
    }

    /// Looks up a raw key such as `"EXP"`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::VariableNotFound`] if the key is absent.
    pub fn value(&self, key: &str) -> Result<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| HarnessError::VariableNotFound(key.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`HarnessError::VariableNotFound`] if the statistic is absent.
    pub fn get(&self, stat: CostStat) -> Result<f64> {
        self.value(stat.key())
    }
}
