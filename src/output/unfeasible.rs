//! Detection of weeks the solver could not optimise.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{HarnessError, Result};

/// Log file the simulator writes next to its results.
pub const SIMULATION_LOG_FILE: &str = "simulation.log";

/// Prefix of the MPS dumps written for unfeasible weekly problems.
const MPS_PREFIX: &str = "problem-";
const MPS_EXTENSION: &str = ".mps";

/// Phrases marking a log line as an unfeasibility report.
const UNFEASIBLE_MARKERS: &[&str] = &["unfeasible", "infeasible", "optimization failed"];

/// A `(year, week)` pair, both 1-based as the simulator prints them.
pub type YearWeek = (u32, u32);

/// Where a run reported unfeasible weekly problems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnfeasibilityReport {
    /// Weeks named in unfeasibility log lines.
    pub logged: BTreeSet<YearWeek>,
    /// Weeks for which an MPS dump of the failing problem exists.
    pub mps_dumps: BTreeSet<YearWeek>,
}

impl UnfeasibilityReport {
    /// Builds the report from the captured standard output and, when known,
    /// the run's output folder (for `simulation.log` and MPS dumps).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output folder exists but cannot be read.
    pub fn from_run(stdout: &str, output_dir: Option<&Path>) -> Result<Self> {
        let mut report = Self::default();
        report.logged.extend(scan_log(stdout));

        let Some(dir) = output_dir.filter(|d| d.is_dir()) else {
            return Ok(report);
        };

        let log_path = dir.join(SIMULATION_LOG_FILE);
        if log_path.is_file() {
            let bytes = fs::read(&log_path).map_err(|e| HarnessError::io(&log_path, e))?;
            report.logged.extend(scan_log(&String::from_utf8_lossy(&bytes)));
        }

        let entries = fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| HarnessError::io(dir, e))?;
            if let Some(week) = entry.file_name().to_str().and_then(parse_mps_name) {
                report.mps_dumps.insert(week);
            }
        }
        Ok(report)
    }
}

/// Collects the `(year, week)` pairs named in unfeasibility log lines.
///
/// A line counts when it carries one of the unfeasibility phrases and both a
/// `year <n>` and a `week <n>` token, e.g.
/// `Year 3, week 19 : the weekly problem is unfeasible`.
pub fn scan_log(text: &str) -> BTreeSet<YearWeek> {
    text.lines().filter_map(parse_log_line).collect()
}

fn parse_log_line(line: &str) -> Option<YearWeek> {
    let lower = line.to_ascii_lowercase();
    if !UNFEASIBLE_MARKERS.iter().any(|m| lower.contains(m)) {
        return None;
    }
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let number_after = |word: &str| {
        tokens
            .windows(2)
            .find(|pair| pair[0] == word)
            .and_then(|pair| pair[1].parse::<u32>().ok())
    };
    Some((number_after("year")?, number_after("week")?))
}

/// Parses `problem-<year>-<week>-...mps`.
fn parse_mps_name(name: &str) -> Option<YearWeek> {
    let stem = name.strip_prefix(MPS_PREFIX)?.strip_suffix(MPS_EXTENSION)?;
    let mut parts = stem.split('-');
    let year = parts.next()?.parse().ok()?;
    let week = parts.next()?.parse().ok()?;
    Some((year, week))
}
