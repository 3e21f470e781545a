use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::output::{UnfeasibilityReport, YearWeek};
use crate::run::RunOutcome;
use crate::study::StudyModifier;

use super::Check;

/// Settings key selecting how the simulator reacts to an unfeasible week.
pub const BEHAVIOR_KEY: &str = "include-unfeasible-problem-behavior";
const BEHAVIOR_SECTION: &str = "optimization";

/// Reaction of the simulator to an unfeasible weekly problem.
///
/// `error-*` modes stop the simulation at the first unfeasible week,
/// `warning-*` modes carry on. `*-verbose` modes dump the failing problem
/// to an MPS file, `*-dry` modes do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnfeasibleBehavior {
    ErrorVerbose,
    ErrorDry,
    WarningVerbose,
    WarningDry,
}

impl UnfeasibleBehavior {
    pub const ALL: [UnfeasibleBehavior; 4] = [
        UnfeasibleBehavior::ErrorVerbose,
        UnfeasibleBehavior::ErrorDry,
        UnfeasibleBehavior::WarningVerbose,
        UnfeasibleBehavior::WarningDry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnfeasibleBehavior::ErrorVerbose => "error-verbose",
            UnfeasibleBehavior::ErrorDry => "error-dry",
            UnfeasibleBehavior::WarningVerbose => "warning-verbose",
            UnfeasibleBehavior::WarningDry => "warning-dry",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            UnfeasibleBehavior::ErrorVerbose | UnfeasibleBehavior::ErrorDry
        )
    }

    pub fn is_verbose(self) -> bool {
        matches!(
            self,
            UnfeasibleBehavior::ErrorVerbose | UnfeasibleBehavior::WarningVerbose
        )
    }
}

impl fmt::Display for UnfeasibleBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnfeasibleBehavior {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        UnfeasibleBehavior::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown unfeasible-problem behavior \"{s}\", expected one of: error-verbose, \
                     error-dry, warning-verbose, warning-dry"
                )
            })
    }
}

/// Weeks of one Monte-Carlo year, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeksInYear {
    pub year: u32,
    pub weeks: Vec<u32>,
}

impl WeeksInYear {
    pub fn new(year: u32, weeks: impl Into<Vec<u32>>) -> Self {
        Self {
            year,
            weeks: weeks.into(),
        }
    }
}

/// Runs the study under a given unfeasible-problem behavior and verifies
/// that exactly the expected weeks are reported unfeasible.
#[derive(Debug, Clone)]
pub struct UnfeasibleProblem {
    study_path: PathBuf,
    behavior: UnfeasibleBehavior,
    checks_on_weeks: Vec<WeeksInYear>,
}

impl UnfeasibleProblem {
    pub fn new(
        study_path: &Path,
        behavior: UnfeasibleBehavior,
        checks_on_weeks: Vec<WeeksInYear>,
    ) -> Self {
        Self {
            study_path: study_path.to_path_buf(),
            behavior,
            checks_on_weeks,
        }
    }

    pub fn behavior(&self) -> UnfeasibleBehavior {
        self.behavior
    }

    pub fn expected_weeks(&self) -> BTreeSet<YearWeek> {
        self.checks_on_weeks
            .iter()
            .flat_map(|w| w.weeks.iter().map(move |&week| (w.year, week)))
            .collect()
    }

    fn compare(
        &self,
        what: &str,
        expected: &BTreeSet<YearWeek>,
        actual: &BTreeSet<YearWeek>,
    ) -> Result<()> {
        if expected == actual {
            return Ok(());
        }
        let missing: Vec<_> = expected.difference(actual).collect();
        let unexpected: Vec<_> = actual.difference(expected).collect();
        Err(HarnessError::check_failed(
            self.name(),
            format!(
                "{what} in {} mode: missing (year, week) {missing:?}, unexpected {unexpected:?}",
                self.behavior
            ),
        ))
    }
}

impl Check for UnfeasibleProblem {
    fn name(&self) -> &str {
        "unfeasible-problem"
    }

    fn study_modifiers(&self) -> Vec<StudyModifier> {
        vec![StudyModifier::general(
            &self.study_path,
            BEHAVIOR_SECTION,
            BEHAVIOR_KEY,
            self.behavior.as_str(),
        )]
    }

    fn run(&self, outcome: &RunOutcome) -> Result<()> {
        let should_succeed = !self.behavior.is_error();
        if outcome.success() != should_succeed {
            return Err(HarnessError::check_failed(
                self.name(),
                format!(
                    "in {} mode the simulation should {}, return code was {:?}",
                    self.behavior,
                    if should_succeed { "succeed" } else { "fail" },
                    outcome.return_code
                ),
            ));
        }

        let report =
            UnfeasibilityReport::from_run(&outcome.stdout_text(), outcome.output_path.as_deref())?;
        let expected = self.expected_weeks();
        tracing::debug!(
            behavior = %self.behavior,
            logged = ?report.logged,
            mps = ?report.mps_dumps,
            "unfeasibility report"
        );

        self.compare("unfeasible weeks in logs", &expected, &report.logged)?;
        let expected_dumps = if self.behavior.is_verbose() {
            expected
        } else {
            BTreeSet::new()
        };
        self.compare("MPS dumps", &expected_dumps, &report.mps_dumps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn outcome(code: i32, logs: &str, dir: &Path) -> RunOutcome {
        RunOutcome {
            return_code: Some(code),
            stdout: logs.as_bytes().to_vec(),
            output_path: Some(dir.to_path_buf()),
        }
    }

    fn check(behavior: UnfeasibleBehavior, weeks: Vec<WeeksInYear>) -> UnfeasibleProblem {
        UnfeasibleProblem::new(Path::new("study"), behavior, weeks)
    }

    #[test]
    fn behaviors_parse_from_settings_values() {
        for behavior in UnfeasibleBehavior::ALL {
            assert_eq!(behavior.as_str().parse::<UnfeasibleBehavior>().ok(), Some(behavior));
        }
        assert!("error".parse::<UnfeasibleBehavior>().is_err());
    }

    #[test]
    fn modifier_targets_optimization_section() {
        let modifiers = check(UnfeasibleBehavior::WarningDry, vec![]).study_modifiers();
        assert_eq!(modifiers.len(), 1);
        assert_eq!(modifiers[0].key(), BEHAVIOR_KEY);
        assert_eq!(modifiers[0].value(), "warning-dry");
        assert!(modifiers[0].file().ends_with("settings/generaldata.ini"));
    }

    #[test]
    fn error_verbose_needs_failure_log_and_dump() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("problem-3-19--optim-nb-1.mps"), "").expect("write mps");
        let run = outcome(1, "Year 3, week 19 : problem is unfeasible\n", dir.path());

        check(
            UnfeasibleBehavior::ErrorVerbose,
            vec![WeeksInYear::new(3, [19])],
        )
        .run(&run)
        .expect("exactly year 3 week 19");
    }

    #[test]
    fn error_mode_with_successful_run_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let run = outcome(0, "", dir.path());
        let err = check(UnfeasibleBehavior::ErrorDry, vec![WeeksInYear::new(3, [19])])
            .run(&run)
            .expect_err("error mode must fail the simulation");
        assert!(err.to_string().contains("should fail"));
    }

    #[test]
    fn superset_of_expected_weeks_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let logs = "Year 6, week 42 : unfeasible\nYear 6, week 43 : unfeasible\n";
        let run = outcome(0, logs, dir.path());
        let err = check(UnfeasibleBehavior::WarningDry, vec![WeeksInYear::new(6, [42])])
            .run(&run)
            .expect_err("week 43 was not expected");
        assert!(err.to_string().contains("(6, 43)"));
    }

    #[test]
    fn subset_of_expected_weeks_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let run = outcome(0, "Year 6, week 42 : unfeasible\n", dir.path());
        let err = check(
            UnfeasibleBehavior::WarningDry,
            vec![WeeksInYear::new(6, [42, 43, 49])],
        )
        .run(&run)
        .expect_err("weeks 43 and 49 are missing");
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn dry_mode_must_not_dump_problems() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("problem-1-1--optim-nb-1.mps"), "").expect("write mps");
        let run = outcome(0, "Year 1, week 1 : unfeasible\n", dir.path());
        let err = check(UnfeasibleBehavior::WarningDry, vec![WeeksInYear::new(1, [1])])
            .run(&run)
            .expect_err("dry mode wrote an MPS file");
        assert!(err.to_string().contains("MPS"));
    }
}
