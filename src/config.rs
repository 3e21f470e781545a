//! TOML harness configuration and test plans.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::check::{
    AnnualCost, CheckList, LoldDuration, OptimalValue, SimulationSuccess, SimulationTime,
    UnfeasibleBehavior, UnfeasibleProblem, UnsuppliedEnergy, WeeksInYear,
};
use crate::output::CostStat;
use crate::run::DEFAULT_SOLVER;

/// Highest week index of a simulated year.
const MAX_WEEK: u32 = 53;

/// Where the simulator binaries and the study fixtures live.
///
/// All fields have defaults. Load from TOML with
/// [`HarnessConfig::from_toml_file`]; command-line options override it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Simulator binaries and run flags.
    pub simulator: SimulatorConfig,
    /// Study fixtures.
    pub studies: StudiesConfig,
}

/// Simulator binaries and run flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Path to the `antares-solver` binary.
    pub solver_path: Option<PathBuf>,
    /// Path to the `antares-modeler` binary.
    pub modeler_path: Option<PathBuf>,
    /// Linear solver name; anything but `"sirius"` goes through OR-Tools.
    pub solver: String,
    /// Go through OR-Tools even when `solver` is `"sirius"`.
    pub use_ortools: bool,
    /// Pass `--named-mps-problems` to the solver.
    pub named_mps_problems: bool,
    /// Pass `--parallel` to the solver.
    pub parallel: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            solver_path: None,
            modeler_path: None,
            solver: DEFAULT_SOLVER.to_string(),
            use_ortools: false,
            named_mps_problems: false,
            parallel: false,
        }
    }
}

/// Study fixtures.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudiesConfig {
    /// Directory test plan study paths are relative to.
    pub root: PathBuf,
}

impl Default for StudiesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("../resources/Antares_Simulator_Tests_NR"),
        }
    }
}

/// Which binary a test plan runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    #[default]
    Solver,
    Modeler,
}

/// One study, how to run it, and what to check afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestPlan {
    /// Label used in reports; defaults to the study path.
    #[serde(default)]
    pub name: String,
    /// Study folder, relative to the studies root unless absolute.
    pub study: PathBuf,
    /// Binary to run.
    #[serde(default)]
    pub run: RunKind,
    /// Checks applied, in order, after the single run.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

/// A check as written in a test plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum CheckConfig {
    SimulationSucceeds,
    SimulationFails,
    AnnualCost {
        exp: Option<f64>,
        std: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        tolerance: Option<f64>,
    },
    LoldDuration {
        area: String,
        year: u32,
        hours: u32,
    },
    UnsuppliedEnergy {
        area: String,
        year: u32,
        date: String,
        mw: f64,
    },
    OptimalValue {
        variable: String,
        value: f64,
    },
    SimulationTime {
        max_seconds: f64,
    },
    UnfeasibleProblem {
        behavior: UnfeasibleBehavior,
        weeks: Vec<WeeksInYear>,
    },
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"checks[2].year"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl HarnessConfig {
    /// Parses a harness configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Resolves a plan's study path against the studies root.
    pub fn study_path(&self, plan: &TestPlan) -> PathBuf {
        if plan.study.is_absolute() {
            plan.study.clone()
        } else {
            self.studies.root.join(&plan.study)
        }
    }

    /// Checks that the binary `kind` needs is configured.
    pub fn validate_for(&self, kind: RunKind) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let sim = &self.simulator;
        match kind {
            RunKind::Solver if sim.solver_path.is_none() => errors.push(ConfigError {
                field: "simulator.solver_path".into(),
                message: "required to run the solver (or pass --solver-path)".into(),
            }),
            RunKind::Modeler if sim.modeler_path.is_none() => errors.push(ConfigError {
                field: "simulator.modeler_path".into(),
                message: "required to run the modeler (or pass --modeler-path)".into(),
            }),
            _ => {}
        }
        if sim.solver.trim().is_empty() {
            errors.push(ConfigError {
                field: "simulator.solver".into(),
                message: "must not be empty".into(),
            });
        }
        errors
    }
}

impl TestPlan {
    /// Parses a test plan from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "plan".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut plan: Self = toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })?;
        if plan.name.is_empty() {
            plan.name = plan.study.display().to_string();
        }
        Ok(plan)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the plan is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.study.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "study".into(),
                message: "must not be empty".into(),
            });
        }

        for (i, check) in self.checks.iter().enumerate() {
            let at = |name: &str| format!("checks[{i}].{name}");
            match check {
                CheckConfig::SimulationSucceeds | CheckConfig::SimulationFails => {}
                CheckConfig::AnnualCost {
                    exp,
                    std,
                    min,
                    max,
                    tolerance,
                } => {
                    if exp.is_none() && std.is_none() && min.is_none() && max.is_none() {
                        errors.push(ConfigError {
                            field: at("exp"),
                            message: "at least one of exp, std, min, max is required".into(),
                        });
                    }
                    if tolerance.is_some_and(|t| !(t >= 0.0)) {
                        errors.push(ConfigError {
                            field: at("tolerance"),
                            message: "must be >= 0".into(),
                        });
                    }
                }
                CheckConfig::LoldDuration { area, year, .. } => {
                    validate_area_year(&mut errors, &at, area, *year);
                }
                CheckConfig::UnsuppliedEnergy {
                    area, year, date, ..
                } => {
                    validate_area_year(&mut errors, &at, area, *year);
                    if date.split_whitespace().count() != 3 {
                        errors.push(ConfigError {
                            field: at("date"),
                            message: format!("expected \"<day> <MONTH> <hh:mm>\", got \"{date}\""),
                        });
                    }
                }
                CheckConfig::OptimalValue { variable, .. } => {
                    if variable.is_empty() {
                        errors.push(ConfigError {
                            field: at("variable"),
                            message: "must not be empty".into(),
                        });
                    }
                }
                CheckConfig::SimulationTime { max_seconds } => {
                    if !(*max_seconds > 0.0) {
                        errors.push(ConfigError {
                            field: at("max_seconds"),
                            message: "must be > 0".into(),
                        });
                    }
                }
                CheckConfig::UnfeasibleProblem { weeks, .. } => {
                    for (j, w) in weeks.iter().enumerate() {
                        if w.year == 0 {
                            errors.push(ConfigError {
                                field: at(&format!("weeks[{j}].year")),
                                message: "years are 1-based".into(),
                            });
                        }
                        if w.weeks.iter().any(|&wk| wk == 0 || wk > MAX_WEEK) {
                            errors.push(ConfigError {
                                field: at(&format!("weeks[{j}].weeks")),
                                message: format!("weeks must be in [1, {MAX_WEEK}]"),
                            });
                        }
                    }
                }
            }
        }

        errors
    }

    /// Builds the check list for a run of this plan on `study_path`.
    pub fn build_checks(&self, study_path: &Path) -> CheckList {
        let mut checks = CheckList::new();
        for check in &self.checks {
            match check {
                CheckConfig::SimulationSucceeds => checks.add(SimulationSuccess::succeeds()),
                CheckConfig::SimulationFails => checks.add(SimulationSuccess::fails()),
                CheckConfig::AnnualCost {
                    exp,
                    std,
                    min,
                    max,
                    tolerance,
                } => {
                    let expected = [
                        (CostStat::Exp, *exp),
                        (CostStat::Std, *std),
                        (CostStat::Min, *min),
                        (CostStat::Max, *max),
                    ]
                    .into_iter()
                    .filter_map(|(stat, value)| value.map(|v| (stat, v)))
                    .collect();
                    let mut cost = AnnualCost::new(expected);
                    if let Some(t) = tolerance {
                        cost = cost.with_tolerance(*t);
                    }
                    checks.add(cost);
                }
                CheckConfig::LoldDuration { area, year, hours } => checks.add(LoldDuration {
                    area: area.clone(),
                    year: *year,
                    hours: *hours,
                }),
                CheckConfig::UnsuppliedEnergy {
                    area,
                    year,
                    date,
                    mw,
                } => checks.add(UnsuppliedEnergy {
                    area: area.clone(),
                    year: *year,
                    date: date.clone(),
                    mw: *mw,
                }),
                CheckConfig::OptimalValue { variable, value } => {
                    checks.add(OptimalValue::new(variable.clone(), *value));
                }
                CheckConfig::SimulationTime { max_seconds } => checks.add(SimulationTime {
                    max_seconds: *max_seconds,
                }),
                CheckConfig::UnfeasibleProblem { behavior, weeks } => checks.add(
                    UnfeasibleProblem::new(study_path, *behavior, weeks.clone()),
                ),
            }
        }
        checks
    }
}

fn validate_area_year(
    errors: &mut Vec<ConfigError>,
    at: &dyn Fn(&str) -> String,
    area: &str,
    year: u32,
) {
    if area.trim().is_empty() {
        errors.push(ConfigError {
            field: at("area"),
            message: "must not be empty".into(),
        });
    }
    if year == 0 {
        errors.push(ConfigError {
            field: at("year"),
            message: "years are 1-based".into(),
        });
    }
}
