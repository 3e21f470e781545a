//! Built-in test plans for the unfeasible-problem studies.

use std::path::PathBuf;

use crate::check::{UnfeasibleBehavior, WeeksInYear};
use crate::config::{CheckConfig, ConfigError, RunKind, TestPlan};

use UnfeasibleBehavior::{ErrorDry, ErrorVerbose, WarningDry, WarningVerbose};

/// Folder, under the studies root, holding the unfeasible-problem studies.
pub const UNFEASIBLE_STUDIES_DIR: &str = "unfeasible-problem";

/// Directory searched for `<name>.toml` before the built-in catalog.
pub const PLANS_DIR: &str = "plans";

type Weeks = &'static [(u32, &'static [u32])];

struct Preset {
    study: u8,
    behavior: UnfeasibleBehavior,
    weeks: Weeks,
}

const STUDY_01_WARNING: Weeks = &[(3, &[19]), (6, &[42, 43, 49]), (7, &[19]), (8, &[19])];
const STUDY_02_WARNING: Weeks = &[(6, &[22, 23, 29])];
const STUDY_05_WARNING: Weeks = &[
    (10, &[19]),
    (11, &[19]),
    (16, &[19]),
    (29, &[19]),
    (41, &[42, 43, 49]),
    (43, &[42, 43, 49]),
    (46, &[42, 43, 49]),
    (142, &[42, 43, 49]),
];
const STUDY_07_WARNING: Weeks = &[(1, &[1]), (3, &[52]), (5, &[1]), (7, &[52]), (9, &[52])];
const STUDY_08_WARNING: Weeks = &[(3, &[51]), (7, &[51]), (9, &[51])];

const fn preset(study: u8, behavior: UnfeasibleBehavior, weeks: Weeks) -> Preset {
    Preset {
        study,
        behavior,
        weeks,
    }
}

const CATALOG: &[Preset] = &[
    preset(1, ErrorVerbose, &[(3, &[19])]),
    preset(1, ErrorDry, &[(3, &[19])]),
    preset(1, WarningVerbose, STUDY_01_WARNING),
    preset(1, WarningDry, STUDY_01_WARNING),
    preset(2, WarningDry, STUDY_02_WARNING),
    preset(2, ErrorDry, &[(6, &[22])]),
    preset(3, WarningDry, STUDY_01_WARNING),
    preset(3, ErrorDry, &[(3, &[19])]),
    preset(4, WarningDry, STUDY_02_WARNING),
    preset(4, ErrorDry, &[(6, &[22])]),
    preset(5, WarningDry, STUDY_05_WARNING),
    preset(5, ErrorDry, &[(10, &[19])]),
    preset(6, WarningDry, STUDY_01_WARNING),
    preset(6, ErrorDry, &[(3, &[19])]),
    preset(7, WarningDry, STUDY_07_WARNING),
    preset(7, ErrorDry, &[(1, &[1])]),
    preset(8, WarningDry, STUDY_08_WARNING),
    preset(8, ErrorDry, &[(3, &[51])]),
    preset(9, WarningDry, STUDY_07_WARNING),
    preset(9, ErrorDry, &[(1, &[1])]),
    preset(10, WarningDry, STUDY_08_WARNING),
    preset(10, ErrorDry, &[(3, &[51])]),
];

impl Preset {
    fn study_dir(&self) -> String {
        format!("unfeasible_problem_{:02}", self.study)
    }

    fn name(&self) -> String {
        format!(
            "{}__{}",
            self.study_dir(),
            self.behavior.as_str().replace('-', "_")
        )
    }

    fn plan(&self) -> TestPlan {
        let weeks = self
            .weeks
            .iter()
            .map(|&(year, weeks)| WeeksInYear::new(year, weeks))
            .collect();
        TestPlan {
            name: self.name(),
            study: PathBuf::from(UNFEASIBLE_STUDIES_DIR).join(self.study_dir()),
            run: RunKind::Solver,
            checks: vec![CheckConfig::UnfeasibleProblem {
                behavior: self.behavior,
                weeks,
            }],
        }
    }
}

/// Names of all built-in presets, in catalog order.
pub fn preset_names() -> Vec<String> {
    CATALOG.iter().map(Preset::name).collect()
}

impl TestPlan {
    /// Loads `plans/<name>.toml` if it exists, otherwise the built-in preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the plan file is invalid or no preset
    /// has that name.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        let plan_path = PathBuf::from(PLANS_DIR).join(format!("{name}.toml"));
        if plan_path.exists() {
            return Self::from_toml_file(&plan_path);
        }

        CATALOG
            .iter()
            .find(|p| p.name() == name)
            .map(Preset::plan)
            .ok_or_else(|| ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset `{name}` (see --list-presets, or add `{}`)",
                    plan_path.display()
                ),
            })
    }
}
