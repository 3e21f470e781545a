use std::path::PathBuf;

use clap::Parser;

use crate::config::HarnessConfig;

/// Non-regression test harness for the Antares simulator.
#[derive(Parser, Debug)]
#[command(name = "antares-nr", version)]
#[command(about = "Run an Antares study and check its results")]
pub struct Cli {
    /// Harness configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Test plan file (TOML)
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub plan: Option<PathBuf>,

    /// Built-in or `plans/<name>.toml` test plan
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Path to the antares-solver binary
    #[arg(long, value_name = "PATH")]
    pub solver_path: Option<PathBuf>,

    /// Path to the antares-modeler binary
    #[arg(long, value_name = "PATH")]
    pub modeler_path: Option<PathBuf>,

    /// Linear solver used by the simulator
    #[arg(long, value_name = "NAME")]
    pub solver: Option<String>,

    /// Directory relative study paths are resolved against
    #[arg(long, value_name = "PATH")]
    pub studies_root: Option<PathBuf>,

    /// Run the linear solver through OR-Tools, sirius included
    #[arg(long)]
    pub use_ortools: bool,

    /// Name the variables and constraints of dumped problems
    #[arg(long)]
    pub named_mps_problems: bool,

    /// Run Monte-Carlo years in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Write the run report as JSON
    #[arg(long, value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Print built-in preset names and exit
    #[arg(long)]
    pub list_presets: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HarnessConfig) {
        let sim = &mut config.simulator;
        if let Some(path) = &self.solver_path {
            sim.solver_path = Some(path.clone());
        }
        if let Some(path) = &self.modeler_path {
            sim.modeler_path = Some(path.clone());
        }
        if let Some(solver) = &self.solver {
            sim.solver = solver.clone();
        }
        sim.use_ortools |= self.use_ortools;
        sim.named_mps_problems |= self.named_mps_problems;
        sim.parallel |= self.parallel;
        if let Some(root) = &self.studies_root {
            config.studies.root = root.clone();
        }
    }
}
