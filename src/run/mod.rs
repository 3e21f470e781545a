//! Running the simulator as a subprocess.

pub mod command;
pub mod process;

pub use command::{CommandLine, DEFAULT_SOLVER, ModelerRun, SimulationRun};
pub use process::{RunOutcome, execute, parse_output_folder_from_logs};

use crate::error::Result;

/// Something that can run a study once and report the outcome.
pub trait Simulation {
    /// Study the run operates on.
    fn study_path(&self) -> &std::path::Path;

    /// Runs the study to completion.
    ///
    /// # Errors
    ///
    /// Fails only when the run could not take place at all; a simulator
    /// that exits with an error still yields an outcome.
    fn run(&mut self) -> Result<RunOutcome>;
}

impl Simulation for SimulationRun {
    fn study_path(&self) -> &std::path::Path {
        SimulationRun::study_path(self)
    }

    fn run(&mut self) -> Result<RunOutcome> {
        let (return_code, stdout) = execute(&self.command())?;
        let output_path = match parse_output_folder_from_logs(&stdout) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(study = %self.study_path().display(), "{err}");
                None
            }
        };
        tracing::info!(
            ?return_code,
            output = ?output_path,
            solver = self.solver_name(),
            "simulation finished"
        );
        Ok(RunOutcome {
            return_code,
            stdout,
            output_path,
        })
    }
}

impl Simulation for ModelerRun {
    fn study_path(&self) -> &std::path::Path {
        ModelerRun::study_path(self)
    }

    fn run(&mut self) -> Result<RunOutcome> {
        let (return_code, stdout) = execute(&self.command())?;
        let output_path = self.output_path();
        tracing::info!(?return_code, output = %output_path.display(), "modeler finished");
        Ok(RunOutcome {
            return_code,
            stdout,
            output_path: Some(output_path),
        })
    }
}
