//! Command lines for the Antares solver and modeler binaries.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Solver name the simulator uses when OR-Tools is not requested.
pub const DEFAULT_SOLVER: &str = "sirius";

/// A program and its arguments, ready to be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Describes one run of the Antares solver on a study.
///
/// Built once per test case and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use antares_nr::run::SimulationRun;
///
/// let run = SimulationRun::new("studies/unfeasible_problem_01", "bin/antares-solver")
///     .with_solver("xpress")
///     .with_parallel(true);
/// let line = run.command().to_string();
/// assert_eq!(
///     line,
///     "bin/antares-solver -i studies/unfeasible_problem_01 --use-ortools --ortools-solver=xpress --parallel"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SimulationRun {
    study_path: PathBuf,
    solver_path: PathBuf,
    solver_name: String,
    use_ortools: bool,
    named_mps_problems: bool,
    parallel: bool,
}

impl SimulationRun {
    /// Creates a run descriptor using the built-in solver and no extra flags.
    pub fn new(study_path: impl Into<PathBuf>, solver_path: impl Into<PathBuf>) -> Self {
        Self {
            study_path: study_path.into(),
            solver_path: solver_path.into(),
            solver_name: DEFAULT_SOLVER.to_string(),
            use_ortools: false,
            named_mps_problems: false,
            parallel: false,
        }
    }

    pub fn with_solver(mut self, name: impl Into<String>) -> Self {
        self.solver_name = name.into();
        self
    }

    /// Routes the linear solver through OR-Tools, even for `sirius`.
    pub fn with_use_ortools(mut self, enabled: bool) -> Self {
        self.use_ortools = enabled;
        self
    }

    pub fn with_named_mps_problems(mut self, enabled: bool) -> Self {
        self.named_mps_problems = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn study_path(&self) -> &Path {
        &self.study_path
    }

    pub fn solver_name(&self) -> &str {
        &self.solver_name
    }

    /// Builds `<solver> -i <study> [--use-ortools --ortools-solver=<name>]
    /// [--named-mps-problems] [--parallel]`.
    ///
    /// The OR-Tools flags are passed when requested or when the solver is
    /// not the built-in one.
    pub fn command(&self) -> CommandLine {
        let mut cmd = CommandLine::new(&self.solver_path)
            .arg("-i")
            .arg(self.study_path.as_os_str());
        if self.use_ortools || self.solver_name != DEFAULT_SOLVER {
            cmd = cmd
                .arg("--use-ortools")
                .arg(format!("--ortools-solver={}", self.solver_name));
        }
        if self.named_mps_problems {
            cmd = cmd.arg("--named-mps-problems");
        }
        if self.parallel {
            cmd = cmd.arg("--parallel");
        }
        cmd
    }
}

/// Describes one run of the Antares modeler on a study.
#[derive(Debug, Clone)]
pub struct ModelerRun {
    study_path: PathBuf,
    modeler_path: PathBuf,
}

impl ModelerRun {
    pub fn new(study_path: impl Into<PathBuf>, modeler_path: impl Into<PathBuf>) -> Self {
        Self {
            study_path: study_path.into(),
            modeler_path: modeler_path.into(),
        }
    }

    pub fn study_path(&self) -> &Path {
        &self.study_path
    }

    /// Builds `<modeler> <study>`.
    pub fn command(&self) -> CommandLine {
        CommandLine::new(&self.modeler_path).arg(self.study_path.as_os_str())
    }

    /// Folder the modeler writes to, always `<study>/output`.
    ///
    /// The logged `Output folder : ` line is not parsed for modeler runs.
    pub fn output_path(&self) -> PathBuf {
        self.study_path.join("output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &CommandLine) -> Vec<String> {
        cmd.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_solver_passes_study_only() {
        let run = SimulationRun::new("study", "antares-solver");
        let cmd = run.command();
        assert_eq!(cmd.program, PathBuf::from("antares-solver"));
        assert_eq!(args(&cmd), vec!["-i", "study"]);
    }

    #[test]
    fn ortools_solver_adds_selection_flags() {
        let run = SimulationRun::new("study", "antares-solver").with_solver("coin");
        assert_eq!(
            args(&run.command()),
            vec!["-i", "study", "--use-ortools", "--ortools-solver=coin"]
        );
    }

    #[test]
    fn sirius_through_ortools_when_requested() {
        let run = SimulationRun::new("study", "antares-solver").with_use_ortools(true);
        assert_eq!(
            args(&run.command()),
            vec!["-i", "study", "--use-ortools", "--ortools-solver=sirius"]
        );
    }

    #[test]
    fn named_mps_and_parallel_flags_come_last() {
        let run = SimulationRun::new("study", "antares-solver")
            .with_named_mps_problems(true)
            .with_parallel(true);
        assert_eq!(
            args(&run.command()),
            vec!["-i", "study", "--named-mps-problems", "--parallel"]
        );
    }

    #[test]
    fn modeler_command_is_binary_then_study() {
        let run = ModelerRun::new("studies/s1", "antares-modeler");
        let cmd = run.command();
        assert_eq!(cmd.to_string(), "antares-modeler studies/s1");
        assert_eq!(run.output_path(), PathBuf::from("studies/s1/output"));
    }
}
