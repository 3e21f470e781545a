//! Child-process execution and log inspection.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{HarnessError, Result};

use super::command::CommandLine;

/// Log prefix the simulator prints in front of its results directory.
pub const OUTPUT_FOLDER_PREFIX: &str = "Output folder : ";

/// What a finished simulator process left behind.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Exit code, `None` when the process was killed by a signal.
    pub return_code: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Results directory, when it could be determined.
    pub output_path: Option<PathBuf>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.return_code == Some(0)
    }

    /// Results directory of the run.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::OutputFolderNotFound`] when the run did not
    /// report one.
    pub fn output_dir(&self) -> Result<&Path> {
        self.output_path
            .as_deref()
            .ok_or(HarnessError::OutputFolderNotFound)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Spawns `command`, waits for it and captures its standard output.
///
/// Standard error is discarded. A non-zero exit is not an error here: the
/// returned code is for the caller to assert on.
///
/// # Errors
///
/// Returns [`HarnessError::Spawn`] if the program cannot be started.
pub fn execute(command: &CommandLine) -> Result<(Option<i32>, Vec<u8>)> {
    tracing::info!(command = %command, "running command");
    let output = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| HarnessError::Spawn {
            program: command.program.display().to_string(),
            source,
        })?;
    let code = output.status.code();
    tracing::debug!(?code, stdout_bytes = output.stdout.len(), "command finished");
    Ok((code, output.stdout))
}

/// Extracts the results directory from simulator logs.
///
/// # Errors
///
/// Returns [`HarnessError::OutputFolderNotFound`] when no line carries
/// [`OUTPUT_FOLDER_PREFIX`].
pub fn parse_output_folder_from_logs(logs: &[u8]) -> Result<PathBuf> {
    let text = String::from_utf8_lossy(logs);
    text.lines()
        .find_map(|line| line.split_once(OUTPUT_FOLDER_PREFIX))
        .map(|(_, folder)| PathBuf::from(folder.trim_end()))
        .ok_or(HarnessError::OutputFolderNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_folder_is_text_after_prefix() {
        let logs = b"[solver][infos] Antares Solver v9.2\n\
                     [solver][infos]   Output folder : /tmp/study/output/20240101-1200eco\r\n\
                     [solver][infos] Done\n";
        let folder = parse_output_folder_from_logs(logs).expect("prefix is present");
        assert_eq!(folder, PathBuf::from("/tmp/study/output/20240101-1200eco"));
    }

    #[test]
    fn first_output_folder_line_wins() {
        let logs = b"Output folder : first\nOutput folder : second\n";
        let folder = parse_output_folder_from_logs(logs).expect("prefix is present");
        assert_eq!(folder, PathBuf::from("first"));
    }

    #[test]
    fn missing_prefix_is_a_lookup_error() {
        let err = parse_output_folder_from_logs(b"nothing useful here\n")
            .expect_err("must fail without the prefix");
        assert!(matches!(err, HarnessError::OutputFolderNotFound));
    }

    #[test]
    fn outcome_without_output_path_reports_missing_folder() {
        let outcome = RunOutcome {
            return_code: Some(1),
            stdout: Vec::new(),
            output_path: None,
        };
        assert!(!outcome.success());
        assert!(matches!(
            outcome.output_dir(),
            Err(HarnessError::OutputFolderNotFound)
        ));
    }

    #[test]
    fn spawning_a_missing_binary_fails() {
        let cmd = CommandLine::new("/definitely/not/a/real/antares-solver").arg("-i");
        let err = execute(&cmd).expect_err("binary does not exist");
        assert!(matches!(err, HarnessError::Spawn { .. }));
    }
}
