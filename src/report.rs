//! Run report: what ran, how it exited, and what each check concluded.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::check::{CheckRecord, CheckStatus};
use crate::run::RunOutcome;

/// Summary of one test plan execution.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub name: String,
    pub study: PathBuf,
    /// `None` when the simulation never ran or was killed by a signal.
    pub return_code: Option<i32>,
    pub output_path: Option<PathBuf>,
    pub checks: Vec<CheckRecord>,
    /// Error that stopped the run before or outside the checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    pub fn new(name: impl Into<String>, study: &Path) -> Self {
        Self {
            name: name.into(),
            study: study.to_path_buf(),
            return_code: None,
            output_path: None,
            checks: Vec::new(),
            error: None,
        }
    }

    /// Copies the return code and output folder of a completed run.
    pub fn with_outcome(mut self, outcome: Option<&RunOutcome>) -> Self {
        if let Some(outcome) = outcome {
            self.return_code = outcome.return_code;
            self.output_path = outcome.output_path.clone();
        }
        self
    }

    pub fn with_checks(mut self, checks: &[CheckRecord]) -> Self {
        self.checks = checks.to_vec();
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    /// True when no error occurred and no check failed.
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && self
                .checks
                .iter()
                .all(|c| c.status == CheckStatus::Passed)
    }

    /// Writes the report as pretty-printed JSON to the given path.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if file creation or writing fails.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_json_to(io::BufWriter::new(file))
    }

    /// Writes the report as pretty-printed JSON to any writer.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if serialization or writing fails.
    pub fn write_json_to(&self, mut writer: impl Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.name)?;
        writeln!(f, "Study:        {}", self.study.display())?;
        match self.return_code {
            Some(code) => writeln!(f, "Return code:  {code}")?,
            None => writeln!(f, "Return code:  -")?,
        }
        if let Some(output) = &self.output_path {
            writeln!(f, "Output:       {}", output.display())?;
        }
        for check in &self.checks {
            match &check.status {
                CheckStatus::Passed => writeln!(f, "  [pass] {}", check.name)?,
                CheckStatus::Failed(msg) => writeln!(f, "  [FAIL] {}: {msg}", check.name)?,
                CheckStatus::Skipped => writeln!(f, "  [skip] {}", check.name)?,
            }
        }
        if let Some(err) = &self.error {
            writeln!(f, "Error:        {err}")?;
        }
        write!(f, "Result:       {}", if self.passed() { "PASSED" } else { "FAILED" })
    }
}
