//! Error type shared by the runner, the output readers and the checks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors raised while running a study or inspecting its results.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A requested key is absent from a result table.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// The simulator logs do not declare where results were written.
    #[error("could not parse output folder in output logs")]
    OutputFolderNotFound,

    /// Expected and observed results disagree.
    #[error("check `{check}` failed: {message}")]
    CheckFailed { check: String, message: String },

    #[error("cannot spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot access \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed table \"{}\": {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed file \"{}\": {message}", path.display())]
    Format { path: PathBuf, message: String },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn check_failed(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            check: check.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for assertion mismatches, as opposed to harness faults.
    pub fn is_check_failure(&self) -> bool {
        matches!(self, Self::CheckFailed { .. })
    }
}
