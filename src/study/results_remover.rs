use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// Deletes what a simulation wrote inside a study.
#[derive(Debug, Clone)]
pub struct ResultsRemover {
    output_dir: PathBuf,
}

impl ResultsRemover {
    /// Remover for `<study>/output`.
    pub fn new(study_path: &Path) -> Self {
        Self {
            output_dir: study_path.join("output"),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Removes the output directory and everything below it.
    ///
    /// A directory that does not exist counts as already removed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory exists but cannot be removed.
    pub fn run(&self) -> Result<()> {
        match fs::remove_dir_all(&self.output_dir) {
            Ok(()) => {
                tracing::info!(path = %self.output_dir.display(), "results removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HarnessError::io(&self.output_dir, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_nested_results() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("output").join("20240101-1200eco").join("economy");
        fs::create_dir_all(&nested).expect("create output");
        fs::write(nested.join("values.txt"), "1").expect("write result");

        let remover = ResultsRemover::new(dir.path());
        remover.run().expect("remove");
        assert!(!remover.output_dir().exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn missing_output_is_fine() {
        let dir = tempfile::tempdir().expect("tempdir");
        ResultsRemover::new(dir.path()).run().expect("nothing to remove");
    }
}
