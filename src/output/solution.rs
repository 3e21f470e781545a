//! Reader for the modeler's `solution.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// File the modeler writes optimal variable values to.
pub const SOLUTION_FILE: &str = "solution.csv";

/// Optimal values written by one modeler run.
///
/// The file holds header-less `<name> <value>` rows separated by any
/// whitespace.
#[derive(Debug, Clone)]
pub struct ModelerOutput {
    path: PathBuf,
    rows: Vec<(String, String)>,
}

impl ModelerOutput {
    /// Loads `solution.csv` from `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a format error for
    /// a non-blank row that does not hold exactly two fields.
    pub fn new(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(SOLUTION_FILE);
        let text = fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;

        let mut rows = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => {}
                [name, value] => rows.push((name.to_string(), value.to_string())),
                _ => {
                    return Err(HarnessError::format(
                        &path,
                        format!("line {}: expected `<name> <value>`, got \"{line}\"", n + 1),
                    ));
                }
            }
        }
        tracing::debug!(path = %path.display(), rows = rows.len(), "loaded solution");
        Ok(Self { path, rows })
    }

    /// Returns the optimal value of `var`.
    ///
    /// Rows are scanned in file order and the first exact match on the name
    /// column wins.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::VariableNotFound`] if no row is named `var`,
    /// or a format error if the matching value is not a number.
    pub fn get_optimal_value(&self, var: &str) -> Result<f64> {
        let (_, raw) = self
            .rows
            .iter()
            .find(|(name, _)| name == var)
            .ok_or_else(|| HarnessError::VariableNotFound(var.to_string()))?;
        raw.parse::<f64>().map_err(|_| {
            HarnessError::format(&self.path, format!("value \"{raw}\" of `{var}` is not a number"))
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(content: &str) -> (tempfile::TempDir, ModelerOutput) {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(SOLUTION_FILE), content).expect("write solution");
        let output = ModelerOutput::new(dir.path()).expect("solution loads");
        (dir, output)
    }

    #[test]
    fn finds_value_by_exact_name() {
        let (_dir, output) = output_with("node1.gen_p 12.5\nnode1.gen_p_max 40\n");
        assert_eq!(output.len(), 2);
        assert_eq!(output.get_optimal_value("node1.gen_p").ok(), Some(12.5));
        assert_eq!(output.get_optimal_value("node1.gen_p_max").ok(), Some(40.0));
    }

    #[test]
    fn prefix_of_a_name_does_not_match() {
        let (_dir, output) = output_with("gen_p_max 40\n");
        let err = output
            .get_optimal_value("gen_p")
            .expect_err("partial names must not match");
        assert!(matches!(err, HarnessError::VariableNotFound(name) if name == "gen_p"));
    }

    #[test]
    fn scientific_notation_is_parsed() {
        let (_dir, output) = output_with("cost 1.5e+03\n");
        assert_eq!(output.get_optimal_value("cost").ok(), Some(1500.0));
    }

    #[test]
    fn non_numeric_value_is_a_format_error() {
        let (_dir, output) = output_with("cost nan-ish\n");
        let err = output.get_optimal_value("cost").expect_err("must fail");
        assert!(matches!(err, HarnessError::Format { .. }));
    }

    #[test]
    fn tab_and_padded_rows_are_split_on_whitespace() {
        let (_dir, output) = output_with("x\t4\n  y   7.25  \n\n");
        assert_eq!(output.len(), 2);
        assert_eq!(output.get_optimal_value("x").ok(), Some(4.0));
        assert_eq!(output.get_optimal_value("y").ok(), Some(7.25));
    }

    #[test]
    fn row_without_a_value_is_a_format_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(SOLUTION_FILE), "x 4\norphan\n").expect("write solution");
        let err = ModelerOutput::new(dir.path()).expect_err("one-field row");
        assert!(matches!(err, HarnessError::Format { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ModelerOutput::new(dir.path()).expect_err("no solution file");
        assert!(err.to_string().contains(SOLUTION_FILE));
    }
}
