//! Reversible edits of study settings files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// Settings file holding the general parameters of a study.
pub const GENERAL_DATA_FILE: &str = "settings/generaldata.ini";

/// A single `key = value` change in an INI file of a study.
///
/// Applying the change returns a [`ModifiedStudy`] that remembers the file's
/// previous content and can put it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyModifier {
    file: PathBuf,
    section: String,
    key: String,
    value: String,
}

impl StudyModifier {
    pub fn new(
        study_path: &Path,
        relative_file: impl AsRef<Path>,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            file: study_path.join(relative_file),
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Change to `settings/generaldata.ini`.
    pub fn general(
        study_path: &Path,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(study_path, GENERAL_DATA_FILE, section, key, value)
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Writes the change to disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read or written.
    pub fn apply(&self) -> Result<ModifiedStudy> {
        let initial = fs::read_to_string(&self.file).map_err(|e| HarnessError::io(&self.file, e))?;
        let updated = set_ini_value(&initial, &self.section, &self.key, &self.value);
        fs::write(&self.file, updated).map_err(|e| HarnessError::io(&self.file, e))?;
        tracing::info!(
            file = %self.file.display(),
            section = %self.section,
            key = %self.key,
            value = %self.value,
            "study modified"
        );
        Ok(ModifiedStudy {
            file: self.file.clone(),
            initial,
        })
    }
}

/// A study file changed by a [`StudyModifier`], with its previous content.
#[derive(Debug, Clone)]
pub struct ModifiedStudy {
    file: PathBuf,
    initial: String,
}

impl ModifiedStudy {
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Restores the file to what it was before the change.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn back_to_initial_state(&self) -> Result<()> {
        fs::write(&self.file, &self.initial).map_err(|e| HarnessError::io(&self.file, e))?;
        tracing::info!(file = %self.file.display(), "study restored");
        Ok(())
    }
}

/// Returns `text` with `key` set to `value` inside `[section]`.
///
/// An existing key is rewritten in place. A missing key is appended to the
/// end of its section, and a missing section is appended to the file.
pub fn set_ini_value(text: &str, section: &str, key: &str, value: &str) -> String {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let entry = format!("{key} = {value}");

    let header = format!("[{section}]");
    let Some(start) = lines.iter().position(|l| l.trim() == header) else {
        if lines.last().is_some_and(|l| !l.trim().is_empty()) {
            lines.push(String::new());
        }
        lines.push(header);
        lines.push(entry);
        return join_lines(lines);
    };

    let end = lines[start + 1..]
        .iter()
        .position(|l| l.trim_start().starts_with('['))
        .map_or(lines.len(), |offset| start + 1 + offset);

    let existing = lines[start + 1..end]
        .iter()
        .position(|l| l.split_once('=').is_some_and(|(k, _)| k.trim() == key));
    match existing {
        Some(offset) => lines[start + 1 + offset] = entry,
        None => {
            // keep blank separator lines after the new entry
            let mut insert_at = end;
            while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
                insert_at -= 1;
            }
            lines.insert(insert_at, entry);
        }
    }
    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
