//! Actions on a study folder around a simulation.

pub mod modifier;
/// Removal of generated results.
pub mod results_remover;

pub use modifier::{GENERAL_DATA_FILE, ModifiedStudy, StudyModifier};
pub use results_remover::ResultsRemover;
