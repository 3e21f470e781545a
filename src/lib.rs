//! Non-regression test harness for the Antares power-system simulator.
//!
//! Runs a study through the solver or modeler binary, then checks the
//! results it wrote against expected values.

pub mod check;
/// Command-line interface of the `antares-nr` binary.
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod presets;
pub mod report;
pub mod run;
pub mod runner;
pub mod study;

pub use error::{HarnessError, Result};
