//! Readers for the files a simulator run leaves in its output folder.

pub mod annual_cost;
pub mod hourly;
pub mod solution;
/// `time_measurement.txt`.
pub mod timing;
pub mod unfeasible;

pub use annual_cost::{AnnualSystemCost, CostStat};
pub use hourly::HourlyValues;
pub use solution::ModelerOutput;
pub use timing::simulation_time;
pub use unfeasible::{UnfeasibilityReport, YearWeek};
