//! Reader for per-area hourly results of a single Monte-Carlo year.

use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// Column holding loss-of-load duration (hours).
pub const LOLD: &str = "LOLD";
/// Column holding unsupplied energy (MW).
pub const UNSUPPLIED_ENERGY: &str = "UNSP. ENRG";

/// Second field of the column-name line; preamble lines carry other labels.
const TIME_STEP_LABEL: &str = "hourly";
/// Unit and statistic lines between the column names and the data.
const SUBHEADER_LINES: usize = 2;
/// Leading label columns: area, index, day, month, hour.
const LABEL_COLUMNS: usize = 5;

/// One hour of results.
#[derive(Debug, Clone)]
pub struct HourlyRow {
    pub index: u32,
    /// `"<day> <MONTH> <hh:mm>"`, e.g. `"02 JAN 09:00"`.
    pub date: String,
    pub values: Vec<f64>,
}

/// Hourly results of one area for one year.
///
/// Read from `<mode>/mc-ind/<year:05>/areas/<area>/values-hourly.txt`
/// below the simulation output folder.
#[derive(Debug, Clone)]
pub struct HourlyValues {
    path: PathBuf,
    columns: Vec<String>,
    rows: Vec<HourlyRow>,
}

/// Locates the hourly file of `area` for Monte-Carlo `year` (1-based).
///
/// Economy results are preferred; adequacy results are used when the
/// simulation ran in adequacy mode.
pub fn hourly_values_path(output_dir: &Path, area: &str, year: u32) -> PathBuf {
    let relative = PathBuf::from("mc-ind")
        .join(format!("{year:05}"))
        .join("areas")
        .join(area.to_lowercase())
        .join("values-hourly.txt");
    let economy = output_dir.join("economy").join(&relative);
    if economy.exists() {
        return economy;
    }
    let adequacy = output_dir.join("adequacy").join(&relative);
    if adequacy.exists() { adequacy } else { economy }
}

impl HourlyValues {
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn from_output(output_dir: &Path, area: &str, year: u32) -> Result<Self> {
        let path = hourly_values_path(output_dir, area, year);
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| HarnessError::csv(&path, e))?;
        Self::from_reader(path, reader)
    }

    /// Parses hourly results already held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        Self::from_reader(PathBuf::from("<memory>"), reader)
    }

    fn from_reader<R: std::io::Read>(path: PathBuf, mut reader: csv::Reader<R>) -> Result<Self> {
        let mut records = reader.records();
        let mut header = None;
        for record in records.by_ref() {
            let record = record.map_err(|e| HarnessError::csv(&path, e))?;
            if record.get(1).map(str::trim) == Some(TIME_STEP_LABEL) {
                header = Some(record);
                break;
            }
        }
        let header = header.ok_or_else(|| HarnessError::format(&path, "missing column names"))?;
        let columns: Vec<String> = header
            .iter()
            .skip(LABEL_COLUMNS)
            .map(|name| name.trim().to_string())
            .collect();

        for _ in 0..SUBHEADER_LINES {
            records.next();
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|e| HarnessError::csv(&path, e))?;
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            if record.len() < LABEL_COLUMNS {
                return Err(HarnessError::format(
                    &path,
                    format!("row has {} fields, expected at least {LABEL_COLUMNS}", record.len()),
                ));
            }
            let index = record[1].trim().parse::<u32>().map_err(|_| {
                HarnessError::format(&path, format!("bad hour index \"{}\"", &record[1]))
            })?;
            let date = format!(
                "{} {} {}",
                record[2].trim(),
                record[3].trim(),
                record[4].trim()
            );
            let values = record
                .iter()
                .skip(LABEL_COLUMNS)
                .map(|v| {
                    v.trim().parse::<f64>().map_err(|_| {
                        HarnessError::format(&path, format!("bad value \"{v}\" at hour {index}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            if values.len() != columns.len() {
                return Err(HarnessError::format(
                    &path,
                    format!(
                        "hour {index} has {} values, expected {}",
                        values.len(),
                        columns.len()
                    ),
                ));
            }
            rows.push(HourlyRow {
                index,
                date,
                values,
            });
        }

        Ok(Self {
            path,
            columns,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HourlyRow] {
        &self.rows
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| HarnessError::VariableNotFound(name.to_string()))
    }

    /// Sums a column over the whole year.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::VariableNotFound`] if the column is absent.
    pub fn column_sum(&self, name: &str) -> Result<f64> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row.values[idx]).sum())
    }

    /// Sums a column over the rows dated `date`.
    ///
    /// `date` is compared after collapsing whitespace, so `"02 JAN  09:00"`
    /// and `"02 JAN 09:00"` are the same hour.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::VariableNotFound`] if the column is absent or
    /// no row carries that date.
    pub fn column_sum_at(&self, name: &str, date: &str) -> Result<f64> {
        let idx = self.column_index(name)?;
        let wanted = normalize_date(date);
        let mut matched = false;
        let mut sum = 0.0;
        for row in self.rows.iter().filter(|row| normalize_date(&row.date) == wanted) {
            matched = true;
            sum += row.values[idx];
        }
        if !matched {
            return Err(HarnessError::VariableNotFound(format!(
                "{name} on \"{date}\" in {}",
                self.path.display()
            )));
        }
        Ok(sum)
    }
}

fn normalize_date(date: &str) -> String {
    date.split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}
