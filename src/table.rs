//! CSV reader for wide-format metro home value tables.
//!
//! Each row is one metro area; every column whose header parses as an ISO
//! calendar date holds that month's observation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Header cell carrying the metro region name.
pub const REGION_COLUMN: &str = "RegionName";
/// Header cell carrying the state label.
pub const STATE_COLUMN: &str = "StateName";

/// A month column from the source header, with its position in each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub date: NaiveDate,
    pub(crate) index: usize,
}

/// One metro row. `observations` is aligned with [`MetroTable::periods`]
/// (newest first); empty or non-numeric cells are `None`.
#[derive(Debug, Clone)]
pub struct MetroRow {
    pub region_name: String,
    pub state: String,
    pub observations: Vec<Option<f64>>,
}

/// Parsed source table: month columns sorted newest first, plus every row
/// that carried both a region name and a state.
#[derive(Debug)]
pub struct MetroTable {
    pub periods: Vec<Period>,
    pub rows: Vec<MetroRow>,
}

impl MetroTable {
    /// Reads and parses the table at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the header is
    /// missing either identifying column. Row-level problems (blank region
    /// or state, unreadable records, non-numeric cells) skip the row or
    /// cell instead.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening source table {}", path.display()))?;
        Self::from_reader(file)
    }

    /// Parses a table from any reader. The first record is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let header = rdr.headers().context("reading table header")?.clone();
        let periods = period_columns(&header);
        let region_idx = column_index(&header, REGION_COLUMN)?;
        let state_idx = column_index(&header, STATE_COLUMN)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for record in rdr.records() {
            let Ok(record) = record else {
                skipped += 1;
                continue;
            };

            let region_name = record.get(region_idx).unwrap_or("").trim();
            let state = record.get(state_idx).unwrap_or("").trim();
            if region_name.is_empty() || state.is_empty() {
                skipped += 1;
                continue;
            }

            let observations = periods
                .iter()
                .map(|p| record.get(p.index).and_then(parse_value))
                .collect();

            rows.push(MetroRow {
                region_name: region_name.to_string(),
                state: state.to_string(),
                observations,
            });
        }

        debug!(
            rows = rows.len(),
            skipped,
            periods = periods.len(),
            "table parsed"
        );

        Ok(Self { periods, rows })
    }
}

/// Finds every header cell that is an ISO date and orders them newest
/// first. Ordering compares parsed dates, not header strings, so unpadded
/// or out-of-order headers still sort chronologically.
fn period_columns(header: &csv::StringRecord) -> Vec<Period> {
    let mut periods: Vec<Period> = header
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            NaiveDate::parse_from_str(name.trim(), "%Y-%m-%d")
                .ok()
                .map(|date| Period { date, index })
        })
        .collect();

    periods.sort_by(|a, b| b.date.cmp(&a.date));
    periods
}

fn column_index(header: &csv::StringRecord, name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("source table header is missing the {name} column"))
}

fn parse_value(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse().ok()
}
