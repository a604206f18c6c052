//! Current value and trend extraction for metro rows.
//!
//! Works over the newest few month columns of a [`MetroTable`]: averages
//! the most recent observations into a representative home value, compares
//! two consecutive three-month windows for a coarse trend, and converts
//! the home value into an estimated monthly rent.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::MetroTable;

/// Monthly rent as a fraction of home value. Market rents typically run
/// 0.5-0.7% of the home value per month; 0.55% is the working estimate.
pub const RENT_TO_HOME_VALUE_RATIO: f64 = 0.0055;

/// Number of newest month columns considered per row.
pub const RECENT_PERIODS: usize = 6;

/// Width of each averaging window inside the recent periods.
const AVERAGE_WINDOW: usize = 3;

/// Percent change beyond which movement counts as a trend.
const TREND_THRESHOLD_PCT: f64 = 2.0;

/// Coarse direction of a metro's recent movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        })
    }
}

/// Derived figures for one metro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroEstimate {
    pub region_name: String,
    pub state: String,
    pub home_value: f64,
    pub rent_estimate: f64,
    pub trend: Trend,
    pub last_updated: NaiveDate,
}

/// Derives one [`MetroEstimate`] per row with at least one observation
/// among the recent periods, keyed by region name.
///
/// The newest period in the table becomes the `last_updated` date on every
/// estimate produced by the run. A table with no month columns yields an
/// empty map.
pub fn extract_estimates(table: &MetroTable) -> HashMap<String, MetroEstimate> {
    let Some(reference) = table.periods.first() else {
        return HashMap::new();
    };

    let mut estimates = HashMap::new();

    for row in &table.rows {
        // Newest first, gaps removed.
        let values: Vec<f64> = row
            .observations
            .iter()
            .take(RECENT_PERIODS)
            .filter_map(|v| *v)
            .collect();

        if values.is_empty() {
            continue;
        }

        let window = values.len().min(AVERAGE_WINDOW);
        let home_value = mean(&values[..window]);
        let rent_estimate = (home_value * RENT_TO_HOME_VALUE_RATIO).round();

        estimates.insert(
            row.region_name.clone(),
            MetroEstimate {
                region_name: row.region_name.clone(),
                state: row.state.clone(),
                home_value,
                rent_estimate,
                trend: classify_trend(&values),
                last_updated: reference.date,
            },
        );
    }

    estimates
}

/// Classifies movement from two consecutive three-month averages over
/// `values` (newest first).
///
/// | Change      | Trend  |
/// |-------------|--------|
/// | > +2%       | Up     |
/// | < -2%       | Down   |
/// | otherwise   | Stable |
///
/// Fewer than six surviving values always classify as stable.
pub fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 * AVERAGE_WINDOW {
        return Trend::Stable;
    }

    let recent = mean(&values[..AVERAGE_WINDOW]);
    let previous = mean(&values[AVERAGE_WINDOW..2 * AVERAGE_WINDOW]);
    let change_pct = (recent - previous) / previous * 100.0;

    if change_pct > TREND_THRESHOLD_PCT {
        Trend::Up
    } else if change_pct < -TREND_THRESHOLD_PCT {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
