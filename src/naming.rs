//! Metro-to-city renaming via an external mapping file.
//!
//! The mapping is a plain JSON object from source metro name to the city
//! name the application uses; `null` marks a metro that is deliberately
//! not surfaced:
//! ```json
//! {
//!   "New York, NY": "New York City",
//!   "Memphis, TN": null
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::warn;

use crate::estimate::MetroEstimate;

/// Read-only mapping from source metro names to target city names.
pub struct CityMapping {
    entries: BTreeMap<String, Option<String>>,
}

/// Final record for one city: a metro estimate under its target name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRecord {
    pub city_name: String,
    #[serde(flatten)]
    pub estimate: MetroEstimate,
}

impl CityMapping {
    /// Loads the mapping from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading city mapping {}", path.display()))?;
        let entries: BTreeMap<String, Option<String>> = serde_json::from_str(&content)
            .with_context(|| format!("parsing city mapping {}", path.display()))?;
        Ok(Self { entries })
    }

    /// Returns the city name configured for `region_name`, if any.
    pub fn target_for(&self, region_name: &str) -> Option<&str> {
        self.entries.get(region_name)?.as_deref()
    }

    /// Number of entries with a non-null target.
    pub fn mapped_len(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Renames and filters `estimates` into the final city-keyed set.
    ///
    /// Sources absent from `estimates`, or mapped to `null`, are dropped.
    /// Entries are walked in ascending source-name order; when two metros
    /// map to the same city the later source wins.
    pub fn apply(
        &self,
        estimates: &HashMap<String, MetroEstimate>,
    ) -> BTreeMap<String, CityRecord> {
        let mut records = BTreeMap::new();

        for (source, target) in &self.entries {
            let Some(city_name) = target else {
                continue;
            };
            let Some(estimate) = estimates.get(source) else {
                continue;
            };

            let record = CityRecord {
                city_name: city_name.clone(),
                estimate: estimate.clone(),
            };
            if let Some(replaced) = records.insert(city_name.clone(), record) {
                warn!(
                    city = %city_name,
                    replaced = %replaced.estimate.region_name,
                    kept = %source,
                    "two metros map to the same city, keeping the later source"
                );
            }
        }

        records
    }
}
