//! Persistence for the final city record set.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::naming::CityRecord;

/// Writes `records` as pretty-printed JSON to `path`, replacing any
/// previous artifact. Intermediate directories are created as needed.
///
/// Records arrive in a sorted map and carry no run timestamps, so two runs
/// over the same input produce byte-identical artifacts.
pub fn write_records(path: &Path, records: &BTreeMap<String, CityRecord>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(records)?;
    debug!(
        path = %path.display(),
        records = records.len(),
        bytes = json.len(),
        "writing artifact"
    );

    fs::write(path, json).with_context(|| format!("writing artifact {}", path.display()))?;
    Ok(())
}
