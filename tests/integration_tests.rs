use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use zhvi_rent_mapper::estimate::{Trend, extract_estimates};
use zhvi_rent_mapper::naming::CityMapping;
use zhvi_rent_mapper::output::write_records;
use zhvi_rent_mapper::table::MetroTable;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_full_pipeline() {
    let table = MetroTable::load(&fixture("sample_zhvi.csv")).expect("failed to parse table");

    // Rows without a region name or state never make it out of the parser.
    assert!(table.rows.iter().all(|r| r.region_name != "Blankstate, BS"));

    let estimates = extract_estimates(&table);

    // Stale has no observation among the newest six months.
    assert!(!estimates.contains_key("Stale, ST"));

    // New York: newest-first values 1000,1020,980 vs 900,890,910.
    let ny = &estimates["New York, NY"];
    assert_eq!(ny.home_value, 1000.0);
    assert_eq!(ny.rent_estimate, 6.0);
    assert_eq!(ny.trend, Trend::Up);
    assert_eq!(ny.last_updated.to_string(), "2025-06-30");

    // Chicago carries a single observation, so no trend.
    let chi = &estimates["Chicago, IL"];
    assert_eq!(chi.home_value, 500000.0);
    assert_eq!(chi.rent_estimate, 2750.0);
    assert_eq!(chi.trend, Trend::Stable);

    let mapping = CityMapping::load(&fixture("city_mapping.json")).expect("failed to load mapping");
    let records = mapping.apply(&estimates);

    // Memphis is mapped to null, Nowhere is unmapped, Los Angeles has no
    // source row; only the two real matches survive.
    let cities: Vec<&str> = records.keys().map(String::as_str).collect();
    assert_eq!(cities, vec!["Chicago", "New York City"]);

    let ny_record = &records["New York City"];
    assert_eq!(ny_record.city_name, "New York City");
    assert_eq!(ny_record.estimate.region_name, "New York, NY");
    assert_eq!(ny_record.estimate.state, "NY");
}

#[test]
fn test_output_keys_come_from_the_mapping() {
    let table = MetroTable::load(&fixture("sample_zhvi.csv")).unwrap();
    let estimates = extract_estimates(&table);
    let mapping = CityMapping::load(&fixture("city_mapping.json")).unwrap();
    let records = mapping.apply(&estimates);

    for record in records.values() {
        assert_eq!(
            mapping.target_for(&record.estimate.region_name),
            Some(record.city_name.as_str())
        );
        assert!(estimates.contains_key(&record.estimate.region_name));
    }
}

#[test]
fn test_rerun_produces_identical_artifact() {
    let table = MetroTable::load(&fixture("sample_zhvi.csv")).unwrap();
    let mapping = CityMapping::load(&fixture("city_mapping.json")).unwrap();
    let path = env::temp_dir().join("zhvi_rent_mapper_integration_rerun.json");

    let records = mapping.apply(&extract_estimates(&table));
    write_records(&path, &records).unwrap();
    let first = fs::read(&path).unwrap();

    let table = MetroTable::load(&fixture("sample_zhvi.csv")).unwrap();
    let records = mapping.apply(&extract_estimates(&table));
    write_records(&path, &records).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_artifact_round_trips_through_json() {
    let table = MetroTable::load(&fixture("sample_zhvi.csv")).unwrap();
    let mapping = CityMapping::load(&fixture("city_mapping.json")).unwrap();
    let records = mapping.apply(&extract_estimates(&table));

    let path = env::temp_dir().join("zhvi_rent_mapper_integration_shape.json");
    write_records(&path, &records).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let ny = &json["New York City"];
    assert_eq!(ny["city_name"], "New York City");
    assert_eq!(ny["state"], "NY");
    assert_eq!(ny["rent_estimate"], 6.0);
    assert_eq!(ny["trend"], "up");
    assert_eq!(ny["last_updated"], "2025-06-30");

    fs::remove_file(&path).unwrap();
}
