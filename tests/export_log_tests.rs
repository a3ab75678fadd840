use std::fs;
use std::io::Read;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use flate2::read::GzDecoder;
use serde_json::Value;

use shieldtester::data::DataCatalog;
use shieldtester::error::{ConfigError, Error};
use shieldtester::export::ExportRegistry;
use shieldtester::optimizer::{compute, SearchOptions, TestCase, TestResult};
use shieldtester::report::{write_log, LogOptions};
use shieldtester::survivability::DamageProfile;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/shield_data.json");

fn python(catalog: &DataCatalog) -> (TestCase<'_>, TestResult) {
    let mut test_case = catalog.select_ship("Python").expect("select");
    test_case.set_number_of_boosters(2).expect("boosters");
    test_case
        .set_damage_profile(DamageProfile {
            kinetic: 60.0,
            thermal: 60.0,
            absolute: 5.0,
            effectiveness: 0.65,
            ..DamageProfile::default()
        })
        .expect("damage");
    let result = compute(&test_case, &SearchOptions::default()).expect("search");
    (test_case, result)
}

fn decode_link(link: &str, prefix: &str) -> Value {
    let payload = link.strip_prefix(prefix).expect("service prefix");
    let compressed = URL_SAFE
        .decode(payload.replace("%3D", "="))
        .expect("base64");
    let mut raw = String::new();
    GzDecoder::new(&compressed[..])
        .read_to_string(&mut raw)
        .expect("gzip");
    serde_json::from_str(&raw).expect("json")
}

#[test]
fn coriolis_link_carries_the_winning_loadout() {
    let catalog = DataCatalog::load(CATALOG).expect("catalog");
    let (_, result) = python(&catalog);
    let registry = ExportRegistry::default();

    let link = registry
        .produce_link(&result.loadout, "Coriolis")
        .expect("link");
    let event = decode_link(&link, "https://coriolis.io/import?data=");
    assert_eq!(event["event"], "Loadout");
    assert_eq!(event["Ship"], "Python");

    let modules = event["Modules"].as_array().expect("modules");
    let generator = modules
        .iter()
        .find(|module| module["Item"] == result.loadout.generator.symbol.as_str())
        .expect("generator module");
    assert!(generator["Slot"]
        .as_str()
        .is_some_and(|slot| slot.starts_with("slot") && slot.contains("_size")));
    let booster_slots: Vec<&str> = modules
        .iter()
        .filter_map(|module| module["Slot"].as_str())
        .filter(|slot| slot.starts_with("tinyhardpoint"))
        .collect();
    assert_eq!(booster_slots, vec!["tinyhardpoint1", "tinyhardpoint2"]);

    let edsy = registry.produce_link(&result.loadout, "edsy").expect("link");
    assert_eq!(decode_link(&edsy, "https://edsy.org/#/I="), event);
}

#[test]
fn unknown_export_service_is_a_configuration_error() {
    let catalog = DataCatalog::load(CATALOG).expect("catalog");
    let (_, result) = python(&catalog);
    let err = ExportRegistry::default()
        .produce_link(&result.loadout, "shipyard")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigError::UnknownExportService(ref name)) if name == "shipyard"
    ));
}

#[test]
fn log_entries_append_to_the_named_file() {
    let catalog = DataCatalog::load(CATALOG).expect("catalog");
    let (test_case, result) = python(&catalog);
    let registry = ExportRegistry::default();
    let dir = tempfile::tempdir().expect("tempdir");
    let options = LogOptions {
        filename: Some("python runs".to_string()),
        time_and_name: false,
        export_service: Some("edsy".to_string()),
    };

    let first = write_log(dir.path(), &test_case, &result, &options, &registry).expect("log");
    let second = write_log(dir.path(), &test_case, &result, &options, &registry).expect("log");
    assert_eq!(first, second);
    assert_eq!(first, dir.path().join("python_runs.txt"));

    let contents = fs::read_to_string(&first).expect("read log");
    assert_eq!(contents.matches("Test run at: ").count(), 2);
    assert_eq!(contents.matches("TEST SETUP").count(), 2);
    assert_eq!(contents.matches("TEST RESULTS").count(), 2);
    assert_eq!(contents.matches("https://edsy.org/#/I=").count(), 2);
}

#[test]
fn log_without_name_uses_the_timestamp() {
    let catalog = DataCatalog::load(CATALOG).expect("catalog");
    let (test_case, result) = python(&catalog);
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("Logs");

    let path = write_log(
        &nested,
        &test_case,
        &result,
        &LogOptions::default(),
        &ExportRegistry::default(),
    )
    .expect("log");
    assert_eq!(path.parent(), Some(nested.as_path()));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("file name");
    // e.g. 2024-01-02_03.04.05.txt
    assert_eq!(name.len(), "2024-01-02_03.04.05.txt".len());
    assert!(name.ends_with(".txt"));
    assert!(!fs::read_to_string(&path).expect("read").contains("https://"));
}
