use std::fs;

use serde_json::{json, Value};
use shieldtester::data::validate::{validate_catalog_file, ValidationSeverity};
use shieldtester::data::DataCatalog;
use shieldtester::error::CatalogError;
use shieldtester::export::loadout_event;
use shieldtester::optimizer::{compute, SearchOptions};
use shieldtester::survivability::DamageProfile;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/shield_data.json");

fn python_event() -> Value {
    json!({
        "timestamp": "2024-03-01T12:00:00Z",
        "event": "Loadout",
        "Ship": "python",
        "ShipID": 7,
        "ShipName": "Serpent",
        "ShipIdent": "PY-01",
        "Modules": [
            {"Slot": "TinyHardpoint1", "Item": "Hpt_ShieldBooster_Size0_Class5", "On": true, "Priority": 0},
            {"Slot": "TinyHardpoint2", "Item": "Hpt_ChaffLauncher_Tiny", "On": true, "Priority": 0},
            {"Slot": "Slot01_Size6", "Item": "Int_ShieldGenerator_Size6_Class5", "On": true, "Priority": 0},
            {"Slot": "Slot02_Size5", "Item": "Int_CargoRack_Size5_Class1", "On": true, "Priority": 0}
        ]
    })
}

#[test]
fn imported_ship_is_listed_first_and_searchable() {
    let mut catalog = DataCatalog::load(CATALOG).expect("catalog");
    let name = catalog.import_loadout(&python_event()).expect("import");
    assert_eq!(name, "Serpent (PY-01)");
    assert_eq!(catalog.ship_names().first().copied(), Some("Serpent (PY-01)"));

    let mut test_case = catalog.select_ship(&name).expect("select imported ship");
    // the chaff launcher keeps one utility slot
    assert_eq!(test_case.number_of_boosters_to_test, 3);
    test_case.set_number_of_boosters(2).expect("boosters");
    test_case
        .set_damage_profile(DamageProfile {
            kinetic: 40.0,
            thermal: 60.0,
            effectiveness: 0.65,
            ..DamageProfile::default()
        })
        .expect("damage");
    assert!(test_case.summary().contains("Custom name: [Serpent (PY-01)]"));

    let result = compute(&test_case, &SearchOptions::default()).expect("search");
    assert_eq!(result.loadout.ship.display_name(), "Serpent (PY-01)");

    let event = loadout_event(&result.loadout).expect("event");
    let modules = event["Modules"].as_array().expect("modules");
    let items: Vec<String> = modules
        .iter()
        .filter_map(|module| module["Item"].as_str())
        .map(str::to_ascii_lowercase)
        .collect();
    assert!(items.contains(&"hpt_chafflauncher_tiny".to_string()));
    assert!(items.contains(&"int_cargorack_size5_class1".to_string()));
    assert_eq!(
        items
            .iter()
            .filter(|item| item.starts_with("int_shieldgenerator"))
            .count(),
        1
    );
    assert_eq!(
        items
            .iter()
            .filter(|item| item.starts_with("hpt_shieldbooster"))
            .count(),
        2
    );
    assert!(modules
        .iter()
        .all(|module| module["Slot"] != "tinyhardpoint2" || module["Item"] == "Hpt_ChaffLauncher_Tiny"));
}

#[test]
fn reimport_replaces_the_earlier_ship() {
    let mut catalog = DataCatalog::load(CATALOG).expect("catalog");
    let count = catalog.ship_names().len();
    catalog.import_loadout(&python_event()).expect("first import");
    catalog.import_loadout(&python_event()).expect("second import");
    assert_eq!(catalog.ship_names().len(), count + 1);
}

#[test]
fn import_of_unknown_ship_type_fails() {
    let mut catalog = DataCatalog::load(CATALOG).expect("catalog");
    let err = catalog
        .import_loadout(&json!({"Ship": "Cutter", "Modules": []}))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Import(_)));
}

#[test]
fn bundled_catalog_validates_without_errors() {
    let report = validate_catalog_file(CATALOG).expect("readable");
    assert!(!report.has_errors(), "{:?}", report.diagnostics);
}

#[test]
fn broken_catalog_reports_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let raw = fs::read_to_string(CATALOG).expect("read catalog");
    let mut document: Value = serde_json::from_str(&raw).expect("parse");
    document["ships"][0]["hullMass"] = json!(-1);
    document["ships"][1]["ship"] = json!("");
    let path = dir.path().join("broken.json");
    fs::write(&path, document.to_string()).expect("write");

    let report = validate_catalog_file(&path).expect("readable");
    assert!(report.has_errors());
    let contexts: Vec<&str> = report
        .errors()
        .map(|diagnostic| diagnostic.context.as_str())
        .collect();
    assert!(contexts.contains(&"ships[0].hullMass"));
    assert!(contexts.contains(&"ships[1].ship"));
    assert!(report
        .errors()
        .all(|diagnostic| diagnostic.severity == ValidationSeverity::Error));

    // loading refuses a catalog that fails validation
    assert!(matches!(
        DataCatalog::load(&path),
        Err(CatalogError::Invalid(_))
    ));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("malformed.json");
    fs::write(&path, "{\"ships\": [").expect("write");
    assert!(matches!(
        validate_catalog_file(&path),
        Err(CatalogError::Parse(_))
    ));
    assert!(matches!(
        validate_catalog_file(dir.path().join("missing.json")),
        Err(CatalogError::Read { .. })
    ));
}
