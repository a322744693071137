use std::fs;

use nextherm_configurator::heatpump::{refresh, Catalog, CircuitType, SystemConfiguration, Zone};
use nextherm_configurator::store::{self, ConfigurationStore, JsonFileStore, StoreError};

fn sample() -> SystemConfiguration {
    let catalog = Catalog::builtin().expect("catalog");
    let mut cfg = SystemConfiguration {
        pac_type: "smartpack3_ht".into(),
        heating_power: 12.0,
        zones: vec![Zone::new("floor_heating"), Zone::new("pool")],
        circuit_type: CircuitType::Barrage,
        ..SystemConfiguration::default()
    };
    refresh(&catalog, &mut cfg);
    cfg
}

#[test]
fn saved_record_loads_back_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("records"));
    let record = sample();

    store.save("maison-dupont", &record).expect("save");
    assert!(store.dir().join("maison-dupont.json").exists());
    assert_eq!(store.load("maison-dupont").expect("load"), record);
}

#[test]
fn list_is_sorted_and_ignores_foreign_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    let record = sample();
    for id in ["zeta", "alpha", "m_01"] {
        store.save(id, &record).expect("save");
    }
    fs::write(dir.path().join("notes.txt"), "x").expect("write");

    assert_eq!(store.list().expect("list"), ["alpha", "m_01", "zeta"]);
}

#[test]
fn missing_directory_lists_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("absent"));
    assert!(store.list().expect("list").is_empty());
}

#[test]
fn ids_with_path_characters_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    for id in ["", "../escape", "a b", "x.json"] {
        assert!(
            matches!(store.save(id, &sample()), Err(StoreError::InvalidId(_))),
            "{id:?}"
        );
    }
}

#[test]
fn unknown_record_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    assert!(matches!(store.load("nope"), Err(StoreError::NotFound(id)) if id == "nope"));
    assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
}

#[test]
fn deleted_record_disappears_from_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    store.save("a", &sample()).expect("save");
    store.save("b", &sample()).expect("save");
    store.delete("a").expect("delete");
    assert_eq!(store.list().expect("list"), ["b"]);
}

#[test]
fn record_without_zones_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{ "pac_type": "smartpack3_std", "heating_power": 10.0 }"#,
    )
    .expect("write");

    assert!(matches!(store::read_record(&path), Err(StoreError::Json(_))));
    let store = JsonFileStore::new(dir.path());
    assert!(matches!(store.load("broken"), Err(StoreError::Json(_))));
}

#[test]
fn minimal_record_fills_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("minimal.json");
    fs::write(
        &path,
        r#"{ "pac_type": "ecopack_duo", "heating_power": 6.5, "zones": [{ "type": "floor_heating" }] }"#,
    )
    .expect("write");

    let record = store::read_record(&path).expect("read");
    assert_eq!(record.circuit_type, CircuitType::Standard);
    assert!(record.dhw.is_none());
    assert!(record.components.mandatory.is_empty());
    assert_eq!(record.zones, [Zone::new("floor_heating")]);
}
