//! 카탈로그 로드와 구성 시점 참조 무결성 검사.
use nextherm_configurator::heatpump::{Catalog, CatalogError, CircuitType};

fn minimal_catalog(models: &str, zones: &str, circuits: &str) -> String {
    format!(
        r#"
[[components]]
id = "disconnector"
name = "Disconnecteur"
position = "input"
required = true

[[components]]
id = "buffer_tank"
name = "Ballon tampon"
position = "circuit"

{models}
{zones}
{circuits}
"#
    )
}

const ONE_MODEL: &str = r#"
[[models]]
id = "m1"
name = "M1"
max_zones = 2
supports_floor_heating = true
supports_radiators = true
max_supply_temp = 55
"#;

const ALL_CIRCUITS: &str = r#"
[[circuits]]
circuit = "standard"
requires = ["buffer_tank"]

[[circuits]]
circuit = "pool"

[[circuits]]
circuit = "barrage"
requires = ["buffer_tank"]
"#;

#[test]
fn builtin_catalog_loads() {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let required: Vec<&str> = catalog
        .required_components()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(required, ["disconnector", "decantation_pot", "safety_valve"]);
    assert_eq!(catalog.sizing().capacity_per_kw, 15.0);
    assert_eq!(catalog.sizing().capacity_per_kw_high_temp, 20.0);
    assert_eq!(catalog.sizing().high_temp_threshold_c, 55);
    assert!(catalog.model("smartpack3_ht").expect("ht").high_temperature);
    assert_eq!(
        catalog.zone_type("floor_heating").expect("floor").required_components,
        ["mixing_valve", "circ_pump", "temp_sensor"]
    );
    assert_eq!(catalog.circuit_requirements(CircuitType::Pool), ["plate_exchanger"]);
}

#[test]
fn minimal_catalog_is_accepted() {
    let src = minimal_catalog(ONE_MODEL, "", ALL_CIRCUITS);
    let catalog = Catalog::from_toml_str(&src).expect("catalog");
    assert_eq!(catalog.models().len(), 1);
    assert!(catalog.circuit_requirements(CircuitType::Pool).is_empty());
}

#[test]
fn zone_referencing_unknown_component_is_rejected() {
    let zones = r#"
[[zone_types]]
id = "floor_heating"
name = "Plancher"
required_components = ["mixing_valv"]
"#;
    let err = Catalog::from_toml_str(&minimal_catalog(ONE_MODEL, zones, ALL_CIRCUITS))
        .expect_err("typo must fail");
    match err {
        CatalogError::UnknownComponent { component, .. } => assert_eq!(component, "mixing_valv"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inverted_zone_bounds_are_rejected() {
    let zones = r#"
[[zone_types]]
id = "odd"
name = "Odd"
min_supply_temp = 60
max_supply_temp = 40
"#;
    let err = Catalog::from_toml_str(&minimal_catalog(ONE_MODEL, zones, ALL_CIRCUITS))
        .expect_err("bounds");
    assert!(matches!(err, CatalogError::InvalidZoneBounds { min: 60, max: 40, .. }));
}

#[test]
fn model_without_zones_is_rejected() {
    let models = ONE_MODEL.replace("max_zones = 2", "max_zones = 0");
    let err = Catalog::from_toml_str(&minimal_catalog(&models, "", ALL_CIRCUITS))
        .expect_err("max_zones");
    assert!(matches!(err, CatalogError::InvalidModel { .. }));
}

#[test]
fn duplicate_model_id_is_rejected() {
    let models = format!("{ONE_MODEL}\n{ONE_MODEL}");
    let err = Catalog::from_toml_str(&minimal_catalog(&models, "", ALL_CIRCUITS))
        .expect_err("duplicate");
    assert!(matches!(err, CatalogError::DuplicateId { table: "model", .. }));
}

#[test]
fn every_circuit_type_needs_an_entry() {
    let circuits = r#"
[[circuits]]
circuit = "standard"
requires = ["buffer_tank"]
"#;
    let err = Catalog::from_toml_str(&minimal_catalog(ONE_MODEL, "", circuits))
        .expect_err("missing circuits");
    assert!(matches!(err, CatalogError::MissingCircuit(CircuitType::Pool)));
}

#[test]
fn catalog_file_can_replace_builtin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, minimal_catalog(ONE_MODEL, "", ALL_CIRCUITS)).expect("write");
    let catalog = Catalog::load_or_builtin(Some(&path)).expect("load");
    assert!(catalog.model("m1").is_some());
    assert!(catalog.model("smartpack3_std").is_none());
}

#[test]
fn catalog_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Catalog>();
}
