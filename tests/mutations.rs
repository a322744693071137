use nextherm_configurator::heatpump::{
    refresh, try_apply, validate, ApplyError, Catalog, CircuitType, DhwConfig, Mutation,
    SystemConfiguration, Violation, Zone,
};

fn step(
    catalog: &Catalog,
    config: &SystemConfiguration,
    mutation: Mutation,
) -> SystemConfiguration {
    match try_apply(catalog, config, mutation.clone()) {
        Ok(next) => next,
        Err(err) => panic!("{mutation:?} rejected: {err}"),
    }
}

fn valid_floor_setup(catalog: &Catalog) -> SystemConfiguration {
    let cfg = SystemConfiguration::default();
    let cfg = step(catalog, &cfg, Mutation::SelectModel("smartpack3_ht".into()));
    let cfg = step(catalog, &cfg, Mutation::SetHeatingPower(12.0));
    step(catalog, &cfg, Mutation::AddZone("floor_heating".into()))
}

#[test]
fn configuration_can_be_built_step_by_step() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);

    assert_eq!(cfg.pac_type, "smartpack3_ht");
    assert_eq!(cfg.zones, [Zone::new("floor_heating")]);
    assert!(validate(&catalog, &cfg).expect("validate").is_empty());
    let buffer = cfg
        .components
        .mandatory
        .iter()
        .find(|c| c.id == "buffer_tank")
        .expect("buffer");
    assert_eq!(buffer.specs.get("capacity"), Some(&240.0));
}

#[test]
fn selecting_a_model_tolerates_existing_power_violation() {
    let catalog = Catalog::builtin().expect("catalog");
    // 출력 0 kW 위반은 변경 전부터 존재하므로 거부 사유가 아니다
    let cfg = step(
        &catalog,
        &SystemConfiguration::default(),
        Mutation::SelectModel("ecopack_duo".into()),
    );
    assert_eq!(
        validate(&catalog, &cfg).expect("validate"),
        [Violation::HeatingPowerNotPositive]
    );
    assert!(cfg.components.has_mandatory("safety_valve"));
}

#[test]
fn exceeding_zone_limit_is_rejected() {
    let catalog = Catalog::builtin().expect("catalog");
    let mut cfg = step(
        &catalog,
        &SystemConfiguration::default(),
        Mutation::SelectModel("ecopack_duo".into()),
    );
    cfg = step(&catalog, &cfg, Mutation::SetHeatingPower(8.0));
    cfg = step(&catalog, &cfg, Mutation::AddZone("floor_heating".into()));
    cfg = step(&catalog, &cfg, Mutation::AddZone("floor_heating".into()));

    let before = cfg.clone();
    let err = try_apply(&catalog, &cfg, Mutation::AddZone("floor_heating".into()))
        .expect_err("third zone");
    assert_eq!(
        err,
        ApplyError::Rejected(vec![Violation::TooManyZones { limit: 2, count: 3 }])
    );
    assert_eq!(cfg, before);
}

#[test]
fn insufficient_supply_temperature_is_rejected() {
    let catalog = Catalog::builtin().expect("catalog");
    let mut cfg = step(
        &catalog,
        &SystemConfiguration::default(),
        Mutation::SelectModel("smartpack3_std".into()),
    );
    cfg = step(&catalog, &cfg, Mutation::SetHeatingPower(10.0));
    let err = try_apply(&catalog, &cfg, Mutation::AddZone("high_temp_radiators".into()))
        .expect_err("55 °C model");
    match err {
        ApplyError::Rejected(violations) => assert_eq!(
            violations,
            [Violation::SupplyTemperatureTooLow {
                zone_type: "high_temp_radiators".into(),
                model_max: 55,
                zone_min: 60,
            }]
        ),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn zero_power_is_rejected_once_power_was_valid() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);
    assert_eq!(
        try_apply(&catalog, &cfg, Mutation::SetHeatingPower(0.0)),
        Err(ApplyError::Rejected(vec![Violation::HeatingPowerNotPositive]))
    );
    assert_eq!(
        try_apply(&catalog, &cfg, Mutation::SetHeatingPower(-3.0)),
        Err(ApplyError::Rejected(vec![Violation::HeatingPowerNotPositive]))
    );
}

#[test]
fn switching_to_pool_circuit_drops_buffer_and_adds_exchanger() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);
    let pool = step(&catalog, &cfg, Mutation::SetCircuitType(CircuitType::Pool));

    assert!(!pool.components.has_mandatory("buffer_tank"));
    assert!(pool.components.has_mandatory("plate_exchanger"));
    assert!(pool.components.optional.iter().any(|id| id == "buffer_tank"));

    let back = step(&catalog, &pool, Mutation::SetCircuitType(CircuitType::Standard));
    assert_eq!(back, cfg);
}

#[test]
fn toggling_a_zone_twice_restores_the_configuration() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);

    let added = step(&catalog, &cfg, Mutation::ToggleZone("radiators".into()));
    assert_eq!(added.zones.len(), 2);
    assert_eq!(added.zones[1], Zone::new("radiators"));

    let removed = step(&catalog, &added, Mutation::ToggleZone("radiators".into()));
    assert_eq!(removed, cfg);
}

#[test]
fn removing_a_zone_keeps_safety_components() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);
    let cfg = step(&catalog, &cfg, Mutation::RemoveZone(0));

    assert!(cfg.zones.is_empty());
    for id in ["disconnector", "decantation_pot", "safety_valve", "buffer_tank"] {
        assert!(cfg.components.has_mandatory(id), "{id}");
    }
    assert!(!cfg.components.has_mandatory("mixing_valve"));
}

#[test]
fn dhw_can_be_enabled_and_disabled() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);
    let with_dhw = step(&catalog, &cfg, Mutation::SetDhw(Some(DhwConfig::default())));
    assert!(with_dhw.has_dhw());
    let without = step(&catalog, &with_dhw, Mutation::SetDhw(None));
    assert_eq!(without, cfg);
}

#[test]
fn structural_errors_are_not_violations() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = valid_floor_setup(&catalog);

    assert!(matches!(
        try_apply(&catalog, &cfg, Mutation::SetHeatingPower(f64::NAN)),
        Err(ApplyError::Malformed(_))
    ));
    assert!(matches!(
        try_apply(&catalog, &cfg, Mutation::RemoveZone(5)),
        Err(ApplyError::Malformed(_))
    ));
    assert!(matches!(
        try_apply(&catalog, &cfg, Mutation::AddZone("sauna".into())),
        Err(ApplyError::Malformed(_))
    ));
}

#[test]
fn stale_component_lists_are_refreshed_before_comparison() {
    let catalog = Catalog::builtin().expect("catalog");
    let mut stale = valid_floor_setup(&catalog);
    stale.components.mandatory.clear();
    stale.components.optional.clear();

    let next = step(&catalog, &stale, Mutation::SetHeatingPower(14.0));
    let mut expected = stale.clone();
    expected.heating_power = 14.0;
    refresh(&catalog, &mut expected);
    assert_eq!(next, expected);
    assert!(validate(&catalog, &next).expect("validate").is_empty());
}

fn over_limit_record(catalog: &Catalog) -> SystemConfiguration {
    // ecopack_duo 는 존 2개까지. 저장소에서 불러온 레코드처럼 직접 만든다
    let mut cfg = SystemConfiguration {
        pac_type: "ecopack_duo".into(),
        heating_power: 8.0,
        zones: vec![Zone::new("floor_heating"); 4],
        ..SystemConfiguration::default()
    };
    refresh(catalog, &mut cfg);
    cfg
}

#[test]
fn shrinking_an_over_limit_record_is_accepted() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = over_limit_record(&catalog);
    assert_eq!(
        validate(&catalog, &cfg).expect("validate"),
        [Violation::TooManyZones { limit: 2, count: 4 }]
    );

    let cfg = step(&catalog, &cfg, Mutation::RemoveZone(0));
    assert_eq!(cfg.zones.len(), 3);
    let cfg = step(&catalog, &cfg, Mutation::ToggleZone("floor_heating".into()));
    assert_eq!(cfg.zones.len(), 2);
    assert!(validate(&catalog, &cfg).expect("validate").is_empty());
}

#[test]
fn changing_model_keeps_an_existing_zone_limit_problem() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = over_limit_record(&catalog);
    let cfg = step(&catalog, &cfg, Mutation::SelectModel("smartpack3_std".into()));
    assert_eq!(
        validate(&catalog, &cfg).expect("validate"),
        [Violation::TooManyZones { limit: 3, count: 4 }]
    );
}

#[test]
fn over_limit_record_still_rejects_other_new_problems() {
    let catalog = Catalog::builtin().expect("catalog");
    let cfg = over_limit_record(&catalog);
    assert_eq!(
        try_apply(&catalog, &cfg, Mutation::SetHeatingPower(0.0)),
        Err(ApplyError::Rejected(vec![Violation::HeatingPowerNotPositive]))
    );
}

#[test]
fn switching_between_two_models_too_cold_for_a_zone() {
    let catalog = Catalog::builtin().expect("catalog");
    let mut cfg = SystemConfiguration {
        pac_type: "smartpack3_std".into(),
        heating_power: 10.0,
        zones: vec![Zone::new("high_temp_radiators")],
        ..SystemConfiguration::default()
    };
    refresh(&catalog, &mut cfg);

    // 55 °C -> 50 °C: 같은 존 타입의 온도 부족이므로 새 위반이 아니다
    let colder = step(&catalog, &cfg, Mutation::SelectModel("ecopack_duo".into()));
    assert_eq!(
        validate(&catalog, &colder).expect("validate"),
        [Violation::SupplyTemperatureTooLow {
            zone_type: "high_temp_radiators".into(),
            model_max: 50,
            zone_min: 60,
        }]
    );

    let fixed = step(&catalog, &colder, Mutation::SelectModel("smartpack3_ht".into()));
    assert!(validate(&catalog, &fixed).expect("validate").is_empty());
}

#[test]
fn violation_cause_ignores_numbers() {
    let a = Violation::TooManyZones { limit: 2, count: 4 };
    let b = Violation::TooManyZones { limit: 3, count: 5 };
    assert_eq!(a.cause(), b.cause());

    let floor = Violation::MissingZoneComponent {
        zone_type: "floor_heating".into(),
        component: "mixing_valve".into(),
        name: "Vanne mélangeuse".into(),
    };
    let pool = Violation::MissingZoneComponent {
        zone_type: "pool".into(),
        component: "mixing_valve".into(),
        name: "Vanne mélangeuse".into(),
    };
    assert_ne!(floor.cause(), pool.cause());
    assert_ne!(a.cause(), Violation::HeatingPowerNotPositive.cause());
}
