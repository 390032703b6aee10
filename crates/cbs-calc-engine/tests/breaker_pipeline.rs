//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "tests"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "End-to-end tests of the breaker sizing pipeline."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::fs;

use cbs_calc_engine::{
    calculate_breaker,
    io::load_input_from_file,
    tables::{recommend_standard_breaker, standard_ratings},
    voltage_drop::VoltageDropStatus,
    AlertType, BreakerCalculationInput, BreakerCalculator, CalcEngineError, CalculationCache,
    CircuitConfiguration, ConductorMaterial, ConductorSize, EnvironmentalConditions,
    InstallationMethod, LoadMode, LoadType, Phase, Severity, Standard, UnitSystem,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn motor_feeder() -> BreakerCalculationInput {
    BreakerCalculationInput::new(CircuitConfiguration {
        standard: Standard::Iec,
        voltage: dec!(400),
        phase: Phase::Three,
        load_mode: LoadMode::Kw,
        load_value: dec!(50),
        power_factor: dec!(0.9),
        unit_system: UnitSystem::Metric,
    })
    .with_load_type(LoadType::Inductive)
    .with_short_circuit_current_ka(dec!(8))
    .with_environment(EnvironmentalConditions {
        ambient_temperature: Some(dec!(40)),
        grouped_cables: Some(6),
        installation_method: Some(InstallationMethod::CableTray),
        circuit_distance: Some(dec!(40)),
        conductor_material: Some(ConductorMaterial::Copper),
        conductor_size: Some(ConductorSize::mm2("16")),
        insulation_rating: Some(90),
    })
}

#[test]
fn full_iec_motor_feeder() {
    let results = calculate_breaker(&motor_feeder()).unwrap();

    assert!((results.load_analysis.calculated_current_amps - dec!(80.18)).abs() < dec!(0.01));
    assert_eq!(results.breaker_sizing.safety_factor.safety_factor, Decimal::ONE);

    let factors = results.derating_factors.as_ref().unwrap();
    // 0.91 (40 °C, XLPE) × 0.88 (two circuits on tray)
    assert_eq!(factors.combined_factor, dec!(0.8008));
    assert_eq!(factors.number_of_circuits, Some(2));
    // 80.19 / 0.8008 = 100.1 A → 125 A
    assert_eq!(results.breaker_sizing.recommended_rating_amps, 125);
    assert_eq!(results.recommendations.trip_curve.display_name, "Type D");
    assert!(results.breaker_sizing.breaker.is_safe);

    // √3 × 40 m × 80.19 A × 1.399 Ω/km / 1000 × 0.9 ≈ 7.0 V, 1.75 %
    let vd = results.voltage_drop_analysis.as_ref().unwrap();
    assert_eq!(vd.voltage_at_load, dec!(400) - vd.voltage_drop_volts);
    assert_eq!(vd.power_loss_watts, vd.voltage_drop_volts * results.load_analysis.calculated_current_amps);
    assert_eq!(vd.status, VoltageDropStatus::Acceptable);
}

#[test]
fn identical_inputs_give_identical_results() {
    let calculator = BreakerCalculator::default();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let first = calculator.calculate_at(&motor_feeder(), at).unwrap();
    let second = calculator.calculate_at(&motor_feeder(), at).unwrap();
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn capacity_exceeded_is_fatal() {
    let input = BreakerCalculationInput::new(CircuitConfiguration {
        standard: Standard::Nec,
        voltage: dec!(480),
        phase: Phase::Three,
        load_mode: LoadMode::Amps,
        load_value: dec!(4000),
        power_factor: dec!(0.9),
        unit_system: UnitSystem::Imperial,
    });
    let err = calculate_breaker(&input).unwrap_err();
    assert!(err.is_input_error());
    match err {
        CalcEngineError::CapacityExceeded { minimum_amps, .. } => assert_eq!(minimum_amps, dec!(5000)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn extreme_loads_fail_cleanly() {
    let circuit = CircuitConfiguration {
        standard: Standard::Nec,
        voltage: dec!(240),
        phase: Phase::Single,
        load_mode: LoadMode::Kw,
        load_value: Decimal::from_i128_with_scale(10i128.pow(26), 0),
        power_factor: dec!(0.9),
        unit_system: UnitSystem::Imperial,
    };
    match calculate_breaker(&BreakerCalculationInput::new(circuit.clone())) {
        Err(CalcEngineError::InvalidInput { violations }) => {
            assert_eq!(violations.len(), 1);
            assert!(violations[0].starts_with("circuit.loadValue"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Largest accepted load with heavy derating still ends in a capacity error.
    let input = BreakerCalculationInput::new(CircuitConfiguration {
        voltage: dec!(100),
        power_factor: dec!(0.5),
        load_value: dec!(1000000),
        ..circuit
    })
    .with_environment(EnvironmentalConditions {
        ambient_temperature: Some(dec!(70)),
        grouped_cables: Some(40),
        insulation_rating: Some(90),
        circuit_distance: Some(dec!(100000)),
        conductor_material: Some(ConductorMaterial::Aluminum),
        ..Default::default()
    });
    assert!(matches!(
        calculate_breaker(&input),
        Err(CalcEngineError::CapacityExceeded { .. })
    ));
}

#[test]
fn invalid_input_lists_every_violation() {
    let input = BreakerCalculationInput::new(CircuitConfiguration {
        standard: Standard::Nec,
        voltage: dec!(24),
        phase: Phase::Single,
        load_mode: LoadMode::Kw,
        load_value: dec!(0),
        power_factor: dec!(0.3),
        unit_system: UnitSystem::Imperial,
    });
    match calculate_breaker(&input) {
        Err(CalcEngineError::InvalidInput { violations }) => assert_eq!(violations.len(), 3),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn out_of_table_conductor_drops_optional_sections_only() {
    let mut input = motor_feeder();
    if let Some(environment) = input.environment.as_mut() {
        environment.conductor_size = Some(ConductorSize::awg("4"));
    }
    let results = calculate_breaker(&input).unwrap();
    assert!(results.voltage_drop_analysis.is_none());
    assert!(results.derating_factors.is_none());
    assert_eq!(results.breaker_sizing.recommended_rating_amps, 100);
}

#[test]
fn alerts_follow_stage_order() {
    let input = BreakerCalculationInput::new(CircuitConfiguration {
        standard: Standard::Nec,
        voltage: dec!(240),
        phase: Phase::Single,
        load_mode: LoadMode::Amps,
        load_value: dec!(40),
        power_factor: dec!(0.95),
        unit_system: UnitSystem::Imperial,
    })
    .with_short_circuit_current_ka(dec!(18))
    .with_environment(EnvironmentalConditions {
        ambient_temperature: Some(dec!(45)),
        grouped_cables: Some(4),
        circuit_distance: Some(dec!(250)),
        conductor_material: Some(ConductorMaterial::Copper),
        conductor_size: Some(ConductorSize::awg("8")),
        ..Default::default()
    });

    let results = calculate_breaker(&input).unwrap();
    let codes: Vec<&str> = results.alerts.iter().map(|alert| alert.code.as_str()).collect();
    let position = |code: &str| codes.iter().position(|c| *c == code).unwrap();

    assert!(position("CONTINUOUS_LOAD_FACTOR") < position("DERATING_APPLIED"));
    assert!(position("DERATING_APPLIED") < position("DERATING_AMPACITY_EXCEEDED"));
    assert!(position("DERATING_AMPACITY_EXCEEDED") < position("INSUFFICIENT_BREAKING_CAPACITY"));
    assert!(position("INSUFFICIENT_BREAKING_CAPACITY") < position("VOLTAGE_DROP_EXCEEDS_TOTAL_LIMIT"));
    assert!(position("VOLTAGE_DROP_EXCEEDS_TOTAL_LIMIT") < position("CABLE_UPSIZE_RECOMMENDED"));
    assert!(results
        .alerts
        .iter()
        .filter(|alert| alert.alert_type == AlertType::Error)
        .all(|alert| alert.severity >= Severity::Major));
}

#[test]
fn rounding_is_monotonic_across_tables() {
    for standard in [Standard::Nec, Standard::Iec] {
        let ratings = standard_ratings(standard);
        for window in ratings.windows(2) {
            let midpoint = Decimal::from(window[0] + window[1]) / dec!(2);
            assert_eq!(recommend_standard_breaker(midpoint, standard), Some(window[1]));
        }
    }
}

#[test]
fn cached_calculation_matches_fresh_one() {
    let calculator = BreakerCalculator::default();
    let mut cache = CalculationCache::from_config(calculator.config());
    let cached = calculator.calculate_cached(&mut cache, &motor_feeder()).unwrap();
    let again = calculator.calculate_cached(&mut cache, &motor_feeder()).unwrap();
    assert_eq!(cached.calculated_at, again.calculated_at);
    assert_eq!(cache.len(), 1);
}

#[test]
fn yaml_file_round_trip_through_report() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("feeder.yaml");
    fs::write(
        &input_path,
        "circuit:\n  standard: NEC\n  voltage: 208\n  phase: three\n  loadMode: kw\n  loadValue: 15\n  powerFactor: 0.85\n  unitSystem: imperial\nloadDuty: intermittent\n",
    )
    .unwrap();

    let input = load_input_from_file(&input_path).unwrap();
    let results = calculate_breaker(&input).unwrap();
    // 15 kW / (√3 × 208 V × 0.85) = 48.98 A → 50 A
    assert_eq!(results.breaker_sizing.recommended_rating_amps, 50);

    let report = results.exporter().export_all(&dir.path().join("reports")).unwrap();
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(written["data"]["breakerSizing"]["recommendedRatingAmps"], 50);
}
