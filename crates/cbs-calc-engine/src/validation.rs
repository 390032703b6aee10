//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use cbs_common::EngineConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    errors::{CalcEngineError, Result},
    load_current::{MAX_POWER_FACTOR, MAX_VOLTAGE, MIN_POWER_FACTOR, MIN_VOLTAGE},
    model::{BreakerCalculationInput, EnvironmentalConditions},
};

pub const MIN_AMBIENT_C: Decimal = dec!(-40);
pub const MAX_AMBIENT_C: Decimal = dec!(100);
pub const INSULATION_RATINGS: &[u16] = &[60, 70, 75, 90];
/// Ceiling for `loadValue` in either kW or A. Anything near it already exceeds every
/// standard rating, and the bound keeps the pipeline arithmetic inside `Decimal` range.
pub const MAX_LOAD_VALUE: Decimal = dec!(1000000);
/// Ceiling for `circuitDistance` in metres or feet.
pub const MAX_CIRCUIT_DISTANCE: Decimal = dec!(100000);

/// Check every rule against the default engine configuration.
pub fn validate_input(input: &BreakerCalculationInput) -> Result<()> {
    validate_input_with(input, &EngineConfig::default())
}

/// Check every rule and report all violations together.
///
/// An explicit `breakingCapacityKA` may only raise the configured default
/// used by the short-circuit check, never lower it.
pub fn validate_input_with(input: &BreakerCalculationInput, config: &EngineConfig) -> Result<()> {
    let mut violations = Vec::new();
    let circuit = &input.circuit;

    if circuit.voltage < MIN_VOLTAGE || circuit.voltage > MAX_VOLTAGE {
        violations.push(format!(
            "circuit.voltage must be between {} and {} V (got {})",
            MIN_VOLTAGE, MAX_VOLTAGE, circuit.voltage
        ));
    }
    if circuit.load_value <= Decimal::ZERO {
        violations.push(format!(
            "circuit.loadValue must be greater than zero (got {})",
            circuit.load_value
        ));
    } else if circuit.load_value > MAX_LOAD_VALUE {
        violations.push(format!(
            "circuit.loadValue must not exceed {} (got {})",
            MAX_LOAD_VALUE, circuit.load_value
        ));
    }
    if circuit.power_factor < MIN_POWER_FACTOR || circuit.power_factor > MAX_POWER_FACTOR {
        violations.push(format!(
            "circuit.powerFactor must be between {} and {} (got {})",
            MIN_POWER_FACTOR, MAX_POWER_FACTOR, circuit.power_factor
        ));
    }
    if let Some(fault_ka) = input.short_circuit_current_ka {
        if fault_ka <= Decimal::ZERO {
            violations.push(format!(
                "shortCircuitCurrentKA must be greater than zero (got {})",
                fault_ka
            ));
        }
    }
    if let Some(capacity_ka) = input.breaking_capacity_ka {
        if capacity_ka <= Decimal::ZERO {
            violations.push(format!(
                "breakingCapacityKA must be greater than zero (got {})",
                capacity_ka
            ));
        } else if capacity_ka < config.default_breaking_capacity_ka {
            violations.push(format!(
                "breakingCapacityKA must not be below the {} kA default (got {})",
                config.default_breaking_capacity_ka, capacity_ka
            ));
        }
    }
    if let Some(environment) = &input.environment {
        validate_environment(environment, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CalcEngineError::InvalidInput { violations })
    }
}

fn validate_environment(environment: &EnvironmentalConditions, violations: &mut Vec<String>) {
    if let Some(ambient) = environment.ambient_temperature {
        if ambient < MIN_AMBIENT_C || ambient > MAX_AMBIENT_C {
            violations.push(format!(
                "environment.ambientTemperature must be between {} and {} °C (got {})",
                MIN_AMBIENT_C, MAX_AMBIENT_C, ambient
            ));
        }
    }
    if environment.grouped_cables == Some(0) {
        violations.push("environment.groupedCables must be at least 1".to_owned());
    }
    if let Some(distance) = environment.circuit_distance {
        if distance <= Decimal::ZERO {
            violations.push(format!(
                "environment.circuitDistance must be greater than zero (got {})",
                distance
            ));
        } else if distance > MAX_CIRCUIT_DISTANCE {
            violations.push(format!(
                "environment.circuitDistance must not exceed {} (got {})",
                MAX_CIRCUIT_DISTANCE, distance
            ));
        }
    }
    if let Some(rating) = environment.insulation_rating {
        if !INSULATION_RATINGS.contains(&rating) {
            violations.push(format!(
                "environment.insulationRating must be one of 60, 70, 75 or 90 (got {})",
                rating
            ));
        }
    }
    if let Some(size) = &environment.conductor_size {
        if size.value.trim().is_empty() {
            violations.push("environment.conductorSize.value must not be empty".to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CircuitConfiguration, LoadMode, Phase, Standard, UnitSystem};

    fn circuit() -> CircuitConfiguration {
        CircuitConfiguration {
            standard: Standard::Iec,
            voltage: dec!(230),
            phase: Phase::Single,
            load_mode: LoadMode::Kw,
            load_value: dec!(5),
            power_factor: dec!(0.95),
            unit_system: UnitSystem::Metric,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_input(&BreakerCalculationInput::new(circuit())).is_ok());
    }

    #[test]
    fn every_violation_is_listed() {
        let mut circuit = circuit();
        circuit.voltage = dec!(50);
        circuit.load_value = dec!(-1);
        circuit.power_factor = dec!(1.2);
        let input = BreakerCalculationInput::new(circuit)
            .with_short_circuit_current_ka(dec!(0))
            .with_environment(EnvironmentalConditions {
                grouped_cables: Some(0),
                insulation_rating: Some(105),
                circuit_distance: Some(dec!(-5)),
                ..Default::default()
            });

        match validate_input(&input) {
            Err(CalcEngineError::InvalidInput { violations }) => {
                assert_eq!(violations.len(), 7);
                assert!(violations[0].starts_with("circuit.voltage"));
                assert!(violations.iter().any(|v| v.contains("insulationRating")));
            }
            other => panic!("expected aggregated violations, got {:?}", other),
        }
    }

    #[test]
    fn oversized_load_and_distance_are_rejected() {
        let mut oversized = circuit();
        oversized.load_value = Decimal::from_i128_with_scale(10i128.pow(26), 0);
        let input = BreakerCalculationInput::new(oversized).with_environment(EnvironmentalConditions {
            circuit_distance: Some(dec!(10000000)),
            ..Default::default()
        });
        match validate_input(&input) {
            Err(CalcEngineError::InvalidInput { violations }) => {
                assert_eq!(violations.len(), 2);
                assert!(violations[0].starts_with("circuit.loadValue must not exceed"));
                assert!(violations[1].starts_with("environment.circuitDistance must not exceed"));
            }
            other => panic!("expected bound violations, got {:?}", other),
        }

        let mut at_limit = circuit();
        at_limit.load_value = MAX_LOAD_VALUE;
        assert!(validate_input(&BreakerCalculationInput::new(at_limit)).is_ok());
    }

    #[test]
    fn breaking_capacity_may_only_raise_the_default() {
        let lower = BreakerCalculationInput::new(circuit()).with_breaking_capacity_ka(dec!(6));
        match validate_input(&lower) {
            Err(CalcEngineError::InvalidInput { violations }) => {
                assert_eq!(
                    violations,
                    ["breakingCapacityKA must not be below the 10 kA default (got 6)"]
                );
            }
            other => panic!("expected a breaking capacity violation, got {:?}", other),
        }

        let config = EngineConfig {
            default_breaking_capacity_ka: dec!(25),
            ..EngineConfig::default()
        };
        let equal = BreakerCalculationInput::new(circuit()).with_breaking_capacity_ka(dec!(25));
        assert!(validate_input_with(&equal, &config).is_ok());
        let higher = BreakerCalculationInput::new(circuit()).with_breaking_capacity_ka(dec!(22));
        assert!(validate_input(&higher).is_ok());
        assert!(validate_input_with(&higher, &config).is_err());
    }
}
