//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::Phase,
    numeric::{phase_multiplier, ONE_THOUSAND},
};

pub const MIN_VOLTAGE: Decimal = dec!(100);
pub const MAX_VOLTAGE: Decimal = dec!(1000);
pub const MIN_POWER_FACTOR: Decimal = dec!(0.5);
pub const MAX_POWER_FACTOR: Decimal = dec!(1.0);

pub const FORMULA_USER_INPUT: &str = "(user input)";
pub const FORMULA_SINGLE_PHASE: &str = "I = (P × 1000) / (V × PF)";
pub const FORMULA_THREE_PHASE: &str = "I = (P × 1000) / (√3 × V × PF)";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadCurrentError {
    #[error("exactly one of power or current must be supplied")]
    AmbiguousLoad,
    #[error("power factor is required when the load is given as power")]
    MissingPowerFactor,
    #[error("voltage {0} V is outside the supported 100-1000 V range")]
    VoltageOutOfRange(Decimal),
    #[error("power factor {0} is outside the 0.5-1.0 range")]
    PowerFactorOutOfRange(Decimal),
    #[error("load value {0} must be greater than zero")]
    NonPositiveLoad(Decimal),
    #[error("load value {0} is too large to convert to a line current")]
    LoadOutOfRange(Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadCurrentInput {
    pub power_kw: Option<Decimal>,
    pub current_amps: Option<Decimal>,
    pub voltage: Decimal,
    pub phase: Phase,
    pub power_factor: Option<Decimal>,
}

impl LoadCurrentInput {
    pub fn from_power(power_kw: Decimal, voltage: Decimal, phase: Phase, power_factor: Decimal) -> Self {
        Self {
            power_kw: Some(power_kw),
            current_amps: None,
            voltage,
            phase,
            power_factor: Some(power_factor),
        }
    }

    pub fn from_current(current_amps: Decimal, voltage: Decimal, phase: Phase) -> Self {
        Self {
            power_kw: None,
            current_amps: Some(current_amps),
            voltage,
            phase,
            power_factor: None,
        }
    }

    pub fn with_power_factor(mut self, power_factor: Decimal) -> Self {
        self.power_factor = Some(power_factor);
        self
    }
}

/// Values that went into the current figure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amps: Option<Decimal>,
    pub voltage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_factor: Option<Decimal>,
    pub phase_multiplier: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadCurrentResult {
    pub current_amps: Decimal,
    pub formula: &'static str,
    pub components: LoadComponents,
    pub real_power_kw: Decimal,
    pub apparent_power_kva: Decimal,
}

/// Convert a power or current load description into line current.
pub fn calculate_load_current(input: &LoadCurrentInput) -> Result<LoadCurrentResult, LoadCurrentError> {
    if input.voltage < MIN_VOLTAGE || input.voltage > MAX_VOLTAGE {
        return Err(LoadCurrentError::VoltageOutOfRange(input.voltage));
    }
    if let Some(pf) = input.power_factor {
        if pf < MIN_POWER_FACTOR || pf > MAX_POWER_FACTOR {
            return Err(LoadCurrentError::PowerFactorOutOfRange(pf));
        }
    }

    let multiplier = phase_multiplier(input.phase);

    match (input.power_kw, input.current_amps) {
        (Some(power_kw), None) => {
            let pf = input
                .power_factor
                .ok_or(LoadCurrentError::MissingPowerFactor)?;
            if power_kw <= Decimal::ZERO {
                return Err(LoadCurrentError::NonPositiveLoad(power_kw));
            }
            let formula = match input.phase {
                Phase::Single => FORMULA_SINGLE_PHASE,
                Phase::Three => FORMULA_THREE_PHASE,
            };
            // The multiplier is 1 for single phase, so one expression covers both formulas.
            let current_amps = power_kw
                .checked_mul(ONE_THOUSAND)
                .and_then(|watts| watts.checked_div(multiplier * input.voltage * pf))
                .ok_or(LoadCurrentError::LoadOutOfRange(power_kw))?;
            Ok(LoadCurrentResult {
                current_amps,
                formula,
                components: LoadComponents {
                    power_kw: Some(power_kw),
                    current_amps: None,
                    voltage: input.voltage,
                    power_factor: Some(pf),
                    phase_multiplier: multiplier,
                },
                real_power_kw: power_kw,
                apparent_power_kva: power_kw / pf,
            })
        }
        (None, Some(current_amps)) => {
            if current_amps <= Decimal::ZERO {
                return Err(LoadCurrentError::NonPositiveLoad(current_amps));
            }
            let apparent_power_kva = (multiplier * input.voltage)
                .checked_mul(current_amps)
                .ok_or(LoadCurrentError::LoadOutOfRange(current_amps))?
                / ONE_THOUSAND;
            let pf = input.power_factor.unwrap_or(Decimal::ONE);
            Ok(LoadCurrentResult {
                current_amps,
                formula: FORMULA_USER_INPUT,
                components: LoadComponents {
                    power_kw: None,
                    current_amps: Some(current_amps),
                    voltage: input.voltage,
                    power_factor: input.power_factor,
                    phase_multiplier: multiplier,
                },
                real_power_kw: apparent_power_kva * pf,
                apparent_power_kva,
            })
        }
        _ => Err(LoadCurrentError::AmbiguousLoad),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_phase_power_to_current() {
        let input = LoadCurrentInput::from_power(dec!(10), dec!(240), Phase::Single, dec!(0.9));
        let result = calculate_load_current(&input).unwrap();
        assert!((result.current_amps - dec!(46.296296296)).abs() < dec!(0.000000001));
        assert_eq!(result.formula, FORMULA_SINGLE_PHASE);
        assert_eq!(result.components.phase_multiplier, Decimal::ONE);
    }

    #[test]
    fn three_phase_power_to_current() {
        let input = LoadCurrentInput::from_power(dec!(50), dec!(400), Phase::Three, dec!(0.9));
        let result = calculate_load_current(&input).unwrap();
        assert!((result.current_amps - dec!(80.18)).abs() < dec!(0.01));
        assert!((result.current_amps - dec!(80.187537387)).abs() < dec!(0.000000001));
        assert_eq!(result.formula, FORMULA_THREE_PHASE);
    }

    #[test]
    fn direct_current_passes_through() {
        let input = LoadCurrentInput::from_current(dec!(32.5), dec!(230), Phase::Single);
        let result = calculate_load_current(&input).unwrap();
        assert_eq!(result.current_amps, dec!(32.5));
        assert_eq!(result.formula, FORMULA_USER_INPUT);
        assert_eq!(result.apparent_power_kva, dec!(7.475));
        assert_eq!(result.real_power_kw, dec!(7.475));
    }

    #[test]
    fn direct_current_with_power_factor_reports_real_power() {
        let input = LoadCurrentInput::from_current(dec!(10), dec!(200), Phase::Single)
            .with_power_factor(dec!(0.8));
        let result = calculate_load_current(&input).unwrap();
        assert_eq!(result.apparent_power_kva, dec!(2));
        assert_eq!(result.real_power_kw, dec!(1.6));
    }

    #[test]
    fn both_or_neither_load_inputs_are_rejected() {
        let mut input = LoadCurrentInput::from_power(dec!(5), dec!(230), Phase::Single, dec!(1));
        input.current_amps = Some(dec!(20));
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::AmbiguousLoad)
        );

        input.power_kw = None;
        input.current_amps = None;
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::AmbiguousLoad)
        );
    }

    #[test]
    fn power_without_power_factor_is_rejected() {
        let mut input = LoadCurrentInput::from_power(dec!(5), dec!(230), Phase::Single, dec!(1));
        input.power_factor = None;
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::MissingPowerFactor)
        );
    }

    #[test]
    fn out_of_range_voltage_and_power_factor() {
        let input = LoadCurrentInput::from_power(dec!(5), dec!(48), Phase::Single, dec!(0.9));
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::VoltageOutOfRange(dec!(48)))
        );
        let input = LoadCurrentInput::from_power(dec!(5), dec!(0), Phase::Single, dec!(0.9));
        assert!(matches!(
            calculate_load_current(&input),
            Err(LoadCurrentError::VoltageOutOfRange(_))
        ));
        let input = LoadCurrentInput::from_power(dec!(5), dec!(230), Phase::Single, dec!(0.45));
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::PowerFactorOutOfRange(dec!(0.45)))
        );
    }

    #[test]
    fn oversized_load_is_an_error_not_a_panic() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(26), 0);
        let input = LoadCurrentInput::from_power(huge, dec!(240), Phase::Single, dec!(0.9));
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::LoadOutOfRange(huge))
        );
        let input = LoadCurrentInput::from_current(Decimal::MAX, dec!(400), Phase::Three);
        assert_eq!(
            calculate_load_current(&input),
            Err(LoadCurrentError::LoadOutOfRange(Decimal::MAX))
        );
    }

    #[test]
    fn boundary_values_are_accepted() {
        let input = LoadCurrentInput::from_power(dec!(1), dec!(100), Phase::Three, dec!(0.5));
        assert!(calculate_load_current(&input).is_ok());
        let input = LoadCurrentInput::from_power(dec!(1), dec!(1000), Phase::Single, dec!(1.0));
        assert!(calculate_load_current(&input).is_ok());
    }
}
