//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Ambient and grouping derating of conductor ampacity.
//!
//! The stage is optional: every failure is returned as a [`DeratingError`] and
//! the orchestrator decides whether the section is dropped.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::{ConductorMaterial, ConductorSize, InstallationMethod, Standard},
    numeric::{display, percent_of},
    results::{CalculationAlert, Severity},
    tables::{
        cables::conductor_table,
        derating::{
            code_references, default_insulation_rating, grouping_factor, iec_circuit_count,
            temperature_factor,
        },
    },
};

pub const DEFAULT_AMBIENT_C: Decimal = dec!(30);
pub const DEFAULT_CONDUCTORS: u32 = 1;
pub const HIGH_UTILIZATION_PERCENT: Decimal = dec!(80);
pub const SEVERE_DERATING_THRESHOLD: Decimal = dec!(0.4);

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeratingError {
    #[error("number of current-carrying conductors must be at least one")]
    InvalidConductorCount,
    #[error("insulation rating {0} °C is not one of 60, 70, 75 or 90")]
    InvalidInsulationRating(u16),
    #[error("combined derating factor is zero (temperature {temperature_factor}, grouping {grouping_factor})")]
    ZeroCombinedFactor {
        temperature_factor: Decimal,
        grouping_factor: Decimal,
        /// Warnings raised before the stage gave up.
        alerts: Vec<CalculationAlert>,
    },
    #[error("conductor size {size} is not listed for {material} under {standard}")]
    UnsupportedSize {
        standard: Standard,
        material: ConductorMaterial,
        size: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeratingInput {
    pub standard: Standard,
    pub load_current_amps: Decimal,
    pub minimum_breaker_size_amps: Decimal,
    pub ambient_temperature_c: Decimal,
    pub conductors: u32,
    pub insulation_rating: u16,
    pub installation_method: Option<InstallationMethod>,
    /// Conductor whose table ampacity is checked against the load.
    pub conductor: Option<(ConductorSize, ConductorMaterial)>,
}

impl DeratingInput {
    pub fn new(standard: Standard, load_current_amps: Decimal, minimum_breaker_size_amps: Decimal) -> Self {
        Self {
            standard,
            load_current_amps,
            minimum_breaker_size_amps,
            ambient_temperature_c: DEFAULT_AMBIENT_C,
            conductors: DEFAULT_CONDUCTORS,
            insulation_rating: default_insulation_rating(standard),
            installation_method: None,
            conductor: None,
        }
    }
}

/// Ampacity check of the supplied conductor after derating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmpacityCompliance {
    pub conductor_size: ConductorSize,
    pub conductor_material: ConductorMaterial,
    pub base_ampacity_amps: Decimal,
    pub adjusted_ampacity_amps: Decimal,
    pub load_current_amps: Decimal,
    pub utilization_percent: Decimal,
    pub compliant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeratingFactorsResult {
    pub temperature_factor: Decimal,
    pub grouping_factor: Decimal,
    pub combined_factor: Decimal,
    pub adjusted_breaker_size_amps: Decimal,
    pub ambient_temperature_c: Decimal,
    pub number_of_conductors: u32,
    /// IEC groups by circuit rather than by conductor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_circuits: Option<u32>,
    pub insulation_rating: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_method: Option<InstallationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ampacity: Option<AmpacityCompliance>,
    pub code_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeratingOutcome {
    pub factors: DeratingFactorsResult,
    pub alerts: Vec<CalculationAlert>,
}

pub fn calculate_derating_factors(input: &DeratingInput) -> Result<DeratingOutcome, DeratingError> {
    if input.conductors == 0 {
        return Err(DeratingError::InvalidConductorCount);
    }
    if ![60, 70, 75, 90].contains(&input.insulation_rating) {
        return Err(DeratingError::InvalidInsulationRating(input.insulation_rating));
    }

    let standard = input.standard;
    let (temperature_reference, grouping_reference) = code_references(standard);
    let temperature = temperature_factor(input.ambient_temperature_c, input.insulation_rating, standard);
    let grouping = grouping_factor(input.conductors, input.installation_method, standard);
    let combined = temperature * grouping;

    let mut alerts = Vec::new();
    if temperature.is_zero() {
        alerts.push(
            CalculationAlert::warning(
                Severity::Critical,
                "AMBIENT_EXCEEDS_INSULATION_RATING",
                format!(
                    "Ambient temperature {} °C exceeds the operating range of {} °C insulation",
                    display(input.ambient_temperature_c, 1),
                    input.insulation_rating
                ),
            )
            .with_code_reference(temperature_reference),
        );
    }
    if combined.is_zero() {
        return Err(DeratingError::ZeroCombinedFactor {
            temperature_factor: temperature,
            grouping_factor: grouping,
            alerts,
        });
    }

    alerts.push(
        CalculationAlert::info(
            "DERATING_APPLIED",
            format!(
                "Combined derating factor {} (temperature {} × grouping {})",
                display(combined, 3),
                display(temperature, 2),
                display(grouping, 2)
            ),
        )
        .with_code_reference(grouping_reference),
    );
    if combined < SEVERE_DERATING_THRESHOLD {
        alerts.push(CalculationAlert::warning(
            Severity::Major,
            "SEVERE_DERATING",
            format!(
                "Combined derating factor {} is below {}; consider a different installation method or separating the cables",
                display(combined, 3),
                SEVERE_DERATING_THRESHOLD
            ),
        ));
    }

    let ampacity = match &input.conductor {
        Some((size, material)) => {
            let compliance = check_ampacity(input, size, *material, combined)?;
            if !compliance.compliant {
                alerts.push(
                    CalculationAlert::error(
                        Severity::Critical,
                        "DERATING_AMPACITY_EXCEEDED",
                        format!(
                            "Load current {} A exceeds the derated ampacity of {} A for {}; the conductor risks overheating",
                            display(compliance.load_current_amps, 2),
                            compliance.adjusted_ampacity_amps,
                            compliance.conductor_size
                        ),
                    )
                    .with_code_reference(grouping_reference),
                );
            } else if compliance.utilization_percent > HIGH_UTILIZATION_PERCENT {
                alerts.push(CalculationAlert::warning(
                    Severity::Minor,
                    "DERATING_HIGH_UTILIZATION",
                    format!(
                        "Conductor {} is loaded to {}% of its derated ampacity",
                        compliance.conductor_size,
                        display(compliance.utilization_percent, 1)
                    ),
                ));
            }
            Some(compliance)
        }
        None => None,
    };

    let factors = DeratingFactorsResult {
        temperature_factor: temperature,
        grouping_factor: grouping,
        combined_factor: combined,
        adjusted_breaker_size_amps: input.minimum_breaker_size_amps / combined,
        ambient_temperature_c: input.ambient_temperature_c,
        number_of_conductors: input.conductors,
        number_of_circuits: match standard {
            Standard::Iec => Some(iec_circuit_count(input.conductors)),
            Standard::Nec => None,
        },
        insulation_rating: input.insulation_rating,
        installation_method: input.installation_method,
        ampacity,
        code_references: vec![temperature_reference.to_owned(), grouping_reference.to_owned()],
    };

    Ok(DeratingOutcome { factors, alerts })
}

fn check_ampacity(
    input: &DeratingInput,
    size: &ConductorSize,
    material: ConductorMaterial,
    combined: Decimal,
) -> Result<AmpacityCompliance, DeratingError> {
    let table = conductor_table(input.standard);
    let base = table
        .ampacity(size, material, input.insulation_rating)
        .ok_or_else(|| DeratingError::UnsupportedSize {
            standard: input.standard,
            material,
            size: size.to_string(),
        })?;
    let adjusted = (base * combined).floor();

    Ok(AmpacityCompliance {
        conductor_size: size.clone(),
        conductor_material: material,
        base_ampacity_amps: base,
        adjusted_ampacity_amps: adjusted,
        load_current_amps: input.load_current_amps,
        utilization_percent: percent_of(input.load_current_amps, adjusted),
        compliant: !adjusted.is_zero() && input.load_current_amps <= adjusted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::AlertType;

    fn nec_input() -> DeratingInput {
        DeratingInput::new(Standard::Nec, dec!(40), dec!(50))
    }

    #[test]
    fn defaults_give_unity_factor() {
        let outcome = calculate_derating_factors(&nec_input()).unwrap();
        assert_eq!(outcome.factors.combined_factor, Decimal::ONE);
        assert_eq!(outcome.factors.adjusted_breaker_size_amps, dec!(50));
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].code, "DERATING_APPLIED");
    }

    #[test]
    fn combined_factor_is_product_and_resizes_breaker() {
        let mut input = nec_input();
        input.ambient_temperature_c = dec!(40);
        input.conductors = 6;
        let outcome = calculate_derating_factors(&input).unwrap();
        assert_eq!(outcome.factors.temperature_factor, dec!(0.88));
        assert_eq!(outcome.factors.grouping_factor, dec!(0.80));
        assert_eq!(outcome.factors.combined_factor, dec!(0.704));
        assert_eq!(outcome.factors.adjusted_breaker_size_amps, dec!(50) / dec!(0.704));
        assert!(outcome.factors.number_of_circuits.is_none());
    }

    #[test]
    fn overloaded_conductor_raises_critical_alert() {
        let mut input = nec_input();
        input.ambient_temperature_c = dec!(45);
        input.conductors = 9;
        input.conductor = Some((ConductorSize::awg("8"), ConductorMaterial::Copper));
        let outcome = calculate_derating_factors(&input).unwrap();
        let ampacity = outcome.factors.ampacity.unwrap();
        // 50 A × 0.82 × 0.70 = 28.7 A
        assert_eq!(ampacity.base_ampacity_amps, dec!(50));
        assert_eq!(ampacity.adjusted_ampacity_amps, dec!(28));
        assert!(!ampacity.compliant);
        let alert = outcome
            .alerts
            .iter()
            .find(|alert| alert.code == "DERATING_AMPACITY_EXCEEDED")
            .unwrap();
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.alert_type, AlertType::Error);
    }

    #[test]
    fn high_utilization_warns() {
        let mut input = nec_input();
        input.load_current_amps = dec!(45);
        input.conductor = Some((ConductorSize::awg("8"), ConductorMaterial::Copper));
        let outcome = calculate_derating_factors(&input).unwrap();
        let ampacity = outcome.factors.ampacity.as_ref().unwrap();
        assert!(ampacity.compliant);
        assert_eq!(ampacity.utilization_percent, dec!(90));
        assert!(outcome
            .alerts
            .iter()
            .any(|alert| alert.code == "DERATING_HIGH_UTILIZATION" && alert.severity == Severity::Minor));
    }

    #[test]
    fn severe_derating_warns() {
        let mut input = nec_input();
        input.ambient_temperature_c = dec!(55);
        input.insulation_rating = 75;
        input.conductors = 12;
        let outcome = calculate_derating_factors(&input).unwrap();
        assert!(outcome.factors.combined_factor < SEVERE_DERATING_THRESHOLD);
        assert!(outcome.alerts.iter().any(|alert| alert.code == "SEVERE_DERATING"));
    }

    #[test]
    fn ambient_above_insulation_is_reported_not_panicked() {
        let mut input = nec_input();
        input.ambient_temperature_c = dec!(65);
        input.insulation_rating = 60;
        match calculate_derating_factors(&input) {
            Err(DeratingError::ZeroCombinedFactor { alerts, temperature_factor, .. }) => {
                assert!(temperature_factor.is_zero());
                assert_eq!(alerts.len(), 1);
                assert_eq!(alerts[0].code, "AMBIENT_EXCEEDS_INSULATION_RATING");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn iec_reports_circuit_count() {
        let mut input = DeratingInput::new(Standard::Iec, dec!(30), dec!(30));
        input.conductors = 7;
        input.installation_method = Some(InstallationMethod::CableTray);
        let outcome = calculate_derating_factors(&input).unwrap();
        assert_eq!(outcome.factors.number_of_circuits, Some(3));
        assert_eq!(outcome.factors.grouping_factor, dec!(0.82));
        assert_eq!(outcome.factors.insulation_rating, 70);
    }

    #[test]
    fn unknown_conductor_is_an_error() {
        let mut input = DeratingInput::new(Standard::Iec, dec!(30), dec!(30));
        input.conductor = Some((ConductorSize::mm2("3"), ConductorMaterial::Copper));
        assert!(matches!(
            calculate_derating_factors(&input),
            Err(DeratingError::UnsupportedSize { .. })
        ));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let mut input = nec_input();
        input.conductors = 0;
        assert_eq!(
            calculate_derating_factors(&input),
            Err(DeratingError::InvalidConductorCount)
        );
        let mut input = nec_input();
        input.insulation_rating = 105;
        assert_eq!(
            calculate_derating_factors(&input),
            Err(DeratingError::InvalidInsulationRating(105))
        );
    }

    #[test]
    fn adjusted_ampacity_never_exceeds_base() {
        for ambient in [dec!(10), dec!(30), dec!(38), dec!(50)] {
            for conductors in [1, 4, 10, 25, 45] {
                let mut input = nec_input();
                input.ambient_temperature_c = ambient;
                input.conductors = conductors;
                input.insulation_rating = 90;
                input.conductor = Some((ConductorSize::awg("4"), ConductorMaterial::Aluminum));
                let outcome = calculate_derating_factors(&input).unwrap();
                let factors = outcome.factors;
                assert!(factors.combined_factor > Decimal::ZERO);
                assert!(factors.combined_factor <= Decimal::ONE);
                let ampacity = factors.ampacity.unwrap();
                assert!(ampacity.adjusted_ampacity_amps <= ampacity.base_ampacity_amps);
            }
        }
    }
}
