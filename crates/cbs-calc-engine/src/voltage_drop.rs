//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Voltage drop along the circuit run, with compliance banding and a cable
//! upsize search when the drop is out of limits.
//!
//! The drop itself is computed from the 75 °C reference resistance; the
//! temperature-adjusted resistance is reported alongside it for information.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::{ConductorMaterial, ConductorSize, Phase, Standard, UnitSystem},
    numeric::{display, HUNDRED, FEET_PER_METRE, METRES_PER_FOOT, ONE_THOUSAND, SQRT_3},
    results::{CalculationAlert, Severity},
    tables::cables::{conductor_table, ConductorRow, ConductorTable, LengthBasis},
};

pub const REFERENCE_TEMPERATURE_C: Decimal = dec!(75);
pub const ALPHA_COPPER: Decimal = dec!(0.00393);
pub const ALPHA_ALUMINUM: Decimal = dec!(0.00403);
pub const BRANCH_LIMIT_PERCENT: Decimal = dec!(3.0);
pub const TOTAL_LIMIT_PERCENT: Decimal = dec!(5.0);

const NEC_BRANCH_REFERENCE: &str = "NEC 210.19(A) Informational Note No. 4";
const NEC_TOTAL_REFERENCE: &str = "NEC 215.2(A)(1) Informational Note No. 2";
const IEC_REFERENCE: &str = "IEC 60364-5-52 Clause 525";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VoltageDropError {
    #[error("conductor size {size} is not listed for {material} under {standard}")]
    UnsupportedSize {
        standard: Standard,
        material: ConductorMaterial,
        size: String,
    },
    #[error("no {material} conductor under {standard} carries {current} A")]
    NoConductorForCurrent {
        standard: Standard,
        material: ConductorMaterial,
        current: Decimal,
    },
    #[error("circuit distance must be greater than zero (got {0})")]
    NonPositiveDistance(Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoltageDropInput {
    pub standard: Standard,
    pub current_amps: Decimal,
    pub voltage: Decimal,
    pub phase: Phase,
    pub power_factor: Decimal,
    /// Metres for metric circuits, feet for imperial ones.
    pub distance: Decimal,
    pub unit_system: UnitSystem,
    pub material: ConductorMaterial,
    /// When absent the smallest conductor whose ampacity carries the load is analysed.
    pub conductor_size: Option<ConductorSize>,
    pub insulation_rating: u16,
    pub temperature_c: Decimal,
    pub upsize_limit_percent: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum VoltageDropStatus {
    Excellent,
    Good,
    Acceptable,
    Warning,
    Error,
    ExceedLimit,
}

impl fmt::Display for VoltageDropStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VoltageDropStatus::Excellent => "excellent",
            VoltageDropStatus::Good => "good",
            VoltageDropStatus::Acceptable => "acceptable",
            VoltageDropStatus::Warning => "warning",
            VoltageDropStatus::Error => "error",
            VoltageDropStatus::ExceedLimit => "exceed-limit",
        })
    }
}

pub fn classify_voltage_drop(percent: Decimal) -> VoltageDropStatus {
    if percent <= dec!(0.5) {
        VoltageDropStatus::Excellent
    } else if percent <= dec!(1.0) {
        VoltageDropStatus::Good
    } else if percent <= dec!(2.0) {
        VoltageDropStatus::Acceptable
    } else if percent <= BRANCH_LIMIT_PERCENT {
        VoltageDropStatus::Warning
    } else if percent <= TOTAL_LIMIT_PERCENT {
        VoltageDropStatus::Error
    } else {
        VoltageDropStatus::ExceedLimit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAssessment {
    pub status: VoltageDropStatus,
    pub message: String,
    pub code_reference: String,
    pub compliance_percentage: Decimal,
}

pub fn assess_compliance(percent: Decimal, standard: Standard) -> ComplianceAssessment {
    let status = classify_voltage_drop(percent);
    let shown = display(percent, 2);
    let message = match status {
        VoltageDropStatus::Excellent => format!("Voltage drop of {}% is excellent", shown),
        VoltageDropStatus::Good => format!("Voltage drop of {}% is good", shown),
        VoltageDropStatus::Acceptable => format!("Voltage drop of {}% is acceptable", shown),
        VoltageDropStatus::Warning => format!(
            "Voltage drop of {}% is at the {}% branch circuit limit",
            shown, BRANCH_LIMIT_PERCENT
        ),
        VoltageDropStatus::Error => format!(
            "Voltage drop of {}% exceeds the {}% branch circuit limit",
            shown, BRANCH_LIMIT_PERCENT
        ),
        VoltageDropStatus::ExceedLimit => format!(
            "Voltage drop of {}% exceeds the {}% combined feeder and branch limit",
            shown, TOTAL_LIMIT_PERCENT
        ),
    };
    let code_reference = match (standard, status) {
        (Standard::Iec, _) => IEC_REFERENCE,
        (Standard::Nec, VoltageDropStatus::ExceedLimit) => NEC_TOTAL_REFERENCE,
        (Standard::Nec, _) => NEC_BRANCH_REFERENCE,
    };

    ComplianceAssessment {
        status,
        message,
        code_reference: code_reference.to_owned(),
        compliance_percentage: (HUNDRED - percent * dec!(20)).max(Decimal::ZERO),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CostImpact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstallationDifficulty {
    Easy,
    Moderate,
    Difficult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CableRecommendation {
    pub sufficient: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_size: Option<ConductorSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_drop_percent: Option<Decimal>,
    pub size_steps: usize,
    pub cost_impact: CostImpact,
    pub installation_difficulty: InstallationDifficulty,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoltageDropAnalysis {
    pub voltage_drop_percent: Decimal,
    pub voltage_drop_volts: Decimal,
    pub voltage_at_load: Decimal,
    pub power_loss_watts: Decimal,
    pub status: VoltageDropStatus,
    pub compliance: ComplianceAssessment,
    pub conductor_size: ConductorSize,
    pub conductor_material: ConductorMaterial,
    /// Resistance at 75 °C in the table's unit (Ω/km or Ω/1000 ft).
    pub reference_resistance: Decimal,
    pub temp_adjusted_resistance: Decimal,
    pub resistance_unit: String,
    pub conductor_temperature_c: Decimal,
    /// Run length converted to the resistance table's length unit.
    pub table_distance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_cable_size: Option<CableRecommendation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoltageDropOutcome {
    pub analysis: VoltageDropAnalysis,
    pub alerts: Vec<CalculationAlert>,
}

pub fn temperature_coefficient(material: ConductorMaterial) -> Decimal {
    match material {
        ConductorMaterial::Copper => ALPHA_COPPER,
        ConductorMaterial::Aluminum => ALPHA_ALUMINUM,
    }
}

/// `R_ref × (1 + α (T − 75))`.
pub fn temperature_adjusted_resistance(
    reference: Decimal,
    material: ConductorMaterial,
    temperature_c: Decimal,
) -> Decimal {
    reference * (Decimal::ONE + temperature_coefficient(material) * (temperature_c - REFERENCE_TEMPERATURE_C))
}

fn table_distance(distance: Decimal, unit_system: UnitSystem, table: &ConductorTable) -> Decimal {
    match (table.length_basis, unit_system) {
        (LengthBasis::PerThousandFeet, UnitSystem::Metric) => distance * FEET_PER_METRE,
        (LengthBasis::PerKilometre, UnitSystem::Imperial) => distance * METRES_PER_FOOT,
        _ => distance,
    }
}

fn drop_volts(input: &VoltageDropInput, distance: Decimal, resistance: Decimal) -> Decimal {
    let multiplier = match input.phase {
        Phase::Single => dec!(2),
        Phase::Three => SQRT_3,
    };
    multiplier * distance * input.current_amps * resistance / ONE_THOUSAND * input.power_factor
}

fn drop_percent(input: &VoltageDropInput, volts: Decimal) -> Decimal {
    volts / input.voltage * HUNDRED
}

pub fn analyze_voltage_drop(input: &VoltageDropInput) -> Result<VoltageDropOutcome, VoltageDropError> {
    if input.distance <= Decimal::ZERO {
        return Err(VoltageDropError::NonPositiveDistance(input.distance));
    }

    let table = conductor_table(input.standard);
    let index = select_conductor(input, table)?;
    let row = &table.rows[index];
    let reference = row
        .resistance(input.material)
        .ok_or_else(|| unsupported(input, &row.size()))?;

    let distance = table_distance(input.distance, input.unit_system, table);
    let volts = drop_volts(input, distance, reference);
    let percent = drop_percent(input, volts);
    let compliance = assess_compliance(percent, input.standard);

    let mut alerts = Vec::new();
    let severity_alert = match compliance.status {
        VoltageDropStatus::Warning => Some(CalculationAlert::warning(
            Severity::Minor,
            "VOLTAGE_DROP_AT_LIMIT",
            compliance.message.clone(),
        )),
        VoltageDropStatus::Error => Some(CalculationAlert::error(
            Severity::Major,
            "VOLTAGE_DROP_EXCEEDS_BRANCH_LIMIT",
            compliance.message.clone(),
        )),
        VoltageDropStatus::ExceedLimit => Some(CalculationAlert::error(
            Severity::Critical,
            "VOLTAGE_DROP_EXCEEDS_TOTAL_LIMIT",
            compliance.message.clone(),
        )),
        _ => None,
    };
    if let Some(alert) = severity_alert {
        alerts.push(alert.with_code_reference(compliance.code_reference.clone()));
    }

    let recommended_cable_size = if percent > input.upsize_limit_percent {
        let recommendation = recommend_cable_upsize(input, table, index, distance);
        alerts.push(if recommendation.sufficient {
            CalculationAlert::info("CABLE_UPSIZE_RECOMMENDED", recommendation.reason.clone())
                .with_code_reference(compliance.code_reference.clone())
        } else {
            CalculationAlert::warning(
                Severity::Major,
                "NO_CABLE_SIZE_SUFFICIENT",
                recommendation.reason.clone(),
            )
        });
        Some(recommendation)
    } else {
        None
    };

    let analysis = VoltageDropAnalysis {
        voltage_drop_percent: percent,
        voltage_drop_volts: volts,
        voltage_at_load: input.voltage - volts,
        power_loss_watts: volts * input.current_amps,
        status: compliance.status,
        compliance,
        conductor_size: row.size(),
        conductor_material: input.material,
        reference_resistance: reference,
        temp_adjusted_resistance: temperature_adjusted_resistance(reference, input.material, input.temperature_c),
        resistance_unit: match table.length_basis {
            LengthBasis::PerKilometre => "Ω/km".to_owned(),
            LengthBasis::PerThousandFeet => "Ω/1000 ft".to_owned(),
        },
        conductor_temperature_c: input.temperature_c,
        table_distance: distance,
        recommended_cable_size,
    };

    Ok(VoltageDropOutcome { analysis, alerts })
}

fn unsupported(input: &VoltageDropInput, size: &ConductorSize) -> VoltageDropError {
    VoltageDropError::UnsupportedSize {
        standard: input.standard,
        material: input.material,
        size: size.to_string(),
    }
}

fn select_conductor(input: &VoltageDropInput, table: &ConductorTable) -> Result<usize, VoltageDropError> {
    match &input.conductor_size {
        Some(size) => table.position(size).ok_or_else(|| unsupported(input, size)),
        None => table
            .rows
            .iter()
            .position(|row| {
                table
                    .ampacity(&row.size(), input.material, input.insulation_rating)
                    .is_some_and(|ampacity| ampacity >= input.current_amps)
            })
            .ok_or(VoltageDropError::NoConductorForCurrent {
                standard: input.standard,
                material: input.material,
                current: input.current_amps,
            }),
    }
}

/// Walk the ascending size table above `current_index` for the first conductor
/// that brings the drop within the configured limit.
pub fn recommend_cable_upsize(
    input: &VoltageDropInput,
    table: &ConductorTable,
    current_index: usize,
    distance: Decimal,
) -> CableRecommendation {
    let limit = input.upsize_limit_percent;
    let candidate = table
        .rows
        .iter()
        .enumerate()
        .skip(current_index + 1)
        .filter_map(|(index, row)| {
            let resistance = row.resistance(input.material)?;
            let percent = drop_percent(input, drop_volts(input, distance, resistance));
            Some((index, row, percent))
        })
        .find(|(_, _, percent)| *percent <= limit);

    match candidate {
        Some((index, row, percent)) => {
            let size_steps = index - current_index;
            CableRecommendation {
                sufficient: true,
                recommended_size: Some(row.size()),
                voltage_drop_percent: Some(percent),
                size_steps,
                cost_impact: cost_impact(size_steps),
                installation_difficulty: installation_difficulty(row),
                reason: format!(
                    "Upsizing to {} reduces the voltage drop to {}%",
                    row.size(),
                    display(percent, 2)
                ),
            }
        }
        None => CableRecommendation {
            sufficient: false,
            recommended_size: None,
            voltage_drop_percent: None,
            size_steps: 0,
            cost_impact: CostImpact::High,
            installation_difficulty: InstallationDifficulty::Difficult,
            reason: format!(
                "No listed {} conductor keeps the voltage drop within {}%; consider parallel runs or a higher supply voltage",
                input.material, limit
            ),
        },
    }
}

fn cost_impact(size_steps: usize) -> CostImpact {
    match size_steps {
        0..=2 => CostImpact::Low,
        3..=4 => CostImpact::Medium,
        _ => CostImpact::High,
    }
}

fn installation_difficulty(row: &ConductorRow) -> InstallationDifficulty {
    if row.area_mm2 <= dec!(25) {
        InstallationDifficulty::Easy
    } else if row.area_mm2 <= dec!(70) {
        InstallationDifficulty::Moderate
    } else {
        InstallationDifficulty::Difficult
    }
}
