//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    derating::DeratingFactorsResult,
    load_current::LoadComponents,
    model::{LoadMode, Phase, Standard},
    safety_factor::SafetyFactorResult,
    tables::trip_curves::{TripCurveAdvice, TripSpecification},
    voltage_drop::VoltageDropAnalysis,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationAlert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_reference: Option<String>,
}

impl CalculationAlert {
    pub fn new(
        alert_type: AlertType,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            alert_type,
            code: code.into(),
            message: message.into(),
            severity,
            code_reference: None,
        }
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertType::Info, Severity::Minor, code, message)
    }

    pub fn warning(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertType::Warning, severity, code, message)
    }

    pub fn error(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertType::Error, severity, code, message)
    }

    pub fn with_code_reference(mut self, reference: impl Into<String>) -> Self {
        self.code_reference = Some(reference.into());
        self
    }
}

/// Append-only, stage-ordered alert list built up during one calculation.
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    entries: Vec<CalculationAlert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, alert: CalculationAlert) {
        self.entries.push(alert);
    }

    pub fn extend(&mut self, alerts: impl IntoIterator<Item = CalculationAlert>) {
        self.entries.extend(alerts);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[CalculationAlert] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<CalculationAlert> {
        self.entries
    }
}

/// Provenance record of the load current stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadAnalysis {
    pub calculated_current_amps: Decimal,
    pub formula: String,
    pub components: LoadComponents,
    pub load_mode: LoadMode,
    pub phase: Phase,
    pub real_power_kw: Decimal,
    pub apparent_power_kva: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakerSpecification {
    pub rating_amps: u32,
    #[serde(rename = "breakingCapacityKA")]
    pub breaking_capacity_ka: Decimal,
    pub trip: TripSpecification,
    pub is_safe: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakerSizing {
    pub safety_factor: SafetyFactorResult,
    /// Size fed to the rating lookup: the derated size when derating ran.
    pub sizing_basis_amps: Decimal,
    pub derating_applied: bool,
    pub recommended_rating_amps: u32,
    pub breaker: BreakerSpecification,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub breaker_rating_amps: u32,
    pub trip_curve: TripCurveAdvice,
    #[serde(rename = "breakingCapacityKA")]
    pub breaking_capacity_ka: Decimal,
    #[serde(
        default,
        rename = "recommendedBreakingCapacityKA",
        skip_serializing_if = "Option::is_none"
    )]
    pub recommended_breaking_capacity_ka: Option<Decimal>,
    pub notes: Vec<String>,
}

/// Aggregate root returned for every successful calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResults {
    pub standard: Standard,
    pub load_analysis: LoadAnalysis,
    pub breaker_sizing: BreakerSizing,
    pub recommendations: Recommendations,
    pub calculated_at: DateTime<Utc>,
    pub calculation_version: String,
    pub alerts: Vec<CalculationAlert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_drop_analysis: Option<VoltageDropAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derating_factors: Option<DeratingFactorsResult>,
}

impl CalculationResults {
    pub fn exporter(&self) -> crate::reports::ReportExporter<'_> {
        crate::reports::ReportExporter::new(self)
    }

    pub fn alerts_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a CalculationAlert> + 'a {
        self.alerts.iter().filter(move |alert| alert.code == code)
    }

    pub fn has_critical_alerts(&self) -> bool {
        self.alerts
            .iter()
            .any(|alert| alert.severity == Severity::Critical)
    }

    pub fn trip(&self) -> &TripSpecification {
        &self.breaker_sizing.breaker.trip
    }
}
