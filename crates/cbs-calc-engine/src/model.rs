//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Regulatory framework the circuit is sized under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Standard {
    #[serde(rename = "NEC", alias = "nec")]
    Nec,
    #[serde(rename = "IEC", alias = "iec")]
    Iec,
}

impl Standard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::Nec => "NEC",
            Standard::Iec => "IEC",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Standard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nec" => Ok(Standard::Nec),
            "iec" => Ok(Standard::Iec),
            other => Err(format!("unknown standard: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Single,
    Three,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    Kw,
    Amps,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConductorMaterial {
    Copper,
    #[serde(alias = "aluminium")]
    Aluminum,
}

impl ConductorMaterial {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "copper",
            ConductorMaterial::Aluminum => "aluminum",
        }
    }
}

impl fmt::Display for ConductorMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InstallationMethod {
    Conduit,
    CableTray,
    FreeAir,
    DirectBurial,
    Surface,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    Awg,
    Kcmil,
    Mm2,
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeUnit::Awg => "AWG",
            SizeUnit::Kcmil => "kcmil",
            SizeUnit::Mm2 => "mm²",
        })
    }
}

/// Conductor size as written on the drawing, e.g. `10 mm2`, `1/0 AWG`, `250 kcmil`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConductorSize {
    #[serde(deserialize_with = "deserialize_size_label")]
    pub value: String,
    pub unit: SizeUnit,
}

impl ConductorSize {
    pub fn new(value: impl Into<String>, unit: SizeUnit) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }

    pub fn mm2(value: &str) -> Self {
        Self::new(value, SizeUnit::Mm2)
    }

    pub fn awg(value: &str) -> Self {
        Self::new(value, SizeUnit::Awg)
    }
}

impl fmt::Display for ConductorSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Accepts `"1/0"`, `"2.5"`, `2.5` or `10` and normalises to the table label.
fn deserialize_size_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct LabelVisitor;

    impl serde::de::Visitor<'_> for LabelVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a conductor size as number or string")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.trim().to_owned())
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(LabelVisitor)
}

/// Electrical load character used for trip-curve selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadType {
    Resistive,
    Inductive,
    #[default]
    Mixed,
    Capacitive,
}

impl std::str::FromStr for LoadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "resistive" => Ok(LoadType::Resistive),
            "inductive" => Ok(LoadType::Inductive),
            "mixed" => Ok(LoadType::Mixed),
            "capacitive" => Ok(LoadType::Capacitive),
            other => Err(format!("unknown load type: {}", other)),
        }
    }
}

/// Operating duty that selects the continuous-load multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadDuty {
    #[default]
    Continuous,
    Intermittent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CircuitConfiguration {
    pub standard: Standard,
    pub voltage: Decimal,
    pub phase: Phase,
    pub load_mode: LoadMode,
    pub load_value: Decimal,
    pub power_factor: Decimal,
    #[serde(default)]
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_temperature: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped_cables: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_method: Option<InstallationMethod>,
    /// Metres for metric circuits, feet for imperial ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_distance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_material: Option<ConductorMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_size: Option<ConductorSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation_rating: Option<u16>,
}

impl EnvironmentalConditions {
    pub fn wants_derating(&self) -> bool {
        self.ambient_temperature.is_some() || self.grouped_cables.is_some()
    }

    pub fn wants_voltage_drop(&self) -> bool {
        self.circuit_distance.is_some() && self.conductor_material.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakerCalculationInput {
    pub circuit: CircuitConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentalConditions>,
    #[serde(
        default,
        rename = "shortCircuitCurrentKA",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_circuit_current_ka: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_type: Option<LoadType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duty: Option<LoadDuty>,
    /// Breaking capacity of an explicitly chosen breaker.
    #[serde(
        default,
        rename = "breakingCapacityKA",
        skip_serializing_if = "Option::is_none"
    )]
    pub breaking_capacity_ka: Option<Decimal>,
    /// Free-form circuit label carried into log events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BreakerCalculationInput {
    pub fn new(circuit: CircuitConfiguration) -> Self {
        Self {
            circuit,
            environment: None,
            short_circuit_current_ka: None,
            load_type: None,
            load_duty: None,
            breaking_capacity_ka: None,
            label: None,
        }
    }

    pub fn with_environment(mut self, environment: EnvironmentalConditions) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_short_circuit_current_ka(mut self, fault_ka: Decimal) -> Self {
        self.short_circuit_current_ka = Some(fault_ka);
        self
    }

    pub fn with_load_type(mut self, load_type: LoadType) -> Self {
        self.load_type = Some(load_type);
        self
    }

    pub fn with_load_duty(mut self, duty: LoadDuty) -> Self {
        self.load_duty = Some(duty);
        self
    }

    pub fn with_breaking_capacity_ka(mut self, capacity_ka: Decimal) -> Self {
        self.breaking_capacity_ka = Some(capacity_ka);
        self
    }
}
