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

use serde::{Deserialize, Serialize};

use crate::model::{LoadType, Standard};

/// IEC 60898 instantaneous trip curves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IecTripCurve {
    B,
    C,
    D,
}

/// NEC breaker trip unit families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NecTripType {
    ThermalMagnetic,
    HighMagnetic,
    Electronic,
}

/// Trip characteristic, resolved once per calculation from the standard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "type", rename_all = "kebab-case")]
pub enum TripSpecification {
    TripCurve(IecTripCurve),
    TripType(NecTripType),
}

impl fmt::Display for TripSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripSpecification::TripCurve(curve) => write!(f, "Type {:?}", curve),
            TripSpecification::TripType(NecTripType::ThermalMagnetic) => f.write_str("Thermal-magnetic"),
            TripSpecification::TripType(NecTripType::HighMagnetic) => {
                f.write_str("Thermal-magnetic, high magnetic pickup")
            }
            TripSpecification::TripType(NecTripType::Electronic) => f.write_str("Electronic trip (LSI)"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripCurveAdvice {
    pub recommendation: TripSpecification,
    pub display_name: String,
    pub rationale: String,
    pub inrush_capability: String,
    pub notes: Vec<String>,
}

pub fn recommend_trip_curve(load_type: LoadType, standard: Standard) -> TripCurveAdvice {
    let recommendation = match (standard, load_type) {
        (Standard::Iec, LoadType::Resistive) => TripSpecification::TripCurve(IecTripCurve::B),
        (Standard::Iec, LoadType::Mixed | LoadType::Capacitive) => {
            TripSpecification::TripCurve(IecTripCurve::C)
        }
        (Standard::Iec, LoadType::Inductive) => TripSpecification::TripCurve(IecTripCurve::D),
        (Standard::Nec, LoadType::Resistive | LoadType::Mixed) => {
            TripSpecification::TripType(NecTripType::ThermalMagnetic)
        }
        (Standard::Nec, LoadType::Inductive) => TripSpecification::TripType(NecTripType::HighMagnetic),
        (Standard::Nec, LoadType::Capacitive) => TripSpecification::TripType(NecTripType::Electronic),
    };

    let (rationale, inrush_capability) = match recommendation {
        TripSpecification::TripCurve(IecTripCurve::B) => (
            "Resistive loads draw little inrush, so the most sensitive curve gives the best cable protection",
            "Instantaneous trip at 3-5 × In",
        ),
        TripSpecification::TripCurve(IecTripCurve::C) => (
            "General purpose curve tolerating moderate inrush from mixed and capacitive loads",
            "Instantaneous trip at 5-10 × In",
        ),
        TripSpecification::TripCurve(IecTripCurve::D) => (
            "Motors and transformers draw high starting current that would nuisance-trip lower curves",
            "Instantaneous trip at 10-20 × In",
        ),
        TripSpecification::TripType(NecTripType::ThermalMagnetic) => (
            "Standard inverse-time breaker suited to resistive and general branch loads",
            "Magnetic pickup typically 5-10 × rating",
        ),
        TripSpecification::TripType(NecTripType::HighMagnetic) => (
            "Higher magnetic pickup rides through motor locked-rotor and transformer magnetising current",
            "Magnetic pickup typically 10-20 × rating",
        ),
        TripSpecification::TripType(NecTripType::Electronic) => (
            "Adjustable short-time settings accommodate capacitor bank switching transients",
            "Adjustable short-time pickup, typically 1.5-10 × rating",
        ),
    };

    let mut notes = Vec::new();
    match load_type {
        LoadType::Inductive => {
            notes.push("Confirm the motor starting current against the instantaneous trip band".to_owned());
            if standard == Standard::Nec {
                notes.push("NEC 430.52 permits higher settings for motor branch circuits".to_owned());
            }
        }
        LoadType::Capacitive => {
            notes.push("Capacitor switching inrush may require a derated or dedicated device".to_owned());
        }
        LoadType::Mixed => {
            notes.push("Review the dominant load type if nuisance tripping occurs".to_owned());
        }
        LoadType::Resistive => {}
    }

    TripCurveAdvice {
        recommendation,
        display_name: recommendation.to_string(),
        rationale: rationale.to_owned(),
        inrush_capability: inrush_capability.to_owned(),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iec_curves_follow_load_character() {
        assert_eq!(
            recommend_trip_curve(LoadType::Resistive, Standard::Iec).recommendation,
            TripSpecification::TripCurve(IecTripCurve::B)
        );
        assert_eq!(
            recommend_trip_curve(LoadType::Mixed, Standard::Iec).recommendation,
            TripSpecification::TripCurve(IecTripCurve::C)
        );
        let advice = recommend_trip_curve(LoadType::Inductive, Standard::Iec);
        assert_eq!(advice.recommendation, TripSpecification::TripCurve(IecTripCurve::D));
        assert_eq!(advice.display_name, "Type D");
    }

    #[test]
    fn nec_returns_trip_types_only() {
        for load in [
            LoadType::Resistive,
            LoadType::Inductive,
            LoadType::Mixed,
            LoadType::Capacitive,
        ] {
            let advice = recommend_trip_curve(load, Standard::Nec);
            assert!(matches!(advice.recommendation, TripSpecification::TripType(_)));
            assert!(!advice.rationale.is_empty());
        }
        let advice = recommend_trip_curve(LoadType::Inductive, Standard::Nec);
        assert_eq!(advice.notes.len(), 2);
    }

    #[test]
    fn trip_specification_serializes_as_tagged_union() {
        let value = serde_json::to_value(TripSpecification::TripCurve(IecTripCurve::C)).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "trip-curve", "type": "C"}));
        let value = serde_json::to_value(TripSpecification::TripType(NecTripType::ThermalMagnetic)).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "trip-type", "type": "thermal-magnetic"}));
    }
}
