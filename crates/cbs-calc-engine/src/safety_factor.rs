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

use crate::model::{LoadDuty, Standard};

pub const NEC_CONTINUOUS_FACTOR: Decimal = dec!(1.25);
pub const NEC_CONTINUOUS_REFERENCE: &str = "NEC 210.20(A)";
pub const IEC_COORDINATION_REFERENCE: &str = "IEC 60364-4-43 Clause 433.1";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FactorType {
    ContinuousLoad,
    CorrectionFactor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SafetyFactorResult {
    pub load_current_amps: Decimal,
    pub minimum_breaker_size_amps: Decimal,
    pub safety_factor: Decimal,
    pub factor_type: FactorType,
    pub code_reference: String,
    pub load_duty: LoadDuty,
}

/// Apply the standard's continuous-load multiplier to the load current.
///
/// NEC intermittent loads get a unity factor but keep the `continuous-load`
/// tag; IEC handles margins through the separate derating stage and always
/// uses unity here.
pub fn apply_safety_factor(load_current: Decimal, standard: Standard, duty: LoadDuty) -> SafetyFactorResult {
    let (safety_factor, factor_type, code_reference) = match (standard, duty) {
        (Standard::Nec, LoadDuty::Continuous) => (
            NEC_CONTINUOUS_FACTOR,
            FactorType::ContinuousLoad,
            NEC_CONTINUOUS_REFERENCE,
        ),
        (Standard::Nec, LoadDuty::Intermittent) => (
            Decimal::ONE,
            FactorType::ContinuousLoad,
            NEC_CONTINUOUS_REFERENCE,
        ),
        (Standard::Iec, _) => (
            Decimal::ONE,
            FactorType::CorrectionFactor,
            IEC_COORDINATION_REFERENCE,
        ),
    };

    SafetyFactorResult {
        load_current_amps: load_current,
        minimum_breaker_size_amps: load_current * safety_factor,
        safety_factor,
        factor_type,
        code_reference: code_reference.to_owned(),
        load_duty: duty,
    }
}
