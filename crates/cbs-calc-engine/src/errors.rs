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
use thiserror::Error;

use crate::{
    derating::DeratingError,
    load_current::LoadCurrentError,
    model::{ConductorMaterial, Standard},
    results::CalculationAlert,
    voltage_drop::VoltageDropError,
};

pub type Result<T> = std::result::Result<T, CalcEngineError>;

#[derive(Debug, Error)]
pub enum CalcEngineError {
    #[error("invalid calculation input: {}", violations.join("; "))]
    InvalidInput { violations: Vec<String> },
    #[error("minimum breaker size {minimum_amps} A exceeds the largest standard rating of {largest_rating_amps} A")]
    CapacityExceeded {
        minimum_amps: Decimal,
        largest_rating_amps: u32,
        /// Alerts accumulated up to and including the fatal one.
        alerts: Vec<CalculationAlert>,
    },
    #[error("conductor size {size} is not listed for {material} under {standard}")]
    UnsupportedSize {
        standard: Standard,
        material: ConductorMaterial,
        size: String,
    },
    #[error(transparent)]
    LoadCurrent(#[from] LoadCurrentError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("yaml serialization error: {0}")]
    YamlSerializationFailed(#[from] serde_yaml::Error),
}

impl CalcEngineError {
    /// Whether the error stems from the caller's input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcEngineError::InvalidInput { .. }
                | CalcEngineError::CapacityExceeded { .. }
                | CalcEngineError::UnsupportedSize { .. }
                | CalcEngineError::LoadCurrent(_)
        )
    }
}

impl From<VoltageDropError> for CalcEngineError {
    fn from(err: VoltageDropError) -> Self {
        match err {
            VoltageDropError::UnsupportedSize {
                standard,
                material,
                size,
            } => CalcEngineError::UnsupportedSize {
                standard,
                material,
                size,
            },
            other => CalcEngineError::InvalidInput {
                violations: vec![other.to_string()],
            },
        }
    }
}

impl From<DeratingError> for CalcEngineError {
    fn from(err: DeratingError) -> Self {
        match err {
            DeratingError::UnsupportedSize {
                standard,
                material,
                size,
            } => CalcEngineError::UnsupportedSize {
                standard,
                material,
                size,
            },
            other => CalcEngineError::InvalidInput {
                violations: vec![other.to_string()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_size_errors_map_to_unsupported_size() {
        let err = CalcEngineError::from(VoltageDropError::UnsupportedSize {
            standard: Standard::Iec,
            material: ConductorMaterial::Copper,
            size: "7 mm²".to_owned(),
        });
        assert!(matches!(err, CalcEngineError::UnsupportedSize { .. }));
        assert!(err.is_input_error());
        assert_eq!(
            err.to_string(),
            "conductor size 7 mm² is not listed for copper under IEC"
        );

        let err = CalcEngineError::from(DeratingError::InvalidConductorCount);
        assert!(matches!(err, CalcEngineError::InvalidInput { .. }));
    }
}
