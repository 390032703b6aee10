//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::{fs, path::Path};

use crate::{
    errors::{CalcEngineError, Result},
    model::BreakerCalculationInput,
};

/// Parse a calculation input from JSON or YAML, sniffed by the leading `{`.
pub fn load_input_from_str(data: &str) -> Result<BreakerCalculationInput> {
    let input = if data.trim_start().starts_with('{') {
        serde_json::from_str(data)?
    } else {
        serde_yaml::from_str(data).map_err(CalcEngineError::YamlSerializationFailed)?
    };
    Ok(input)
}

pub fn load_input_from_file(path: impl AsRef<Path>) -> Result<BreakerCalculationInput> {
    let data = fs::read_to_string(path)?;
    load_input_from_str(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LoadMode, Standard};
    use rust_decimal_macros::dec;

    #[test]
    fn yaml_input_is_accepted() {
        let input = load_input_from_str(
            "circuit:\n  standard: IEC\n  voltage: 400\n  phase: three\n  loadMode: kw\n  loadValue: 50\n  powerFactor: 0.9\nloadType: inductive\n",
        )
        .unwrap();
        assert_eq!(input.circuit.standard, Standard::Iec);
        assert_eq!(input.circuit.load_mode, LoadMode::Kw);
        assert_eq!(input.circuit.power_factor, dec!(0.9));
    }

    #[test]
    fn json_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circuit.json");
        fs::write(
            &path,
            r#"{"circuit":{"standard":"NEC","voltage":240,"phase":"single","loadMode":"amps","loadValue":32,"powerFactor":1}}"#,
        )
        .unwrap();
        let input = load_input_from_file(&path).unwrap();
        assert_eq!(input.circuit.load_value, dec!(32));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            load_input_from_str("{\"circuit\": 3}"),
            Err(CalcEngineError::SerializationFailed(_))
        ));
    }
}
