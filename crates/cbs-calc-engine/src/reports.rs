//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{errors::Result, results::CalculationResults};

pub const BREAKER_SIZING_REPORT: &str = "breaker_sizing.json";

#[derive(Debug)]
pub struct ReportExporter<'a> {
    results: &'a CalculationResults,
}

impl<'a> ReportExporter<'a> {
    pub fn new(results: &'a CalculationResults) -> Self {
        Self { results }
    }

    /// Write the report into `output_dir`, creating it if needed, and return the file path.
    pub fn export_all(&self, output_dir: &Path) -> Result<PathBuf> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let timestamp = self.results.calculated_at.to_rfc3339();
        let envelope = ReportEnvelope {
            timestamp: &timestamp,
            calculation_version: &self.results.calculation_version,
            schema: breaker_sizing_schema(),
            data: self.results,
        };

        let path = output_dir.join(BREAKER_SIZING_REPORT);
        write_json(&path, &envelope)?;
        info!("Breaker sizing report exported to {}", path.display());
        Ok(path)
    }

    /// Serialize the results alone as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self.results)?)
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    timestamp: &'a str,
    calculation_version: &'a str,
    schema: serde_json::Value,
    data: &'a T,
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn breaker_sizing_schema() -> serde_json::Value {
    let alert = json!({
        "type": "object",
        "properties": {
            "type": {"enum": ["info", "warning", "error"]},
            "code": {"type": "string"},
            "message": {"type": "string"},
            "severity": {"enum": ["minor", "major", "critical"]},
            "codeReference": {"type": "string"}
        },
        "required": ["type", "code", "message", "severity"]
    });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "CalculationResults",
        "type": "object",
        "properties": {
            "standard": {"enum": ["NEC", "IEC"]},
            "loadAnalysis": {
                "type": "object",
                "properties": {
                    "calculatedCurrentAmps": {"type": "number", "exclusiveMinimum": 0},
                    "formula": {"type": "string"},
                    "components": {"type": "object"},
                    "realPowerKw": {"type": "number"},
                    "apparentPowerKva": {"type": "number"}
                },
                "required": ["calculatedCurrentAmps", "formula", "components"]
            },
            "breakerSizing": {
                "type": "object",
                "properties": {
                    "safetyFactor": {"type": "object"},
                    "sizingBasisAmps": {"type": "number"},
                    "deratingApplied": {"type": "boolean"},
                    "recommendedRatingAmps": {"type": "integer"},
                    "breaker": {
                        "type": "object",
                        "properties": {
                            "ratingAmps": {"type": "integer"},
                            "breakingCapacityKA": {"type": "number"},
                            "trip": {
                                "type": "object",
                                "properties": {
                                    "kind": {"enum": ["trip-curve", "trip-type"]},
                                    "type": {"type": "string"}
                                },
                                "required": ["kind", "type"]
                            },
                            "isSafe": {"type": "boolean"},
                            "warnings": {"type": "array", "items": {"type": "string"}}
                        },
                        "required": ["ratingAmps", "breakingCapacityKA", "trip", "isSafe", "warnings"]
                    }
                },
                "required": ["safetyFactor", "recommendedRatingAmps", "breaker"]
            },
            "recommendations": {"type": "object"},
            "calculatedAt": {"type": "string", "format": "date-time"},
            "calculationVersion": {"type": "string"},
            "alerts": {"type": "array", "items": alert},
            "voltageDropAnalysis": {"type": "object"},
            "deratingFactors": {"type": "object"}
        },
        "required": [
            "standard",
            "loadAnalysis",
            "breakerSizing",
            "recommendations",
            "calculatedAt",
            "calculationVersion",
            "alerts"
        ]
    })
}
