//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Breaker sizing for NEC and IEC circuits.
//!
//! [`BreakerCalculator`] runs the pipeline: validation, load current, safety
//! factor, optional derating, standard rating lookup, trip advice, the
//! short-circuit check and optional voltage drop analysis. The result is a
//! [`CalculationResults`] record carrying every alert raised along the way.

pub mod api;
pub mod cache;
pub mod derating;
pub mod errors;
pub mod io;
pub mod load_current;
pub mod model;
pub mod numeric;
pub mod orchestrator;
pub mod reports;
pub mod results;
pub mod safety_factor;
pub mod tables;
pub mod validation;
pub mod voltage_drop;

pub use cache::{cache_key, CalculationCache};
pub use errors::{CalcEngineError, Result};
pub use model::{
    BreakerCalculationInput, CircuitConfiguration, ConductorMaterial, ConductorSize,
    EnvironmentalConditions, InstallationMethod, LoadDuty, LoadMode, LoadType, Phase, SizeUnit,
    Standard, UnitSystem,
};
pub use orchestrator::{calculate_breaker, BreakerCalculator};
pub use results::{AlertType, CalculationAlert, CalculationResults, Severity};
pub use tables::{TripCurveAdvice, TripSpecification};
