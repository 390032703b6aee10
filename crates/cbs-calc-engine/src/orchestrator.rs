//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Sequential breaker sizing pipeline.
//!
//! Validation, load current, safety factor and the standard rating lookup are
//! fatal on failure. Derating and voltage drop are optional: their errors drop
//! the corresponding section and the calculation carries on.

use cbs_common::EngineConfig;
use cbs_logging::{cbs_debug, cbs_info, cbs_warn, log_stage_event, LogContext, StageOutcome};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    cache::CalculationCache,
    derating::{calculate_derating_factors, DeratingError, DeratingFactorsResult, DeratingInput},
    errors::{CalcEngineError, Result},
    load_current::{calculate_load_current, LoadCurrentInput},
    model::{BreakerCalculationInput, ConductorMaterial, LoadMode},
    numeric::{display, HUNDRED},
    results::{
        AlertLog, BreakerSizing, BreakerSpecification, CalculationAlert, CalculationResults,
        LoadAnalysis, Recommendations, Severity,
    },
    safety_factor::{apply_safety_factor, FactorType},
    tables::{
        derating::default_insulation_rating, largest_standard_rating, recommend_breaking_capacity,
        recommend_standard_breaker, recommend_trip_curve,
    },
    validation::validate_input_with,
    voltage_drop::{analyze_voltage_drop, VoltageDropAnalysis, VoltageDropInput},
};

pub const STAGE_VALIDATE: &str = "validate";
pub const STAGE_LOAD_CURRENT: &str = "load-current";
pub const STAGE_SAFETY_FACTOR: &str = "safety-factor";
pub const STAGE_DERATING: &str = "derating";
pub const STAGE_BREAKER_LOOKUP: &str = "breaker-lookup";
pub const STAGE_SHORT_CIRCUIT: &str = "short-circuit";
pub const STAGE_VOLTAGE_DROP: &str = "voltage-drop";

/// Runs the breaker sizing pipeline with a fixed engine configuration.
#[derive(Debug, Clone, Default)]
pub struct BreakerCalculator {
    config: EngineConfig,
}

impl BreakerCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculate(&self, input: &BreakerCalculationInput) -> Result<CalculationResults> {
        self.calculate_at(input, Utc::now())
    }

    /// Look the input up in `cache` first; successful results are stored for reuse.
    pub fn calculate_cached(
        &self,
        cache: &mut CalculationCache,
        input: &BreakerCalculationInput,
    ) -> Result<CalculationResults> {
        let key = cache.key_for(input, &self.config)?;
        if let Some(hit) = cache.get(&key) {
            cbs_debug!("cache hit for {}", key);
            return Ok(hit.clone());
        }
        let results = self.calculate(input)?;
        cache.insert(key, results.clone());
        Ok(results)
    }

    /// Same as [`calculate`](Self::calculate) with a caller supplied timestamp.
    pub fn calculate_at(
        &self,
        input: &BreakerCalculationInput,
        calculated_at: DateTime<Utc>,
    ) -> Result<CalculationResults> {
        let circuit = &input.circuit;
        let standard = circuit.standard;
        let label = input.label.as_deref().unwrap_or("unnamed");
        let base = LogContext::new()
            .with_calculation(label)
            .with_standard(standard.as_str());

        let ctx = base.clone().with_stage(STAGE_VALIDATE);
        if let Err(err) = validate_input_with(input, &self.config) {
            log_stage_event(Some(&ctx), "validation_failed", &err.to_string(), StageOutcome::Fatal);
            return Err(err);
        }

        let mut alerts = AlertLog::new();

        let ctx = base.clone().with_stage(STAGE_LOAD_CURRENT);
        let load_input = match circuit.load_mode {
            LoadMode::Kw => {
                LoadCurrentInput::from_power(circuit.load_value, circuit.voltage, circuit.phase, circuit.power_factor)
            }
            LoadMode::Amps => LoadCurrentInput::from_current(circuit.load_value, circuit.voltage, circuit.phase)
                .with_power_factor(circuit.power_factor),
        };
        let load = calculate_load_current(&load_input).map_err(|err| {
            log_stage_event(Some(&ctx), "load_current_failed", &err.to_string(), StageOutcome::Fatal);
            CalcEngineError::from(err)
        })?;
        cbs_debug!(context = ctx, "load current {} A ({})", display(load.current_amps, 3), load.formula);
        let load_analysis = LoadAnalysis {
            calculated_current_amps: load.current_amps,
            formula: load.formula.to_owned(),
            components: load.components,
            load_mode: circuit.load_mode,
            phase: circuit.phase,
            real_power_kw: load.real_power_kw,
            apparent_power_kva: load.apparent_power_kva,
        };

        let ctx = base.clone().with_stage(STAGE_SAFETY_FACTOR);
        let safety_factor = apply_safety_factor(
            load_analysis.calculated_current_amps,
            standard,
            input.load_duty.unwrap_or_default(),
        );
        if safety_factor.factor_type == FactorType::ContinuousLoad && safety_factor.safety_factor > Decimal::ONE {
            alerts.push(
                CalculationAlert::info(
                    "CONTINUOUS_LOAD_FACTOR",
                    format!(
                        "Continuous load sized at {}%: minimum breaker {} A",
                        display(safety_factor.safety_factor * HUNDRED, 0),
                        display(safety_factor.minimum_breaker_size_amps, 2)
                    ),
                )
                .with_code_reference(safety_factor.code_reference.clone()),
            );
        }
        cbs_debug!(
            context = ctx,
            "minimum breaker size {} A (factor {})",
            display(safety_factor.minimum_breaker_size_amps, 3),
            safety_factor.safety_factor
        );

        let derating_factors = self.run_derating(
            input,
            &load_analysis,
            safety_factor.minimum_breaker_size_amps,
            &mut alerts,
            &base,
        );
        let sizing_basis_amps = derating_factors
            .as_ref()
            .map(|factors| factors.adjusted_breaker_size_amps)
            .unwrap_or(safety_factor.minimum_breaker_size_amps);

        let ctx = base.clone().with_stage(STAGE_BREAKER_LOOKUP);
        let rating_amps = match recommend_standard_breaker(sizing_basis_amps, standard) {
            Some(rating) => rating,
            None => {
                let largest_rating_amps = largest_standard_rating(standard);
                alerts.push(CalculationAlert::error(
                    Severity::Critical,
                    "BREAKER_CAPACITY_EXCEEDED",
                    format!(
                        "Required breaker size {} A exceeds the largest {} standard rating of {} A",
                        display(sizing_basis_amps, 2),
                        standard,
                        largest_rating_amps
                    ),
                ));
                let err = CalcEngineError::CapacityExceeded {
                    minimum_amps: sizing_basis_amps,
                    largest_rating_amps,
                    alerts: alerts.into_vec(),
                };
                log_stage_event(Some(&ctx), "capacity_exceeded", &err.to_string(), StageOutcome::Fatal);
                return Err(err);
            }
        };

        let trip_curve = recommend_trip_curve(input.load_type.unwrap_or_default(), standard);
        let mut breaker = BreakerSpecification {
            rating_amps,
            breaking_capacity_ka: input
                .breaking_capacity_ka
                .unwrap_or(self.config.default_breaking_capacity_ka),
            trip: trip_curve.recommendation,
            is_safe: true,
            warnings: Vec::new(),
        };
        cbs_info!(context = ctx, "selected {} A breaker, {}", rating_amps, breaker.trip);

        let ctx = base.clone().with_stage(STAGE_SHORT_CIRCUIT);
        let mut recommended_breaking_capacity_ka = None;
        match input.short_circuit_current_ka {
            Some(fault_ka) if fault_ka > breaker.breaking_capacity_ka => {
                breaker.is_safe = false;
                recommended_breaking_capacity_ka = recommend_breaking_capacity(fault_ka, standard);
                let remedy = match recommended_breaking_capacity_ka {
                    Some(capacity) => format!("select a breaker rated at least {} kA", capacity),
                    None => "no standard breaking capacity covers this fault level".to_owned(),
                };
                let message = format!(
                    "Prospective fault current {} kA exceeds the breaking capacity of {} kA; {}",
                    display(fault_ka, 2),
                    display(breaker.breaking_capacity_ka, 2),
                    remedy
                );
                cbs_warn!(context = ctx, "{}", message);
                breaker.warnings.push(message.clone());
                alerts.push(CalculationAlert::error(
                    Severity::Major,
                    "INSUFFICIENT_BREAKING_CAPACITY",
                    message,
                ));
            }
            Some(_) => {}
            None => alerts.push(CalculationAlert::info(
                "BREAKING_CAPACITY_UNVERIFIED",
                format!(
                    "No fault current supplied; the {} kA breaking capacity has not been verified",
                    display(breaker.breaking_capacity_ka, 2)
                ),
            )),
        }

        let mut notes = trip_curve.notes.clone();
        if let Some(factors) = &derating_factors {
            if factors.combined_factor < Decimal::ONE {
                notes.push(format!(
                    "Breaker sized on the derated minimum of {} A (combined factor {})",
                    display(factors.adjusted_breaker_size_amps, 2),
                    display(factors.combined_factor, 3)
                ));
            }
        }
        if let Some(capacity) = recommended_breaking_capacity_ka {
            notes.push(format!("Specify a breaking capacity of at least {} kA", capacity));
        }
        let recommendations = Recommendations {
            breaker_rating_amps: rating_amps,
            trip_curve,
            breaking_capacity_ka: breaker.breaking_capacity_ka,
            recommended_breaking_capacity_ka,
            notes,
        };

        let voltage_drop_analysis = self.run_voltage_drop(input, &load_analysis, &mut alerts, &base);

        Ok(CalculationResults {
            standard,
            load_analysis,
            breaker_sizing: BreakerSizing {
                safety_factor,
                sizing_basis_amps,
                derating_applied: derating_factors.is_some(),
                recommended_rating_amps: rating_amps,
                breaker,
            },
            recommendations,
            calculated_at,
            calculation_version: self.config.calculation_version.clone(),
            alerts: alerts.into_vec(),
            voltage_drop_analysis,
            derating_factors,
        })
    }

    fn run_derating(
        &self,
        input: &BreakerCalculationInput,
        load: &LoadAnalysis,
        minimum_breaker_size_amps: Decimal,
        alerts: &mut AlertLog,
        base: &LogContext<'_>,
    ) -> Option<DeratingFactorsResult> {
        let environment = input.environment.as_ref().filter(|env| env.wants_derating())?;
        let ctx = base.clone().with_stage(STAGE_DERATING);
        let standard = input.circuit.standard;

        let mut stage_input = DeratingInput::new(standard, load.calculated_current_amps, minimum_breaker_size_amps);
        if let Some(ambient) = environment.ambient_temperature {
            stage_input.ambient_temperature_c = ambient;
        }
        if let Some(conductors) = environment.grouped_cables {
            stage_input.conductors = conductors;
        }
        stage_input.insulation_rating = environment
            .insulation_rating
            .unwrap_or_else(|| default_insulation_rating(standard));
        stage_input.installation_method = environment.installation_method;
        stage_input.conductor = environment.conductor_size.clone().map(|size| {
            (
                size,
                environment.conductor_material.unwrap_or(ConductorMaterial::Copper),
            )
        });

        match calculate_derating_factors(&stage_input) {
            Ok(outcome) => {
                alerts.extend(outcome.alerts);
                log_stage_event(
                    Some(&ctx),
                    "derating_applied",
                    &format!("combined factor {}", outcome.factors.combined_factor),
                    StageOutcome::Completed,
                );
                Some(outcome.factors)
            }
            Err(DeratingError::ZeroCombinedFactor { alerts: stage_alerts, .. }) => {
                alerts.extend(stage_alerts);
                alerts.push(CalculationAlert::error(
                    Severity::Critical,
                    "DERATING_NOT_APPLIED",
                    "Combined derating factor is zero; the breaker is sized on the undiminished minimum and the cable must be re-specified",
                ));
                log_stage_event(
                    Some(&ctx),
                    "derating_skipped",
                    "combined derating factor is zero",
                    StageOutcome::Skipped,
                );
                None
            }
            Err(err) => {
                let err = CalcEngineError::from(err);
                log_stage_event(Some(&ctx), "derating_skipped", &err.to_string(), StageOutcome::Skipped);
                None
            }
        }
    }

    fn run_voltage_drop(
        &self,
        input: &BreakerCalculationInput,
        load: &LoadAnalysis,
        alerts: &mut AlertLog,
        base: &LogContext<'_>,
    ) -> Option<VoltageDropAnalysis> {
        let environment = input.environment.as_ref().filter(|env| env.wants_voltage_drop())?;
        let (distance, material) = environment.circuit_distance.zip(environment.conductor_material)?;
        let ctx = base.clone().with_stage(STAGE_VOLTAGE_DROP);
        let circuit = &input.circuit;

        let stage_input = VoltageDropInput {
            standard: circuit.standard,
            current_amps: load.calculated_current_amps,
            voltage: circuit.voltage,
            phase: circuit.phase,
            power_factor: circuit.power_factor,
            distance,
            unit_system: circuit.unit_system,
            material,
            conductor_size: environment.conductor_size.clone(),
            insulation_rating: environment
                .insulation_rating
                .unwrap_or_else(|| default_insulation_rating(circuit.standard)),
            temperature_c: self.config.voltage_drop_temperature_c,
            upsize_limit_percent: self.config.upsize_limit_percent,
        };

        match analyze_voltage_drop(&stage_input) {
            Ok(outcome) => {
                alerts.extend(outcome.alerts);
                log_stage_event(
                    Some(&ctx),
                    "voltage_drop_analyzed",
                    &format!(
                        "{}% ({})",
                        display(outcome.analysis.voltage_drop_percent, 3),
                        outcome.analysis.status
                    ),
                    StageOutcome::Completed,
                );
                Some(outcome.analysis)
            }
            Err(err) => {
                let err = CalcEngineError::from(err);
                log_stage_event(Some(&ctx), "voltage_drop_skipped", &err.to_string(), StageOutcome::Skipped);
                None
            }
        }
    }
}

/// Run one calculation with the default engine configuration.
pub fn calculate_breaker(input: &BreakerCalculationInput) -> Result<CalculationResults> {
    BreakerCalculator::default().calculate(input)
}
