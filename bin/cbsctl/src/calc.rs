//! ---
//! cbs_section: "05-external-interfaces"
//! cbs_subsection: "binary"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Command line front end for CBS breaker sizing calculations."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use cbs_calc_engine::{io::load_input_from_file, BreakerCalculator, CalcEngineError, CalculationResults};
use cbs_common::{init_tracing, AppConfig};
use clap::{Args, ValueEnum};
use cbs_logging::{log_stage_event, LogContext, StageOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct CalcCommand {
    /// Circuit description (JSON or YAML).
    #[arg(long, short, value_name = "FILE")]
    input: PathBuf,

    /// Also write `breaker_sizing.json` into this directory.
    #[arg(long, short, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Format of the results printed to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Configuration file; `CBS_CONFIG` and `configs/cbs.toml` are tried otherwise.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the rolling log file, overriding the configuration.
    #[arg(long = "log-dir", value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

pub fn run(command: CalcCommand) -> Result<()> {
    let mut config = load_config(&command)?;
    if let Some(dir) = &command.log_dir {
        config.logging.directory = dir.clone();
    }
    init_tracing("cbsctl", &config.logging)?;

    let input = load_input_from_file(&command.input)
        .with_context(|| format!("unable to read circuit description {}", command.input.display()))?;
    let label = input
        .label
        .clone()
        .unwrap_or_else(|| command.input.display().to_string());
    let ctx = LogContext::new().with_calculation(&label).with_stage("cli");

    let calculator = BreakerCalculator::new(config.engine);
    let results = match calculator.calculate(&input) {
        Ok(results) => results,
        Err(err) => {
            report_failure(&err);
            log_stage_event(Some(&ctx), "calculation_failed", &err.to_string(), StageOutcome::Fatal);
            return Err(err).context("breaker calculation failed");
        }
    };

    if let Some(dir) = &command.output {
        let path = results
            .exporter()
            .export_all(dir)
            .with_context(|| format!("unable to write report into {}", dir.display()))?;
        eprintln!("Report written to {}", path.display());
    }

    println!("{}", render(&results, command.format)?);
    log_stage_event(Some(&ctx), "calculation_completed", "results printed", StageOutcome::Completed);
    Ok(())
}

fn load_config(command: &CalcCommand) -> Result<AppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = &command.config {
        candidates.push(path.clone());
        return AppConfig::load(&candidates);
    }
    candidates.push(PathBuf::from("configs/cbs.toml"));
    AppConfig::load_or_default(&candidates)
}

fn render(results: &CalculationResults, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(results)?,
        OutputFormat::Yaml => serde_yaml::to_string(results)?,
    })
}

fn report_failure(err: &CalcEngineError) {
    match err {
        CalcEngineError::InvalidInput { violations } => {
            for violation in violations {
                eprintln!("  - {}", violation);
            }
        }
        CalcEngineError::CapacityExceeded { alerts, .. } => {
            for alert in alerts {
                eprintln!("  [{:?}/{:?}] {}: {}", alert.alert_type, alert.severity, alert.code, alert.message);
            }
        }
        _ => {}
    }
}
