//! ---
//! cbs_section: "03-logging"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Stage-tagged structured logging for breaker calculations."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

#[doc(hidden)]
pub use tracing;

/// Initialize a baseline tracing subscriber suitable for development.
///
/// Events go to stderr so command output on stdout stays machine readable.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Caller supplied label of the circuit being sized.
    pub calculation: Option<&'a str>,
    /// Pipeline stage emitting the event.
    pub stage: Option<&'a str>,
    /// Regulatory framework in effect (NEC or IEC).
    pub standard: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a circuit label.
    pub fn with_calculation(mut self, calculation: &'a str) -> Self {
        self.calculation = Some(calculation);
        self
    }

    /// Attach a pipeline stage name.
    pub fn with_stage(mut self, stage: &'a str) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Attach the standard identifier.
    pub fn with_standard(mut self, standard: &'a str) -> Self {
        self.standard = Some(standard);
        self
    }
}

/// Outcome recorded when a pipeline stage finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage produced its result.
    Completed,
    /// An optional stage failed and its section was dropped.
    Skipped,
    /// The stage aborted the calculation.
    Fatal,
}

impl StageOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            StageOutcome::Completed => "completed",
            StageOutcome::Skipped => "skipped",
            StageOutcome::Fatal => "fatal",
        }
    }

    fn level(&self) -> Level {
        match self {
            StageOutcome::Completed => Level::DEBUG,
            StageOutcome::Skipped => Level::WARN,
            StageOutcome::Fatal => Level::ERROR,
        }
    }
}

/// Emit a standardized stage event with its outcome.
pub fn log_stage_event(context: Option<&LogContext>, event: &str, message: &str, outcome: StageOutcome) {
    let ctx = context.cloned().unwrap_or_default();
    let outcome_str = outcome.as_str();
    let calculation = ctx.calculation.unwrap_or("");
    let stage = ctx.stage.unwrap_or("");
    let standard = ctx.standard.unwrap_or("");
    // `tracing::event!` needs a constant level, so dispatch per level.
    match outcome.level() {
        Level::ERROR => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome_str,
            calculation,
            stage,
            standard,
            message = %message
        ),
        Level::WARN => tracing::event!(
            Level::WARN,
            event,
            outcome = outcome_str,
            calculation,
            stage,
            standard,
            message = %message
        ),
        _ => tracing::event!(
            Level::DEBUG,
            event,
            outcome = outcome_str,
            calculation,
            stage,
            standard,
            message = %message
        ),
    }
}
