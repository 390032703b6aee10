//! ---
//! cbs_section: "01-core-functionality"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Shared configuration and tracing primitives."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Shared primitives for the CBS workspace: TOML configuration loading and
//! tracing subscriber setup consumed by the engine and the CLI.

pub mod config;
pub mod logging;

pub use config::{AppConfig, EngineConfig, LoadedAppConfig, LoggingConfig};
pub use logging::{init_tracing, LogFormat};
