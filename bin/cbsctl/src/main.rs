//! ---
//! cbs_section: "05-external-interfaces"
//! cbs_subsection: "binary"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Command line front end for CBS breaker sizing calculations."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use anyhow::Result;
use clap::{Parser, Subcommand};
use cbs_logging as logging;

mod calc;
mod tables;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Circuit breaker sizing for NEC and IEC installations",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Size a breaker from a JSON or YAML circuit description.
    Calc(calc::CalcCommand),
    /// List the standard breaker ratings and breaking capacities.
    Ratings(tables::RatingsCommand),
    /// Show trip curve advice for a load type.
    TripCurve(tables::TripCurveCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Calc(cmd) => calc::run(cmd)?,
        Commands::Ratings(cmd) => {
            logging::init();
            tables::run_ratings(cmd)?
        }
        Commands::TripCurve(cmd) => {
            logging::init();
            tables::run_trip_curve(cmd)?
        }
    }
    Ok(())
}
