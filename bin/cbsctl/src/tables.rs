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
use cbs_calc_engine::{
    tables::{
        breakers::{IEC_BREAKING_CAPACITIES_KA, NEC_BREAKING_CAPACITIES_KA},
        recommend_trip_curve, standard_ratings,
    },
    LoadType, Standard,
};
use clap::{Args, ValueEnum};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StandardArg {
    Nec,
    Iec,
}

impl From<StandardArg> for Standard {
    fn from(value: StandardArg) -> Self {
        match value {
            StandardArg::Nec => Standard::Nec,
            StandardArg::Iec => Standard::Iec,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoadTypeArg {
    Resistive,
    Inductive,
    Mixed,
    Capacitive,
}

impl From<LoadTypeArg> for LoadType {
    fn from(value: LoadTypeArg) -> Self {
        match value {
            LoadTypeArg::Resistive => LoadType::Resistive,
            LoadTypeArg::Inductive => LoadType::Inductive,
            LoadTypeArg::Mixed => LoadType::Mixed,
            LoadTypeArg::Capacitive => LoadType::Capacitive,
        }
    }
}

#[derive(Debug, Args)]
pub struct RatingsCommand {
    #[arg(long, value_enum)]
    standard: StandardArg,

    /// Print JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct TripCurveCommand {
    #[arg(long, value_enum)]
    standard: StandardArg,

    #[arg(long = "load-type", value_enum, default_value_t = LoadTypeArg::Mixed)]
    load_type: LoadTypeArg,

    /// Print JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatingsListing {
    standard: Standard,
    ratings_amps: &'static [u32],
    #[serde(rename = "breakingCapacitiesKA")]
    breaking_capacities_ka: &'static [u32],
}

pub fn run_ratings(command: RatingsCommand) -> Result<()> {
    let standard = Standard::from(command.standard);
    let listing = RatingsListing {
        standard,
        ratings_amps: standard_ratings(standard),
        breaking_capacities_ka: match standard {
            Standard::Nec => NEC_BREAKING_CAPACITIES_KA,
            Standard::Iec => IEC_BREAKING_CAPACITIES_KA,
        },
    };

    if command.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }
    println!("{} standard breaker ratings (A):", standard);
    println!("  {}", join(listing.ratings_amps));
    println!("{} breaking capacities (kA):", standard);
    println!("  {}", join(listing.breaking_capacities_ka));
    Ok(())
}

pub fn run_trip_curve(command: TripCurveCommand) -> Result<()> {
    let advice = recommend_trip_curve(command.load_type.into(), command.standard.into());
    if command.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
        return Ok(());
    }
    println!("Recommendation: {}", advice.display_name);
    println!("Rationale: {}", advice.rationale);
    println!("Inrush: {}", advice.inrush_capability);
    for note in &advice.notes {
        println!("Note: {}", note);
    }
    Ok(())
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
