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

use crate::model::Standard;

/// NEC 240.6(A) standard ampere ratings.
pub const NEC_STANDARD_RATINGS: &[u32] = &[
    15, 20, 25, 30, 35, 40, 45, 50, 60, 70, 80, 90, 100, 110, 125, 150, 175, 200, 225, 250, 300,
    350, 400, 450, 500, 600, 700, 800, 1000, 1200, 1600, 2000, 2500, 3000, 4000,
];

/// IEC 60898-1 / 60947-2 preferred rated currents.
pub const IEC_STANDARD_RATINGS: &[u32] = &[
    6, 10, 13, 16, 20, 25, 32, 40, 50, 63, 80, 100, 125, 160, 200, 250, 315, 400, 500, 630, 800,
    1000, 1250, 1600, 2000, 2500, 3200, 4000,
];

/// Interrupting ratings (kA) commonly listed for NEC molded case breakers.
pub const NEC_BREAKING_CAPACITIES_KA: &[u32] = &[10, 14, 18, 22, 25, 35, 42, 50, 65, 100, 150, 200];

/// Rated short-circuit breaking capacities (kA) for IEC devices.
pub const IEC_BREAKING_CAPACITIES_KA: &[u32] = &[6, 10, 15, 20, 25, 36, 50, 70, 100, 150];

pub fn standard_ratings(standard: Standard) -> &'static [u32] {
    match standard {
        Standard::Nec => NEC_STANDARD_RATINGS,
        Standard::Iec => IEC_STANDARD_RATINGS,
    }
}

pub fn largest_standard_rating(standard: Standard) -> u32 {
    standard_ratings(standard).last().copied().unwrap_or_default()
}

/// Round up to the next standard rating; `None` when the load exceeds the largest one.
pub fn recommend_standard_breaker(minimum_amps: Decimal, standard: Standard) -> Option<u32> {
    standard_ratings(standard)
        .iter()
        .copied()
        .find(|rating| Decimal::from(*rating) >= minimum_amps)
}

/// Smallest listed breaking capacity that can interrupt the given fault current.
pub fn recommend_breaking_capacity(fault_ka: Decimal, standard: Standard) -> Option<Decimal> {
    let capacities = match standard {
        Standard::Nec => NEC_BREAKING_CAPACITIES_KA,
        Standard::Iec => IEC_BREAKING_CAPACITIES_KA,
    };
    capacities
        .iter()
        .copied()
        .map(Decimal::from)
        .find(|capacity| *capacity >= fault_ka)
}
