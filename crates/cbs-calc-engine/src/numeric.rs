//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Decimal helpers shared by the pipeline stages.
//!
//! Every stage computes in [`Decimal`] so that values compared against
//! two-decimal regulatory thresholds carry no binary floating point error.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::model::Phase;

/// √3 to 28 decimal places.
pub const SQRT_3: Decimal = dec!(1.7320508075688772935274463415);
pub const ONE_THOUSAND: Decimal = dec!(1000);
pub const HUNDRED: Decimal = dec!(100);
pub const FEET_PER_METRE: Decimal = dec!(3.2808398950131233595800524934);
pub const METRES_PER_FOOT: Decimal = dec!(0.3048);

/// Line multiplier for power/current conversions: 1 for single phase, √3 for three phase.
pub fn phase_multiplier(phase: Phase) -> Decimal {
    match phase {
        Phase::Single => Decimal::ONE,
        Phase::Three => SQRT_3,
    }
}

/// `part / whole × 100`; zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * HUNDRED
}

/// Human readable rendering used in alert messages.
pub fn display(value: Decimal, places: u32) -> String {
    value
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}
