//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Ambient temperature correction and conductor grouping factors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{InstallationMethod, Standard};

pub const NEC_TEMPERATURE_REFERENCE: &str = "NEC Table 310.15(B)(2)(a)";
pub const NEC_GROUPING_REFERENCE: &str = "NEC Table 310.15(C)(1)";
pub const IEC_TEMPERATURE_REFERENCE: &str = "IEC 60364-5-52 Table B.52.14";
pub const IEC_GROUPING_REFERENCE: &str = "IEC 60364-5-52 Table B.52.17";

pub const NEC_INSULATION_COLUMNS: &[u16] = &[60, 75, 90];
pub const IEC_INSULATION_COLUMNS: &[u16] = &[70, 90];

/// Rows are `(upper ambient bound °C, factor per insulation column)`.
type TemperatureRow = (i64, &'static [Decimal]);

static NEC_TEMPERATURE: &[TemperatureRow] = &[
    (10, &[dec!(1.29), dec!(1.20), dec!(1.15)]),
    (15, &[dec!(1.22), dec!(1.15), dec!(1.12)]),
    (20, &[dec!(1.15), dec!(1.11), dec!(1.08)]),
    (25, &[dec!(1.08), dec!(1.05), dec!(1.04)]),
    (30, &[dec!(1.00), dec!(1.00), dec!(1.00)]),
    (35, &[dec!(0.91), dec!(0.94), dec!(0.96)]),
    (40, &[dec!(0.82), dec!(0.88), dec!(0.91)]),
    (45, &[dec!(0.71), dec!(0.82), dec!(0.87)]),
    (50, &[dec!(0.58), dec!(0.75), dec!(0.82)]),
    (55, &[dec!(0.41), dec!(0.67), dec!(0.76)]),
    (60, &[dec!(0), dec!(0.58), dec!(0.71)]),
    (65, &[dec!(0), dec!(0.47), dec!(0.65)]),
    (70, &[dec!(0), dec!(0.33), dec!(0.58)]),
    (75, &[dec!(0), dec!(0), dec!(0.50)]),
    (80, &[dec!(0), dec!(0), dec!(0.41)]),
    (85, &[dec!(0), dec!(0), dec!(0.29)]),
];

static IEC_TEMPERATURE: &[TemperatureRow] = &[
    (10, &[dec!(1.22), dec!(1.15)]),
    (15, &[dec!(1.17), dec!(1.12)]),
    (20, &[dec!(1.12), dec!(1.08)]),
    (25, &[dec!(1.06), dec!(1.04)]),
    (30, &[dec!(1.00), dec!(1.00)]),
    (35, &[dec!(0.94), dec!(0.96)]),
    (40, &[dec!(0.87), dec!(0.91)]),
    (45, &[dec!(0.79), dec!(0.87)]),
    (50, &[dec!(0.71), dec!(0.82)]),
    (55, &[dec!(0.61), dec!(0.76)]),
    (60, &[dec!(0.50), dec!(0.71)]),
    (65, &[dec!(0), dec!(0.65)]),
    (70, &[dec!(0), dec!(0.58)]),
    (75, &[dec!(0), dec!(0.50)]),
    (80, &[dec!(0), dec!(0.41)]),
];

/// B.52.17 row 1: bunched in air, on a surface, embedded or enclosed.
const IEC_GROUPING_ENCLOSED: &[Decimal] = &[
    dec!(1.00), dec!(0.80), dec!(0.70), dec!(0.65), dec!(0.60),
    dec!(0.57), dec!(0.54), dec!(0.52), dec!(0.50),
];
/// B.52.17 row 2: single layer on wall, floor or unperforated tray.
const IEC_GROUPING_SURFACE: &[Decimal] = &[
    dec!(1.00), dec!(0.85), dec!(0.79), dec!(0.75), dec!(0.73),
    dec!(0.72), dec!(0.72), dec!(0.71), dec!(0.70),
];
/// B.52.17 row 4: single layer on perforated tray or in free air.
const IEC_GROUPING_TRAY: &[Decimal] = &[
    dec!(1.00), dec!(0.88), dec!(0.82), dec!(0.77), dec!(0.75),
    dec!(0.73), dec!(0.73), dec!(0.72), dec!(0.72),
];

pub fn insulation_columns(standard: Standard) -> &'static [u16] {
    match standard {
        Standard::Nec => NEC_INSULATION_COLUMNS,
        Standard::Iec => IEC_INSULATION_COLUMNS,
    }
}

pub fn default_insulation_rating(standard: Standard) -> u16 {
    match standard {
        Standard::Nec => 75,
        Standard::Iec => 70,
    }
}

/// Ambient correction factor, capped at unity.
///
/// The ambient is rounded up to the next tabulated row. Ambients above the last
/// row, or above what the insulation can tolerate, yield zero.
pub fn temperature_factor(ambient_c: Decimal, insulation_rating: u16, standard: Standard) -> Decimal {
    let (rows, columns) = match standard {
        Standard::Nec => (NEC_TEMPERATURE, NEC_INSULATION_COLUMNS),
        Standard::Iec => (IEC_TEMPERATURE, IEC_INSULATION_COLUMNS),
    };
    let column = super::insulation_column(columns, insulation_rating);
    if ambient_c >= Decimal::from(insulation_rating) {
        return Decimal::ZERO;
    }

    rows.iter()
        .find(|(upper, _)| ambient_c <= Decimal::from(*upper))
        .and_then(|(_, factors)| factors.get(column).copied())
        .map(|factor| factor.min(Decimal::ONE))
        .unwrap_or(Decimal::ZERO)
}

/// Number of circuits IEC grouping counts for a conductor total (three conductors per circuit).
pub fn iec_circuit_count(conductors: u32) -> u32 {
    conductors.div_ceil(3)
}

/// Adjustment factor for the number of current-carrying conductors bundled together.
pub fn grouping_factor(
    conductors: u32,
    installation_method: Option<InstallationMethod>,
    standard: Standard,
) -> Decimal {
    match standard {
        Standard::Nec => match conductors {
            0..=3 => dec!(1.00),
            4..=6 => dec!(0.80),
            7..=9 => dec!(0.70),
            10..=20 => dec!(0.50),
            21..=30 => dec!(0.45),
            31..=40 => dec!(0.40),
            _ => dec!(0.35),
        },
        Standard::Iec => {
            let circuits = iec_circuit_count(conductors).max(1) as usize;
            let (row, beyond) = match installation_method {
                Some(InstallationMethod::Surface) => (IEC_GROUPING_SURFACE, dec!(0.70)),
                Some(InstallationMethod::CableTray | InstallationMethod::FreeAir) => {
                    (IEC_GROUPING_TRAY, dec!(0.72))
                }
                Some(InstallationMethod::Conduit | InstallationMethod::DirectBurial) | None => {
                    let beyond = match circuits {
                        0..=12 => dec!(0.45),
                        13..=16 => dec!(0.41),
                        _ => dec!(0.38),
                    };
                    (IEC_GROUPING_ENCLOSED, beyond)
                }
            };
            row.get(circuits - 1).copied().unwrap_or(beyond)
        }
    }
}

pub fn code_references(standard: Standard) -> (&'static str, &'static str) {
    match standard {
        Standard::Nec => (NEC_TEMPERATURE_REFERENCE, NEC_GROUPING_REFERENCE),
        Standard::Iec => (IEC_TEMPERATURE_REFERENCE, IEC_GROUPING_REFERENCE),
    }
}
