//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Conductor tables keyed by standard, material and size.
//!
//! NEC resistances follow Chapter 9 Table 8 (uncoated, 75 °C, Ω per 1000 ft) and
//! ampacities Table 310.16. IEC resistances are IEC 60228 class 2 values
//! corrected to 75 °C (Ω per km); ampacities follow IEC 60364-5-52 method C
//! with three loaded conductors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{ConductorMaterial, ConductorSize, SizeUnit, Standard};

/// Length unit the resistance column is expressed per.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBasis {
    PerKilometre,
    PerThousandFeet,
}

#[derive(Debug, Clone, Copy)]
pub struct ConductorRow {
    pub label: &'static str,
    pub unit: SizeUnit,
    /// Cross-section in mm² (equivalent area for AWG/kcmil sizes).
    pub area_mm2: Decimal,
    pub resistance_copper: Decimal,
    pub resistance_aluminum: Option<Decimal>,
    /// Ampacity per insulation column of the owning table.
    pub ampacity_copper: &'static [Decimal],
    /// Empty when the size is not listed for aluminium.
    pub ampacity_aluminum: &'static [Decimal],
}

impl ConductorRow {
    pub fn size(&self) -> ConductorSize {
        ConductorSize::new(self.label, self.unit)
    }

    pub fn resistance(&self, material: ConductorMaterial) -> Option<Decimal> {
        match material {
            ConductorMaterial::Copper => Some(self.resistance_copper),
            ConductorMaterial::Aluminum => self.resistance_aluminum,
        }
    }

    fn ampacities(&self, material: ConductorMaterial) -> &'static [Decimal] {
        match material {
            ConductorMaterial::Copper => self.ampacity_copper,
            ConductorMaterial::Aluminum => self.ampacity_aluminum,
        }
    }
}

const fn row(
    label: &'static str,
    unit: SizeUnit,
    area_mm2: Decimal,
    resistance_copper: Decimal,
    resistance_aluminum: Option<Decimal>,
    ampacity_copper: &'static [Decimal],
    ampacity_aluminum: &'static [Decimal],
) -> ConductorRow {
    ConductorRow {
        label,
        unit,
        area_mm2,
        resistance_copper,
        resistance_aluminum,
        ampacity_copper,
        ampacity_aluminum,
    }
}

#[derive(Debug)]
pub struct ConductorTable {
    pub standard: Standard,
    pub length_basis: LengthBasis,
    /// Insulation temperature ratings (°C) of the ampacity columns.
    pub insulation_columns: &'static [u16],
    /// Ascending by cross-section.
    pub rows: &'static [ConductorRow],
}

impl ConductorTable {
    pub fn position(&self, size: &ConductorSize) -> Option<usize> {
        let wanted = normalize_label(&size.value);
        self.rows
            .iter()
            .position(|row| row.unit == size.unit && row.label == wanted)
    }

    pub fn row(&self, size: &ConductorSize) -> Option<&'static ConductorRow> {
        let rows: &'static [ConductorRow] = self.rows;
        self.position(size).map(|index| &rows[index])
    }

    pub fn resistance(&self, size: &ConductorSize, material: ConductorMaterial) -> Option<Decimal> {
        self.row(size).and_then(|row| row.resistance(material))
    }

    pub fn ampacity(
        &self,
        size: &ConductorSize,
        material: ConductorMaterial,
        insulation_rating: u16,
    ) -> Option<Decimal> {
        let column = super::insulation_column(self.insulation_columns, insulation_rating);
        self.row(size)
            .and_then(|row| row.ampacities(material).get(column).copied())
    }
}

/// Trim and drop redundant trailing zeros, so `"4.0"` and `"16.00"` match the table.
fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.contains('.') && !trimmed.contains('/') {
        let stripped = trimmed.trim_end_matches('0').trim_end_matches('.');
        return stripped.to_owned();
    }
    trimmed.to_owned()
}

pub static NEC_CONDUCTORS: ConductorTable = ConductorTable {
    standard: Standard::Nec,
    length_basis: LengthBasis::PerThousandFeet,
    insulation_columns: &[60, 75, 90],
    rows: &[
        row("14", SizeUnit::Awg, dec!(2.08), dec!(3.07), None, &[dec!(15), dec!(20), dec!(25)], &[]),
        row("12", SizeUnit::Awg, dec!(3.31), dec!(1.93), Some(dec!(3.18)), &[dec!(20), dec!(25), dec!(30)], &[dec!(15), dec!(20), dec!(25)]),
        row("10", SizeUnit::Awg, dec!(5.26), dec!(1.21), Some(dec!(2.00)), &[dec!(30), dec!(35), dec!(40)], &[dec!(25), dec!(30), dec!(35)]),
        row("8", SizeUnit::Awg, dec!(8.37), dec!(0.764), Some(dec!(1.26)), &[dec!(40), dec!(50), dec!(55)], &[dec!(35), dec!(40), dec!(45)]),
        row("6", SizeUnit::Awg, dec!(13.3), dec!(0.491), Some(dec!(0.808)), &[dec!(55), dec!(65), dec!(75)], &[dec!(40), dec!(50), dec!(55)]),
        row("4", SizeUnit::Awg, dec!(21.2), dec!(0.308), Some(dec!(0.508)), &[dec!(70), dec!(85), dec!(95)], &[dec!(55), dec!(65), dec!(75)]),
        row("3", SizeUnit::Awg, dec!(26.7), dec!(0.245), Some(dec!(0.403)), &[dec!(85), dec!(100), dec!(115)], &[dec!(65), dec!(75), dec!(85)]),
        row("2", SizeUnit::Awg, dec!(33.6), dec!(0.194), Some(dec!(0.319)), &[dec!(95), dec!(115), dec!(130)], &[dec!(75), dec!(90), dec!(100)]),
        row("1", SizeUnit::Awg, dec!(42.4), dec!(0.154), Some(dec!(0.253)), &[dec!(110), dec!(130), dec!(145)], &[dec!(85), dec!(100), dec!(115)]),
        row("1/0", SizeUnit::Awg, dec!(53.5), dec!(0.122), Some(dec!(0.201)), &[dec!(125), dec!(150), dec!(170)], &[dec!(100), dec!(120), dec!(135)]),
        row("2/0", SizeUnit::Awg, dec!(67.4), dec!(0.0967), Some(dec!(0.159)), &[dec!(145), dec!(175), dec!(195)], &[dec!(115), dec!(135), dec!(150)]),
        row("3/0", SizeUnit::Awg, dec!(85.0), dec!(0.0766), Some(dec!(0.126)), &[dec!(165), dec!(200), dec!(225)], &[dec!(130), dec!(155), dec!(175)]),
        row("4/0", SizeUnit::Awg, dec!(107), dec!(0.0608), Some(dec!(0.100)), &[dec!(195), dec!(230), dec!(260)], &[dec!(150), dec!(180), dec!(205)]),
        row("250", SizeUnit::Kcmil, dec!(127), dec!(0.0515), Some(dec!(0.0847)), &[dec!(215), dec!(255), dec!(290)], &[dec!(170), dec!(205), dec!(230)]),
        row("300", SizeUnit::Kcmil, dec!(152), dec!(0.0429), Some(dec!(0.0707)), &[dec!(240), dec!(285), dec!(320)], &[dec!(195), dec!(230), dec!(260)]),
        row("350", SizeUnit::Kcmil, dec!(177), dec!(0.0367), Some(dec!(0.0605)), &[dec!(260), dec!(310), dec!(350)], &[dec!(210), dec!(250), dec!(280)]),
        row("400", SizeUnit::Kcmil, dec!(203), dec!(0.0321), Some(dec!(0.0529)), &[dec!(280), dec!(335), dec!(380)], &[dec!(225), dec!(270), dec!(305)]),
        row("500", SizeUnit::Kcmil, dec!(253), dec!(0.0258), Some(dec!(0.0424)), &[dec!(320), dec!(380), dec!(430)], &[dec!(260), dec!(310), dec!(350)]),
        row("600", SizeUnit::Kcmil, dec!(304), dec!(0.0214), Some(dec!(0.0353)), &[dec!(350), dec!(420), dec!(475)], &[dec!(285), dec!(340), dec!(385)]),
        row("750", SizeUnit::Kcmil, dec!(380), dec!(0.0171), Some(dec!(0.0282)), &[dec!(400), dec!(475), dec!(535)], &[dec!(320), dec!(385), dec!(435)]),
        row("1000", SizeUnit::Kcmil, dec!(507), dec!(0.0129), Some(dec!(0.0212)), &[dec!(455), dec!(545), dec!(615)], &[dec!(375), dec!(445), dec!(500)]),
    ],
};

pub static IEC_CONDUCTORS: ConductorTable = ConductorTable {
    standard: Standard::Iec,
    length_basis: LengthBasis::PerKilometre,
    insulation_columns: &[70, 90],
    rows: &[
        row("1.5", SizeUnit::Mm2, dec!(1.5), dec!(14.72), None, &[dec!(17.5), dec!(22)], &[]),
        row("2.5", SizeUnit::Mm2, dec!(2.5), dec!(9.012), None, &[dec!(24), dec!(30)], &[]),
        row("4", SizeUnit::Mm2, dec!(4), dec!(5.606), None, &[dec!(32), dec!(40)], &[]),
        row("6", SizeUnit::Mm2, dec!(6), dec!(3.746), None, &[dec!(41), dec!(51)], &[]),
        row("10", SizeUnit::Mm2, dec!(10), dec!(2.226), Some(dec!(3.763)), &[dec!(57), dec!(70)], &[dec!(44), dec!(54)]),
        row("16", SizeUnit::Mm2, dec!(16), dec!(1.399), Some(dec!(2.333)), &[dec!(76), dec!(94)], &[dec!(59), dec!(73)]),
        row("25", SizeUnit::Mm2, dec!(25), dec!(0.8841), Some(dec!(1.466)), &[dec!(96), dec!(119)], &[dec!(73), dec!(89)]),
        row("35", SizeUnit::Mm2, dec!(35), dec!(0.6373), Some(dec!(1.060)), &[dec!(119), dec!(148)], &[dec!(90), dec!(111)]),
        row("50", SizeUnit::Mm2, dec!(50), dec!(0.4707), Some(dec!(0.7831)), &[dec!(144), dec!(180)], &[dec!(110), dec!(135)]),
        row("70", SizeUnit::Mm2, dec!(70), dec!(0.3259), Some(dec!(0.5412)), &[dec!(184), dec!(232)], &[dec!(140), dec!(173)]),
        row("95", SizeUnit::Mm2, dec!(95), dec!(0.2347), Some(dec!(0.3909)), &[dec!(223), dec!(282)], &[dec!(170), dec!(210)]),
        row("120", SizeUnit::Mm2, dec!(120), dec!(0.1861), Some(dec!(0.3091)), &[dec!(259), dec!(328)], &[dec!(197), dec!(244)]),
        row("150", SizeUnit::Mm2, dec!(150), dec!(0.1508), Some(dec!(0.2517)), &[dec!(299), dec!(379)], &[dec!(227), dec!(282)]),
        row("185", SizeUnit::Mm2, dec!(185), dec!(0.1205), Some(dec!(0.2004)), &[dec!(341), dec!(434)], &[dec!(259), dec!(322)]),
        row("240", SizeUnit::Mm2, dec!(240), dec!(0.0917), Some(dec!(0.1527)), &[dec!(403), dec!(514)], &[dec!(305), dec!(380)]),
        row("300", SizeUnit::Mm2, dec!(300), dec!(0.07309), Some(dec!(0.1222)), &[dec!(464), dec!(593)], &[dec!(351), dec!(439)]),
        row("400", SizeUnit::Mm2, dec!(400), dec!(0.05716), Some(dec!(0.09504)), &[dec!(530), dec!(690)], &[dec!(410), dec!(520)]),
        row("500", SizeUnit::Mm2, dec!(500), dec!(0.04451), Some(dec!(0.07391)), &[dec!(610), dec!(795)], &[dec!(470), dec!(600)]),
        row("630", SizeUnit::Mm2, dec!(630), dec!(0.03442), Some(dec!(0.05730)), &[dec!(705), dec!(920)], &[dec!(545), dec!(695)]),
    ],
};

pub fn conductor_table(standard: Standard) -> &'static ConductorTable {
    match standard {
        Standard::Nec => &NEC_CONDUCTORS,
        Standard::Iec => &IEC_CONDUCTORS,
    }
}
