//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Read-only standard tables consumed by the pipeline. Everything here is
//! `'static` data, so lookups can be shared freely across threads.

pub mod breakers;
pub mod cables;
pub mod derating;
pub mod trip_curves;

pub use breakers::{
    largest_standard_rating, recommend_breaking_capacity, recommend_standard_breaker,
    standard_ratings,
};
pub use trip_curves::{recommend_trip_curve, TripCurveAdvice, TripSpecification};

/// Pick the column for an insulation rating: the highest column not above the
/// rating, or the lowest column when the rating is below every column.
pub(crate) fn insulation_column(columns: &[u16], insulation_rating: u16) -> usize {
    columns
        .iter()
        .rposition(|column| *column <= insulation_rating)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insulation_column_selection() {
        let nec = [60, 75, 90];
        assert_eq!(insulation_column(&nec, 60), 0);
        assert_eq!(insulation_column(&nec, 70), 0);
        assert_eq!(insulation_column(&nec, 75), 1);
        assert_eq!(insulation_column(&nec, 90), 2);

        let iec = [70, 90];
        assert_eq!(insulation_column(&iec, 60), 0);
        assert_eq!(insulation_column(&iec, 75), 0);
        assert_eq!(insulation_column(&iec, 90), 1);
    }
}
