//! Row aggregation: per-row radius results into uniquely keyed output rows.
//!
//! Generated keys are always prefixed by the owning input row's key, so
//! keys never collide across input rows. Failed tasks contribute no row;
//! only missing input cells get an explicit placeholder.

use crate::types::{OutputRow, RadiusResult};

/// Assemble one output row per successful radius result.
///
/// Row keys take the fixed form
/// `"<row_key>_Region<label>_Slice<slice index>"`.
#[must_use]
pub fn assemble(row_key: &str, results: Vec<RadiusResult>) -> Vec<OutputRow> {
    results
        .into_iter()
        .map(|result| {
            OutputRow::values(
                format!("{row_key}_{}", result.identity),
                result.min_radius,
                result.max_radius,
            )
        })
        .collect()
}

/// The single placeholder row emitted for a row with a missing input
/// cell: both values carry the missing sentinel, keyed by the input
/// row's own key.
#[must_use]
pub fn missing_row(row_key: &str) -> OutputRow {
    OutputRow::missing(row_key.to_owned())
}
