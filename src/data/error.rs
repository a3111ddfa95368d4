use thiserror::Error;

use super::model::{Column, Position, TargetId};

// ---------------------------------------------------------------------------
// SessionError – fatal ingestion failures
// ---------------------------------------------------------------------------

/// Conditions that abort ingestion. No partial dataset is produced.
///
/// Header rows and out-of-bounds observations are not errors; they are
/// tallied in [`IngestStats`](super::model::IngestStats) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A second, different subject appeared in a single-subject session.
    #[error("multiple subjects found in dataset: {first} and {second}")]
    MultiSubject { first: String, second: String },

    /// The same target id was recorded at two different positions.
    #[error("inconsistent data for target {target_id}: coords recorded at {recorded} and {found}")]
    TargetConsistency {
        target_id: TargetId,
        recorded: Position,
        found: Position,
    },

    /// A required numeric field is missing or not an integer.
    #[error("row {row}: {}", malformed_detail(.field, .value))]
    MalformedRow {
        /// 0-based index of the row in the input.
        row: usize,
        field: Column,
        /// Raw field text, `None` when the row is too short to contain it.
        value: Option<String>,
    },
}

fn malformed_detail(field: &Column, value: &Option<String>) -> String {
    match value {
        Some(v) => format!("field {field} is not an integer: {v:?}"),
        None => format!("field {field} is missing"),
    }
}
