//! Vector aligner: sparse record to schema-ordered dense vector.
//!
//! Every schema column is looked up in the record and filled with 0 when
//! absent. Record keys the schema does not name are collected as
//! `unmatched` and handled according to [`UnmatchedKeyPolicy`].

use heart_model::{AlignedVector, FeatureSchema, SparseRecord};
use tracing::debug;

use crate::error::StageError;

/// What to do with encoded keys that have no schema column.
///
/// A schema exported with drop-first one-hot encoding omits one column per
/// categorical field, so unmatched keys are expected there and `Log` is the
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmatchedKeyPolicy {
    /// Drop silently.
    Ignore,
    /// Drop and emit a debug event naming the keys.
    #[default]
    Log,
    /// Fail the alignment.
    Reject,
}

/// Result of aligning one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub vector: AlignedVector,
    /// Record keys absent from the schema, in key order.
    pub unmatched: Vec<String>,
}

/// Align a record against the schema. Never fails; see [`align_with_policy`].
pub fn align(record: &SparseRecord, schema: &FeatureSchema) -> Alignment {
    let values = schema
        .iter()
        .map(|column| record.get(column).unwrap_or(0.0))
        .collect();
    let unmatched = record
        .keys()
        .filter(|key| !schema.contains(key))
        .map(str::to_string)
        .collect();
    Alignment {
        vector: AlignedVector::new(values),
        unmatched,
    }
}

/// Align a record and apply the unmatched-key policy.
pub fn align_with_policy(
    record: &SparseRecord,
    schema: &FeatureSchema,
    policy: UnmatchedKeyPolicy,
) -> Result<AlignedVector, StageError> {
    let Alignment { vector, unmatched } = align(record, schema);
    if !unmatched.is_empty() {
        match policy {
            UnmatchedKeyPolicy::Ignore => {}
            UnmatchedKeyPolicy::Log => {
                debug!(
                    unmatched = ?unmatched,
                    "encoded columns absent from feature schema were dropped"
                );
            }
            UnmatchedKeyPolicy::Reject => {
                return Err(StageError::UnmatchedColumns { columns: unmatched });
            }
        }
    }
    Ok(vector)
}
