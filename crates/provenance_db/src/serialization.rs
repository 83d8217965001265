//! Conversion between domain provenance and stored documents.
//!
//! Writes turn every time span into f64 seconds. Reads restore only
//! `duration` into a time span: any other span field comes back as a plain
//! `Real` number of seconds. Reads also split off the snapshot payload.

use std::time::Duration;

use crate::document::{fields, Document, Provenance};
use crate::error::{RepositoryError, Result};
use crate::value::Value;

/// Seconds representation of a time span.
pub fn time_span_to_seconds(span: Duration) -> f64 {
    span.as_secs_f64()
}

/// Restore a time span from stored seconds.
///
/// Rejects negative, NaN and out-of-range values.
pub fn seconds_to_time_span(seconds: f64) -> std::result::Result<Duration, String> {
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("{} ({})", e, seconds))
}

/// Provenance in stored form. Every [`Value::TimeSpan`] field, not just
/// `duration`, is written as seconds.
pub(crate) fn to_stored(provenance: &Provenance) -> Document {
    provenance
        .iter()
        .map(|(key, value)| (key.clone(), store_value(value)))
        .collect()
}

fn store_value(value: &Value) -> Value {
    match value {
        Value::TimeSpan(span) => Value::Real(time_span_to_seconds(*span)),
        other => other.clone(),
    }
}

/// A stored document split back into its domain and storage-only parts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Restored {
    pub provenance: Provenance,
    pub snapshot: Option<Vec<u8>>,
}

/// Restore a stored document into domain provenance.
pub(crate) fn restore(mut document: Document) -> Result<Restored> {
    let snapshot = match document.remove(fields::SNAPSHOT_DATA) {
        None => None,
        Some(Value::Binary(bytes)) => Some(bytes),
        Some(other) => {
            return Err(RepositoryError::malformed(
                fields::SNAPSHOT_DATA,
                format!("expected binary, found {}", other.type_name()),
            ))
        }
    };

    if let Some(value) = document.get_mut(fields::DURATION) {
        let restored = match &*value {
            Value::TimeSpan(span) => *span,
            Value::Integer(_) | Value::Real(_) => {
                let seconds = value.as_f64().unwrap_or_default();
                seconds_to_time_span(seconds)
                    .map_err(|reason| RepositoryError::malformed(fields::DURATION, reason))?
            }
            other => {
                return Err(RepositoryError::malformed(
                    fields::DURATION,
                    format!("expected seconds, found {}", other.type_name()),
                ))
            }
        };
        *value = Value::TimeSpan(restored);
    }

    Ok(Restored {
        provenance: document,
        snapshot,
    })
}
