//! Result types returned by repository queries.

use serde::{Deserialize, Serialize};

use crate::store::Totals;

/// Aggregate over every stored record.
///
/// An empty store reports `{"count": 0}` with no `totalsize` key, which keeps
/// "no records" distinguishable from an aggregate of zero-sized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(
        rename = "totalsize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_size: Option<i64>,
    pub count: u64,
}

impl Statistics {
    /// Statistics of an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl From<Option<Totals>> for Statistics {
    fn from(totals: Option<Totals>) -> Self {
        match totals {
            Some(Totals { total, count }) if count > 0 => Self {
                total_size: Some(total),
                count,
            },
            _ => Self::empty(),
        }
    }
}
