//! Data contracts returned by the analysis service.
//!
//! `total_count` is required on every payload. `averages` and
//! `type_distribution` are optional because history entries may carry only
//! the record count.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metric averages in the order the service sent them. A `null` average
/// decodes to `None` instead of rejecting the payload.
pub type Averages = IndexMap<String, Option<f64>>;

/// Equipment type counts in the order the service sent them.
pub type TypeCounts = IndexMap<String, u64>;

/// Exact match first, then an ASCII case-insensitive one.
pub fn get_ignore_case<'a, V>(map: &'a IndexMap<String, V>, label: &str) -> Option<&'a V> {
    map.get(label).or_else(|| {
        map.iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(label))
            .map(|(_, value)| value)
    })
}

/// Aggregated statistics for one uploaded dataset.
///
/// The sum of `type_distribution` is not checked against `total_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub total_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub averages: Option<Averages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_distribution: Option<TypeCounts>,
}

impl SummaryPayload {
    pub fn new(total_count: u64) -> Self {
        Self {
            total_count,
            averages: None,
            type_distribution: None,
        }
    }

    pub fn with_average(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.averages
            .get_or_insert_with(Averages::new)
            .insert(metric.into(), Some(value));
        self
    }

    pub fn with_type_count(mut self, equipment_type: impl Into<String>, count: u64) -> Self {
        self.type_distribution
            .get_or_insert_with(TypeCounts::new)
            .insert(equipment_type.into(), count);
        self
    }
}
