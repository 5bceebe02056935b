use serde::Serialize;

use super::node::{NetworkId, OccurrenceDate, first_date};
use chrono::{DateTime, Utc};

/// A directed edge between two nodes, referenced by index into the
/// date-sorted node list. Repeated edges in the input are merged into one
/// link, accumulating every occurrence date.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    /// Occurrence dates, sorted ascending with dateless entries last.
    pub dates: Vec<OccurrenceDate>,
    pub network: NetworkId,
    /// Stable identity for keyed data binding, derived from the endpoint
    /// node keys.
    pub key: String,
}

impl Link {
    pub fn new(source: usize, target: usize, source_key: &str, target_key: &str) -> Self {
        Self {
            source,
            target,
            dates: Vec::new(),
            network: super::node::UNASSIGNED_NETWORK,
            key: format!("{}-{}", source_key, target_key),
        }
    }

    /// Earliest real date of any occurrence, if one exists.
    pub fn first_date(&self) -> Option<DateTime<Utc>> {
        first_date(&self.dates)
    }
}
