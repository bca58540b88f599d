//! Validates extraction envelopes and pulls out the record lists.
//!
//! Nothing here filters by price or type: the records are passed through as
//! extracted and the ranking stage decides what gets shown.

use crate::models::{ExtractionResult, LocationTrend, PropertyCollection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Listings from a successful extraction, or an empty collection
pub fn normalize(result: &ExtractionResult) -> PropertyCollection {
    records_under(result, "properties")
}

/// Locality trends from a successful extraction, or an empty list
pub fn normalize_trends(result: &ExtractionResult) -> Vec<LocationTrend> {
    records_under(result, "locations")
}

fn records_under<T: DeserializeOwned>(result: &ExtractionResult, key: &str) -> Vec<T> {
    if !result.success {
        warn!(status = %result.status, "Extraction unsuccessful, using empty {}", key);
        return Vec::new();
    }

    let Some(list) = result.data.get(key) else {
        warn!("Extraction payload has no `{}` list", key);
        return Vec::new();
    };

    let Value::Array(items) = list else {
        warn!("`{}` is not a list", key);
        return Vec::new();
    };

    let records: Vec<T> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value::<T>(item.clone())
                .map_err(|e| warn!(index, error = %e, "Dropping malformed entry in `{}`", key))
                .ok()
        })
        .collect();

    debug!(count = records.len(), total = items.len(), "Normalized {}", key);
    records
}
