//! Ranking engine: distance ascending, rating descending, id ascending.

use crate::domain::{FilterCriteria, OrganizationRecord};
use std::cmp::Ordering;

/// Distances closer than this many kilometers are treated as equal.
pub const DISTANCE_RESOLUTION_KM: f64 = 1e-9;

/// Ordered records produced for one criteria value under one epoch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedResultSet {
    pub criteria: FilterCriteria,
    pub epoch: u64,
    pub records: Vec<OrganizationRecord>,
}

impl RankedResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sorts `records` into display order.
///
/// The comparator is a total order and the sort is stable, so
/// `rank(rank(x)) == rank(x)`.
///
/// ```
/// use ngo_discovery::discovery::rank;
/// use ngo_discovery::domain::{Category, OrganizationRecord};
///
/// let ranked = rank(vec![
///     OrganizationRecord::new("b", "Far", Category::Education).with_distance(4.0),
///     OrganizationRecord::new("a", "Near", Category::Education).with_distance(1.0),
/// ]);
/// assert_eq!(ranked[0].id.as_str(), "a");
/// ```
#[must_use]
pub fn rank(mut records: Vec<OrganizationRecord>) -> Vec<OrganizationRecord> {
    let _span = tracing::debug_span!("rank", count = records.len()).entered();
    records.sort_by(compare);
    records
}

/// Display-order comparator.
///
/// 1. Distance ascending, quantized to [`DISTANCE_RESOLUTION_KM`]; `NaN` last
/// 2. Rating descending (`f64::total_cmp`)
/// 3. Identifier ascending
#[must_use]
pub fn compare(a: &OrganizationRecord, b: &OrganizationRecord) -> Ordering {
    distance_key(a.distance_km)
        .cmp(&distance_key(b.distance_km))
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.id.cmp(&b.id))
}

#[allow(clippy::cast_possible_truncation)]
fn distance_key(distance_km: f64) -> i64 {
    if distance_km.is_nan() {
        return i64::MAX;
    }
    // `as` saturates on overflow and infinities
    (distance_km / DISTANCE_RESOLUTION_KM).round() as i64
}
