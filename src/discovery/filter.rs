//! Filter engine: `(catalog, criteria) -> filtered records`.
//!
//! All predicates are AND-combined. Filtering is pure and total; it never
//! reorders its input.

use crate::domain::{FilterCriteria, OrganizationRecord};

/// Returns the records of `catalog` that satisfy every predicate in `criteria`,
/// in catalog order.
///
/// # Example
///
/// ```
/// use ngo_discovery::discovery::filter;
/// use ngo_discovery::domain::{Category, FilterCriteria, OrganizationRecord, Radius};
///
/// let catalog = vec![
///     OrganizationRecord::new("a", "River Clinic", Category::Healthcare).with_distance(2.0),
///     OrganizationRecord::new("b", "Book Bus", Category::Education).with_distance(9.0),
/// ];
/// let criteria = FilterCriteria::default().with_radius(Radius::Km(5.0));
///
/// let found = filter(&catalog, &criteria);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id.as_str(), "a");
/// ```
#[must_use]
pub fn filter(catalog: &[OrganizationRecord], criteria: &FilterCriteria) -> Vec<OrganizationRecord> {
    let _span = tracing::debug_span!(
        "filter",
        catalog_size = catalog.len(),
        active_filters = criteria.active_filter_count(),
        query_len = criteria.query.len()
    )
    .entered();

    let query = criteria.normalized_query();
    let filtered: Vec<OrganizationRecord> = catalog
        .iter()
        .filter(|record| matches_normalized(record, criteria, &query))
        .cloned()
        .collect();

    tracing::debug!(filtered_count = filtered.len(), "filter applied");
    filtered
}

/// Whether a single record satisfies `criteria`.
#[must_use]
pub fn matches(record: &OrganizationRecord, criteria: &FilterCriteria) -> bool {
    matches_normalized(record, criteria, &criteria.normalized_query())
}

fn matches_normalized(record: &OrganizationRecord, criteria: &FilterCriteria, query: &str) -> bool {
    matches_query(record, query)
        && criteria.radius.admits(record.distance_km)
        && criteria.category.admits(record.category)
        && criteria.verification.admits(record.verification_status)
        && urgency_admits(record, criteria)
}

fn matches_query(record: &OrganizationRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    [
        record.name.as_str(),
        record.category.label(),
        record.description.as_str(),
        record.address.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(query))
}

// Passes when any need carries the selected urgency.
fn urgency_admits(record: &OrganizationRecord, criteria: &FilterCriteria) -> bool {
    criteria.urgency.is_all() || record.needs.iter().any(|need| criteria.urgency.admits(need.urgency))
}
