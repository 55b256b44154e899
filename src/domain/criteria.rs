//! Search and filter criteria value objects.
//!
//! [`FilterCriteria`] is replaced wholesale on every user change: the `with_*`
//! methods consume the old value and return a new one, so the reducer can tell
//! whether anything changed with a plain equality check.

use super::organization::{Category, Urgency, VerificationStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum distance filter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radius {
    /// No distance limit.
    #[default]
    Unbounded,
    /// Only organizations at most this many kilometers away.
    Km(f64),
}

impl Radius {
    /// Whether an organization at `distance_km` is inside the radius.
    ///
    /// A `NaN` radius admits nothing.
    #[must_use]
    pub fn admits(self, distance_km: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Km(limit) => distance_km <= limit,
        }
    }

    #[must_use]
    pub const fn is_bounded(self) -> bool {
        matches!(self, Self::Km(_))
    }

    /// Parses `"all"`, `"unbounded"`, `"any"`, or a kilometer value such as
    /// `"25"` / `"25km"`. Returns `None` for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if ["all", "unbounded", "any"].iter().any(|v| v.eq_ignore_ascii_case(value)) {
            return Some(Self::Unbounded);
        }
        value
            .trim_end_matches("km")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|km| km.is_finite() && *km >= 0.0)
            .map(Self::Km)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("any distance"),
            Self::Km(km) => write!(f, "{km} km"),
        }
    }
}

/// Members of a closed enumeration that may hold an unrecognized value.
pub trait ClosedSet: Copy + PartialEq {
    /// `false` for the catch-all variant used for unseen backend values.
    fn is_known(self) -> bool;
}

impl ClosedSet for Category {
    fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl ClosedSet for VerificationStatus {
    fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl ClosedSet for Urgency {
    fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// Either "all" (no constraint) or one specific value of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: ClosedSet> Selection<T> {
    /// Whether `value` passes this selection.
    ///
    /// An unknown value on either side never matches a specific selection.
    #[must_use]
    pub fn admits(self, value: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.is_known() && value.is_known() && wanted == value,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Parses `"all"` to [`Selection::All`], anything else through `parse_one`.
    pub fn parse_with(value: &str, parse_one: impl FnOnce(&str) -> T) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(parse_one(value))
        }
    }
}

/// The complete set of search inputs committed at one point in time.
///
/// # Example
///
/// ```
/// use ngo_discovery::domain::{Category, FilterCriteria, Radius, Selection};
///
/// let criteria = FilterCriteria::default()
///     .with_radius(Radius::Km(5.0))
///     .with_category(Selection::Only(Category::Healthcare));
///
/// assert_eq!(criteria.active_filter_count(), 2);
/// assert_ne!(criteria, FilterCriteria::default());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub radius: Radius,
    pub category: Selection<Category>,
    pub verification: Selection<VerificationStatus>,
    pub urgency: Selection<Urgency>,
}

impl FilterCriteria {
    #[must_use]
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self { query: query.into(), ..self }
    }

    #[must_use]
    pub fn with_radius(self, radius: Radius) -> Self {
        Self { radius, ..self }
    }

    #[must_use]
    pub fn with_category(self, category: Selection<Category>) -> Self {
        Self { category, ..self }
    }

    #[must_use]
    pub fn with_verification(self, verification: Selection<VerificationStatus>) -> Self {
        Self { verification, ..self }
    }

    #[must_use]
    pub fn with_urgency(self, urgency: Selection<Urgency>) -> Self {
        Self { urgency, ..self }
    }

    /// Query text as the filter engine compares it: trimmed and lowercased.
    #[must_use]
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// Number of constraints other than the query text, for the filter badge.
    ///
    /// Counts category, verification and urgency when they are not "all", and
    /// the radius when it is bounded.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        [
            self.radius.is_bounded(),
            !self.category.is_all(),
            !self.verification.is_all(),
            !self.urgency.is_all(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_parsing() {
        assert_eq!(Radius::parse("all"), Some(Radius::Unbounded));
        assert_eq!(Radius::parse("25"), Some(Radius::Km(25.0)));
        assert_eq!(Radius::parse("7.5km"), Some(Radius::Km(7.5)));
        assert_eq!(Radius::parse("-3"), None);
        assert_eq!(Radius::parse("far"), None);
    }

    #[test]
    fn nan_radius_admits_nothing() {
        assert!(!Radius::Km(f64::NAN).admits(0.0));
        assert!(Radius::Unbounded.admits(f64::MAX));
    }

    #[test]
    fn unknown_selection_never_matches() {
        let selection = Selection::Only(Category::Unknown);
        assert!(!selection.admits(Category::Unknown));
        assert!(!selection.admits(Category::Healthcare));
        assert!(!Selection::Only(Category::Healthcare).admits(Category::Unknown));
        assert!(Selection::<Category>::All.admits(Category::Unknown));
    }

    #[test]
    fn active_filter_count_ignores_query() {
        let criteria = FilterCriteria::default().with_query("water");
        assert_eq!(criteria.active_filter_count(), 0);

        let criteria = criteria
            .with_verification(Selection::Only(VerificationStatus::Verified))
            .with_urgency(Selection::Only(Urgency::Critical));
        assert_eq!(criteria.active_filter_count(), 2);
    }

    #[test]
    fn selection_parse_with() {
        let parsed = Selection::parse_with("ALL", Category::parse);
        assert_eq!(parsed, Selection::All);
        let parsed = Selection::parse_with("elderly-care", Category::parse);
        assert_eq!(parsed, Selection::Only(Category::ElderlyCare));
    }
}
