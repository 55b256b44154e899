//! Organization domain model.
//!
//! [`OrganizationRecord`] is the immutable snapshot of one NGO as delivered by
//! the catalog provider. The engine only ever reads records; it never patches
//! them in place. The closed enumerations ([`Category`],
//! [`VerificationStatus`], [`Urgency`]) each carry an `Unknown` variant so a
//! backend value this build has never seen deserializes cleanly and simply
//! matches no filter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique identifier of an organization.
///
/// Ordered lexicographically; the ranking engine uses this order as its final
/// tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrganizationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OrganizationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Cause an organization works on.
///
/// Serialized with its display label (`"Food Security"`). Deserialization
/// goes through [`Category::parse`], so labels and slugs load in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    Education,
    Healthcare,
    #[serde(rename = "Food Security")]
    FoodSecurity,
    Environment,
    #[serde(rename = "Women Empowerment")]
    WomenEmpowerment,
    #[serde(rename = "Child Welfare")]
    ChildWelfare,
    #[serde(rename = "Elderly Care")]
    ElderlyCare,
    #[serde(rename = "Disaster Relief")]
    DisasterRelief,
    /// Any value outside the known set.
    Unknown,
}

impl Category {
    /// Every known category, in the order the filter menu lists them.
    pub const ALL: [Self; 8] = [
        Self::Education,
        Self::Healthcare,
        Self::FoodSecurity,
        Self::Environment,
        Self::WomenEmpowerment,
        Self::ChildWelfare,
        Self::ElderlyCare,
        Self::DisasterRelief,
    ];

    /// Human-readable label, also the text searched by free-text queries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Healthcare => "Healthcare",
            Self::FoodSecurity => "Food Security",
            Self::Environment => "Environment",
            Self::WomenEmpowerment => "Women Empowerment",
            Self::ChildWelfare => "Child Welfare",
            Self::ElderlyCare => "Elderly Care",
            Self::DisasterRelief => "Disaster Relief",
            Self::Unknown => "Unknown",
        }
    }

    /// URL/menu slug (`"food-security"`).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Healthcare => "healthcare",
            Self::FoodSecurity => "food-security",
            Self::Environment => "environment",
            Self::WomenEmpowerment => "women-empowerment",
            Self::ChildWelfare => "child-welfare",
            Self::ElderlyCare => "elderly-care",
            Self::DisasterRelief => "disaster-relief",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a label or slug, case-insensitively. Never fails: anything
    /// unrecognized becomes [`Category::Unknown`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Self::Unknown)
    }
}

/// Verification state of an organization's registration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Rejected,
    Unknown,
}

impl VerificationStatus {
    pub const ALL: [Self; 3] = [Self::Verified, Self::Pending, Self::Rejected];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a status name, case-insensitively; unrecognized input is `Unknown`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(Self::Unknown)
    }
}

/// How pressing a need is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Urgency {
    pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }

    /// Sort key for displaying needs, most pressing first.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Unknown => 4,
        }
    }

    /// Parses an urgency level, case-insensitively; unrecognized input is `Unknown`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(Self::Unknown)
    }
}

macro_rules! parse_from_string {
    ($($ty:ty),*) => {
        $(
            impl From<String> for $ty {
                fn from(value: String) -> Self {
                    Self::parse(&value)
                }
            }
        )*
    };
}

parse_from_string!(Category, VerificationStatus, Urgency);

/// One item an organization is asking donors for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedEntry {
    pub item: String,
    pub urgency: Urgency,
    pub quantity_needed: u32,
    #[serde(default)]
    pub quantity_received: u32,
    #[serde(default)]
    pub description: String,
}

impl NeedEntry {
    #[must_use]
    pub fn new(item: impl Into<String>, urgency: Urgency, quantity_needed: u32, quantity_received: u32) -> Self {
        Self {
            item: item.into(),
            urgency,
            quantity_needed,
            quantity_received,
            description: String::new(),
        }
    }

    /// Share of the need already covered, as a whole percentage in `0..=100`.
    ///
    /// A need with `quantity_needed == 0` reports 0.
    ///
    /// ```
    /// use ngo_discovery::domain::{NeedEntry, Urgency};
    ///
    /// let need = NeedEntry::new("Rice", Urgency::Critical, 500, 150);
    /// assert_eq!(need.progress_percent(), 30);
    /// ```
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.quantity_needed == 0 {
            return 0;
        }
        let percent = u64::from(self.quantity_received) * 100 / u64::from(self.quantity_needed);
        u8::try_from(percent.min(100)).unwrap_or(100)
    }
}

/// Immutable snapshot of one NGO.
///
/// # Fields
///
/// - `distance_km`: distance from the current user, non-negative
/// - `rating`: average donor rating in `0.0..=5.0`
/// - `needs`: open needs; the urgency filter looks at these
/// - `description` / `address`: free text searched by the query box
/// - `email`: contact address for the contact action, if published
/// - `is_favorited`: backend flag used to seed the favorite store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub id: OrganizationId,
    pub name: String,
    pub category: Category,
    pub verification_status: VerificationStatus,
    pub distance_km: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub needs: Vec<NeedEntry>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_favorited: bool,
}

impl OrganizationRecord {
    /// Creates a verified record at distance 0 with no needs.
    ///
    /// Intended as a starting point for the `with_*` builders.
    ///
    /// ```
    /// use ngo_discovery::domain::{Category, OrganizationRecord};
    ///
    /// let record = OrganizationRecord::new("ngo-1", "Healing Hands", Category::Healthcare)
    ///     .with_distance(2.5)
    ///     .with_rating(4.7);
    /// assert_eq!(record.id.as_str(), "ngo-1");
    /// assert!(record.needs.is_empty());
    /// ```
    #[must_use]
    pub fn new(id: impl Into<OrganizationId>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            verification_status: VerificationStatus::Verified,
            distance_km: 0.0,
            rating: 0.0,
            needs: Vec::new(),
            description: String::new(),
            address: String::new(),
            email: None,
            is_favorited: false,
        }
    }

    #[must_use]
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = distance_km;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn with_verification(mut self, status: VerificationStatus) -> Self {
        self.verification_status = status;
        self
    }

    #[must_use]
    pub fn with_need(mut self, need: NeedEntry) -> Self {
        self.needs.push(need);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_favorited(mut self, is_favorited: bool) -> Self {
        self.is_favorited = is_favorited;
        self
    }

    /// Needs ordered most pressing first, keeping catalog order within a level.
    #[must_use]
    pub fn needs_by_urgency(&self) -> Vec<&NeedEntry> {
        let mut needs: Vec<&NeedEntry> = self.needs.iter().collect();
        needs.sort_by_key(|need| need.urgency.severity());
        needs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_labels_and_slugs() {
        assert_eq!(Category::parse("food-security"), Category::FoodSecurity);
        assert_eq!(Category::parse("Food Security"), Category::FoodSecurity);
        assert_eq!(Category::parse("HEALTHCARE"), Category::Healthcare);
        assert_eq!(Category::parse("space-exploration"), Category::Unknown);
    }

    #[test]
    fn unseen_backend_values_deserialize_as_unknown() {
        let json = r#"{
            "id": "ngo-9",
            "name": "Orbital Aid",
            "category": "Space Exploration",
            "verification_status": "suspended",
            "distance_km": 3.0,
            "needs": [{"item": "Rockets", "urgency": "extreme", "quantity_needed": 1}]
        }"#;

        let record: OrganizationRecord = serde_json::from_str(json).expect("record should parse");
        assert_eq!(record.category, Category::Unknown);
        assert_eq!(record.verification_status, VerificationStatus::Unknown);
        assert_eq!(record.needs[0].urgency, Urgency::Unknown);
        assert!(!record.is_favorited);
    }

    #[test]
    fn category_accepts_slug_alias_in_json() {
        let category: Category = serde_json::from_str("\"child-welfare\"").expect("alias should parse");
        assert_eq!(category, Category::ChildWelfare);
        assert_eq!(serde_json::to_string(&category).expect("serialize"), "\"Child Welfare\"");
    }

    #[test]
    fn enum_values_in_json_ignore_case() {
        let categories: Vec<Category> =
            serde_json::from_str(r#"["food security", "HEALTHCARE", "Elderly-Care", " education "]"#).expect("parse");
        assert_eq!(
            categories,
            vec![
                Category::FoodSecurity,
                Category::Healthcare,
                Category::ElderlyCare,
                Category::Education
            ]
        );

        let status: VerificationStatus = serde_json::from_str("\"Verified\"").expect("parse");
        assert_eq!(status, VerificationStatus::Verified);
        let urgency: Urgency = serde_json::from_str("\"CRITICAL\"").expect("parse");
        assert_eq!(urgency, Urgency::Critical);
    }

    #[test]
    fn progress_is_clamped_and_safe_on_zero() {
        assert_eq!(NeedEntry::new("Tools", Urgency::Low, 0, 5).progress_percent(), 0);
        assert_eq!(NeedEntry::new("Tools", Urgency::Low, 10, 25).progress_percent(), 100);
        assert_eq!(NeedEntry::new("Tools", Urgency::Low, 50, 15).progress_percent(), 30);
    }

    #[test]
    fn needs_by_urgency_puts_critical_first() {
        let record = OrganizationRecord::new("ngo-1", "Test", Category::Education)
            .with_need(NeedEntry::new("Books", Urgency::Medium, 10, 0))
            .with_need(NeedEntry::new("Desks", Urgency::Critical, 5, 0))
            .with_need(NeedEntry::new("Chalk", Urgency::Low, 5, 0));

        let order: Vec<&str> = record.needs_by_urgency().iter().map(|n| n.item.as_str()).collect();
        assert_eq!(order, vec!["Desks", "Books", "Chalk"]);
    }
}
