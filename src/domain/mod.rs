//! Domain layer for the discovery engine.
//!
//! This module contains the value types the engine reasons about, independent
//! of storage, workers or rendering.
//!
//! # Organization
//!
//! - [`error`]: Error types, result alias and surfaced error signals
//! - [`organization`]: Organization records, needs and their enumerations
//! - [`criteria`]: Filter criteria value objects
//!
//! # Examples
//!
//! ```
//! use ngo_discovery::domain::{Category, FilterCriteria, OrganizationRecord, Selection};
//!
//! let record = OrganizationRecord::new("ngo-1", "Community Kitchen", Category::FoodSecurity);
//! let criteria = FilterCriteria::default().with_category(Selection::Only(Category::FoodSecurity));
//! assert!(criteria.category.admits(record.category));
//! ```

pub mod criteria;
pub mod error;
pub mod organization;

pub use criteria::{ClosedSet, FilterCriteria, Radius, Selection};
pub use error::{DiscoveryError, ErrorSignal, Result};
pub use organization::{
    Category, NeedEntry, OrganizationId, OrganizationRecord, Urgency, VerificationStatus,
};
