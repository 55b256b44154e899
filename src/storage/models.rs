//! On-disk record formats.
//!
//! These types describe the JSON files the file backend reads and writes. They
//! are kept apart from the domain model so the file layout can carry a version
//! and per-entry metadata without leaking into the engine.

use crate::domain::{OrganizationId, OrganizationRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current favorites file format version.
pub const FAVORITES_FORMAT_VERSION: u32 = 1;

/// Catalog file: `{"organizations": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub organizations: Vec<OrganizationRecord>,
}

/// One persisted favorite flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub value: bool,
    /// Unix timestamp of the last write.
    pub updated_at: i64,
}

impl FavoriteRecord {
    /// Creates a record stamped with the current time.
    ///
    /// ```
    /// use ngo_discovery::storage::FavoriteRecord;
    ///
    /// let record = FavoriteRecord::new(true);
    /// assert!(record.value);
    /// assert!(record.updated_at > 0);
    /// ```
    #[must_use]
    pub fn new(value: bool) -> Self {
        Self {
            value,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Favorites file container.
///
/// ```json
/// {
///   "version": 1,
///   "favorites": {
///     "ngo-3": { "value": true, "updated_at": 1718000000 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesData {
    pub version: u32,
    #[serde(default)]
    pub favorites: BTreeMap<OrganizationId, FavoriteRecord>,
}

impl Default for FavoritesData {
    fn default() -> Self {
        Self {
            version: FAVORITES_FORMAT_VERSION,
            favorites: BTreeMap::new(),
        }
    }
}

impl FavoritesData {
    /// Overwrites each record's `is_favorited` flag with the persisted value, if any.
    pub fn overlay(&self, records: &mut [OrganizationRecord]) {
        for record in records {
            if let Some(favorite) = self.favorites.get(&record.id) {
                record.is_favorited = favorite.value;
            }
        }
    }
}
