//! JSON file-based storage backend.
//!
//! The catalog is read from its file on every fetch so an edited file shows up
//! on the next refresh. Favorites live in a second file that is rewritten with
//! an atomic write (write-to-temp + rename) on every change.
//!
//! # Performance Characteristics
//!
//! - **Catalog fetch**: O(n) - parses the whole catalog file
//! - **Favorite write**: O(f) - serializes every stored favorite
//! - **Best for**: catalogs of a few thousand organizations

use crate::domain::error::{DiscoveryError, Result};
use crate::domain::{OrganizationId, OrganizationRecord};
use crate::storage::backend::{CatalogProvider, FavoritePersistence};
use crate::storage::models::{CatalogFile, FavoriteRecord, FavoritesData};
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`; it is owned by the single worker.
///
/// # Examples
///
/// ```no_run
/// use ngo_discovery::storage::{CatalogProvider, JsonStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(
///     PathBuf::from("catalog.json"),
///     PathBuf::from("/tmp/favorites.json"),
/// )?;
/// let organizations = storage.fetch_catalog()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JsonStorage {
    catalog_path: PathBuf,
    favorites_path: PathBuf,
    favorites: FavoritesData,
}

impl JsonStorage {
    /// Opens the backend, loading existing favorites if the file exists.
    ///
    /// The catalog file is not touched until the first fetch. The favorites
    /// file's parent directory is created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The favorites file exists but contains invalid JSON
    pub fn new(catalog_path: PathBuf, favorites_path: PathBuf) -> Result<Self> {
        tracing::debug!(catalog = ?catalog_path, favorites = ?favorites_path, "initializing JSON storage");

        if let Some(parent) = favorites_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let favorites = if favorites_path.exists() {
            Self::load_favorites(&favorites_path)?
        } else {
            tracing::debug!("initializing empty favorites");
            FavoritesData::default()
        };

        tracing::debug!(favorite_count = favorites.favorites.len(), "storage initialized");

        Ok(Self {
            catalog_path,
            favorites_path,
            favorites,
        })
    }

    /// Parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CatalogUnavailable`] when the file cannot be
    /// read or parsed.
    pub fn read_catalog(path: &Path) -> Result<Vec<OrganizationRecord>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DiscoveryError::CatalogUnavailable(format!("{}: {e}", path.display())))?;
        let file: CatalogFile = serde_json::from_str(&contents)
            .map_err(|e| DiscoveryError::CatalogUnavailable(format!("invalid catalog JSON: {e}")))?;
        Ok(file.organizations)
    }

    /// Persisted favorites, for inspection.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesData {
        &self.favorites
    }

    fn load_favorites(path: &Path) -> Result<FavoritesData> {
        let contents = std::fs::read_to_string(path)?;
        let data: FavoritesData = serde_json::from_str(&contents)
            .map_err(|e| DiscoveryError::Storage(format!("failed to parse favorites JSON: {e}")))?;

        tracing::debug!(version = data.version, favorites = data.favorites.len(), "loaded favorites");
        Ok(data)
    }

    /// Writes favorites to disk atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    fn save_favorites(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.favorites)
            .map_err(|e| DiscoveryError::Storage(format!("failed to serialize favorites: {e}")))?;

        let tmp_path = self.favorites_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.favorites_path)?;

        tracing::debug!(path = ?self.favorites_path, "favorites saved");
        Ok(())
    }
}

impl CatalogProvider for JsonStorage {
    fn fetch_catalog(&self) -> Result<Vec<OrganizationRecord>> {
        let _span = tracing::debug_span!("json_fetch_catalog", path = ?self.catalog_path).entered();

        let mut organizations = Self::read_catalog(&self.catalog_path)?;
        self.favorites.overlay(&mut organizations);

        tracing::debug!(count = organizations.len(), "catalog fetched");
        Ok(organizations)
    }
}

impl FavoritePersistence for JsonStorage {
    fn set_favorite(&mut self, id: &OrganizationId, value: bool) -> Result<()> {
        let _span = tracing::debug_span!("json_set_favorite", id = %id, value).entered();

        let previous = self.favorites.favorites.insert(id.clone(), FavoriteRecord::new(value));

        if let Err(e) = self.save_favorites() {
            // Memory mirrors disk after a failed write.
            match previous {
                Some(record) => self.favorites.favorites.insert(id.clone(), record),
                None => self.favorites.favorites.remove(id),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "organizations": [
            {"id": "ngo-1", "name": "Hope Foundation", "category": "Education",
             "verification_status": "verified", "distance_km": 1.5, "rating": 4.5},
            {"id": "ngo-2", "name": "Annapurna Kitchen", "category": "food-security",
             "verification_status": "pending", "distance_km": 3.0, "is_favorited": true}
        ]
    }"#;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, CATALOG).expect("write catalog");
        let favorites = dir.path().join("data").join("favorites.json");
        (dir, catalog, favorites)
    }

    #[test]
    fn fetches_catalog_with_backend_flags() {
        let (_dir, catalog, favorites) = setup();
        let storage = JsonStorage::new(catalog, favorites).expect("storage");

        let organizations = storage.fetch_catalog().expect("fetch");
        assert_eq!(organizations.len(), 2);
        assert!(!organizations[0].is_favorited);
        assert!(organizations[1].is_favorited);
    }

    #[test]
    fn persisted_favorites_overlay_catalog_and_survive_reopen() {
        let (_dir, catalog, favorites) = setup();
        {
            let mut storage = JsonStorage::new(catalog.clone(), favorites.clone()).expect("storage");
            storage.set_favorite(&OrganizationId::new("ngo-1"), true).expect("set");
            storage.set_favorite(&OrganizationId::new("ngo-2"), false).expect("set");
        }
        assert!(favorites.exists());

        let storage = JsonStorage::new(catalog, favorites).expect("reopen");
        assert_eq!(storage.favorites().favorites.len(), 2);
        let organizations = storage.fetch_catalog().expect("fetch");
        assert!(organizations[0].is_favorited);
        assert!(!organizations[1].is_favorited);
    }

    #[test]
    fn failed_write_leaves_memory_matching_disk() {
        let (_dir, catalog, favorites) = setup();
        let mut storage = JsonStorage::new(catalog, favorites.clone()).expect("storage");
        std::fs::create_dir_all(&favorites).expect("block target with a directory");

        assert!(storage.set_favorite(&OrganizationId::new("ngo-1"), true).is_err());
        assert!(storage.favorites().favorites.is_empty());
        let organizations = storage.fetch_catalog().expect("fetch");
        assert!(!organizations[0].is_favorited);
    }

    #[test]
    fn missing_catalog_is_unavailable() {
        let (dir, _catalog, favorites) = setup();
        let storage = JsonStorage::new(dir.path().join("nope.json"), favorites).expect("storage");
        assert!(matches!(storage.fetch_catalog(), Err(DiscoveryError::CatalogUnavailable(_))));
    }

    #[test]
    fn corrupt_favorites_file_is_a_storage_error() {
        let (_dir, catalog, favorites) = setup();
        std::fs::create_dir_all(favorites.parent().expect("parent")).expect("mkdir");
        std::fs::write(&favorites, "{ not json").expect("write");
        assert!(matches!(JsonStorage::new(catalog, favorites), Err(DiscoveryError::Storage(_))));
    }
}
