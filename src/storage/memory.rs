//! In-memory storage backend.
//!
//! Handles are cheap clones sharing one state, so a test can keep a handle,
//! give another to the worker, and flip failure switches while a flow runs.

use crate::domain::error::{DiscoveryError, Result};
use crate::domain::{OrganizationId, OrganizationRecord};
use crate::storage::backend::{CatalogProvider, FavoritePersistence};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    catalog: Vec<OrganizationRecord>,
    favorites: HashMap<OrganizationId, bool>,
    fail_catalog: Option<String>,
    failing_favorites: HashSet<OrganizationId>,
    fetch_calls: u64,
    favorite_writes: u64,
}

/// Shared in-process backend with failure injection.
///
/// # Examples
///
/// ```
/// use ngo_discovery::domain::{Category, OrganizationRecord};
/// use ngo_discovery::storage::{CatalogProvider, MemoryStorage};
///
/// let storage = MemoryStorage::with_catalog(vec![
///     OrganizationRecord::new("ngo-1", "Hope Foundation", Category::Education),
/// ]);
/// assert_eq!(storage.fetch_catalog()?.len(), 1);
///
/// storage.fail_catalog("backend offline");
/// assert!(storage.fetch_catalog().is_err());
/// # Ok::<(), ngo_discovery::DiscoveryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(catalog: Vec<OrganizationRecord>) -> Self {
        let storage = Self::new();
        storage.set_catalog(catalog);
        storage
    }

    /// Replaces the catalog served by later fetches.
    pub fn set_catalog(&self, catalog: Vec<OrganizationRecord>) {
        if let Ok(mut state) = self.lock() {
            state.catalog = catalog;
        }
    }

    /// Makes every catalog fetch fail with `reason` until [`Self::heal_catalog`].
    pub fn fail_catalog(&self, reason: impl Into<String>) {
        if let Ok(mut state) = self.lock() {
            state.fail_catalog = Some(reason.into());
        }
    }

    pub fn heal_catalog(&self) {
        if let Ok(mut state) = self.lock() {
            state.fail_catalog = None;
        }
    }

    /// Makes favorite writes for `id` fail until [`Self::heal_favorite`].
    pub fn fail_favorite(&self, id: &OrganizationId) {
        if let Ok(mut state) = self.lock() {
            state.failing_favorites.insert(id.clone());
        }
    }

    pub fn heal_favorite(&self, id: &OrganizationId) {
        if let Ok(mut state) = self.lock() {
            state.failing_favorites.remove(id);
        }
    }

    /// Last successfully written flag for `id`.
    #[must_use]
    pub fn stored_favorite(&self, id: &OrganizationId) -> Option<bool> {
        self.lock().ok().and_then(|state| state.favorites.get(id).copied())
    }

    #[must_use]
    pub fn fetch_calls(&self) -> u64 {
        self.lock().map_or(0, |state| state.fetch_calls)
    }

    #[must_use]
    pub fn favorite_writes(&self) -> u64 {
        self.lock().map_or(0, |state| state.favorite_writes)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| DiscoveryError::Storage("memory storage lock poisoned".to_string()))
    }
}

impl CatalogProvider for MemoryStorage {
    fn fetch_catalog(&self) -> Result<Vec<OrganizationRecord>> {
        let _span = tracing::debug_span!("memory_fetch_catalog").entered();
        let mut state = self.lock()?;
        state.fetch_calls += 1;

        if let Some(reason) = &state.fail_catalog {
            tracing::debug!(reason = %reason, "injected catalog failure");
            return Err(DiscoveryError::CatalogUnavailable(reason.clone()));
        }

        let mut catalog = state.catalog.clone();
        for record in &mut catalog {
            if let Some(value) = state.favorites.get(&record.id) {
                record.is_favorited = *value;
            }
        }
        Ok(catalog)
    }
}

impl FavoritePersistence for MemoryStorage {
    fn set_favorite(&mut self, id: &OrganizationId, value: bool) -> Result<()> {
        let _span = tracing::debug_span!("memory_set_favorite", id = %id, value).entered();
        let mut state = self.lock()?;

        if state.failing_favorites.contains(id) {
            tracing::debug!("injected favorite failure");
            return Err(DiscoveryError::PersistenceFailure {
                id: id.clone(),
                reason: "write rejected".to_string(),
            });
        }

        state.favorites.insert(id.clone(), value);
        state.favorite_writes += 1;
        Ok(())
    }
}
