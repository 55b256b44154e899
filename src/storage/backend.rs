//! Storage backend abstraction.
//!
//! The engine talks to two external collaborators: a catalog provider that
//! hands out full snapshots, and a persistence sink for favorite flags. Both
//! are traits so the worker can run against a JSON file or an in-memory fake
//! without changing any business logic.

use crate::domain::error::Result;
use crate::domain::{OrganizationId, OrganizationRecord};

/// Source of organization snapshots.
pub trait CatalogProvider: Send {
    /// Returns the full current catalog.
    ///
    /// Called on the initial load and on every explicit refresh. The engine
    /// never asks for partial snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DiscoveryError::CatalogUnavailable`] (or an I/O or
    /// storage error) when no snapshot can be produced.
    fn fetch_catalog(&self) -> Result<Vec<OrganizationRecord>>;
}

/// Sink for favorite flag writes.
pub trait FavoritePersistence: Send {
    /// Persists the favorite flag for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not reach durable storage; the caller
    /// rolls back its optimistic value.
    fn set_favorite(&mut self, id: &OrganizationId, value: bool) -> Result<()>;
}

/// A backend providing both catalog reads and favorite writes.
///
/// # Implementations
///
/// - [`crate::storage::JsonStorage`]: JSON files with atomic writes
/// - [`crate::storage::MemoryStorage`]: in-process, with failure injection
pub trait Storage: CatalogProvider + FavoritePersistence {}

impl<T: CatalogProvider + FavoritePersistence> Storage for T {}
