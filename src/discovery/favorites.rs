//! Optimistic favorite flags with versioned rollback.
//!
//! Toggling flips the in-memory flag immediately and hands back a
//! [`FavoriteTicket`] stamped with the key's new version. When persistence
//! later fails, the flag falls back to the last value the backend
//! acknowledged, but only if no newer toggle has touched that key since;
//! otherwise the failure is superseded and ignored.

use crate::domain::OrganizationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FavoriteEntry {
    value: bool,
    version: u64,
    /// Version stamped by the most recent toggle. Rollbacks bump `version` only.
    toggled: u64,
    confirmed: bool,
    confirmed_version: u64,
}

/// Receipt for one optimistic toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteTicket {
    pub id: OrganizationId,
    /// Value installed by the toggle.
    pub value: bool,
    /// Value before the toggle.
    pub previous: bool,
    /// Key version after the toggle.
    pub version: u64,
}

/// Outcome of resolving a ticket against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteResolution {
    Confirmed,
    /// The optimistic value was reverted to the last acknowledged `restored`.
    RolledBack { restored: bool },
    /// A newer toggle owns the key; nothing changed.
    Superseded,
}

/// Per-organization favorite flags.
#[derive(Debug, Clone, Default)]
pub struct FavoriteStore {
    entries: HashMap<OrganizationId, FavoriteEntry>,
}

impl FavoriteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a backend flag for an id the store has never seen.
    ///
    /// Known ids keep their in-memory value.
    pub fn seed(&mut self, id: &OrganizationId, value: bool) {
        self.entries.entry(id.clone()).or_insert(FavoriteEntry {
            value,
            confirmed: value,
            ..FavoriteEntry::default()
        });
    }

    #[must_use]
    pub fn is_favorite(&self, id: &OrganizationId) -> bool {
        self.entries.get(id).is_some_and(|entry| entry.value)
    }

    /// Last value persistence acknowledged for `id`.
    #[must_use]
    pub fn confirmed(&self, id: &OrganizationId) -> bool {
        self.entries.get(id).is_some_and(|entry| entry.confirmed)
    }

    /// Flips the flag for `id` and returns the ticket to resolve later.
    pub fn toggle(&mut self, id: &OrganizationId) -> FavoriteTicket {
        let entry = self.entries.entry(id.clone()).or_default();
        let previous = entry.value;
        entry.value = !previous;
        entry.version += 1;
        entry.toggled = entry.version;

        tracing::debug!(id = %id, value = entry.value, version = entry.version, "favorite toggled");
        FavoriteTicket {
            id: id.clone(),
            value: entry.value,
            previous,
            version: entry.version,
        }
    }

    /// Records a successful write of `ticket.value`.
    ///
    /// Acknowledgements older than the last confirmed one are superseded. When
    /// the key was rolled back after its latest toggle, the flag follows the
    /// newly acknowledged value.
    pub fn confirm(&mut self, ticket: &FavoriteTicket) -> FavoriteResolution {
        let entry = self.entries.entry(ticket.id.clone()).or_default();
        if ticket.version < entry.confirmed_version {
            tracing::debug!(id = %ticket.id, version = ticket.version, "stale favorite acknowledgement");
            return FavoriteResolution::Superseded;
        }

        entry.confirmed = ticket.value;
        entry.confirmed_version = ticket.version;
        if entry.version != entry.toggled && entry.value != entry.confirmed {
            entry.value = entry.confirmed;
            entry.version += 1;
        }
        FavoriteResolution::Confirmed
    }

    /// Reverts a failed toggle if it is still the latest one for its key.
    ///
    /// A rollback counts as a new write, so it bumps the version too.
    pub fn reject(&mut self, ticket: &FavoriteTicket) -> FavoriteResolution {
        match self.entries.get_mut(&ticket.id) {
            Some(entry) if entry.version == ticket.version => {
                entry.value = entry.confirmed;
                entry.version += 1;
                tracing::debug!(id = %ticket.id, restored = entry.confirmed, "favorite rolled back");
                FavoriteResolution::RolledBack {
                    restored: entry.confirmed,
                }
            }
            _ => {
                tracing::debug!(id = %ticket.id, version = ticket.version, "favorite failure superseded");
                FavoriteResolution::Superseded
            }
        }
    }

    /// Current version of `id`, 0 when never toggled.
    #[must_use]
    pub fn version(&self, id: &OrganizationId) -> u64 {
        self.entries.get(id).map_or(0, |entry| entry.version)
    }
}
