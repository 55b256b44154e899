//! Error types for the discovery engine.
//!
//! This module defines the centralized error type [`DiscoveryError`], the
//! [`Result`] alias used throughout the crate, and [`ErrorSignal`], the
//! cloneable value the reducer hands to its caller when a boundary operation
//! (catalog refresh, favorite confirmation) fails.
//!
//! Stale async completions are not errors from the caller's point of view; the
//! pagination controller reports them as [`crate::discovery::StaleResult`] and
//! the reducer drops them.

use crate::domain::OrganizationId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for discovery operations.
///
/// Filtering and ranking are total and never produce one of these; errors only
/// come from the storage boundary, configuration, or caller input that names
/// something the engine does not know about.
///
/// # Examples
///
/// ```
/// use ngo_discovery::DiscoveryError;
///
/// fn refresh() -> Result<(), DiscoveryError> {
///     Err(DiscoveryError::CatalogUnavailable("backend timed out".to_string()))
/// }
///
/// assert!(refresh().is_err());
/// ```
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The catalog provider could not produce a snapshot.
    ///
    /// The reducer keeps its last good snapshot when this happens.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A favorite could not be persisted.
    #[error("Failed to persist favorite for {id}: {reason}")]
    PersistenceFailure {
        /// Organization whose favorite flag was being written.
        id: OrganizationId,
        /// Backend-provided description.
        reason: String,
    },

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the storage worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// An event referenced an organization that is not in the current snapshot.
    #[error("Unknown organization: {0}")]
    UnknownOrganization(OrganizationId),

    /// A donation request referenced a need index the organization does not have.
    #[error("Organization {id} has no need at index {index}")]
    InvalidNeed {
        /// Organization the need was looked up on.
        id: OrganizationId,
        /// Requested position in the organization's need list.
        index: usize,
    },

    /// A text command could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// A specialized `Result` type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Failure surfaced to the caller after a boundary operation did not succeed.
///
/// Unlike [`DiscoveryError`], signals are plain values: they travel inside
/// [`crate::app::Action::Surface`] and are kept on the state for rendering a
/// banner. The engine state is already back in its last valid configuration by
/// the time a signal is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSignal {
    /// Refresh failed; the previous snapshot is still in use and a retry is possible.
    CatalogUnavailable {
        /// Backend-provided description.
        reason: String,
    },

    /// A favorite confirmation failed and the optimistic value was rolled back.
    PersistenceFailure {
        /// Organization whose favorite flag was restored.
        id: OrganizationId,
        /// Backend-provided description.
        reason: String,
    },
}

impl ErrorSignal {
    /// Short human-readable message for banners and logs.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::CatalogUnavailable { reason } => {
                format!("Could not refresh organizations ({reason})")
            }
            Self::PersistenceFailure { id, reason } => {
                format!("Could not update favorite for {id} ({reason})")
            }
        }
    }

    /// Whether the UI should offer a retry affordance for this signal.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::CatalogUnavailable { .. })
    }
}

impl From<ErrorSignal> for DiscoveryError {
    fn from(signal: ErrorSignal) -> Self {
        match signal {
            ErrorSignal::CatalogUnavailable { reason } => Self::CatalogUnavailable(reason),
            ErrorSignal::PersistenceFailure { id, reason } => Self::PersistenceFailure { id, reason },
        }
    }
}
