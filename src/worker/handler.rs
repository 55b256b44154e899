//! Worker implementation for storage round trips.
//!
//! The worker owns the storage backend and turns each [`WorkerMessage`] into a
//! [`WorkerResponse`]. Storage errors never escape: they become `*Failed`
//! responses the reducer knows how to roll back or surface.

use crate::domain::error::Result;
use crate::storage::Storage;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker state for handling storage operations.
pub struct DiscoveryWorker {
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for DiscoveryWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryWorker").finish_non_exhaustive()
    }
}

impl DiscoveryWorker {
    /// Creates a worker backed by `storage`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngo_discovery::storage::MemoryStorage;
    /// use ngo_discovery::worker::{DiscoveryWorker, WorkerMessage, WorkerResponse};
    ///
    /// let mut worker = DiscoveryWorker::new(MemoryStorage::new());
    /// let response = worker.handle_message(WorkerMessage::fetch_catalog());
    /// assert!(matches!(response, WorkerResponse::CatalogLoaded { .. }));
    /// ```
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Helper for handling storage results with consistent logging.
    fn handle_storage_result<T, S, F>(operation: &str, result: Result<T>, on_success: S, on_failure: F) -> WorkerResponse
    where
        S: FnOnce(T) -> WorkerResponse,
        F: FnOnce(String) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                on_failure(e.to_string())
            }
        }
    }

    /// Attaches the parent trace context carried by a message.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns its completion.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchCatalog { .. } => Self::handle_storage_result(
                "fetch catalog",
                self.storage.fetch_catalog(),
                |organizations| {
                    tracing::debug!(count = organizations.len(), "catalog fetched");
                    WorkerResponse::CatalogLoaded { organizations }
                },
                |reason| WorkerResponse::CatalogFailed { reason },
            ),

            WorkerMessage::SetFavorite { ticket, .. } => {
                let result = self.storage.set_favorite(&ticket.id, ticket.value);
                let failed_ticket = ticket.clone();
                Self::handle_storage_result(
                    "set favorite",
                    result,
                    |()| WorkerResponse::FavoriteSaved { ticket },
                    |reason| WorkerResponse::FavoriteFailed {
                        ticket: failed_ticket,
                        reason,
                    },
                )
            }
        }
    }
}
