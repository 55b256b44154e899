//! Worker message types for the storage boundary.
//!
//! This module defines the request and response protocol between the reducer
//! and the worker that owns the storage backend. Messages carry the caller's
//! trace context so worker spans join the same distributed trace.

use crate::discovery::FavoriteTicket;
use crate::domain::OrganizationRecord;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-boundary span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when a message is handled by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across the boundary.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(trace_id = %trace_id, parent_span_id = %parent_span_id, "capturing trace context");
            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_catalog(FetchCatalog {}),
    set_favorite(SetFavorite { ticket: FavoriteTicket }),
}

/// Requests handled by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch a full catalog snapshot.
    FetchCatalog {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist the value installed by an optimistic toggle.
    SetFavorite {
        /// Toggle receipt; echoed back so the reducer can resolve it.
        ticket: FavoriteTicket,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchCatalog { trace_context } | Self::SetFavorite { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Completions sent back by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A snapshot was produced.
    CatalogLoaded { organizations: Vec<OrganizationRecord> },

    /// The provider could not produce a snapshot.
    CatalogFailed { reason: String },

    /// The favorite write reached storage.
    FavoriteSaved { ticket: FavoriteTicket },

    /// The favorite write failed.
    FavoriteFailed { ticket: FavoriteTicket, reason: String },
}
