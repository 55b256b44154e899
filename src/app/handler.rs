//! Event handling and state transition logic.
//!
//! This module implements the reducer entry point: it processes user input,
//! timer expirations, page deliveries and worker responses, translating them
//! into state changes and action sequences.
//!
//! # Architecture
//!
//! 1. Events arrive from the runtime (user commands or scheduled completions)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Input**: `QueryChanged`, `DebounceElapsed`, the `*Selected` filters, `ClearFilters`
//! - **Pagination**: `LoadMore`, `PageLoaded`
//! - **Data**: `Refresh`, `WorkerResponse`
//! - **Item actions**: `ToggleFavorite`, `DonateNow`, `Contact`

use crate::app::{Action, AppState};
use crate::discovery::{FavoriteResolution, PageBatch};
use crate::domain::error::{DiscoveryError, Result};
use crate::domain::{Category, ErrorSignal, OrganizationId, Radius, Selection, Urgency, VerificationStatus};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, timers, or worker responses.
///
/// The handler processes these sequentially, so every transition observes the
/// result of the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The search box text changed. Committed after the debounce delay.
    QueryChanged { text: String },

    /// A debounce timer elapsed.
    DebounceElapsed { token: u64 },

    RadiusSelected(Radius),
    CategorySelected(Selection<Category>),
    VerificationSelected(Selection<VerificationStatus>),
    UrgencySelected(Selection<Urgency>),

    /// Reset every criterion to its default.
    ClearFilters,

    /// The user scrolled to the end of the window.
    LoadMore,

    /// A requested page arrived.
    PageLoaded(PageBatch),

    /// Fetch a new catalog snapshot. Also used for the initial load.
    Refresh,

    ToggleFavorite { id: OrganizationId },

    /// Start a donation, optionally for one of the organization's needs.
    DonateNow {
        id: OrganizationId,
        need_index: Option<usize>,
    },

    Contact { id: OrganizationId },

    /// Wraps a response from the storage worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// `(render, actions)`: whether the view changed, and the side effects to run
/// in order.
///
/// # Errors
///
/// Returns [`DiscoveryError::UnknownOrganization`] or
/// [`DiscoveryError::InvalidNeed`] when a donate/contact event names something
/// absent from the current snapshot. State is untouched in that case.
///
/// # Example
///
/// ```rust
/// use ngo_discovery::app::{handle_event, Action, AppState, Event};
///
/// let mut state = AppState::new(6, 300);
/// let (_, actions) = handle_event(&mut state, &Event::QueryChanged { text: "water".into() })?;
/// assert!(matches!(actions[0], Action::ScheduleDebounce { delay_ms: 300, .. }));
/// # Ok::<(), ngo_discovery::DiscoveryError>(())
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event, epoch = state.epoch()).entered();

    match event {
        Event::QueryChanged { text } => {
            let task = state.set_query_input(text);
            tracing::trace!(query = %text, token = task.token, "query input updated");
            Ok((
                true,
                vec![Action::ScheduleDebounce {
                    token: task.token,
                    delay_ms: task.delay_ms,
                }],
            ))
        }
        Event::DebounceElapsed { token } => Ok((state.apply_debounced(*token), vec![])),
        Event::RadiusSelected(radius) => {
            let criteria = state.criteria.clone().with_radius(*radius);
            Ok((state.commit(criteria), vec![]))
        }
        Event::CategorySelected(category) => {
            let criteria = state.criteria.clone().with_category(*category);
            Ok((state.commit(criteria), vec![]))
        }
        Event::VerificationSelected(verification) => {
            let criteria = state.criteria.clone().with_verification(*verification);
            Ok((state.commit(criteria), vec![]))
        }
        Event::UrgencySelected(urgency) => {
            let criteria = state.criteria.clone().with_urgency(*urgency);
            Ok((state.commit(criteria), vec![]))
        }
        Event::ClearFilters => Ok((state.clear_all(), vec![])),
        Event::LoadMore => state.request_page().map_or_else(
            || Ok((false, vec![])),
            |batch| {
                tracing::debug!(offset = batch.offset, count = batch.records.len(), "page requested");
                Ok((
                    true,
                    vec![Action::DeliverPage {
                        batch,
                        delay_ms: state.page_load_delay_ms(),
                    }],
                ))
            },
        ),
        Event::PageLoaded(batch) => Ok((state.complete_page(batch.clone()), vec![])),
        Event::Refresh => {
            if !state.begin_refresh() {
                tracing::debug!("refresh already in flight");
                return Ok((false, vec![]));
            }
            Ok((true, vec![Action::PostToWorker(WorkerMessage::fetch_catalog())]))
        }
        Event::ToggleFavorite { id } => {
            let ticket = state.favorites_mut().toggle(id);
            Ok((true, vec![Action::PostToWorker(WorkerMessage::set_favorite(ticket))]))
        }
        Event::DonateNow { id, need_index } => {
            let organization = state
                .organization(id)
                .ok_or_else(|| DiscoveryError::UnknownOrganization(id.clone()))?;
            let need = match need_index {
                Some(index) => Some(organization.needs.get(*index).cloned().ok_or_else(|| {
                    DiscoveryError::InvalidNeed {
                        id: id.clone(),
                        index: *index,
                    }
                })?),
                None => None,
            };
            tracing::debug!(id = %id, need = ?need.as_ref().map(|n| &n.item), "navigating to donation");
            Ok((
                false,
                vec![Action::NavigateToDonation {
                    organization_id: id.clone(),
                    need,
                }],
            ))
        }
        Event::Contact { id } => {
            let organization = state
                .organization(id)
                .ok_or_else(|| DiscoveryError::UnknownOrganization(id.clone()))?;
            Ok((
                false,
                vec![Action::OpenContact {
                    organization_id: id.clone(),
                    email: organization.email.clone(),
                    subject: format!("Inquiry about donation to {}", organization.name),
                }],
            ))
        }
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::CatalogLoaded { organizations } => {
            let epoch = state.replace_catalog(organizations.clone());
            tracing::info!(count = organizations.len(), epoch, "catalog loaded");
            (true, vec![])
        }
        WorkerResponse::CatalogFailed { reason } => {
            tracing::warn!(reason = %reason, "catalog refresh failed, keeping last snapshot");
            let signal = ErrorSignal::CatalogUnavailable { reason: reason.clone() };
            state.fail_refresh(signal.clone());
            (true, vec![Action::Surface(signal)])
        }
        WorkerResponse::FavoriteSaved { ticket } => {
            let shown = state.is_favorite(&ticket.id);
            if state.favorites_mut().confirm(ticket) == FavoriteResolution::Superseded {
                return (false, vec![]);
            }
            if matches!(&state.last_error, Some(ErrorSignal::PersistenceFailure { id, .. }) if id == &ticket.id) {
                state.last_error = None;
                return (true, vec![]);
            }
            (state.is_favorite(&ticket.id) != shown, vec![])
        }
        WorkerResponse::FavoriteFailed { ticket, reason } => match state.favorites_mut().reject(ticket) {
            FavoriteResolution::RolledBack { restored } => {
                tracing::warn!(id = %ticket.id, restored, reason = %reason, "favorite rolled back");
                let signal = ErrorSignal::PersistenceFailure {
                    id: ticket.id.clone(),
                    reason: reason.clone(),
                };
                state.last_error = Some(signal.clone());
                (true, vec![Action::Surface(signal)])
            }
            FavoriteResolution::Superseded | FavoriteResolution::Confirmed => (false, vec![]),
        },
    }
}
