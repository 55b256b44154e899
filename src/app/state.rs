//! Reducer state and view model computation.
//!
//! This module defines [`AppState`], the single authority over the committed
//! criteria, the debounced query input and the pagination epoch. Every
//! committed change runs filter → rank → pagination reset as one transition,
//! so no caller can observe a window that belongs to older criteria.
//!
//! # State Components
//!
//! - **Catalog**: last good snapshot from the provider
//! - **Criteria**: committed filter criteria, and the defaults clear-all restores
//! - **Query input**: text as typed, ahead of the committed query while a debounce is pending
//! - **Pagination**: ranked set, revealed window and epoch
//! - **Favorites**: optimistic per-id flags
//! - **Status**: initial load, refresh in flight, last surfaced error
//!
//! # Example
//!
//! ```rust
//! use ngo_discovery::app::AppState;
//! use ngo_discovery::domain::{Category, OrganizationRecord, Radius};
//!
//! let mut state = AppState::new(2, 300);
//! state.replace_catalog(vec![
//!     OrganizationRecord::new("a", "Clinic A", Category::Healthcare).with_distance(1.0),
//!     OrganizationRecord::new("b", "Clinic B", Category::Healthcare).with_distance(9.0),
//! ]);
//!
//! let narrowed = state.criteria.clone().with_radius(Radius::Km(5.0));
//! assert!(state.commit(narrowed));
//! assert_eq!(state.window().len(), 1);
//! ```

use super::debounce::{Debouncer, ScheduledTask};
use crate::discovery::{self, FavoriteStore, PageBatch, PageState, PaginationController};
use crate::domain::{ErrorSignal, FilterCriteria, OrganizationId, OrganizationRecord};
use crate::ui::viewmodel::{
    EmptyState, ErrorBanner, FooterInfo, HeaderInfo, NeedSummary, OrganizationCard, SearchBarInfo, UIViewModel,
};
use crate::ui::NEEDS_PER_CARD;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Default delay before a requested page is delivered.
pub const DEFAULT_PAGE_LOAD_DELAY_MS: u64 = 1000;

/// Central reducer state.
///
/// Mutated only by [`crate::app::handle_event`] and the methods below. View
/// models are computed on demand from state snapshots.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Last good catalog snapshot. Never patched in place.
    pub catalog: Vec<OrganizationRecord>,

    /// Criteria the current window was computed for.
    pub criteria: FilterCriteria,

    /// Criteria restored by clear-all.
    default_criteria: FilterCriteria,

    /// Query text as typed.
    pub query_input: String,

    /// `true` until the first snapshot (or first failure) arrives.
    pub loading: bool,

    /// `true` while a catalog refresh is in flight.
    pub refreshing: bool,

    /// Failure shown as a banner until resolved.
    pub last_error: Option<ErrorSignal>,

    debouncer: Debouncer,
    pagination: PaginationController,
    favorites: FavoriteStore,
    page_load_delay_ms: u64,
}

impl AppState {
    /// Creates an empty reducer waiting for its first snapshot.
    ///
    /// # Parameters
    ///
    /// * `page_size` - Records revealed per page (0 is treated as 1)
    /// * `debounce_ms` - Quiet period before typed queries commit
    #[must_use]
    pub fn new(page_size: usize, debounce_ms: u64) -> Self {
        Self {
            catalog: Vec::new(),
            criteria: FilterCriteria::default(),
            default_criteria: FilterCriteria::default(),
            query_input: String::new(),
            loading: true,
            refreshing: false,
            last_error: None,
            debouncer: Debouncer::new(debounce_ms),
            pagination: PaginationController::new(page_size),
            favorites: FavoriteStore::new(),
            page_load_delay_ms: DEFAULT_PAGE_LOAD_DELAY_MS,
        }
    }

    /// Sets the criteria installed now and restored by clear-all.
    #[must_use]
    pub fn with_default_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.query_input.clone_from(&criteria.query);
        self.criteria = criteria.clone();
        self.default_criteria = criteria;
        self
    }

    #[must_use]
    pub fn with_page_load_delay(mut self, delay_ms: u64) -> Self {
        self.page_load_delay_ms = delay_ms;
        self
    }

    /// Commits new criteria and recomputes the window.
    ///
    /// Returns `false` (and leaves the epoch alone) when `criteria` equals the
    /// committed value.
    pub fn commit(&mut self, criteria: FilterCriteria) -> bool {
        if criteria == self.criteria {
            tracing::debug!("criteria unchanged, skipping recompute");
            return false;
        }
        self.criteria = criteria;
        self.recompute();
        true
    }

    /// Runs filter → rank → pagination reset for the committed criteria.
    ///
    /// Returns the new epoch.
    pub fn recompute(&mut self) -> u64 {
        let _span = tracing::debug_span!(
            "recompute",
            catalog_size = self.catalog.len(),
            active_filters = self.criteria.active_filter_count()
        )
        .entered();

        let ranked = discovery::rank(discovery::filter(&self.catalog, &self.criteria));
        let epoch = self.pagination.reset(ranked, self.criteria.clone());

        tracing::debug!(epoch, results = self.pagination.total(), "window recomputed");
        epoch
    }

    /// Records typed text and schedules its debounced commit.
    pub fn set_query_input(&mut self, text: &str) -> ScheduledTask {
        self.query_input = text.to_string();
        self.debouncer.schedule(text)
    }

    /// Commits the pending query if `token` is still current.
    pub fn apply_debounced(&mut self, token: u64) -> bool {
        match self.debouncer.fire(token) {
            Some(text) => {
                let criteria = self.criteria.clone().with_query(text);
                self.commit(criteria)
            }
            None => false,
        }
    }

    /// Resets every criterion to its default in one transition.
    ///
    /// Any pending debounce is cancelled. The epoch moves at most once.
    pub fn clear_all(&mut self) -> bool {
        let cancelled = self.debouncer.cancel();
        self.query_input.clone_from(&self.default_criteria.query);
        let changed = self.commit(self.default_criteria.clone());
        tracing::debug!(cancelled_debounce = cancelled, changed, "filters cleared");
        changed || cancelled
    }

    /// Installs a fresh snapshot and recomputes the current criteria.
    ///
    /// Backend favorite flags seed ids the favorite store has not seen yet.
    pub fn replace_catalog(&mut self, organizations: Vec<OrganizationRecord>) -> u64 {
        for record in &organizations {
            self.favorites.seed(&record.id, record.is_favorited);
        }
        self.catalog = organizations;
        self.loading = false;
        self.refreshing = false;
        if matches!(self.last_error, Some(ErrorSignal::CatalogUnavailable { .. })) {
            self.last_error = None;
        }
        self.recompute()
    }

    /// Marks a refresh in flight and invalidates any pending page load.
    ///
    /// Returns `false` when a refresh is already in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        self.pagination.invalidate();
        true
    }

    /// Ends a failed refresh, keeping the last good snapshot.
    pub fn fail_refresh(&mut self, signal: ErrorSignal) {
        self.refreshing = false;
        self.loading = false;
        self.last_error = Some(signal);
    }

    /// Issues the next page load, if the window is idle.
    pub fn request_page(&mut self) -> Option<PageBatch> {
        let request = self.pagination.request_more()?;
        Some(self.pagination.fetch(&request))
    }

    /// Applies a delivered page. Stale batches are dropped.
    pub fn complete_page(&mut self, batch: PageBatch) -> bool {
        match self.pagination.complete(batch) {
            Ok(_) => true,
            Err(stale) => {
                tracing::debug!(
                    issued_epoch = stale.issued_epoch,
                    current_epoch = stale.current_epoch,
                    "discarding stale page"
                );
                false
            }
        }
    }

    /// Looks an organization up in the current snapshot.
    #[must_use]
    pub fn organization(&self, id: &OrganizationId) -> Option<&OrganizationRecord> {
        self.catalog.iter().find(|record| &record.id == id)
    }

    /// Currently revealed records.
    #[must_use]
    pub fn window(&self) -> &[OrganizationRecord] {
        self.pagination.window()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.pagination.epoch()
    }

    /// Size of the full ranked set.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.pagination.total()
    }

    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.criteria.active_filter_count()
    }

    #[must_use]
    pub fn is_favorite(&self, id: &OrganizationId) -> bool {
        self.favorites.is_favorite(id)
    }

    #[must_use]
    pub const fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn favorites_mut(&mut self) -> &mut FavoriteStore {
        &mut self.favorites
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoriteStore {
        &self.favorites
    }

    #[must_use]
    pub const fn debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub const fn page_load_delay_ms(&self) -> u64 {
        self.page_load_delay_ms
    }

    /// Computes a renderable view model from the current state.
    ///
    /// # Returns
    ///
    /// A [`UIViewModel`] whose cards mirror the revealed window under the
    /// current epoch. Names that contain the committed query carry highlight
    /// ranges for it.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let query = self.criteria.query.trim();
        let matcher = if query.is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        let cards = self
            .window()
            .iter()
            .map(|record| self.compute_card(record, query, matcher.as_ref()))
            .collect();

        UIViewModel {
            header: self.compute_header(),
            search_bar: SearchBarInfo {
                input: self.query_input.clone(),
                pending: self.debouncer.is_pending(),
            },
            cards,
            footer: self.compute_footer(),
            empty_state: self.compute_empty_state(),
            error_banner: self.last_error.as_ref().map(|signal| ErrorBanner {
                message: signal.message(),
                retryable: signal.is_retryable(),
            }),
            epoch: self.epoch(),
        }
    }

    fn compute_card(&self, record: &OrganizationRecord, query: &str, matcher: Option<&SkimMatcherV2>) -> OrganizationCard {
        let needle = query.to_lowercase();
        let highlight_ranges = matcher
            .filter(|_| record.name.to_lowercase().contains(&needle))
            .map_or_else(Vec::new, |m| Self::compute_highlight_ranges(&record.name, &needle, m));

        let needs = record
            .needs_by_urgency()
            .into_iter()
            .take(NEEDS_PER_CARD)
            .map(|need| NeedSummary {
                item: need.item.clone(),
                urgency: need.urgency.as_str().to_string(),
                progress_percent: need.progress_percent(),
                quantity_label: format!("{}/{}", need.quantity_received, need.quantity_needed),
            })
            .collect();

        OrganizationCard {
            id: record.id.to_string(),
            name: record.name.clone(),
            category: record.category.label().to_string(),
            distance_label: format!("{:.1} km", record.distance_km),
            rating_label: format!("{:.1}", record.rating),
            verification: record.verification_status.as_str().to_string(),
            is_favorite: self.favorites.is_favorite(&record.id),
            highlight_ranges,
            needs,
        }
    }

    /// Computes character index ranges to highlight for fuzzy match visualization.
    ///
    /// Consecutive matched indices are coalesced into `(start, end)` ranges
    /// with an exclusive end.
    fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_header(&self) -> HeaderInfo {
        let count = self.result_count();
        let noun = if count == 1 { "NGO" } else { "NGOs" };
        HeaderInfo {
            title: "Discover NGOs".to_string(),
            result_count: format!("{count} {noun} found"),
            active_filters: self.active_filter_count(),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        FooterInfo {
            revealed: self.window().len(),
            total: self.result_count(),
            has_more: self.has_more(),
            loading_more: self.pagination.state() == PageState::LoadingMore,
            refreshing: self.refreshing,
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.window().is_empty() {
            return None;
        }
        if self.loading {
            return Some(EmptyState {
                message: "Loading organizations...".to_string(),
                subtitle: String::new(),
            });
        }
        let subtitle = if self.active_filter_count() > 0 || !self.criteria.query.trim().is_empty() {
            "Try adjusting your search or filters"
        } else {
            "No organizations are available right now"
        };
        Some(EmptyState {
            message: "No NGOs found".to_string(),
            subtitle: subtitle.to_string(),
        })
    }
}
