//! View model types representing renderable UI state.
//!
//! View models are immutable snapshots computed by
//! [`crate::app::AppState::compute_viewmodel`] and consumed by the renderer.
//! They contain no business logic, only display-ready data such as labels,
//! progress percentages and highlight ranges.

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Title, result count and filter badge.
    pub header: HeaderInfo,

    /// Search input state.
    pub search_bar: SearchBarInfo,

    /// Cards for the revealed window, in ranked order.
    pub cards: Vec<OrganizationCard>,

    /// Pagination and refresh indicators.
    pub footer: FooterInfo,

    /// Set when there is nothing to show (still loading, or no matches).
    pub empty_state: Option<EmptyState>,

    /// Last surfaced failure.
    pub error_banner: Option<ErrorBanner>,

    /// Epoch the window was rendered under.
    pub epoch: u64,
}

/// Display information for one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationCard {
    pub id: String,
    pub name: String,
    pub category: String,
    /// e.g. `"2.5 km"`.
    pub distance_label: String,
    /// e.g. `"4.7"`.
    pub rating_label: String,
    /// `"verified"`, `"pending"`, ...
    pub verification: String,
    pub is_favorite: bool,
    /// Character ranges of `name` matched by the query, `(start, end)` exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,
    /// Most pressing needs first, at most [`crate::ui::NEEDS_PER_CARD`].
    pub needs: Vec<NeedSummary>,
}

/// One need line on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedSummary {
    pub item: String,
    pub urgency: String,
    pub progress_percent: u8,
    /// e.g. `"150/500"`.
    pub quantity_label: String,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// e.g. `"3 NGOs found"`.
    pub result_count: String,

    /// Number of non-default filters other than the query.
    pub active_filters: usize,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub revealed: usize,
    pub total: usize,
    pub has_more: bool,
    pub loading_more: bool,
    pub refreshing: bool,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No NGOs found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Text as typed, possibly not yet committed.
    pub input: String,

    /// Whether a debounced commit is still pending.
    pub pending: bool,
}

/// Error banner display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,

    /// Whether a retry affordance should be offered.
    pub retryable: bool,
}
