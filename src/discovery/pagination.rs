//! Pagination controller for incrementally revealed result windows.
//!
//! The controller owns the current [`RankedResultSet`] and reveals it page by
//! page. Every reset or invalidation increments the epoch; a page load that
//! completes under a different epoch is reported as a [`StaleResult`] and
//! leaves the window untouched.
//!
//! # State Machine
//!
//! ```text
//!            reset (more remain)          request_more
//!   ───────────────────────────▶ Idle ───────────────────▶ LoadingMore
//!                                 ▲                             │
//!                                 └──── complete (more remain) ─┤
//!   reset (all revealed)                                        │
//!   ───────────────────────────▶ Exhausted ◀── complete (done) ─┘
//! ```

use super::rank::RankedResultSet;
use crate::domain::{FilterCriteria, OrganizationRecord};
use thiserror::Error;

/// Number of records revealed on reset and per page load.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Load state of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// More records remain and no load is in flight.
    Idle,
    /// A page request is in flight.
    LoadingMore,
    /// Every ranked record is revealed.
    Exhausted,
}

/// A page load issued by [`PaginationController::request_more`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub offset: usize,
    pub limit: usize,
}

/// Records delivered for a [`PageRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch {
    pub epoch: u64,
    pub offset: usize,
    pub records: Vec<OrganizationRecord>,
}

/// A page completion that no longer applies to the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stale page result from epoch {issued_epoch} (current epoch {current_epoch})")]
pub struct StaleResult {
    pub issued_epoch: u64,
    pub current_epoch: u64,
}

/// Stateful window over a ranked sequence.
///
/// # Invariants
///
/// - `revealed <= ranked.len()`
/// - `has_more() == (revealed < ranked.len())`
/// - `state() == LoadingMore` only between `request_more` and the matching
///   `complete` (or the next reset/invalidate)
#[derive(Debug, Clone)]
pub struct PaginationController {
    page_size: usize,
    ranked: RankedResultSet,
    revealed: usize,
    state: PageState,
    epoch: u64,
}

impl PaginationController {
    /// Creates an empty, exhausted controller. A `page_size` of 0 becomes 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ranked: RankedResultSet::default(),
            revealed: 0,
            state: PageState::Exhausted,
            epoch: 0,
        }
    }

    /// Installs a new ranked set and reveals its first page.
    ///
    /// Returns the new epoch.
    pub fn reset(&mut self, records: Vec<OrganizationRecord>, criteria: FilterCriteria) -> u64 {
        self.epoch += 1;
        self.revealed = self.page_size.min(records.len());
        self.ranked = RankedResultSet {
            criteria,
            epoch: self.epoch,
            records,
        };
        self.state = self.settled_state();

        tracing::debug!(
            epoch = self.epoch,
            total = self.ranked.len(),
            revealed = self.revealed,
            state = ?self.state,
            "pagination reset"
        );
        self.epoch
    }

    /// Bumps the epoch without replacing the ranked set.
    ///
    /// An in-flight load is abandoned: its completion will be stale, and the
    /// state leaves `LoadingMore` immediately.
    pub fn invalidate(&mut self) -> u64 {
        self.epoch += 1;
        if self.state == PageState::LoadingMore {
            self.state = self.settled_state();
        }
        tracing::debug!(epoch = self.epoch, "pagination invalidated");
        self.epoch
    }

    /// Starts loading the next page. Only effective in [`PageState::Idle`].
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if self.state != PageState::Idle {
            tracing::trace!(state = ?self.state, "request_more ignored");
            return None;
        }
        self.state = PageState::LoadingMore;
        Some(PageRequest {
            epoch: self.epoch,
            offset: self.revealed,
            limit: self.page_size,
        })
    }

    /// Reads the records a request asks for from the current ranked set.
    #[must_use]
    pub fn fetch(&self, request: &PageRequest) -> PageBatch {
        let start = request.offset.min(self.ranked.len());
        let end = request.offset.saturating_add(request.limit).min(self.ranked.len());
        PageBatch {
            epoch: request.epoch,
            offset: request.offset,
            records: self.ranked.records[start..end].to_vec(),
        }
    }

    /// Applies a delivered batch.
    ///
    /// Returns the number of records appended.
    ///
    /// # Errors
    ///
    /// Returns [`StaleResult`] without touching the window when the batch was
    /// issued under another epoch, no load is in flight, or the batch does not
    /// start where the window ends.
    pub fn complete(&mut self, batch: PageBatch) -> Result<usize, StaleResult> {
        let stale = StaleResult {
            issued_epoch: batch.epoch,
            current_epoch: self.epoch,
        };
        if batch.epoch != self.epoch || self.state != PageState::LoadingMore || batch.offset != self.revealed {
            return Err(stale);
        }

        let appended = batch.records.len().min(self.ranked.len() - self.revealed);
        self.revealed += appended;
        self.state = self.settled_state();

        tracing::debug!(
            epoch = self.epoch,
            appended,
            revealed = self.revealed,
            state = ?self.state,
            "page appended"
        );
        Ok(appended)
    }

    /// Currently revealed records, in ranked order.
    #[must_use]
    pub fn window(&self) -> &[OrganizationRecord] {
        &self.ranked.records[..self.revealed]
    }

    #[must_use]
    pub fn ranked(&self) -> &RankedResultSet {
        &self.ranked
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.revealed < self.ranked.len()
    }

    #[must_use]
    pub const fn state(&self) -> PageState {
        self.state
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Size of the full ranked set.
    #[must_use]
    pub fn total(&self) -> usize {
        self.ranked.len()
    }

    fn settled_state(&self) -> PageState {
        if self.has_more() {
            PageState::Idle
        } else {
            PageState::Exhausted
        }
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
