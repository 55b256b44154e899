//! Cancellable debounce for query input.
//!
//! Each keystroke schedules a task identified by a fresh token and replaces
//! whatever was pending. When a timer fires, only the token that is still
//! pending yields its text; every older token is silently dropped.

/// Default quiet period before a typed query is committed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// A timer the runtime must start; fire it with [`Debouncer::fire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub token: u64,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingQuery {
    token: u64,
    text: String,
}

/// Token-based debouncer owned by the reducer.
///
/// # Example
///
/// ```
/// use ngo_discovery::app::Debouncer;
///
/// let mut debouncer = Debouncer::new(300);
/// let first = debouncer.schedule("wat");
/// let second = debouncer.schedule("water");
///
/// assert_eq!(debouncer.fire(first.token), None);
/// assert_eq!(debouncer.fire(second.token), Some("water".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u64,
    next_token: u64,
    pending: Option<PendingQuery>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            next_token: 0,
            pending: None,
        }
    }

    /// Replaces any pending text and returns the timer to start.
    pub fn schedule(&mut self, text: impl Into<String>) -> ScheduledTask {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(previous) = self.pending.replace(PendingQuery { token, text: text.into() }) {
            tracing::trace!(cancelled = previous.token, token, "debounce rescheduled");
        }
        ScheduledTask {
            token,
            delay_ms: self.delay_ms,
        }
    }

    /// Takes the pending text if `token` is still the latest task.
    pub fn fire(&mut self, token: u64) -> Option<String> {
        if self.pending.as_ref().is_some_and(|pending| pending.token == token) {
            return self.pending.take().map(|pending| pending.text);
        }
        tracing::trace!(token, "stale debounce token ignored");
        None
    }

    /// Drops the pending task. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
