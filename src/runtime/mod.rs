//! Deterministic event loop driving the reducer.
//!
//! The runtime owns the [`AppState`] and the [`DiscoveryWorker`], executes the
//! actions the handler returns, and turns every asynchronous action into a job
//! on a virtual-clock queue. Jobs run in `(due time, sequence)` order, so a
//! debounce timer, a page load and a worker round trip interleave the same way
//! on every run.
//!
//! # Example
//!
//! ```
//! use ngo_discovery::app::{AppState, Event};
//! use ngo_discovery::domain::{Category, OrganizationRecord};
//! use ngo_discovery::runtime::Runtime;
//! use ngo_discovery::storage::MemoryStorage;
//! use ngo_discovery::worker::DiscoveryWorker;
//!
//! let storage = MemoryStorage::with_catalog(vec![
//!     OrganizationRecord::new("ngo-1", "Hope Clinic", Category::Healthcare),
//! ]);
//! let mut runtime = Runtime::new(AppState::new(6, 300), DiscoveryWorker::new(storage));
//!
//! runtime.dispatch(Event::Refresh)?;
//! runtime.settle()?;
//! assert_eq!(runtime.state().window().len(), 1);
//! # Ok::<(), ngo_discovery::DiscoveryError>(())
//! ```

pub mod command;

pub use command::Command;

use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::error::{DiscoveryError, Result};
use crate::worker::{DiscoveryWorker, WorkerMessage};
use std::collections::BTreeMap;

/// Upper bound on jobs run by one [`Runtime::settle`] call.
const MAX_SETTLE_JOBS: usize = 10_000;

#[derive(Debug, Clone)]
enum Job {
    Dispatch(Event),
    Worker(WorkerMessage),
}

/// Virtual-clock event loop.
#[derive(Debug)]
pub struct Runtime {
    state: AppState,
    worker: DiscoveryWorker,
    clock_ms: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Job>,
    worker_latency_ms: u64,
    effects: Vec<Action>,
}

impl Runtime {
    #[must_use]
    pub fn new(state: AppState, worker: DiscoveryWorker) -> Self {
        Self {
            state,
            worker,
            clock_ms: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            worker_latency_ms: 0,
            effects: Vec::new(),
        }
    }

    /// Delay between posting a worker message and handling it.
    #[must_use]
    pub const fn with_worker_latency(mut self, latency_ms: u64) -> Self {
        self.worker_latency_ms = latency_ms;
        self
    }

    /// Runs one event through the reducer and executes the resulting actions.
    ///
    /// Returns whether the view changed.
    ///
    /// # Errors
    ///
    /// Propagates reducer errors (unknown organization, invalid need index).
    pub fn dispatch(&mut self, event: Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.state, &event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(render)
    }

    /// Dispatches a command, or runs it as a clock directive.
    ///
    /// # Errors
    ///
    /// Propagates reducer errors and settle failures.
    pub fn run_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Wait(ms) => Ok(self.advance(ms)? > 0),
            Command::Settle => Ok(self.settle()? > 0),
            Command::Show => Ok(true),
            other => match other.into_event() {
                Some(event) => self.dispatch(event),
                None => Ok(false),
            },
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::PostToWorker(message) => {
                self.schedule(self.worker_latency_ms, Job::Worker(message));
            }
            Action::ScheduleDebounce { token, delay_ms } => {
                self.schedule(delay_ms, Job::Dispatch(Event::DebounceElapsed { token }));
            }
            Action::DeliverPage { batch, delay_ms } => {
                self.schedule(delay_ms, Job::Dispatch(Event::PageLoaded(batch)));
            }
            effect @ (Action::NavigateToDonation { .. } | Action::OpenContact { .. } | Action::Surface(_)) => {
                tracing::info!(effect = ?effect, "external effect");
                self.effects.push(effect);
            }
        }
    }

    fn schedule(&mut self, delay_ms: u64, job: Job) {
        let due = self.clock_ms.saturating_add(delay_ms);
        self.next_seq += 1;
        tracing::trace!(due, seq = self.next_seq, job = ?job, "job scheduled");
        self.queue.insert((due, self.next_seq), job);
    }

    fn run_job(&mut self, job: Job) -> Result<()> {
        match job {
            Job::Dispatch(event) => {
                self.dispatch(event)?;
            }
            Job::Worker(message) => {
                let response = self.worker.handle_message(message);
                self.dispatch(Event::WorkerResponse(response))?;
            }
        }
        Ok(())
    }

    /// Moves the clock forward by `ms`, running every job that falls due.
    ///
    /// Returns the number of jobs run.
    ///
    /// # Errors
    ///
    /// Propagates reducer errors raised by a job.
    pub fn advance(&mut self, ms: u64) -> Result<usize> {
        let target = self.clock_ms.saturating_add(ms);
        let mut ran = 0;
        while let Some(entry) = self.queue.first_entry() {
            let (due, _) = *entry.key();
            if due > target {
                break;
            }
            let job = entry.remove();
            self.clock_ms = due;
            self.run_job(job)?;
            ran += 1;
        }
        self.clock_ms = target;
        Ok(ran)
    }

    /// Runs jobs until the queue is empty, jumping the clock as needed.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Worker`] if the queue keeps refilling past an
    /// internal bound, and propagates reducer errors raised by a job.
    pub fn settle(&mut self) -> Result<usize> {
        let mut ran = 0;
        while let Some(((due, _), job)) = self.queue.pop_first() {
            if ran == MAX_SETTLE_JOBS {
                return Err(DiscoveryError::Worker("runtime did not settle".to_string()));
            }
            self.clock_ms = self.clock_ms.max(due);
            self.run_job(job)?;
            ran += 1;
        }
        tracing::debug!(jobs = ran, now_ms = self.clock_ms, "runtime settled");
        Ok(ran)
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Drains externally visible effects (navigation, contact, surfaced errors).
    pub fn take_effects(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, OrganizationRecord};
    use crate::storage::MemoryStorage;

    fn runtime(count: usize) -> Runtime {
        let catalog = (0..count)
            .map(|i| {
                OrganizationRecord::new(format!("ngo-{i}"), format!("Org {i}"), Category::Education)
                    .with_distance(i as f64)
            })
            .collect();
        let worker = DiscoveryWorker::new(MemoryStorage::with_catalog(catalog));
        Runtime::new(AppState::new(2, 300).with_page_load_delay(1000), worker)
    }

    #[test]
    fn advance_runs_only_due_jobs() {
        let mut rt = runtime(5);
        rt.dispatch(Event::Refresh).expect("refresh");
        rt.settle().expect("settle");

        rt.dispatch(Event::LoadMore).expect("load more");
        assert_eq!(rt.advance(999).expect("advance"), 0);
        assert_eq!(rt.state().window().len(), 2);
        assert_eq!(rt.advance(1).expect("advance"), 1);
        assert_eq!(rt.state().window().len(), 4);
        assert_eq!(rt.now_ms(), 1000);
    }

    #[test]
    fn worker_latency_delays_responses() {
        let mut rt = runtime(1).with_worker_latency(50);
        rt.dispatch(Event::Refresh).expect("refresh");
        rt.advance(49).expect("advance");
        assert!(rt.state().loading);
        rt.advance(1).expect("advance");
        assert!(!rt.state().loading);
    }

    #[test]
    fn effects_are_collected() {
        let mut rt = runtime(1);
        rt.run_command("refresh".parse().expect("parse")).expect("run");
        rt.run_command(Command::Settle).expect("run");
        rt.run_command("donate ngo-0".parse().expect("parse")).expect("run");

        let effects = rt.take_effects();
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Action::NavigateToDonation { need: None, .. }));
        assert!(rt.take_effects().is_empty());
    }
}
