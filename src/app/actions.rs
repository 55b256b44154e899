//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! reducer itself never sleeps, performs I/O or touches storage; everything
//! asynchronous is expressed here and comes back later as an
//! [`crate::app::Event`].

use crate::discovery::PageBatch;
use crate::domain::{ErrorSignal, NeedEntry, OrganizationId};
use crate::worker::WorkerMessage;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Posts a message to the storage worker.
    ///
    /// The response arrives as [`crate::app::Event::WorkerResponse`].
    PostToWorker(WorkerMessage),

    /// Starts the debounce timer for a typed query.
    ///
    /// When it elapses the runtime dispatches
    /// [`crate::app::Event::DebounceElapsed`] with the same token.
    ScheduleDebounce {
        token: u64,
        delay_ms: u64,
    },

    /// Delivers a fetched page after the simulated load delay.
    ///
    /// Comes back as [`crate::app::Event::PageLoaded`].
    DeliverPage {
        batch: PageBatch,
        delay_ms: u64,
    },

    /// Opens the donation flow for an organization, optionally preselecting a need.
    NavigateToDonation {
        organization_id: OrganizationId,
        need: Option<NeedEntry>,
    },

    /// Opens the user's mail client.
    OpenContact {
        organization_id: OrganizationId,
        email: Option<String>,
        /// `Inquiry about donation to <name>`.
        subject: String,
    },

    /// Reports a boundary failure the state has already recovered from.
    Surface(ErrorSignal),
}
