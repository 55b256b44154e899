//! Worker owning the storage backend.
//!
//! The reducer never calls storage directly; it emits
//! [`crate::app::Action::PostToWorker`] and receives a [`WorkerResponse`]
//! later as an event.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::DiscoveryWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
