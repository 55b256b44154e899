//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime and the discovery engine. It owns the
//! single reducer through which every user event and async completion flows.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── Timers, Pages, Worker ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`debounce`]: Token-based cancellable query debounce
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`state`]: Reducer state and view model computation
//!
//! # Example
//!
//! ```rust
//! use ngo_discovery::app::{handle_event, AppState, Event};
//!
//! let mut state = AppState::new(6, 300);
//! let (render, actions) = handle_event(&mut state, &Event::Refresh)?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), ngo_discovery::DiscoveryError>(())
//! ```

pub mod actions;
pub mod debounce;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use debounce::{Debouncer, ScheduledTask, DEFAULT_DEBOUNCE_MS};
pub use handler::{handle_event, Event};
pub use state::AppState;
