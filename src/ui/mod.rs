//! Presentation layer.
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render_text → String
//! ```
//!
//! - [`viewmodel`]: display-ready snapshot types
//! - [`renderer`]: plain-text rendering of a view model

pub mod renderer;
pub mod viewmodel;

/// Needs shown per organization card.
pub const NEEDS_PER_CARD: usize = 2;

pub use renderer::{highlight, render_text};
pub use viewmodel::{
    EmptyState, ErrorBanner, FooterInfo, HeaderInfo, NeedSummary, OrganizationCard, SearchBarInfo, UIViewModel,
};
