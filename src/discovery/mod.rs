//! Discovery engine: filtering, ranking, pagination and favorites.
//!
//! Filter and rank are pure functions; [`PaginationController`] and
//! [`FavoriteStore`] are the two stateful pieces the reducer owns.
//!
//! ```text
//! catalog ──filter──▶ filtered ──rank──▶ ranked ──reset──▶ window
//!                                                  ▲
//!                            request_more/complete ┘
//! ```

pub mod favorites;
pub mod filter;
pub mod pagination;
pub mod rank;

pub use favorites::{FavoriteResolution, FavoriteStore, FavoriteTicket};
pub use filter::{filter, matches};
pub use pagination::{PageBatch, PageRequest, PageState, PaginationController, StaleResult, DEFAULT_PAGE_SIZE};
pub use rank::{compare, rank, RankedResultSet};
