//! Single source of truth for server-derived client state.

mod action;
mod handle;
mod reducer;
mod state;
pub mod thunks;

pub use action::StoreAction;
pub use handle::Store;
pub use reducer::StoreReducer;
pub use state::StoreState;
pub use thunks::{receive_articles, FetchError};
