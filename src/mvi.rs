//! Unidirectional data flow primitives.
//!
//! ```text
//! dispatch(Action) ──→ Reducer ──→ State ──→ watch subscribers
//! ```
//!
//! Views never write state directly; they dispatch an action and read the
//! state that comes back out.

/// A named event describing an intended state change: a fetched page, a
/// saved article, a session transition.
pub trait Action: Send + 'static {}

/// A complete snapshot. Every transition yields a new value, and `Sync` lets
/// snapshots be published to other tasks.
pub trait State: Clone + PartialEq + Default + Send + Sync + 'static {}

/// The only place state transitions happen.
pub trait Reducer {
    type State: State;
    type Action: Action;

    /// Pure: `(state, action) -> state`, no I/O.
    fn reduce(state: Self::State, action: Self::Action) -> Self::State;
}
