//! Presentation-side retrieval state.
//!
//! # Responsibility
//! - Track `{data, loading, error}` around one service call.
//! - Re-run the call when its input changes structurally, or on `refetch`.
//!
//! # Invariants
//! - Only the most recently dispatched fetch may change visible state.
//! - A failed fetch keeps the last good `data`.
//! - Completions arriving after `unmount` are discarded.

pub mod hook;
pub mod retrievers;

pub use hook::{FetchTicket, RetrievalHook, RetrievalState};
pub use retrievers::{ByIdRetriever, ListRetriever, Retrieve};
