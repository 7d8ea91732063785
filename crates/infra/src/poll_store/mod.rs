//! Poll persistence boundary.
//!
//! This module defines the store abstraction the HTTP layer reads questions
//! and choices through, plus its in-memory and Postgres implementations.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryPollStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresPollStore;
pub use r#trait::{EntityStore, PollStore, StoreError, StoreResult};
