//! Infrastructure layer: poll storage backends and the lookup service.

pub mod lookup;
pub mod poll_store;
pub mod seed;

pub use lookup::{get_or_not_found, Lookup};
pub use poll_store::{EntityStore, InMemoryPollStore, PollStore, StoreError, StoreResult};
#[cfg(feature = "postgres")]
pub use poll_store::PostgresPollStore;
