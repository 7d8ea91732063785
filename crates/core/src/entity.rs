//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity: Send + Sync {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display + Send + Sync;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
