//! Primary-key identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Auto-assigned integer primary key of a persisted record.
///
/// Keys are non-negative. Parsing accepts ASCII digits only, which matches
/// the `/<int>/` path segments the HTTP layer routes on: signs, whitespace
/// and empty strings are rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// First key handed out by a store.
    pub const FIRST: RecordId = RecordId(1);

    /// Wrap a raw key. Returns an error for negative values.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::invalid_id(format!(
                "RecordId: negative key {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Next key in sequence (used by stores that assign keys themselves).
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!(
                "RecordId: expected digits, got {s:?}"
            )));
        }
        let value = s
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("RecordId: {e}")))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_plain_digits() {
        let id: RecordId = "2".parse().unwrap();
        assert_eq!(id.get(), 2);
        assert_eq!(id.to_string(), "2");
    }

    #[test]
    fn leading_zeros_are_accepted() {
        let id: RecordId = "007".parse().unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn rejects_non_digit_segments() {
        for s in ["", "-1", "+1", " 1", "1 ", "abc", "1.0", "１"] {
            assert!(
                matches!(s.parse::<RecordId>(), Err(DomainError::InvalidId(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!("99999999999999999999".parse::<RecordId>().is_err());
    }

    #[test]
    fn new_rejects_negative() {
        assert!(RecordId::new(-5).is_err());
        assert_eq!(RecordId::new(0).unwrap().get(), 0);
    }

    proptest! {
        /// Property: every non-negative key survives Display -> FromStr.
        #[test]
        fn display_parses_back(n in 0i64..=i64::MAX) {
            let id = RecordId::new(n).unwrap();
            let parsed: RecordId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }
    }
}
