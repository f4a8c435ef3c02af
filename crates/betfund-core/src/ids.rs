//! Identifier types for betfund.
//!
//! Stripe assigns opaque string identifiers (`cus_...`). We never parse their
//! structure, only guarantee that a stored identifier is non-empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Stripe customer identifier.
///
/// An empty string is never a valid identifier; a record without a synced
/// customer carries no `StripeCustomerId` at all.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StripeCustomerId(String);

impl StripeCustomerId {
    /// Create an identifier, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] if `value` is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(value))
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StripeCustomerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for StripeCustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StripeCustomerId({})", self.0)
    }
}

impl fmt::Display for StripeCustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StripeCustomerId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StripeCustomerId> for String {
    fn from(id: StripeCustomerId) -> Self {
        id.0
    }
}

impl AsRef<str> for StripeCustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty.
    #[error("identifier must not be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_parses() {
        let id: StripeCustomerId = "cus_NffrFeUfNV2Hib".parse().unwrap();
        assert_eq!(id.as_str(), "cus_NffrFeUfNV2Hib");
        assert_eq!(id.to_string(), "cus_NffrFeUfNV2Hib");
    }

    #[test]
    fn customer_id_rejects_blank() {
        assert_eq!(StripeCustomerId::new(""), Err(IdError::Empty));
        assert_eq!(StripeCustomerId::new("   "), Err(IdError::Empty));
    }

    #[test]
    fn customer_id_serde_json() {
        let id = StripeCustomerId::new("cus_123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cus_123\"");
        let parsed: StripeCustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn customer_id_serde_rejects_empty() {
        let parsed: Result<StripeCustomerId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }
}
