//! Customer-facing order number generation.

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Number of random characters appended to the order number.
const SUFFIX_LEN: usize = 6;

/// Human-readable order reference, distinct from the internal order id.
///
/// Format: `ORD-<epoch millis>-<6 uppercase alphanumerics>`. Uniqueness is
/// overwhelmingly likely but not guaranteed by construction; the database
/// uniqueness constraint is authoritative, and a collision surfaces as a
/// retryable error so the caller can generate a fresh number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generates a new order number from the current time and a random suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();
        Self(format!("ORD-{millis}-{suffix}"))
    }

    /// Wraps an order number read back from storage.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the order number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let number = OrderNumber::generate();
        let parts: Vec<&str> = number.as_str().split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_consecutive_numbers_differ() {
        let a = OrderNumber::generate();
        let b = OrderNumber::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_string_roundtrip() {
        let number = OrderNumber::from_string("ORD-1700000000000-A1B2C3");
        assert_eq!(number.as_str(), "ORD-1700000000000-A1B2C3");
    }
}
