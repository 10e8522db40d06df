//! Domain error types.

use thiserror::Error;

/// Errors that can occur in pure domain logic.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A status string from storage or a request did not match any variant.
    #[error("Unknown {kind}: {value}")]
    UnknownStatus { kind: &'static str, value: String },
}
