use thiserror::Error;

/// Errors that can occur when interacting with the data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    ///
    /// Callers that generated the conflicting value (e.g., an order number)
    /// should retry with a fresh value.
    #[error("Duplicate value for unique constraint {constraint}")]
    Duplicate { constraint: String },

    /// The referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value failed domain-level decoding (e.g., a status string).
    #[error("Corrupt stored value: {0}")]
    Corrupt(#[from] domain::DomainError),
}

impl StoreError {
    /// Returns true if retrying the operation with fresh inputs can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
