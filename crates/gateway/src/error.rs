use thiserror::Error;

/// Errors that can occur when talking to the payment gateway.
///
/// All variants mean the gateway order may not exist; the caller must
/// leave its local order untouched and offer a retry.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP request failed or timed out.
    #[error("Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("Gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The gateway declined to create the order.
    #[error("Gateway declined: {0}")]
    Declined(String),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
