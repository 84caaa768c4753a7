use thiserror::Error;

/// Errors from talking to the exchange
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {label} - {message}")]
    Api {
        status: u16,
        label: String,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No ticker returned for {0}")]
    MissingTicker(String),

    #[error("Signed endpoint called without API credentials")]
    MissingCredentials,

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

impl GatewayError {
    /// Worth retrying an idempotent request
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
