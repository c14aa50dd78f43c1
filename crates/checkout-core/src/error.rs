//! # Checkout Error Types
//!
//! Typed error handling for the checkout service.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Message returned to clients for any error that must not leak internals.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Message returned when an offering identifier is unknown.
pub const OFFERING_NOT_FOUND_MESSAGE: &str = "Service not found in database";

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (message is safe to return to the caller)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Offering not found in the catalog
    #[error("Offering not found: {service_id}")]
    OfferingNotFound { service_id: String },

    /// Offering table failed validation
    #[error("Invalid offering table: {0}")]
    InvalidCatalog(String),

    /// Payment provider rejected the request
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Database failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Provider failures are reported as client errors, the payment
    /// provider being the authority on whether a checkout can proceed.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::InvalidRequest(_) => 400,
            CheckoutError::OfferingNotFound { .. } => 404,
            CheckoutError::ProviderError { .. } => 400,
            CheckoutError::NetworkError(_) => 400,
            CheckoutError::Configuration(_)
            | CheckoutError::InvalidCatalog(_)
            | CheckoutError::Storage(_)
            | CheckoutError::Serialization(_)
            | CheckoutError::Internal(_) => 500,
        }
    }

    /// Message safe to show to an API caller.
    pub fn public_message(&self) -> String {
        match self {
            CheckoutError::InvalidRequest(message) => message.clone(),
            CheckoutError::OfferingNotFound { .. } => OFFERING_NOT_FOUND_MESSAGE.to_string(),
            CheckoutError::ProviderError { message, .. } => message.clone(),
            CheckoutError::NetworkError(_) => "Unable to reach the payment provider".to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns true if the error originates from the payment provider
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::ProviderError { .. } | CheckoutError::NetworkError(_)
        )
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
