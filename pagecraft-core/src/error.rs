//! Error types for Pagecraft Core
//!
//! Each service reports its own error enum; callers map them at their edge.

use thiserror::Error;

/// Errors raised by the document and blob stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from signup and login
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username or email already exists")]
    Conflict,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AccountError::Conflict,
            other => AccountError::Store(other),
        }
    }
}

/// Errors from the request -> verify -> reset protocol
#[derive(Debug, Error)]
pub enum ResetError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User not found")]
    NotFound,

    #[error("OTP not found or expired")]
    NotFoundOrExpired,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Failed to send OTP: {0}")]
    DeliveryFailed(#[from] DeliveryError),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the catalog read path
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Book store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from AI generation and the artifacts it produces
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Invalid response from generation API")]
    InvalidResponse,

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from email delivery
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Transport failed: {0}")]
    Transport(String),
}
