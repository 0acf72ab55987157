//! HTTP error responses
//!
//! Every handler error becomes a status code plus a JSON body of the form
//! `{"error": "...", "details": "..."}`, with `details` omitted when empty.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pagecraft_core::{AccountError, CatalogError, GenerationError, ResetError, StoreError};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.error, details = ?self.details, "request failed");
        }
        let body = ErrorBody {
            error: &self.error,
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Conflict(_) | StoreError::PermissionDenied(_) => StatusCode::BAD_REQUEST,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, "Storage error").with_details(err.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::bad_request(msg),
            AccountError::Conflict => ApiError::bad_request(err.to_string()),
            AccountError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AccountError::Hash(msg) => ApiError::internal("Account operation failed").with_details(msg),
            AccountError::Store(e) => e.into(),
        }
    }
}

impl From<ResetError> for ApiError {
    fn from(err: ResetError) -> Self {
        match err {
            ResetError::NotFound => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            ResetError::Validation(msg) => ApiError::bad_request(msg),
            ResetError::NotFoundOrExpired
            | ResetError::InvalidCode
            | ResetError::InvalidOrExpiredToken
            | ResetError::PasswordTooShort(_) => ApiError::bad_request(err.to_string()),
            ResetError::DeliveryFailed(e) => {
                ApiError::internal("Failed to send OTP").with_details(e.to_string())
            }
            ResetError::Hash(msg) => ApiError::internal("Failed to reset password").with_details(msg),
            ResetError::Store(e) => e.into(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Book not found"),
            CatalogError::Unavailable(details) => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Failed to fetch book")
                    .with_details(details)
            }
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(msg) => ApiError::bad_request(msg),
            GenerationError::Upstream(_) | GenerationError::InvalidResponse => {
                ApiError::new(StatusCode::BAD_GATEWAY, "Failed to generate content")
                    .with_details(err.to_string())
            }
            GenerationError::Render(_) => {
                ApiError::internal("Failed to generate content").with_details(err.to_string())
            }
            GenerationError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::DeliveryError;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (AccountError::Conflict.into(), StatusCode::BAD_REQUEST),
            (AccountError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (ResetError::NotFound.into(), StatusCode::NOT_FOUND),
            (ResetError::InvalidCode.into(), StatusCode::BAD_REQUEST),
            (ResetError::PasswordTooShort(6).into(), StatusCode::BAD_REQUEST),
            (
                ResetError::DeliveryFailed(DeliveryError::Transport("refused".into())).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (CatalogError::NotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (
                CatalogError::Unavailable("down".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (GenerationError::InvalidResponse.into(), StatusCode::BAD_GATEWAY),
            (
                StoreError::Unavailable("down".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status, status, "{:?}", err);
        }
    }

    #[test]
    fn test_delivery_failure_keeps_details() {
        let err: ApiError =
            ResetError::DeliveryFailed(DeliveryError::Transport("refused".into())).into();
        assert_eq!(err.error, "Failed to send OTP");
        assert_eq!(err.details.as_deref(), Some("Transport failed: refused"));
    }
}
