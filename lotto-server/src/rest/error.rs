//! REST API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use lotto_predict::PredictError;

use crate::auth::AuthError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
    /// Error kind.
    pub status: String,
    /// HTTP status code.
    pub code: u16,
}

impl ApiError {
    #[must_use]
    pub fn new(status: impl Into<String>, code: u16, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            status: status.into(),
            code,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", 400, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", 401, message)
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("forbidden", 403, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("conflict", 409, message)
    }

    #[must_use]
    pub fn model_load(message: impl Into<String>) -> Self {
        Self::new("model_load_failure", 500, message)
    }

    #[must_use]
    pub fn data_load(message: impl Into<String>) -> Self {
        Self::new("data_load_failure", 500, message)
    }

    #[must_use]
    pub fn prediction(message: impl Into<String>) -> Self {
        Self::new("prediction_failure", 500, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", 500, message)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::InvalidCredentials | AuthError::Unauthorized => Self::unauthorized(message),
            AuthError::Forbidden => Self::forbidden(message),
            AuthError::DuplicateUser(_) => Self::conflict(message),
            AuthError::PasswordMismatch | AuthError::InvalidInput(_) => Self::bad_request(message),
            AuthError::Storage(_) => {
                log::error!("{message}");
                Self::internal("account storage unavailable")
            }
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        log::error!("Generation failed: {err}");
        let message = err.to_string();
        match err {
            PredictError::ModelLoad(_) => Self::model_load(message),
            PredictError::InsufficientHistory { .. } => Self::data_load(message),
            PredictError::Prediction(_) => Self::prediction(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Result type for REST API handlers.
pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).code, 401);
        assert_eq!(ApiError::from(AuthError::Unauthorized).code, 401);
        assert_eq!(ApiError::from(AuthError::Forbidden).code, 403);
        assert_eq!(ApiError::from(AuthError::DuplicateUser("a".into())).code, 409);
        assert_eq!(ApiError::from(AuthError::PasswordMismatch).code, 400);
        assert_eq!(ApiError::from(AuthError::InvalidInput("x".into())).code, 400);
        assert_eq!(ApiError::from(AuthError::Storage("disk".into())).code, 500);
    }

    #[test]
    fn test_predict_error_mapping() {
        let err = ApiError::from(PredictError::InsufficientHistory { needed: 60, available: 3 });
        assert_eq!(err.code, 500);
        assert_eq!(err.status, "data_load_failure");
        assert!(err.error.contains("60"));

        assert_eq!(ApiError::from(PredictError::ModelLoad("x".into())).status, "model_load_failure");
        assert_eq!(ApiError::from(PredictError::Prediction("x".into())).status, "prediction_failure");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::conflict("taken").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::new("odd", 1000, "odd").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
