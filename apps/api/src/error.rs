use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};
use warden_core::AppError;

mod types;

pub use types::ErrorResponse;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) | AppError::InvalidEvidence(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self.0 {
            AppError::StoreUnavailable(message) => warn!(%message, "store unavailable"),
            AppError::Internal(message) => error!(%message, "internal error"),
            _ => {}
        }

        let payload = Json(ErrorResponse::new(self.0.kind(), self.0.to_string()));

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use warden_core::AppError;

    use super::ApiError;

    #[test]
    fn error_kinds_map_to_http_statuses() {
        let cases = [
            (AppError::Validation("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::InvalidEvidence("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::Unauthenticated("x".to_owned()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".to_owned()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (AppError::InvalidTransition("x".to_owned()), StatusCode::CONFLICT),
            (
                AppError::StoreUnavailable("x".to_owned()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Internal("x".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).into_response().status(), expected);
        }
    }
}
