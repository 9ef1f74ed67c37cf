use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sqlx::Error;

/// Failure taxonomy of the API. Every variant renders as the uniform
/// `{success:false, message, error}` envelope the frontend expects.
#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Unprocessable,
    DataBaseError(sqlx::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, "Bad request"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            ApiError::Unprocessable => (StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable request"),
            ApiError::DataBaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::DataBaseError(error) = &self {
            tracing::error!("Database error: {error}");
        }
        let (status, message) = self.status_and_message();
        let body = Json(json!({
            "success": false,
            "message": message,
            "error": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        match error {
            Error::RowNotFound => ApiError::NotFound,
            _ => ApiError::DataBaseError(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn statuses_match_the_envelope_codes() {
        assert_eq!(
            ApiError::Unprocessable.status_and_message().0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status_and_message().1,
            "Method not allowed"
        );
    }
}
