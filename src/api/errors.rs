use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant carrying both.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(format!("{context}: {err}"))
    }

    /// Maps constraint violations of admin writes to client errors; anything else is internal.
    pub(crate) fn from_write(err: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return Self::Conflict(format!("{context}: record already exists"));
                }
                // foreign_key_violation
                Some("23503") => {
                    return Self::BadRequest(format!("{context}: referenced record does not exist"));
                }
                _ => {}
            }
        }
        Self::internal(err, context)
    }

    /// Deletes blocked by referencing rows become 409.
    pub(crate) fn from_delete(err: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.code().as_deref(), Some("23503") | Some("23001")) {
                return Self::Conflict(format!("{context}: record is still referenced"));
            }
        }
        Self::internal(err, context)
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Unauthorized(message) | ApiError::Forbidden(message) => message.to_string(),
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::Internal(message) => message,
        };

        let mut response =
            (status, Json(ErrorResponse { status: status.as_u16(), message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;

    use crate::test_support::read_json;

    #[tokio::test]
    async fn not_found_carries_status_and_message() {
        let response =
            ApiError::NotFound("No MCQs found for the given criteria".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "No MCQs found for the given criteria");
    }

    #[tokio::test]
    async fn internal_exposes_underlying_error() {
        let response =
            ApiError::internal("connection refused", "Failed to select questions").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Failed to select questions: connection refused");
    }

    #[tokio::test]
    async fn unauthorized_sets_bearer_challenge() {
        let response = ApiError::Unauthorized("Invalid authentication credentials").into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn non_database_write_errors_are_internal() {
        let error = ApiError::from_write(sqlx::Error::RowNotFound, "Failed to create subject");
        assert!(matches!(error, ApiError::Internal(_)));
    }
}
