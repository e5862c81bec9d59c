use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Request-terminating failures surfaced by handlers.
///
/// User-facing bodies come from the `#[error]` strings; variants carrying a
/// source keep the detail for server-side logging only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing email or password")]
    MissingCredentials,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password too short")]
    WeakPassword,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    SessionInvalid,
    #[error("Email already registered")]
    EmailTaken,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Service temporarily unavailable")]
    Store(#[source] sqlx::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials
            | ApiError::InvalidEmail
            | ApiError::WeakPassword
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::SessionInvalid => StatusCode::UNAUTHORIZED,
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) => error!(error = %e, "store error"),
            ApiError::Internal(e) => error!(error = %e, "internal error"),
            _ => {}
        }
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::MissingCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::SessionInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("Video").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Store(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_account_and_wrong_password_share_one_message() {
        // Both failure modes must render the same body to avoid account enumeration.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }

    #[test]
    fn store_error_body_hides_detail() {
        let e = ApiError::Store(sqlx::Error::PoolTimedOut);
        assert_eq!(e.to_string(), "Service temporarily unavailable");
    }
}
