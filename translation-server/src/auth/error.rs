use crate::errors::ApiError;
use axum::response::{IntoResponse, Response};
use http::header::WWW_AUTHENTICATE;
use http::{HeaderValue, StatusCode};
use thiserror::Error;

/// Errors raised while authenticating and authorizing a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Bearer token")]
    MissingCredentials,
    #[error("Server auth configuration missing")]
    Configuration,
    #[error("Introspection failed: {0}")]
    Authentication(String),
    #[error("Inactive token")]
    InactiveToken,
    #[error("Invalid audience")]
    InvalidAudience,
    #[error("Insufficient scopes")]
    InsufficientScope,
    #[error("Requires {0} role")]
    ForbiddenRole(String),
}

impl AuthError {
    /// HTTP status for this error: 401 unauthenticated, 403 unauthorized, 500 misconfigured
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::Authentication(_)
            | AuthError::InactiveToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidAudience
            | AuthError::InsufficientScope
            | AuthError::ForbiddenRole(_) => StatusCode::FORBIDDEN,
            AuthError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status_code = err.status_code();
        match err {
            // The remote reason stays in the logs
            AuthError::Authentication(_) => ApiError::new("Introspection failed", status_code),
            other => ApiError::new(other, status_code),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let mut response = ApiError::from(self).into_response();
        if status_code == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
