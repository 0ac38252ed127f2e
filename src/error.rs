//! Error kinds surfaced by the route layer.
//!
//! Movie routes report failures as `{"error": ...}` while auth routes use
//! `{"message": ...}`. Existing clients read the key per route, so both
//! shapes are kept: [`ApiError`] renders the former, [`AuthRouteError`] the
//! latter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;
pub type AuthResult<T> = Result<T, AuthRouteError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The catalog call failed. `public` is what the caller sees.
    #[error("{public}: {cause:#}")]
    Upstream {
        public: &'static str,
        cause: anyhow::Error,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn upstream(public: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |cause| ApiError::Upstream { public, cause }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the caller. Upstream and internal details stay in
    /// the logs.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Validation(m) | ApiError::Unauthorized(m) => m,
            ApiError::Upstream { public, .. } => public,
            ApiError::Internal(_) => "Internal server error",
        }
    }

    fn render(self, key: &str) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        let body = Json(json!({ key: self.public_message() }));
        (status, body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render("error")
    }
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct AuthRouteError(#[from] pub ApiError);

impl IntoResponse for AuthRouteError {
    fn into_response(self) -> Response {
        self.0.render("message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn maps_kinds_to_status() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        let upstream = ApiError::upstream("Failed to fetch credits")(anyhow!("socket closed"));
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn public_message_hides_upstream_detail() {
        let err = ApiError::upstream("Failed to fetch videos")(anyhow!("api_key=secret rejected"));
        assert_eq!(err.public_message(), "Failed to fetch videos");
        assert!(err.to_string().contains("api_key=secret rejected"));
        let internal = ApiError::Internal("stack overflow in parser".into());
        assert_eq!(internal.public_message(), "Internal server error");
    }
}
