use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::api::ApiClient;
use super::storage::{AuthData, AuthStorage};

/// Where a login page usually sends the user afterwards.
pub const POST_LOGIN_ROUTE: &str = "/movies";

const MISSING_FIELDS: &str = "Please fill in all fields";
const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Default, Error)]
#[error("{}", .message.as_deref().unwrap_or(LOGIN_FAILED))]
pub struct AuthFailure {
    pub message: Option<String>,
}

impl AuthFailure {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(), AuthFailure>;
}

/// Logs in through the auth route and records the session in storage.
pub struct ApiAuthenticator {
    api: ApiClient,
    storage: Arc<dyn AuthStorage>,
}

impl ApiAuthenticator {
    pub fn new(api: ApiClient, storage: Arc<dyn AuthStorage>) -> Self {
        Self { api, storage }
    }

    pub fn logout(&self) {
        self.storage.clear_auth_data();
        info!("Session cleared");
    }
}

#[async_trait]
impl Authenticator for ApiAuthenticator {
    async fn login(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        match self.api.login(email, password).await {
            Ok(resp) => {
                self.storage.set_auth_data(&AuthData {
                    token: resp.token,
                    refresh_token: None,
                    user: json!({ "email": email }),
                });
                Ok(())
            }
            Err(e) => {
                warn!("Login request failed: {}", e);
                Err(AuthFailure {
                    message: e.server_message().map(str::to_string),
                })
            }
        }
    }
}

/// Form state behind a login page.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    form_error: Option<String>,
    auth_error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// The error to display, local validation first.
    pub fn error(&self) -> Option<&str> {
        self.form_error().or(self.auth_error())
    }

    /// Validates locally, then asks `auth` to log in. `on_success` runs only
    /// after a successful login. Returns whether the login succeeded.
    ///
    /// Holding `&mut self` across the await keeps a second submission of the
    /// same form from starting while one is in flight.
    pub async fn handle_submit<A, F>(&mut self, auth: &A, on_success: F) -> bool
    where
        A: Authenticator + ?Sized,
        F: FnOnce(),
    {
        self.form_error = None;
        self.auth_error = None;

        if self.email.is_empty() || self.password.is_empty() {
            self.form_error = Some(MISSING_FIELDS.to_string());
            return false;
        }

        match auth.login(&self.email, &self.password).await {
            Ok(()) => {
                on_success();
                true
            }
            Err(failure) => {
                self.auth_error = Some(failure.to_string());
                false
            }
        }
    }
}
