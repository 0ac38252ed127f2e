//! Placeholder authentication endpoints. Credentials are checked against a
//! single hard-coded account and nothing is persisted.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    Json,
};
use constant_time_eq::constant_time_eq;
use tracing::{info, warn};

use crate::error::{ApiError, AuthResult};
use crate::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_TOKEN: &str = "dummy-token";

fn body_or_internal<T>(body: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::Internal(rejection.body_text()).into()),
    }
}

fn credentials_match(email: &str, password: &str) -> bool {
    let email_ok = constant_time_eq(email.as_bytes(), DEMO_EMAIL.as_bytes());
    let password_ok = constant_time_eq(password.as_bytes(), DEMO_PASSWORD.as_bytes());
    email_ok & password_ok
}

pub async fn login(body: Result<Json<LoginRequest>, JsonRejection>) -> AuthResult<Json<TokenResponse>> {
    let LoginRequest { email, password } = body_or_internal(body)?;

    if !credentials_match(&email, &password) {
        warn!("Login rejected for '{}'", email);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()).into());
    }

    info!("Login accepted for '{}'", email);
    Ok(Json(TokenResponse {
        token: DEMO_TOKEN.to_string(),
    }))
}

pub async fn register(
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)> {
    let RegisterRequest {
        name,
        email,
        password,
    } = body_or_internal(body)?;

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()).into());
    }

    info!("Registered '{}' <{}>", name, email);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_demo_account_matches() {
        assert!(credentials_match(DEMO_EMAIL, DEMO_PASSWORD));
        assert!(!credentials_match(DEMO_EMAIL, "Password"));
        assert!(!credentials_match("other@example.com", DEMO_PASSWORD));
        assert!(!credentials_match("", ""));
    }
}
