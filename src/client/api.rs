use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::storage::AuthStorage;
use crate::models::{
    ApiResponse, Credits, LoginRequest, MessageResponse, Movie, MovieDetails, MovieId,
    RegisterRequest, Results, TokenResponse, Video,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// The server-supplied message, when the server produced one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { message, .. } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Auth routes answer with `message`, movie routes with `error`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Talks to the `/api` routes of this service. With storage attached, the
/// stored token is sent as a bearer credential on every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Option<Arc<dyn AuthStorage>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage: None,
        })
    }

    pub fn with_storage(mut self, storage: Arc<dyn AuthStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.as_ref().and_then(|s| s.get_token()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json("/api/auth/login", &body).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json("/api/auth/register", &body).await
    }

    pub async fn popular(&self, page: u32) -> Result<ApiResponse<Movie>, ClientError> {
        self.get_json("/api/movies", &[("page", page.to_string())])
            .await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<ApiResponse<Movie>, ClientError> {
        self.get_json(
            "/api/movies",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    pub async fn movie(&self, id: &MovieId) -> Result<MovieDetails, ClientError> {
        self.get_json("/api/movies", &[("id", id.to_string())])
            .await
    }

    pub async fn credits(&self, id: i64) -> Result<Credits, ClientError> {
        self.get_json(&format!("/api/movies/{id}/credits"), &[])
            .await
    }

    pub async fn recommendations(&self, id: i64) -> Result<Results<Movie>, ClientError> {
        self.get_json(&format!("/api/movies/{id}/recommendations"), &[])
            .await
    }

    pub async fn similar(&self, id: i64) -> Result<Results<Movie>, ClientError> {
        self.get_json(&format!("/api/movies/{id}/similar"), &[])
            .await
    }

    pub async fn videos(&self, id: i64) -> Result<Results<Video>, ClientError> {
        self.get_json(&format!("/api/movies/{id}/videos"), &[])
            .await
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{path}", self.base_url);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.url(path, params);
        debug!("GET {}", url);
        let res = self.authorize(self.client.get(&url)).send().await?;
        decode(res).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path, &[]);
        debug!("POST {}", url);
        let res = self
            .authorize(self.client.post(&url).json(body))
            .send()
            .await?;
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_default();
        return Err(ClientError::Http { status, message });
    }
    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_query_strings() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(
            client.url("/api/movies", &[("query", "star wars".to_string()), ("page", "2".to_string())]),
            "http://localhost:3000/api/movies?query=star%20wars&page=2"
        );
        assert_eq!(
            client.url("/api/movies/5/videos", &[]),
            "http://localhost:3000/api/movies/5/videos"
        );
    }

    #[test]
    fn server_message_only_for_http_errors() {
        let err = ClientError::Http {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        let empty = ClientError::Http {
            status: StatusCode::BAD_GATEWAY,
            message: String::new(),
        };
        assert_eq!(empty.server_message(), None);
        assert_eq!(ClientError::Decode("eof".into()).server_message(), None);
    }
}
