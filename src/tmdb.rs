use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::models::{ApiResponse, Credits, Movie, MovieDetails, Results, Video};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";

/// Outbound operations the route layer needs from the movie catalog.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn popular_movies(&self, page: u32) -> Result<ApiResponse<Movie>>;
    async fn search_movies(&self, query: &str, page: u32) -> Result<ApiResponse<Movie>>;
    async fn movie_details(&self, id: &str) -> Result<MovieDetails>;
    async fn movie_credits(&self, id: i64) -> Result<Credits>;
    async fn movie_recommendations(&self, id: i64) -> Result<Results<Movie>>;
    async fn similar_movies(&self, id: i64) -> Result<Results<Movie>>;
    async fn movie_videos(&self, id: i64) -> Result<Results<Video>>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self> {
        let user_agent = format!("cinebrowse/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_base_url.clone(),
            config.tmdb_language.clone(),
        )
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        // The URL carries the api key; reqwest errors must not echo it.
        let url = self.url(path, params);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("request to {path} failed"))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{path} -> {status}: {text}"));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {path}"))?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn popular_movies(&self, page: u32) -> Result<ApiResponse<Movie>> {
        self.get_json("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<ApiResponse<Movie>> {
        self.get_json(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn movie_details(&self, id: &str) -> Result<MovieDetails> {
        // One round trip: videos and credits come back nested in the details body.
        let path = format!("/movie/{}", urlencoding::encode(id));
        self.get_json(&path, &[("append_to_response", "videos,credits".to_string())])
            .await
    }

    async fn movie_credits(&self, id: i64) -> Result<Credits> {
        self.get_json(&format!("/movie/{id}/credits"), &[]).await
    }

    async fn movie_recommendations(&self, id: i64) -> Result<Results<Movie>> {
        self.get_json(&format!("/movie/{id}/recommendations"), &[])
            .await
    }

    async fn similar_movies(&self, id: i64) -> Result<Results<Movie>> {
        self.get_json(&format!("/movie/{id}/similar"), &[]).await
    }

    async fn movie_videos(&self, id: i64) -> Result<Results<Video>> {
        self.get_json(&format!("/movie/{id}/videos"), &[]).await
    }
}

/// Accepts only strings made entirely of ASCII digits (optionally signed).
pub fn parse_movie_id(input: &str) -> Option<i64> {
    let digits = input.strip_prefix('-').unwrap_or(input);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}
