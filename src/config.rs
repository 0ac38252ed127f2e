//! Environment-driven server configuration.

use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;

use crate::tmdb::TMDB_BASE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
}

impl Config {
    /// | Variable        | Default                          |
    /// |-----------------|----------------------------------|
    /// | `TMDB_API_KEY`  | required                         |
    /// | `TMDB_BASE_URL` | `https://api.themoviedb.org/3`   |
    /// | `TMDB_LANGUAGE` | `en-US`                          |
    /// | `BIND_ADDR`     | `0.0.0.0:3000`                   |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(tmdb_api_key) = non_empty("TMDB_API_KEY") else {
            bail!("Missing required environment variable: TMDB_API_KEY");
        };
        let bind_raw = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_raw}"))?;

        Ok(Self {
            bind_addr,
            tmdb_api_key,
            tmdb_base_url: non_empty("TMDB_BASE_URL").unwrap_or_else(|| TMDB_BASE.to_string()),
            tmdb_language: non_empty("TMDB_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        })
    }
}
