use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthData {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: Value,
}

/// Where a client keeps its session artifacts. Injected into whatever needs
/// it so nothing reaches for a global store.
///
/// Values are opaque: nothing here validates a token or inspects a user.
pub trait AuthStorage: Send + Sync {
    fn get_token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn remove_token(&self);

    fn get_refresh_token(&self) -> Option<String>;
    fn set_refresh_token(&self, token: &str);
    fn remove_refresh_token(&self);

    fn get_user(&self) -> Option<Value>;
    fn set_user(&self, user: &Value);
    fn remove_user(&self);

    fn clear_auth_data(&self) {
        self.remove_token();
        self.remove_refresh_token();
        self.remove_user();
    }

    fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    fn set_auth_data(&self, data: &AuthData) {
        self.set_token(&data.token);
        if let Some(refresh) = &data.refresh_token {
            self.set_refresh_token(refresh);
        }
        self.set_user(&data.user);
    }
}

/// String key/value store with the same layout a browser's local storage
/// would hold: the user is kept JSON-encoded.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

impl AuthStorage for MemoryStorage {
    fn get_token(&self) -> Option<String> {
        self.get(TOKEN_KEY)
    }

    fn set_token(&self, token: &str) {
        self.set(TOKEN_KEY, token.to_string());
    }

    fn remove_token(&self) {
        self.remove(TOKEN_KEY);
    }

    fn get_refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    fn set_refresh_token(&self, token: &str) {
        self.set(REFRESH_TOKEN_KEY, token.to_string());
    }

    fn remove_refresh_token(&self) {
        self.remove(REFRESH_TOKEN_KEY);
    }

    fn get_user(&self) -> Option<Value> {
        // A corrupt entry reads as "no user".
        self.get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    fn set_user(&self, user: &Value) {
        self.set(USER_KEY, user.to_string());
    }

    fn remove_user(&self) {
        self.remove(USER_KEY);
    }
}
