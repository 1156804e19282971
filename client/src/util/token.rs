//! Access/refresh token storage and unverified JWT payload inspection.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend issues a short-lived access token and a refresh token after OTP
//! verification. Tokens and the signed-in user's summary live in a key-value
//! store (browser `localStorage` in the web build, memory elsewhere) under the
//! same keys the web app has always used.
//!
//! TRADE-OFFS
//! ==========
//! Claims are decoded without verifying the signature. They only drive UI
//! decisions (expiry countdowns, role hints); the server stays the authority.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::net::types::{deserialize_id, deserialize_opt_id};

pub const ACCESS_TOKEN_KEY: &str = "clinic_access_token";
pub const REFRESH_TOKEN_KEY: &str = "clinic_refresh_token";
pub const USER_INFO_KEY: &str = "user_info";

// =============================================================================
// STORAGE
// =============================================================================

/// Minimal string key-value storage, shaped like `localStorage`.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local store for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }
}

/// Signed-in user summary persisted next to the tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub role: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub email: String,
}

/// Typed access to the token keys of a [`TokenStore`].
#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn TokenStore>,
}

impl TokenService {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Store whichever tokens are present; `None` leaves the old value.
    pub fn set_tokens(&self, access: Option<&str>, refresh: Option<&str>) {
        if let Some(access) = access.filter(|t| !t.is_empty()) {
            self.store.set(ACCESS_TOKEN_KEY, access);
        }
        if let Some(refresh) = refresh.filter(|t| !t.is_empty()) {
            self.store.set(REFRESH_TOKEN_KEY, refresh);
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Removes both tokens and the stored user.
    pub fn clear(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        self.store.remove(USER_INFO_KEY);
    }

    pub fn set_user_info(&self, user: &StoredUser) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set(USER_INFO_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "failed to encode user info"),
        }
    }

    /// Stored user, or `None` when missing or unreadable.
    pub fn user_info(&self) -> Option<StoredUser> {
        let raw = self.store.get(USER_INFO_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some_and(|t| !t.is_empty())
    }
}

// =============================================================================
// JWT CLAIMS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has no payload segment")]
    Malformed,
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The payload fields the client reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry in seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// User fields carried by a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenUser {
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
}

/// Decode the payload segment of a JWT.
///
/// # Errors
///
/// Returns [`TokenError`] when the token has no payload segment or the payload
/// is not base64url-encoded JSON.
pub fn token_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token.split('.').nth(1).filter(|p| !p.is_empty()).ok_or(TokenError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Missing or undecodable tokens count as expired. A token without `exp`
/// never expires.
pub fn is_token_expired(token: Option<&str>, now_secs: i64) -> bool {
    let Some(token) = token else {
        return true;
    };
    match token_claims(token) {
        Ok(claims) => claims.exp.is_some_and(|exp| exp < now_secs),
        Err(_) => true,
    }
}

/// True when the token is expired or expires within `buffer_secs`.
pub fn needs_refresh(token: Option<&str>, now_secs: i64, buffer_secs: i64) -> bool {
    is_token_expired(token, now_secs.saturating_add(buffer_secs))
}

/// Expiry in milliseconds since the Unix epoch.
pub fn token_expiration_ms(token: &str) -> Option<i64> {
    token_claims(token).ok()?.exp.map(|exp| exp.saturating_mul(1000))
}

pub fn user_from_token(token: &str) -> Option<TokenUser> {
    let claims = token_claims(token).ok()?;
    Some(TokenUser { user_id: claims.user_id, role: claims.role, email: claims.email })
}

/// Current time as seconds since the Unix epoch.
pub fn now_secs() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_secs()).unwrap_or(i64::MAX)
}
