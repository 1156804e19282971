//! Shared auth helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards apply identical unauthenticated redirect behavior, and session
//! restore reads the same stored user summary the OTP flow writes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde_json::Value;

use crate::net::types::id_from_json;
use crate::state::auth::{AuthState, SessionUser};
use crate::util::token::TokenService;

/// Idle sessions older than this are treated as expired.
pub const SESSION_TIMEOUT_MS: i64 = 24 * 60 * 60 * 1000;

const REQUIRED_USER_FIELDS: [&str; 3] = ["role", "user_id", "email"];

/// Redirect to `/login` once auth has loaded and no user is present.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// True when `user` is an object carrying `role`, `user_id` and `email`.
pub fn validate_user_data(user: &Value) -> bool {
    user.as_object()
        .is_some_and(|map| REQUIRED_USER_FIELDS.iter().all(|field| map.contains_key(*field)))
}

/// Session user from a verify-OTP style response (`{ data: { role, user_id, email } }`).
pub fn format_user_data(response: &Value) -> Option<SessionUser> {
    let data = response.get("data").filter(|d| d.is_object())?;
    Some(SessionUser {
        role: data.get("role").and_then(Value::as_str).unwrap_or_default().to_owned(),
        id: data.get("user_id").and_then(id_from_json).unwrap_or_default(),
        email: data.get("email").and_then(Value::as_str).map(str::to_owned),
    })
}

/// `last_activity_ms` and `now_ms` are milliseconds since the Unix epoch.
/// No recorded activity counts as expired.
pub fn is_session_expired(last_activity_ms: Option<i64>, now_ms: i64) -> bool {
    match last_activity_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) > SESSION_TIMEOUT_MS,
    }
}

/// Session user rebuilt from stored tokens, for startup initialization.
pub fn restore_session(tokens: &TokenService) -> Option<SessionUser> {
    if !tokens.is_authenticated() {
        return None;
    }
    let stored = tokens.user_info()?;
    Some(SessionUser { role: stored.role, id: stored.user_id, email: Some(stored.email) })
}
