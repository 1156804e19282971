//! Wire DTOs for the clinic backend.
//!
//! DESIGN
//! ======
//! The backend wraps most payloads in `{ status, message, data }`. Ids arrive
//! as integers from some endpoints and strings from others, so they are
//! normalized to `String` on the way in.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::util::roles::Role;
use crate::util::token::StoredUser;

// =============================================================================
// ID HELPERS
// =============================================================================

fn id_from_value<E: serde::de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(E::custom(format!("expected string or number id, got {other}"))),
    }
}

/// Borrowed variant for loosely typed payloads.
pub(crate) fn id_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept either a JSON string or number as an id.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(deserializer)?)
}

pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => id_from_value(value).map(Some),
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Standard `{ status, message, data }` response wrapper.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: bool,
    /// Usually a string; validation failures send a field->errors object.
    #[serde(default)]
    pub message: Value,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Message as display text, or `None` when absent.
    pub fn message_text(&self) -> Option<String> {
        message_text(&self.message)
    }
}

/// Render a `message` field: strings as-is, structured values as JSON.
pub(crate) fn message_text(message: &Value) -> Option<String> {
    match message {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

/// Payload of a successful OTP verification.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct VerifiedSession {
    pub access: String,
    pub refresh: String,
    pub role: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub email: String,
}

impl VerifiedSession {
    pub fn stored_user(&self) -> StoredUser {
        StoredUser { role: self.role.clone(), user_id: self.user_id.clone(), email: self.email.clone() }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// The signed-in user as reported by `auth/me/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "user_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
}

// =============================================================================
// DOCTORS
// =============================================================================

/// Doctor profile as listed by the clinic and super-admin panels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub doctor_name: String,
    #[serde(default)]
    pub clinic_name: Option<String>,
    pub specialization: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Field name as spelled by the backend.
    #[serde(default, rename = "experince_years")]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub appointment_amount: Option<Value>,
}

/// Registration payload for `register-doctor/`.
#[derive(Clone, Debug, Serialize)]
pub struct DoctorRegistration {
    pub doctor_name: String,
    pub specialization: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "experince_years", skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
}
