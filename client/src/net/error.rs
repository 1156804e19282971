//! Normalization of request failures into a single [`ApiError`] shape.
//!
//! SYSTEM CONTEXT
//! ==============
//! Failures reach the client in several shapes: the server answered with an
//! error status (and maybe a JSON body carrying `message`/`code`/`details`),
//! the request never got a response, or something else went wrong locally.
//! Pages only ever render an [`ApiError`], so every shape funnels through
//! [`parse_error`].
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. [`handle_error`] logs, optionally redirects auth
//! failures to the login route, and always hands the parsed error back to the
//! caller.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::net::types::message_text;
use crate::util::navigation::LOGIN_ROUTE;

// =============================================================================
// CODES
// =============================================================================

/// Machine-readable error code, as sent by the backend in `body.code`.
///
/// Codes the client does not know are kept verbatim in [`ErrorCode::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    TokenExpired,
    InvalidCredentials,
    ValidationError,
    RequiredField,
    InvalidFormat,
    NotFound,
    AlreadyExists,
    Conflict,
    InternalError,
    ServiceUnavailable,
    Timeout,
    NetworkError,
    ConnectionError,
    Other(String),
}

const KNOWN_CODES: [ErrorCode; 15] = [
    ErrorCode::Unauthorized,
    ErrorCode::Forbidden,
    ErrorCode::TokenExpired,
    ErrorCode::InvalidCredentials,
    ErrorCode::ValidationError,
    ErrorCode::RequiredField,
    ErrorCode::InvalidFormat,
    ErrorCode::NotFound,
    ErrorCode::AlreadyExists,
    ErrorCode::Conflict,
    ErrorCode::InternalError,
    ErrorCode::ServiceUnavailable,
    ErrorCode::Timeout,
    ErrorCode::NetworkError,
    ErrorCode::ConnectionError,
];

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ConnectionError => "CONNECTION_ERROR",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        KNOWN_CODES
            .into_iter()
            .find(|code| code.as_str() == raw)
            .unwrap_or_else(|| Self::Other(raw.to_owned()))
    }

    /// User-facing message shown when the server did not supply one.
    pub fn default_message(&self) -> Option<&'static str> {
        let message = match self {
            Self::Unauthorized => "You are not authorized to perform this action",
            Self::Forbidden => "Access denied. You don't have permission for this action",
            Self::TokenExpired => "Your session has expired. Please login again",
            Self::InvalidCredentials => "Invalid email or password",
            Self::ValidationError => "Please check your input and try again",
            Self::RequiredField => "This field is required",
            Self::InvalidFormat => "Invalid format provided",
            Self::NotFound => "The requested resource was not found",
            Self::AlreadyExists => "This resource already exists",
            Self::Conflict => "There is a conflict with the current state",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::Timeout => "Request timed out. Please try again",
            Self::NetworkError => "Network error. Please check your connection",
            Self::ConnectionError => "Unable to connect to the server",
            Self::Other(_) => return None,
        };
        Some(message)
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Unauthorized | Self::Forbidden | Self::TokenExpired | Self::InvalidCredentials => {
                Some(ErrorKind::Auth)
            }
            Self::ValidationError | Self::RequiredField | Self::InvalidFormat => Some(ErrorKind::Validation),
            Self::NotFound => Some(ErrorKind::NotFound),
            Self::AlreadyExists | Self::Conflict => Some(ErrorKind::Conflict),
            Self::InternalError | Self::ServiceUnavailable | Self::Timeout => Some(ErrorKind::Server),
            Self::NetworkError | Self::ConnectionError => Some(ErrorKind::Network),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Message used whenever nothing more specific is available.
pub const FALLBACK_MESSAGE: &str = "An internal server error occurred";

/// Coarse error family used to pick UI treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    Validation,
    NotFound,
    Conflict,
    Server,
    Network,
}

impl ErrorKind {
    fn from_status(status: u16) -> Option<Self> {
        match status {
            401 | 403 => Some(Self::Auth),
            400 | 422 => Some(Self::Validation),
            404 => Some(Self::NotFound),
            409 => Some(Self::Conflict),
            500..=599 => Some(Self::Server),
            _ => None,
        }
    }
}

// =============================================================================
// API ERROR
// =============================================================================

/// Normalized error surfaced to pages.
///
/// `status` is `0` when no HTTP response was received.
#[derive(Clone, Debug, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: u16,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, code: ErrorCode) -> Self {
        Self { message: message.into(), status, code, details: None }
    }

    /// Error carrying the code's default message.
    pub fn from_code(code: ErrorCode, status: u16) -> Self {
        let message = code.default_message().unwrap_or(FALLBACK_MESSAGE);
        Self::new(message, status, code)
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Classification by code when it is a known one, else by HTTP status.
    pub fn kind(&self) -> ErrorKind {
        self.code
            .kind()
            .or_else(|| ErrorKind::from_status(self.status))
            .unwrap_or(ErrorKind::Server)
    }
}

// =============================================================================
// RAW FAILURES
// =============================================================================

/// A failure as it arrives from the transport, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestFailure {
    /// Already normalized; passed through unchanged.
    Api(ApiError),
    /// The server responded with a non-success status.
    Response { status: u16, body: Option<Value> },
    /// The request was sent but no response arrived.
    NoResponse { reason: String },
    /// Anything else (local I/O, decode errors, bugs).
    Other { message: Option<String> },
}

impl From<ApiError> for RequestFailure {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Response { status: status.as_u16(), body: None }
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::NoResponse { reason: err.to_string() }
        } else {
            Self::Other { message: Some(err.to_string()) }
        }
    }
}

impl From<serde_json::Error> for RequestFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Other { message: Some(err.to_string()) }
    }
}

fn body_str<'a>(body: Option<&'a Value>, key: &str) -> Option<&'a str> {
    body.and_then(|b| b.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Normalize any failure into an [`ApiError`].
pub fn parse_error(failure: impl Into<RequestFailure>) -> ApiError {
    match failure.into() {
        RequestFailure::Api(err) => err,
        RequestFailure::Response { status, body } => {
            let raw_message = body.as_ref().and_then(|b| b.get("message"));
            let message = raw_message
                .and_then(message_text)
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());
            let code = body_str(body.as_ref(), "code").map_or(ErrorCode::InternalError, ErrorCode::parse);
            // Serializer errors arrive as a field->errors map under `message`.
            let details = body
                .as_ref()
                .and_then(|b| b.get("details"))
                .filter(|d| !d.is_null())
                .or_else(|| raw_message.filter(|m| m.is_object() || m.is_array()))
                .cloned();
            let err = ApiError::new(message, status, code);
            match details {
                Some(details) => err.with_details(details),
                None => err,
            }
        }
        RequestFailure::NoResponse { reason } => {
            tracing::debug!(%reason, "request produced no response");
            ApiError::from_code(ErrorCode::NetworkError, 0)
        }
        RequestFailure::Other { message } => {
            let message = message.filter(|m| !m.is_empty());
            match message {
                Some(message) => ApiError::new(message, 0, ErrorCode::InternalError),
                None => ApiError::from_code(ErrorCode::InternalError, 0),
            }
        }
    }
}

/// Text to show for any displayable error; empty text gets the fallback.
pub fn error_message(err: &dyn fmt::Display) -> String {
    let text = err.to_string();
    if text.is_empty() { FALLBACK_MESSAGE.to_owned() } else { text }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Anything that may carry an HTTP status.
pub trait StatusError {
    fn http_status(&self) -> Option<u16>;
}

impl StatusError for ApiError {
    fn http_status(&self) -> Option<u16> {
        Some(self.status)
    }
}

impl StatusError for RequestFailure {
    fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Response { status, .. } => Some(*status),
            Self::NoResponse { .. } | Self::Other { .. } => None,
        }
    }
}

/// Only gateway/server faults are worth retrying.
pub fn is_retryable_error<E: StatusError + ?Sized>(err: &E) -> bool {
    matches!(err.http_status(), Some(500 | 502 | 503 | 504))
}

pub fn is_auth_error<E: StatusError + ?Sized>(err: &E) -> bool {
    matches!(err.http_status(), Some(401 | 403))
}

// =============================================================================
// HANDLING
// =============================================================================

/// Options for [`handle_error`].
pub struct HandleOptions<'a> {
    /// Log the message at error level.
    pub show_notification: bool,
    /// Navigate to the login route on 401/403.
    pub redirect_to_login: bool,
    /// When set, replaces the default redirect/log behavior entirely.
    pub custom_handler: Option<&'a dyn Fn(&ApiError)>,
}

impl Default for HandleOptions<'_> {
    fn default() -> Self {
        Self { show_notification: true, redirect_to_login: false, custom_handler: None }
    }
}

/// Parse, report, and return a failure.
///
/// `navigate` is called with [`LOGIN_ROUTE`] when an auth failure should send
/// the user back to sign in.
pub fn handle_error<F>(failure: impl Into<RequestFailure>, options: &HandleOptions<'_>, navigate: F) -> ApiError
where
    F: FnOnce(&str),
{
    let err = parse_error(failure);

    if let Some(handler) = options.custom_handler {
        handler(&err);
        return err;
    }

    if is_auth_error(&err) && options.redirect_to_login {
        navigate(LOGIN_ROUTE);
    }

    if options.show_notification {
        tracing::error!(status = err.status, code = %err.code, "{}", err.message);
    }

    err
}
