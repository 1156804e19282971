//! REST client for the clinic backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request carries the stored access token as a bearer header. A 401
//! triggers one token refresh and one replay of the original request; if the
//! refresh itself fails the session is cleared and the caller gets an auth
//! error, which UI code routes to the login page via `handle_error`.
//!
//! CONCURRENCY
//! ===========
//! Refreshes are serialized behind a mutex. A request that was rejected with
//! a token some other task has since replaced replays with the new token
//! instead of refreshing again.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use super::endpoints::Endpoints;
use super::error::{ApiError, ErrorCode, RequestFailure, parse_error};
use super::retry::{RetryPolicy, retry_request};
use super::types::{
    Doctor, DoctorRegistration, Envelope, LoginRequest, RefreshRequest, RefreshResponse, User, VerifiedSession,
    VerifyOtpRequest,
};
use crate::config::ApiConfig;
use crate::util::token::TokenService;

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    tokens: TokenService,
    retry: RetryPolicy,
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend init).
    pub fn new(config: &ApiConfig, tokens: TokenService) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(parse_error)?;
        Ok(Self {
            http,
            endpoints: Endpoints::new(&config.base_url),
            tokens,
            retry: config.retry,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    // =========================================================================
    // GENERIC
    // =========================================================================

    /// GET `path` (relative to the base URL, or absolute), retrying transient
    /// server failures.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] of the last attempt.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoints.url(path);
        let url = url.as_str();
        let value = retry_request(self.retry, move || self.send(Method::GET, url, None)).await?;
        serde_json::from_value(value).map_err(parse_error)
    }

    /// POST a JSON body to `path`. Never retried.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoints.url(path);
        let body = serde_json::to_value(body).map_err(parse_error)?;
        let value = self.send(Method::POST, &url, Some(&body)).await?;
        serde_json::from_value(value).map_err(parse_error)
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Submit credentials; on success the backend emails an OTP.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`], e.g. `INVALID_CREDENTIALS`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Envelope<Value>, ApiError> {
        self.post_json(&self.endpoints.login(), &LoginRequest { email, password }).await
    }

    /// Exchange an OTP for tokens, storing them and the user summary.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`], or `INVALID_CREDENTIALS` when the
    /// backend answers with `status: false`.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<VerifiedSession, ApiError> {
        let envelope: Envelope<VerifiedSession> =
            self.post_json(&self.endpoints.verify_otp(), &VerifyOtpRequest { email, otp }).await?;
        let message = envelope.message_text();
        let Some(session) = envelope.data.filter(|_| envelope.status) else {
            let message = message.unwrap_or_else(|| "OTP verification failed".to_owned());
            return Err(ApiError::new(message, 400, ErrorCode::InvalidCredentials));
        };
        self.tokens.set_tokens(Some(&session.access), Some(&session.refresh));
        self.tokens.set_user_info(&session.stored_user());
        tracing::debug!(role = %session.role, user_id = %session.user_id, "otp verified");
        Ok(session)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `TOKEN_EXPIRED` (401) and clears the session when there is no
    /// refresh token or the backend rejects it.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Tell the backend to end the session. Local tokens are cleared whatever
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Returns the backend's error after the local session is already gone.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.send(Method::POST, &self.endpoints.logout(), None).await;
        self.tokens.clear();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "logout request failed");
        }
        result.map(|_| ())
    }

    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let value: Value = self.get_json(&self.endpoints.me()).await?;
        serde_json::from_value(unwrap_data(value)).map_err(parse_error)
    }

    // =========================================================================
    // DOCTORS / CLINICS
    // =========================================================================

    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        let value: Value = self.get_json(&self.endpoints.doctors()).await?;
        serde_json::from_value(unwrap_data(value)).map_err(parse_error)
    }

    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; `NOT_FOUND` for unknown ids.
    pub async fn doctor(&self, id: &str) -> Result<Doctor, ApiError> {
        let value: Value = self.get_json(&self.endpoints.doctor(id)).await?;
        serde_json::from_value(unwrap_data(value)).map_err(parse_error)
    }

    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; validation failures carry the
    /// per-field messages in `details`.
    pub async fn register_doctor(&self, doctor: &DoctorRegistration) -> Result<Envelope<Value>, ApiError> {
        self.post_json(&self.endpoints.register_doctor(), doctor).await
    }

    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn register_clinic(&self, clinic: &Value) -> Result<Envelope<Value>, ApiError> {
        self.post_json(&self.endpoints.register_clinic(), clinic).await
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let token = self.tokens.access_token();
        match self.send_once(method.clone(), url, body, token.as_deref()).await {
            Err(err) if err.status() == 401 => {
                let access = self.refresh_after_rejection(token.as_deref()).await?;
                self.send_once(method, url, body, Some(&access)).await
            }
            other => other,
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut request = self.http.request(method, url);
        if let Some(token) = bearer.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(parse_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(parse_error)?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            return Err(parse_error(RequestFailure::Response { status: status.as_u16(), body }));
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(parse_error)
    }

    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.refresh_lock.lock().await;
        if let Some(current) = self.tokens.access_token() {
            if rejected != Some(current.as_str()) {
                return Ok(current);
            }
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<String, ApiError> {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            tracing::warn!("no refresh token, clearing session");
            self.tokens.clear();
            return Err(ApiError::new("No refresh token available. Please login again.", 401, ErrorCode::TokenExpired));
        };

        tracing::debug!("refreshing access token");
        let body = serde_json::to_value(RefreshRequest { refresh_token: &refresh_token }).map_err(parse_error)?;
        let refreshed = self
            .send_once(Method::POST, &self.endpoints.refresh(), Some(&body), None)
            .await
            .and_then(|value| serde_json::from_value::<RefreshResponse>(value).map_err(parse_error));

        match refreshed {
            Ok(RefreshResponse { access, refresh }) => {
                self.tokens.set_tokens(Some(&access), refresh.as_deref());
                Ok(access)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, clearing session");
                self.tokens.clear();
                Err(ApiError::from_code(ErrorCode::TokenExpired, 401))
            }
        }
    }
}

/// Most endpoints wrap their payload in `data`; some return it bare.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
