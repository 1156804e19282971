//! Auth-session state for the signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and role-aware views read this state; the login and OTP
//! screens drive it through [`AuthEvent`]s as their requests start and
//! settle.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};

use crate::util::roles::Role;

/// The signed-in user as the UI sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub role: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionUser {
    /// Parsed role, `None` for role strings the client does not know.
    pub fn known_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Authentication state tracking the current user and in-flight requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    /// Session restore in progress. Starts `true` so guards wait for it.
    pub loading: bool,
    pub error: Option<String>,
    pub is_authenticated: bool,
    pub login_loading: bool,
    pub otp_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
            is_authenticated: false,
            login_loading: false,
            otp_loading: false,
        }
    }
}

/// Lifecycle of the auth requests plus the two plain setters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    InitializePending,
    /// `None` when no stored session was found.
    InitializeFulfilled(Option<SessionUser>),
    InitializeRejected(String),
    LoginPending,
    LoginFulfilled,
    LoginRejected(String),
    VerifyOtpPending,
    VerifyOtpFulfilled(SessionUser),
    VerifyOtpRejected(String),
    LogoutFulfilled,
    ClearError,
    SetLoading(bool),
}

impl AuthState {
    pub fn apply(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::InitializePending => {
                self.loading = true;
                self.error = None;
            }
            AuthEvent::InitializeFulfilled(user) => {
                self.loading = false;
                self.is_authenticated = user.is_some();
                self.user = user;
                self.error = None;
            }
            AuthEvent::InitializeRejected(message) => {
                self.loading = false;
                self.user = None;
                self.is_authenticated = false;
                self.error = Some(message);
            }
            AuthEvent::LoginPending => {
                self.login_loading = true;
                self.error = None;
            }
            AuthEvent::LoginFulfilled => {
                self.login_loading = false;
                self.error = None;
            }
            AuthEvent::LoginRejected(message) => {
                self.login_loading = false;
                self.error = Some(message);
            }
            AuthEvent::VerifyOtpPending => {
                self.otp_loading = true;
                self.error = None;
            }
            AuthEvent::VerifyOtpFulfilled(user) => {
                self.otp_loading = false;
                self.user = Some(user);
                self.is_authenticated = true;
                self.error = None;
            }
            AuthEvent::VerifyOtpRejected(message) => {
                self.otp_loading = false;
                self.error = Some(message);
            }
            AuthEvent::LogoutFulfilled => {
                self.user = None;
                self.is_authenticated = false;
                self.error = None;
            }
            AuthEvent::ClearError => self.error = None,
            AuthEvent::SetLoading(loading) => self.loading = loading,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(SessionUser::known_role)
    }
}
