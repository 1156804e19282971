//! Backend URL table.
//!
//! Every path keeps the backend's trailing slash.

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod endpoints_test;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self { base: base_url.trim_end_matches('/').to_owned() }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Join a relative path (with or without leading `/`) onto the base.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    // --- auth ---

    pub fn login(&self) -> String {
        self.url("login/")
    }

    pub fn verify_otp(&self) -> String {
        self.url("verify-otp/")
    }

    pub fn logout(&self) -> String {
        self.url("logout/")
    }

    pub fn me(&self) -> String {
        self.url("auth/me/")
    }

    pub fn refresh(&self) -> String {
        self.url("refresh-token/")
    }

    // --- doctors ---

    pub fn register_doctor(&self) -> String {
        self.url("register-doctor/")
    }

    pub fn doctors(&self) -> String {
        self.url("doctors/")
    }

    pub fn doctor(&self, id: &str) -> String {
        self.url(&format!("doctors/{id}/"))
    }

    // --- clinics ---

    pub fn register_clinic(&self) -> String {
        self.url("register-clinic/")
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
