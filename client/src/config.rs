//! Client configuration parsed from `CLINIC_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::net::endpoints::DEFAULT_BASE_URL;
use crate::net::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};
use crate::util::token::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(5 * 60);
pub const APP_NAME: &str = "Clinic Management System";
pub const APP_VERSION: &str = "1.0.0";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_UPLOAD_FILES: u32 = 5;
pub const ALLOWED_UPLOAD_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "application/pdf"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown CLINIC_ENV: {0}")]
    UnknownEnvironment(String),
    #[error("{var} is required in production")]
    Missing { var: &'static str },
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.unwrap_or("development") {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub access_token_key: &'static str,
    pub refresh_token_key: &'static str,
    /// Refresh this long before the access token expires.
    pub expiry_buffer: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub name: &'static str,
    pub version: &'static str,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub notifications: bool,
    pub offline_mode: bool,
    pub analytics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PaginationConfig {
    /// Requested page size, defaulted and capped.
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        match requested {
            None | Some(0) => self.default_page_size,
            Some(n) => n.min(self.max_page_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub allowed_types: Vec<String>,
    pub max_files: u32,
}

impl UploadConfig {
    pub fn accepts(&self, mime: &str, size: u64) -> bool {
        size <= self.max_file_size && self.allowed_types.iter().any(|t| t == mime)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub app: AppConfig,
    pub features: FeatureFlags,
    pub pagination: PaginationConfig,
    pub upload: UploadConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development, None)
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CLINIC_ENV`: `development` (default), `test`, or `production`
    /// - `CLINIC_API_BASE_URL`: required in production, ignored in development
    /// - `CLINIC_API_TIMEOUT_MS`: default 10000
    /// - `CLINIC_API_RETRY_ATTEMPTS`: default 3
    /// - `CLINIC_API_RETRY_DELAY_MS`: default 1000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown environment, a malformed number,
    /// or a production build without a base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::parse(lookup("CLINIC_ENV").as_deref())?;
        let base_url = lookup("CLINIC_API_BASE_URL").filter(|v| !v.trim().is_empty());
        if environment == Environment::Production && base_url.is_none() {
            return Err(ConfigError::Missing { var: "CLINIC_API_BASE_URL" });
        }

        let mut config = Self::for_environment(environment, base_url);
        let timeout_ms = parse_u64(&lookup, "CLINIC_API_TIMEOUT_MS")?;
        let attempts = parse_u64(&lookup, "CLINIC_API_RETRY_ATTEMPTS")?;
        let delay_ms = parse_u64(&lookup, "CLINIC_API_RETRY_DELAY_MS")?;

        if let Some(ms) = timeout_ms {
            config.api.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = attempts {
            config.api.retry.max_attempts = u32::try_from(n).unwrap_or(u32::MAX);
        }
        if let Some(ms) = delay_ms {
            config.api.retry.delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Defaults plus the per-environment overrides. Development always talks
    /// to the local backend.
    pub fn for_environment(environment: Environment, base_url: Option<String>) -> Self {
        let base_url = match environment {
            Environment::Development => DEFAULT_BASE_URL.to_owned(),
            Environment::Test | Environment::Production => base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        };
        Self {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_owned(),
                timeout: DEFAULT_TIMEOUT,
                retry: RetryPolicy::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY),
            },
            auth: AuthConfig {
                access_token_key: ACCESS_TOKEN_KEY,
                refresh_token_key: REFRESH_TOKEN_KEY,
                expiry_buffer: DEFAULT_EXPIRY_BUFFER,
            },
            app: AppConfig { name: APP_NAME, version: APP_VERSION, environment },
            features: FeatureFlags {
                notifications: true,
                offline_mode: false,
                analytics: environment == Environment::Production,
            },
            pagination: PaginationConfig { default_page_size: DEFAULT_PAGE_SIZE, max_page_size: MAX_PAGE_SIZE },
            upload: UploadConfig {
                max_file_size: MAX_UPLOAD_BYTES,
                allowed_types: ALLOWED_UPLOAD_TYPES.iter().map(|t| (*t).to_owned()).collect(),
                max_files: MAX_UPLOAD_FILES,
            },
        }
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}
