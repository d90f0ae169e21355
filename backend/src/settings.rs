//! Server settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `QUESTIONNAIRE_*` environment variables over
//! the optional config file; the accessors below supply the defaults.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::UserId;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_ADMIN_USER_ID: i32 = 1;

/// Raised when settings are missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("database_url is not configured (set QUESTIONNAIRE_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUESTIONNAIRE")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Listener address, default `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    pub pool_max_size: Option<u32>,
    /// User recorded as the actor of audited mutations until
    /// authentication exists.
    pub admin_user_id: Option<i32>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
    /// Comma-separated CORS origins. Unset, empty or `*` allows any origin.
    pub cors_allowed_origins: Option<String>,
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn admin_user_id(&self) -> UserId {
        UserId::new(self.admin_user_id.unwrap_or(DEFAULT_ADMIN_USER_ID))
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Configured CORS origins, trimmed with blanks dropped.
    pub fn cors_allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
