//! Process configuration from flags and environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use fleetdesk_auth::config::{AuthConfig, MAX_TOKEN_LIFETIME_SECS};
use fleetdesk_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set and non-empty")]
    MissingSecret(&'static str),

    #[error("{0} must be a positive number of seconds")]
    ZeroDuration(&'static str),

    #[error("{0} must not exceed {max} seconds", max = MAX_TOKEN_LIFETIME_SECS)]
    LifetimeTooLong(&'static str),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "fleetdesk", version, about = "Multi-tenant fleet management admin API")]
pub struct Args {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "FLEETDESK_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    #[arg(long, env = "FLEETDESK_DB_URL", default_value = "mem://")]
    pub db_url: String,

    #[arg(long, env = "FLEETDESK_DB_NAMESPACE", default_value = "fleetdesk")]
    pub db_namespace: String,

    #[arg(long, env = "FLEETDESK_DB_DATABASE", default_value = "main")]
    pub db_database: String,

    #[arg(long, env = "FLEETDESK_DB_USERNAME")]
    pub db_username: Option<String>,

    #[arg(long, env = "FLEETDESK_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long, env = "ADMIN_JWT_SECRET", hide_env_values = true)]
    pub admin_jwt_secret: String,

    /// Admin token lifetime in seconds.
    #[arg(long, env = "ADMIN_JWT_EXPIRATION")]
    pub admin_jwt_expiration: u64,

    #[arg(long, env = "USER_JWT_SECRET", hide_env_values = true)]
    pub user_jwt_secret: String,

    /// End-user token lifetime in seconds.
    #[arg(long, env = "USER_JWT_EXPIRATION")]
    pub user_jwt_expiration: u64,

    #[arg(long, env = "FLEETDESK_PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,

    #[arg(long, env = "FLEETDESK_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Args {
    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret("ADMIN_JWT_SECRET"));
        }
        if self.user_jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret("USER_JWT_SECRET"));
        }
        if self.admin_jwt_expiration == 0 {
            return Err(ConfigError::ZeroDuration("ADMIN_JWT_EXPIRATION"));
        }
        if self.user_jwt_expiration == 0 {
            return Err(ConfigError::ZeroDuration("USER_JWT_EXPIRATION"));
        }
        if self.admin_jwt_expiration > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::LifetimeTooLong("ADMIN_JWT_EXPIRATION"));
        }
        if self.user_jwt_expiration > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::LifetimeTooLong("USER_JWT_EXPIRATION"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("FLEETDESK_REQUEST_TIMEOUT_SECS"));
        }
        Ok(())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        let mut config = AuthConfig::new(
            self.admin_jwt_secret.clone(),
            self.admin_jwt_expiration,
            self.user_jwt_secret.clone(),
            self.user_jwt_expiration,
        );
        config.pepper = self.password_pepper.clone().filter(|p| !p.is_empty());
        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
