//! Authentication error types.

use fleetdesk_core::error::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Password too short: at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Password encoding error: {0}")]
    Encoding(String),

    #[error("Corrupt password hash: {0}")]
    CorruptHash(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for FleetError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => FleetError::InvalidCredentials,
            AuthError::AccountInactive => FleetError::AccountInactive,
            AuthError::WeakPassword { .. } => FleetError::Validation {
                message: err.to_string(),
            },
            AuthError::Encoding(message) => FleetError::Validation { message },
            AuthError::CorruptHash(msg) | AuthError::Crypto(msg) => FleetError::Crypto(msg),
            AuthError::TokenExpired => FleetError::TokenExpired,
            // The detail stays in logs; callers only learn "invalid".
            AuthError::TokenInvalid(_) => FleetError::TokenInvalid,
        }
    }
}
