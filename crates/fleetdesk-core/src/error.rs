//! Error types for the FleetDesk system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Admin email already exists")]
    DuplicateOwnerEmail,

    #[error("Module already assigned: {module_id} to company {company_id}")]
    AlreadyAssigned { company_id: u64, module_id: u64 },

    #[error("Module not assigned: {module_id} to company {company_id}")]
    NotAssigned { company_id: u64, module_id: u64 },

    #[error("Limit exceeded: {resource} (max {limit})")]
    LimitExceeded { resource: String, limit: u32 },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Company suspended: {company_id}")]
    TenantSuspended { company_id: u64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used by the HTTP boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    AccountInactive,
    Forbidden,
    Internal,
}

impl FleetError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        FleetError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        FleetError::Validation {
            message: message.into(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        FleetError::AuthorizationDenied {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FleetError::Validation { .. } => ErrorKind::Validation,
            FleetError::NotFound { .. } | FleetError::NotAssigned { .. } => ErrorKind::NotFound,
            FleetError::AlreadyExists { .. }
            | FleetError::DuplicateOwnerEmail
            | FleetError::AlreadyAssigned { .. }
            | FleetError::LimitExceeded { .. } => ErrorKind::Conflict,
            FleetError::InvalidCredentials
            | FleetError::TokenExpired
            | FleetError::TokenInvalid => ErrorKind::Unauthorized,
            FleetError::AccountInactive => ErrorKind::AccountInactive,
            FleetError::AuthorizationDenied { .. } | FleetError::TenantSuspended { .. } => {
                ErrorKind::Forbidden
            }
            FleetError::Database(_) | FleetError::Crypto(_) | FleetError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type FleetResult<T> = Result<T, FleetError>;
