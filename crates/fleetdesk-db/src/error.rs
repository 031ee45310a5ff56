//! Database-specific error types and conversions.

use fleetdesk_core::error::FleetError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique constraint violated on {entity}")]
    Conflict { entity: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Corrupt row in {entity}: {detail}")]
    Decode { entity: String, detail: String },
}

impl DbError {
    /// Classify a failed statement. Unique index violations become
    /// [`DbError::Conflict`] for `entity`.
    pub(crate) fn statement(err: impl std::fmt::Display, entity: &str) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Query(message)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub(crate) fn decode(entity: &str, detail: impl ToString) -> Self {
        DbError::Decode {
            entity: entity.into(),
            detail: detail.to_string(),
        }
    }
}

impl From<DbError> for FleetError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FleetError::NotFound { entity, id },
            DbError::Conflict { entity } => FleetError::AlreadyExists { entity },
            other => FleetError::Database(other.to_string()),
        }
    }
}
