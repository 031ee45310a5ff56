//! Numeric id allocation.
//!
//! Every table draws ids from a row in `id_sequence` keyed by table
//! name. Ids are never reused, even when the statement that requested
//! one later fails.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SequenceRow {
    next_id: u64,
}

/// Allocate the next id for `table`.
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, table: &str) -> Result<u64, DbError> {
    let result = db
        .query("UPSERT type::record('id_sequence', $table) SET next_id += 1")
        .bind(("table", table.to_string()))
        .await
        .map_err(DbError::from)?;

    let mut result = result
        .check()
        .map_err(|e| DbError::Query(e.to_string()))?;

    let rows: Vec<SequenceRow> = result.take(0).map_err(DbError::from)?;
    rows.into_iter()
        .next()
        .map(|row| row.next_id)
        .ok_or_else(|| DbError::Query(format!("id sequence for {table} returned nothing")))
}
