//! SurrealDB implementation of [`ShiftRepository`].
//!
//! Shift dates are stored as ISO `YYYY-MM-DD` strings, which sort and
//! compare correctly as text.

use chrono::{DateTime, NaiveDate, Utc};
use fleetdesk_core::error::FleetResult;
use fleetdesk_core::models::shift::{NewShift, Shift, ShiftStatus};
use fleetdesk_core::repository::{PaginatedResult, Pagination, ShiftRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::sequence::next_id;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ShiftRow {
    record_id: u64,
    company_id: u64,
    driver_id: u64,
    shift_date: String,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    status: String,
    total_orders: u32,
    completed_orders: u32,
    cancelled_orders: u32,
    total_distance_km: f64,
    total_earnings: f64,
    rating: f64,
    notes: String,
    created_at: DateTime<Utc>,
}

impl ShiftRow {
    fn try_into_shift(self) -> Result<Shift, DbError> {
        let shift_date = self
            .shift_date
            .parse::<NaiveDate>()
            .map_err(|e| DbError::decode("shift", e))?;
        let status = self
            .status
            .parse::<ShiftStatus>()
            .map_err(|e| DbError::decode("shift", e))?;
        Ok(Shift {
            id: self.record_id,
            company_id: self.company_id,
            driver_id: self.driver_id,
            shift_date,
            start_time: self.start_time,
            end_time: self.end_time,
            status,
            total_orders: self.total_orders,
            completed_orders: self.completed_orders,
            cancelled_orders: self.cancelled_orders,
            total_distance_km: self.total_distance_km,
            total_earnings: self.total_earnings,
            rating: self.rating,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the shift repository.
#[derive(Clone)]
pub struct SurrealShiftRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealShiftRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ShiftRepository for SurrealShiftRepository<C> {
    async fn create(&self, input: NewShift) -> FleetResult<Shift> {
        let id = next_id(&self.db, "shift").await?;

        let mut sets = vec![
            "company_id = $company_id",
            "driver_id = $driver_id",
            "shift_date = $shift_date",
            "status = $status",
            "total_orders = $total_orders",
            "completed_orders = $completed_orders",
            "cancelled_orders = $cancelled_orders",
            "total_distance_km = $total_distance_km",
            "total_earnings = $total_earnings",
            "rating = $rating",
            "notes = $notes",
        ];
        if input.start_time.is_some() {
            sets.push("start_time = $start_time");
        }
        if input.end_time.is_some() {
            sets.push("end_time = $end_time");
        }
        let query = format!(
            "CREATE type::record('shift', $id) SET {}; \
             SELECT meta::id(id) AS record_id, * FROM type::record('shift', $id);",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id))
            .bind(("company_id", input.company_id))
            .bind(("driver_id", input.driver_id))
            .bind(("shift_date", input.shift_date.format("%Y-%m-%d").to_string()))
            .bind(("status", input.status.as_str()))
            .bind(("total_orders", input.total_orders))
            .bind(("completed_orders", input.completed_orders))
            .bind(("cancelled_orders", input.cancelled_orders))
            .bind(("total_distance_km", input.total_distance_km))
            .bind(("total_earnings", input.total_earnings))
            .bind(("rating", input.rating))
            .bind(("notes", input.notes));
        if let Some(start_time) = input.start_time {
            builder = builder.bind(("start_time", start_time));
        }
        if let Some(end_time) = input.end_time {
            builder = builder.bind(("end_time", end_time));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "shift"))?;

        let rows: Vec<ShiftRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("shift", id))?;
        Ok(row.try_into_shift()?)
    }

    async fn list_by_driver(
        &self,
        company_id: u64,
        driver_id: u64,
        status: Option<ShiftStatus>,
        pagination: Pagination,
    ) -> FleetResult<PaginatedResult<Shift>> {
        let clause = if status.is_some() {
            "company_id = $company_id AND driver_id = $driver_id AND status = $status"
        } else {
            "company_id = $company_id AND driver_id = $driver_id"
        };
        let query = format!(
            "SELECT count() AS total FROM shift WHERE {clause} GROUP ALL; \
             SELECT meta::id(id) AS record_id, * FROM shift WHERE {clause} \
             ORDER BY shift_date DESC, id DESC LIMIT $limit START $offset;"
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("company_id", company_id))
            .bind(("driver_id", driver_id))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(status) = status {
            builder = builder.bind(("status", status.as_str()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<ShiftRow> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(ShiftRow::try_into_shift)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_since(
        &self,
        company_id: u64,
        driver_id: u64,
        since: NaiveDate,
    ) -> FleetResult<Vec<Shift>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM shift \
                 WHERE company_id = $company_id AND driver_id = $driver_id \
                 AND shift_date >= $since ORDER BY id ASC",
            )
            .bind(("company_id", company_id))
            .bind(("driver_id", driver_id))
            .bind(("since", since.format("%Y-%m-%d").to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ShiftRow> = result.take(0).map_err(DbError::from)?;
        let shifts = rows
            .into_iter()
            .map(ShiftRow::try_into_shift)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(shifts)
    }
}
