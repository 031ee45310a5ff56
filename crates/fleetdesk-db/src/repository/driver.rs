//! SurrealDB implementation of [`DriverRepository`].

use chrono::{DateTime, Utc};
use fleetdesk_core::error::FleetResult;
use fleetdesk_core::models::driver::{
    Driver, DriverFilter, DriverStatus, NewDriver, UpdateDriver,
};
use fleetdesk_core::repository::{DriverRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::sequence::next_id;
use crate::error::DbError;

const SELECT_SCOPED: &str = "SELECT meta::id(id) AS record_id, * \
     FROM type::record('driver', $id) WHERE company_id = $company_id";

#[derive(Debug, SurrealValue)]
struct DriverRow {
    record_id: u64,
    company_id: u64,
    store_id: Option<u64>,
    full_name: String,
    phone: String,
    email: String,
    password_hash: String,
    status: String,
    is_online: bool,
    rating: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DriverRow {
    fn try_into_driver(self) -> Result<Driver, DbError> {
        let status = self
            .status
            .parse::<DriverStatus>()
            .map_err(|e| DbError::decode("driver", e))?;
        Ok(Driver {
            id: self.record_id,
            company_id: self.company_id,
            store_id: self.store_id,
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            password_hash: self.password_hash,
            status,
            is_online: self.is_online,
            rating: self.rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Build the WHERE clause shared by the count and page queries.
fn filter_clause(filter: &DriverFilter) -> String {
    let mut clauses = vec!["company_id = $company_id"];
    if filter.status.is_some() {
        clauses.push("status = $status");
    }
    if filter.search.is_some() {
        clauses.push(
            "(string::lowercase(full_name) CONTAINS $search OR phone CONTAINS $search)",
        );
    }
    clauses.join(" AND ")
}

/// SurrealDB implementation of the driver repository.
#[derive(Clone)]
pub struct SurrealDriverRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDriverRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, company_id: u64, id: u64) -> Result<Driver, DbError> {
        let mut result = self
            .db
            .query(SELECT_SCOPED)
            .bind(("id", id))
            .bind(("company_id", company_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DriverRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("driver", id))?
            .try_into_driver()
    }
}

impl<C: Connection> DriverRepository for SurrealDriverRepository<C> {
    async fn create(&self, input: NewDriver) -> FleetResult<Driver> {
        let id = next_id(&self.db, "driver").await?;

        let mut sets = vec![
            "company_id = $company_id",
            "full_name = $full_name",
            "phone = $phone",
            "email = $email",
            "password_hash = $password_hash",
            "status = $status",
        ];
        if input.store_id.is_some() {
            sets.push("store_id = $store_id");
        }
        let query = format!(
            "CREATE type::record('driver', $id) SET {}; {SELECT_SCOPED};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id))
            .bind(("company_id", input.company_id))
            .bind(("full_name", input.full_name))
            .bind(("phone", input.phone))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .bind(("status", input.status.as_str()));
        if let Some(store_id) = input.store_id {
            builder = builder.bind(("store_id", store_id));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "driver"))?;

        let rows: Vec<DriverRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("driver", id))?;
        Ok(row.try_into_driver()?)
    }

    async fn get_by_id(&self, company_id: u64, id: u64) -> FleetResult<Driver> {
        Ok(self.fetch(company_id, id).await?)
    }

    async fn update(&self, company_id: u64, id: u64, input: UpdateDriver) -> FleetResult<Driver> {
        let mut sets = Vec::new();
        if input.store_id.is_some() {
            sets.push("store_id = $store_id");
        }
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.is_online.is_some() {
            sets.push("is_online = $is_online");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('driver', $id) SET {} WHERE company_id = $company_id; \
             {SELECT_SCOPED};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id))
            .bind(("company_id", company_id));
        if let Some(store_id) = input.store_id {
            builder = builder.bind(("store_id", store_id));
        }
        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(is_online) = input.is_online {
            builder = builder.bind(("is_online", is_online));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "driver"))?;

        let rows: Vec<DriverRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("driver", id))?;
        Ok(row.try_into_driver()?)
    }

    async fn set_status(
        &self,
        company_id: u64,
        id: u64,
        status: DriverStatus,
    ) -> FleetResult<Driver> {
        self.update(
            company_id,
            id,
            UpdateDriver {
                status: Some(status),
                is_online: (status == DriverStatus::Suspended).then_some(false),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete(&self, company_id: u64, id: u64) -> FleetResult<()> {
        self.fetch(company_id, id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE shift WHERE company_id = $company_id AND driver_id = $id; \
                 DELETE type::record('driver', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id))
            .bind(("company_id", company_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(e, "driver"))?;

        Ok(())
    }

    async fn list(
        &self,
        company_id: u64,
        filter: DriverFilter,
        pagination: Pagination,
    ) -> FleetResult<PaginatedResult<Driver>> {
        let clause = filter_clause(&filter);
        let query = format!(
            "SELECT count() AS total FROM driver WHERE {clause} GROUP ALL; \
             SELECT meta::id(id) AS record_id, * FROM driver WHERE {clause} \
             ORDER BY id ASC LIMIT $limit START $offset;"
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("company_id", company_id))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(search) = filter.search {
            builder = builder.bind(("search", search.to_lowercase()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<DriverRow> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(DriverRow::try_into_driver)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count_by_company(&self, company_id: u64) -> FleetResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM driver WHERE company_id = $company_id GROUP ALL")
            .bind(("company_id", company_id))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
