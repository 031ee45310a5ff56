//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use fleetdesk_core::error::FleetResult;
use fleetdesk_core::models::user::{NewUser, UpdateUser, User};
use fleetdesk_core::repository::{PaginatedResult, Pagination, UserRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::sequence::next_id;
use crate::error::DbError;

const SELECT_BY_ID: &str = "SELECT meta::id(id) AS record_id, * FROM type::record('user', $id)";

#[derive(Debug, SurrealValue)]
struct UserRow {
    record_id: u64,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.record_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the end-user repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: NewUser) -> FleetResult<User> {
        let id = next_id(&self.db, "user").await?;

        let result = self
            .db
            .query(format!(
                "CREATE type::record('user', $id) SET name = $name, \
                 email = $email, password_hash = $password_hash; {SELECT_BY_ID};"
            ))
            .bind(("id", id))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "user"))?;

        let rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id))?;
        Ok(row.into_user())
    }

    async fn get_by_id(&self, id: u64) -> FleetResult<User> {
        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id))?;
        Ok(row.into_user())
    }

    async fn get_by_email(&self, email: &str) -> FleetResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", email))?;
        Ok(row.into_user())
    }

    async fn update(&self, id: u64, input: UpdateUser) -> FleetResult<User> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}; {SELECT_BY_ID};",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "user"))?;

        let rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("user", id))?;
        Ok(row.into_user())
    }

    async fn delete(&self, id: u64) -> FleetResult<()> {
        #[derive(Debug, SurrealValue)]
        struct Removed {
            #[allow(dead_code)]
            email: String,
        }

        let result = self
            .db
            .query("DELETE type::record('user', $id) RETURN BEFORE")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "user"))?;

        let removed: Vec<Removed> = result.take(0).map_err(DbError::from)?;
        if removed.is_empty() {
            return Err(DbError::not_found("user", id).into());
        }
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> FleetResult<PaginatedResult<User>> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user GROUP ALL; \
                 SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY id ASC LIMIT $limit START $offset;",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;
        Ok(PaginatedResult {
            items: rows.into_iter().map(UserRow::into_user).collect(),
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
