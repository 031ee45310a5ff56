//! SurrealDB implementation of [`AdminRepository`].

use chrono::{DateTime, Utc};
use fleetdesk_core::error::FleetResult;
use fleetdesk_core::models::admin::{AdminRole, CompanyAdmin, NewAdmin};
use fleetdesk_core::repository::AdminRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::sequence::next_id;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AdminRow {
    record_id: u64,
    company_id: u64,
    full_name: String,
    email: String,
    phone: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminRow {
    fn try_into_admin(self) -> Result<CompanyAdmin, DbError> {
        let role = self
            .role
            .parse::<AdminRole>()
            .map_err(|e| DbError::decode("company_admin", e))?;
        Ok(CompanyAdmin {
            id: self.record_id,
            company_id: self.company_id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the company admin repository.
#[derive(Clone)]
pub struct SurrealAdminRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAdminRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AdminRepository for SurrealAdminRepository<C> {
    async fn create(&self, input: NewAdmin) -> FleetResult<CompanyAdmin> {
        let id = next_id(&self.db, "company_admin").await?;

        let result = self
            .db
            .query(
                "CREATE type::record('company_admin', $id) SET \
                    company_id = $company_id, full_name = $full_name, \
                    email = $email, phone = $phone, \
                    password_hash = $password_hash, role = $role, \
                    is_active = true; \
                 SELECT meta::id(id) AS record_id, * \
                    FROM type::record('company_admin', $id);",
            )
            .bind(("id", id))
            .bind(("company_id", input.company_id))
            .bind(("full_name", input.full_name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("password_hash", input.password_hash))
            .bind(("role", input.role.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company_admin"))?;

        let rows: Vec<AdminRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_admin", id))?;
        Ok(row.try_into_admin()?)
    }

    async fn get_by_id(&self, id: u64) -> FleetResult<CompanyAdmin> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('company_admin', $id)",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_admin", id))?;
        Ok(row.try_into_admin()?)
    }

    async fn get_by_email(&self, email: &str) -> FleetResult<CompanyAdmin> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company_admin WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_admin", email))?;
        Ok(row.try_into_admin()?)
    }

    async fn list_by_company(&self, company_id: u64) -> FleetResult<Vec<CompanyAdmin>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company_admin WHERE company_id = $company_id \
                 ORDER BY id ASC",
            )
            .bind(("company_id", company_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminRow> = result.take(0).map_err(DbError::from)?;
        let admins = rows
            .into_iter()
            .map(AdminRow::try_into_admin)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(admins)
    }

    async fn set_active(&self, id: u64, is_active: bool) -> FleetResult<CompanyAdmin> {
        let result = self
            .db
            .query(
                "UPDATE type::record('company_admin', $id) SET \
                    is_active = $is_active, updated_at = time::now(); \
                 SELECT meta::id(id) AS record_id, * \
                    FROM type::record('company_admin', $id);",
            )
            .bind(("id", id))
            .bind(("is_active", is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company_admin"))?;

        let rows: Vec<AdminRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_admin", id))?;
        Ok(row.try_into_admin()?)
    }
}
