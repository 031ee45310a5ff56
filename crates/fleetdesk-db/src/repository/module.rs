//! SurrealDB implementation of [`ModuleRepository`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fleetdesk_core::error::FleetResult;
use fleetdesk_core::models::module::{
    AssignedModule, CreateAssignment, Module, ModuleAssignment, UpdateAssignment,
};
use fleetdesk_core::repository::ModuleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::sequence::next_id;
use crate::error::DbError;

const SELECT_ASSIGNMENT: &str = "SELECT meta::id(id) AS record_id, * FROM company_module \
     WHERE company_id = $company_id AND module_id = $module_id";

#[derive(Debug, SurrealValue)]
struct ModuleRow {
    record_id: u64,
    module_key: String,
    name: String,
    category: String,
    description: String,
    default_enabled: bool,
}

impl ModuleRow {
    fn into_module(self) -> Module {
        Module {
            id: self.record_id,
            module_key: self.module_key,
            name: self.name,
            category: self.category,
            description: self.description,
            default_enabled: self.default_enabled,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct AssignmentRow {
    record_id: u64,
    company_id: u64,
    module_id: u64,
    is_enabled: bool,
    config: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssignmentRow {
    fn into_assignment(self) -> ModuleAssignment {
        ModuleAssignment {
            id: self.record_id,
            company_id: self.company_id,
            module_id: self.module_id,
            is_enabled: self.is_enabled,
            config: self.config,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn pair_id(company_id: u64, module_id: u64) -> String {
    format!("company={company_id},module={module_id}")
}

/// SurrealDB implementation of the module catalog and assignments.
#[derive(Clone)]
pub struct SurrealModuleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealModuleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ModuleRepository for SurrealModuleRepository<C> {
    async fn list_catalog(&self) -> FleetResult<Vec<Module>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM module ORDER BY id ASC")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(ModuleRow::into_module).collect())
    }

    async fn get_module(&self, id: u64) -> FleetResult<Module> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('module', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("module", id))?;
        Ok(row.into_module())
    }

    async fn assign(&self, input: CreateAssignment) -> FleetResult<ModuleAssignment> {
        let id = next_id(&self.db, "company_module").await?;

        let result = self
            .db
            .query(
                "CREATE type::record('company_module', $id) SET \
                    company_id = $company_id, module_id = $module_id, \
                    is_enabled = $is_enabled, config = $config; \
                 SELECT meta::id(id) AS record_id, * \
                    FROM type::record('company_module', $id);",
            )
            .bind(("id", id))
            .bind(("company_id", input.company_id))
            .bind(("module_id", input.module_id))
            .bind(("is_enabled", input.is_enabled))
            .bind(("config", input.config))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company_module"))?;

        let rows: Vec<AssignmentRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_module", id))?;
        Ok(row.into_assignment())
    }

    async fn get_assignment(&self, company_id: u64, module_id: u64) -> FleetResult<ModuleAssignment> {
        let mut result = self
            .db
            .query(SELECT_ASSIGNMENT)
            .bind(("company_id", company_id))
            .bind(("module_id", module_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_module", pair_id(company_id, module_id)))?;
        Ok(row.into_assignment())
    }

    async fn list_for_company(&self, company_id: u64) -> FleetResult<Vec<AssignedModule>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company_module \
                 WHERE company_id = $company_id ORDER BY id ASC; \
                 SELECT meta::id(id) AS record_id, * FROM module;",
            )
            .bind(("company_id", company_id))
            .await
            .map_err(DbError::from)?;

        let assignments: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        let modules: Vec<ModuleRow> = result.take(1).map_err(DbError::from)?;
        let mut catalog: HashMap<u64, Module> = modules
            .into_iter()
            .map(|row| (row.record_id, row.into_module()))
            .collect();

        let mut joined = Vec::with_capacity(assignments.len());
        for row in assignments {
            let module = catalog
                .remove(&row.module_id)
                .ok_or_else(|| DbError::decode("company_module", format!(
                    "assignment {} references missing module {}",
                    row.record_id, row.module_id
                )))?;
            joined.push(AssignedModule {
                assignment: row.into_assignment(),
                module,
            });
        }
        Ok(joined)
    }

    async fn update_assignment(
        &self,
        company_id: u64,
        module_id: u64,
        input: UpdateAssignment,
    ) -> FleetResult<ModuleAssignment> {
        let mut sets = Vec::new();
        if input.is_enabled.is_some() {
            sets.push("is_enabled = $is_enabled");
        }
        if input.config.is_some() {
            sets.push("config = $config");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE company_module SET {} \
             WHERE company_id = $company_id AND module_id = $module_id; \
             {SELECT_ASSIGNMENT};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("company_id", company_id))
            .bind(("module_id", module_id));
        if let Some(is_enabled) = input.is_enabled {
            builder = builder.bind(("is_enabled", is_enabled));
        }
        if let Some(config) = input.config {
            builder = builder.bind(("config", config));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company_module"))?;

        let rows: Vec<AssignmentRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company_module", pair_id(company_id, module_id)))?;
        Ok(row.into_assignment())
    }

    async fn remove(&self, company_id: u64, module_id: u64) -> FleetResult<()> {
        #[derive(Debug, SurrealValue)]
        struct Removed {
            #[allow(dead_code)]
            company_id: u64,
        }

        let result = self
            .db
            .query(
                "DELETE company_module \
                 WHERE company_id = $company_id AND module_id = $module_id \
                 RETURN BEFORE",
            )
            .bind(("company_id", company_id))
            .bind(("module_id", module_id))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company_module"))?;

        let removed: Vec<Removed> = result.take(0).map_err(DbError::from)?;
        if removed.is_empty() {
            return Err(DbError::not_found("company_module", pair_id(company_id, module_id)).into());
        }
        Ok(())
    }
}
