//! Per-tenant module assignment.
//!
//! A (company, module) pair is assigned at most once. The pre-check here
//! produces the domain error; the unique index backs it up under races.

use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::module::{
    AssignedModule, CreateAssignment, Module, ModuleAssignment, UpdateAssignment,
};
use fleetdesk_core::repository::{CompanyRepository, ModuleRepository};
use serde_json::Value;
use tracing::info;

use crate::ensure_active;

/// Assignment request. `is_enabled` defaults to `true` and `config` to
/// an empty object.
#[derive(Debug, Clone, Default)]
pub struct AssignModule {
    pub module_id: u64,
    pub is_enabled: Option<bool>,
    pub config: Option<Value>,
}

pub struct ModuleService<M: ModuleRepository, C: CompanyRepository> {
    modules: M,
    companies: C,
}

impl<M: ModuleRepository, C: CompanyRepository> ModuleService<M, C> {
    pub fn new(modules: M, companies: C) -> Self {
        Self { modules, companies }
    }

    pub async fn catalog(&self) -> FleetResult<Vec<Module>> {
        self.modules.list_catalog().await
    }

    pub async fn assign(&self, company_id: u64, input: AssignModule) -> FleetResult<ModuleAssignment> {
        ensure_active(&self.companies, company_id).await?;
        let module_id = input.module_id;
        self.modules.get_module(module_id).await?;

        match self.modules.get_assignment(company_id, module_id).await {
            Ok(_) => return Err(FleetError::AlreadyAssigned { company_id, module_id }),
            Err(FleetError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let config = match input.config {
            Some(Value::Null) | None => Value::Object(Default::default()),
            Some(config) => config,
        };
        let assignment = self
            .modules
            .assign(CreateAssignment {
                company_id,
                module_id,
                is_enabled: input.is_enabled.unwrap_or(true),
                config,
            })
            .await
            .map_err(|e| match e {
                FleetError::AlreadyExists { .. } => FleetError::AlreadyAssigned { company_id, module_id },
                other => other,
            })?;

        info!(company_id, module_id, "module assigned");
        Ok(assignment)
    }

    /// Modules assigned to a company, joined with their catalog entries.
    pub async fn list_for_tenant(&self, company_id: u64) -> FleetResult<Vec<AssignedModule>> {
        self.companies.get_by_id(company_id).await?;
        self.modules.list_for_company(company_id).await
    }

    pub async fn update(
        &self,
        company_id: u64,
        module_id: u64,
        input: UpdateAssignment,
    ) -> FleetResult<ModuleAssignment> {
        if input.is_enabled.is_none() && input.config.is_none() {
            return Err(FleetError::validation("no fields to update"));
        }
        ensure_active(&self.companies, company_id).await?;
        let assignment = self
            .modules
            .update_assignment(company_id, module_id, input)
            .await
            .map_err(|e| not_assigned(e, company_id, module_id))?;
        info!(company_id, module_id, "module assignment updated");
        Ok(assignment)
    }

    pub async fn update_config(
        &self,
        company_id: u64,
        module_id: u64,
        config: Value,
    ) -> FleetResult<ModuleAssignment> {
        let input = UpdateAssignment {
            config: Some(config),
            ..Default::default()
        };
        self.update(company_id, module_id, input).await
    }

    pub async fn set_enabled(
        &self,
        company_id: u64,
        module_id: u64,
        is_enabled: bool,
    ) -> FleetResult<ModuleAssignment> {
        let input = UpdateAssignment {
            is_enabled: Some(is_enabled),
            ..Default::default()
        };
        self.update(company_id, module_id, input).await
    }

    pub async fn remove(&self, company_id: u64, module_id: u64) -> FleetResult<()> {
        ensure_active(&self.companies, company_id).await?;
        self.modules
            .remove(company_id, module_id)
            .await
            .map_err(|e| not_assigned(e, company_id, module_id))?;
        info!(company_id, module_id, "module unassigned");
        Ok(())
    }
}

fn not_assigned(err: FleetError, company_id: u64, module_id: u64) -> FleetError {
    match err {
        FleetError::NotFound { .. } => FleetError::NotAssigned { company_id, module_id },
        other => other,
    }
}
