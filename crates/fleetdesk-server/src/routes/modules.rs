//! Module catalog and per-tenant assignment endpoints.

use axum::extract::State;
use fleetdesk_admin::AssignModule;
use fleetdesk_core::models::module::{AssignedModule, Module, ModuleAssignment, UpdateAssignment};
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::ApiResult;
use crate::extract::{AdminIdentity, Path, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;

fn json_object(value: &Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ValidationError::new("object").with_message("config must be a JSON object".into()))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignModuleRequest {
    #[validate(range(min = 1, message = "module_id is required"))]
    pub module_id: u64,
    pub is_enabled: Option<bool>,
    #[validate(custom(function = "json_object"))]
    pub config: Option<Value>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    pub is_enabled: Option<bool>,
    #[validate(custom(function = "json_object"))]
    pub config: Option<Value>,
}

pub async fn catalog(
    State(state): State<AppState>,
    _caller: AdminIdentity,
) -> ApiResult<ApiResponse<Vec<Module>>> {
    let modules = state.modules.catalog().await?;
    Ok(ApiResponse::ok("Modules retrieved", modules))
}

pub async fn assign(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
    ValidatedJson(req): ValidatedJson<AssignModuleRequest>,
) -> ApiResult<ApiResponse<ModuleAssignment>> {
    identity.require_company(id)?;
    let assignment = state
        .modules
        .assign(
            id,
            AssignModule {
                module_id: req.module_id,
                is_enabled: req.is_enabled,
                config: req.config,
            },
        )
        .await?;
    Ok(ApiResponse::created("Module assigned", assignment))
}

pub async fn list(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<Vec<AssignedModule>>> {
    identity.require_company(id)?;
    let modules = state.modules.list_for_tenant(id).await?;
    Ok(ApiResponse::ok("Company modules retrieved", modules))
}

pub async fn update(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, module_id)): Path<(u64, u64)>,
    ValidatedJson(req): ValidatedJson<UpdateModuleRequest>,
) -> ApiResult<ApiResponse<ModuleAssignment>> {
    identity.require_company(id)?;
    let assignment = state
        .modules
        .update(
            id,
            module_id,
            UpdateAssignment {
                is_enabled: req.is_enabled,
                config: req.config,
            },
        )
        .await?;
    Ok(ApiResponse::ok("Module assignment updated", assignment))
}

pub async fn remove(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, module_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<()>> {
    identity.require_company(id)?;
    state.modules.remove(id, module_id).await?;
    Ok(ApiResponse::done("Module removed"))
}
