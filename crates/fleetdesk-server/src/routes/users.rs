//! End-user management. Accounts may only change or delete themselves.

use axum::extract::State;
use fleetdesk_auth::user::UserChanges;
use fleetdesk_core::error::FleetError;
use fleetdesk_core::models::user::User;
use serde::Deserialize;
use validator::Validate;

use super::PageQuery;
use super::auth::RegisterRequest;
use crate::error::ApiResult;
use crate::extract::{Path, Query, UserIdentity, ValidatedJson};
use crate::response::{ApiResponse, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100, message = "name must be 2 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

fn require_self(identity: &fleetdesk_auth::gate::Identity, id: u64) -> ApiResult<()> {
    if identity.id == id {
        Ok(())
    } else {
        Err(FleetError::denied("users may only modify their own account").into())
    }
}

pub async fn list(
    State(state): State<AppState>,
    _caller: UserIdentity,
    Query(query): Query<PageQuery>,
) -> ApiResult<ApiResponse<Page<User>>> {
    let users = state.accounts.list(query.pagination()).await?;
    Ok(ApiResponse::ok("Users retrieved", users.into()))
}

pub async fn create(
    State(state): State<AppState>,
    _caller: UserIdentity,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<ApiResponse<User>> {
    let user = state.accounts.create(req.into()).await?;
    Ok(ApiResponse::created("User created", user))
}

pub async fn get(
    State(state): State<AppState>,
    _caller: UserIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<User>> {
    let user = state.accounts.get(id).await?;
    Ok(ApiResponse::ok("User retrieved", user))
}

pub async fn update(
    State(state): State<AppState>,
    UserIdentity(identity): UserIdentity,
    Path(id): Path<u64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<ApiResponse<User>> {
    require_self(&identity, id)?;
    let changes = UserChanges {
        name: req.name,
        email: req.email,
        password: req.password,
    };
    let user = state.accounts.update(id, changes).await?;
    Ok(ApiResponse::ok("User updated", user))
}

pub async fn delete(
    State(state): State<AppState>,
    UserIdentity(identity): UserIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<()>> {
    require_self(&identity, id)?;
    state.accounts.delete(id).await?;
    Ok(ApiResponse::done("User deleted"))
}
