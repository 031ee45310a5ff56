//! Login endpoints for both namespaces plus end-user registration.

use axum::extract::State;
use fleetdesk_auth::service::LoginOutput;
use fleetdesk_auth::user::RegisterUser;
use fleetdesk_core::models::admin::CompanyAdmin;
use fleetdesk_core::models::user::User;
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiResult;
use crate::extract::{AdminIdentity, UserIdentity, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

pub async fn admin_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginOutput<CompanyAdmin>>> {
    let output = state.admin_auth.login(&req.email, &req.password).await?;
    Ok(ApiResponse::ok("Login successful", output))
}

pub async fn admin_me(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
) -> ApiResult<ApiResponse<CompanyAdmin>> {
    let admin = state.admin_auth.profile(&identity).await?;
    Ok(ApiResponse::ok("Profile retrieved", admin))
}

pub async fn user_register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<ApiResponse<LoginOutput<User>>> {
    let output = state.accounts.register(req.into()).await?;
    Ok(ApiResponse::created("Registration successful", output))
}

pub async fn user_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginOutput<User>>> {
    let output = state.accounts.login(&req.email, &req.password).await?;
    Ok(ApiResponse::ok("Login successful", output))
}

pub async fn user_me(
    State(state): State<AppState>,
    UserIdentity(identity): UserIdentity,
) -> ApiResult<ApiResponse<User>> {
    let user = state.accounts.get(identity.id).await?;
    Ok(ApiResponse::ok("Profile retrieved", user))
}
