//! Tenant endpoints: bootstrap creation, listing, profile, branding,
//! status and admins.

use axum::extract::State;
use fleetdesk_admin::{CreateTenant, NewManager, TenantCreated};
use fleetdesk_core::models::admin::CompanyAdmin;
use fleetdesk_core::error::FleetError;
use fleetdesk_core::models::company::{
    ColorPalette, Company, CompanyFilter, CompanyStatus, CreateCompany, Plan, Theme,
    UpdateBranding, UpdateCompany,
};
use fleetdesk_core::repository::Pagination;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::ApiResult;
use crate::extract::{AdminIdentity, Path, Query, ValidatedJson};
use crate::response::{ApiResponse, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 2, max = 255, message = "name must be 2 to 255 characters"))]
    pub name: String,
    pub legal_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(equal = 2, message = "country must be a 2-letter code"))]
    pub country: Option<String>,
    pub timezone: Option<String>,
    #[validate(length(min = 2, max = 10))]
    pub locale: Option<String>,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub plan: Option<Plan>,
    #[validate(range(min = 1, max = 100000))]
    pub max_allowed_drivers: Option<u32>,
    pub settings: Option<Value>,

    #[validate(length(min = 2, max = 255, message = "owner name must be 2 to 255 characters"))]
    pub owner_full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub owner_email: String,
    #[validate(length(max = 50))]
    pub owner_phone: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub owner_password: String,
}

impl From<CreateCompanyRequest> for CreateTenant {
    fn from(req: CreateCompanyRequest) -> Self {
        CreateTenant {
            company: CreateCompany {
                name: req.name,
                legal_name: req.legal_name,
                email: req.email,
                phone: req.phone,
                address: req.address,
                country: req.country,
                timezone: req.timezone,
                locale: req.locale,
                currency: req.currency,
                plan: req.plan,
                max_allowed_drivers: req.max_allowed_drivers,
                settings: req.settings,
            },
            owner_full_name: req.owner_full_name,
            owner_email: req.owner_email,
            owner_phone: req.owner_phone,
            owner_password: req.owner_password,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: Option<String>,
    pub legal_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(equal = 2, message = "country must be a 2-letter code"))]
    pub country: Option<String>,
    pub timezone: Option<String>,
    #[validate(length(min = 2, max = 10))]
    pub locale: Option<String>,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub plan: Option<Plan>,
    #[validate(range(min = 1, max = 100000))]
    pub max_allowed_drivers: Option<u32>,
    pub settings: Option<Value>,
}

impl From<UpdateCompanyRequest> for UpdateCompany {
    fn from(req: UpdateCompanyRequest) -> Self {
        UpdateCompany {
            name: req.name,
            legal_name: req.legal_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            country: req.country,
            timezone: req.timezone,
            locale: req.locale,
            currency: req.currency,
            plan: req.plan,
            max_allowed_drivers: req.max_allowed_drivers,
            settings: req.settings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    pub status: Option<CompanyStatus>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ColorPaletteRequest {
    #[validate(length(min = 1, max = 32, message = "primary must be 1 to 32 characters"))]
    pub primary: String,
    #[validate(length(min = 1, max = 32, message = "secondary must be 1 to 32 characters"))]
    pub secondary: String,
    #[validate(length(min = 1, max = 32, message = "accent must be 1 to 32 characters"))]
    pub accent: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrandingRequest {
    #[validate(length(max = 2048))]
    pub logo_url: Option<String>,
    #[validate(nested)]
    pub color_palette: Option<ColorPaletteRequest>,
    #[validate(length(max = 100, message = "font_family must be at most 100 characters"))]
    pub font_family: Option<String>,
    pub theme: Option<Theme>,
    pub custom_css: Option<String>,
}

impl From<UpdateBrandingRequest> for UpdateBranding {
    fn from(req: UpdateBrandingRequest) -> Self {
        UpdateBranding {
            logo_url: req.logo_url,
            color_palette: req.color_palette.map(|p| ColorPalette {
                primary: p.primary,
                secondary: p.secondary,
                accent: p.accent,
            }),
            font_family: req.font_family,
            theme: req.theme,
            custom_css: req.custom_css,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddManagerRequest {
    #[validate(length(min = 2, max = 255))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCompanyRequest>,
) -> ApiResult<ApiResponse<TenantCreated>> {
    let created = state.companies.create_tenant(req.into()).await?;
    Ok(ApiResponse::created("Company created", created))
}

/// Admin tokens are tenant-scoped, so the listing only ever contains
/// the caller's own company, narrowed by the query filters.
pub async fn list(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<ApiResponse<Page<Company>>> {
    let own = identity
        .company_id
        .ok_or_else(|| FleetError::denied("token carries no company"))?;
    let filter = CompanyFilter {
        id: Some(own),
        status: query.status,
        search: query.search,
    };
    let companies = state
        .companies
        .list(filter, Pagination::from_page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok("Companies retrieved", companies.into()))
}

pub async fn get(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<Company>> {
    identity.require_company(id)?;
    let company = state.companies.get(id).await?;
    Ok(ApiResponse::ok("Company retrieved", company))
}

pub async fn update(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
    ValidatedJson(req): ValidatedJson<UpdateCompanyRequest>,
) -> ApiResult<ApiResponse<Company>> {
    identity.require_company(id)?;
    let company = state.companies.update(id, req.into()).await?;
    Ok(ApiResponse::ok("Company updated", company))
}

pub async fn update_branding(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
    ValidatedJson(req): ValidatedJson<UpdateBrandingRequest>,
) -> ApiResult<ApiResponse<Company>> {
    identity.require_company(id)?;
    let company = state.companies.update_branding(id, req.into()).await?;
    Ok(ApiResponse::ok("Branding updated", company))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<()>> {
    identity.require_owner(id)?;
    state.companies.delete(id).await?;
    Ok(ApiResponse::done("Company deleted"))
}

pub async fn suspend(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<Company>> {
    identity.require_owner(id)?;
    let company = state.companies.suspend(id).await?;
    Ok(ApiResponse::ok("Company suspended", company))
}

pub async fn activate(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<Company>> {
    identity.require_owner(id)?;
    let company = state.companies.activate(id).await?;
    Ok(ApiResponse::ok("Company activated", company))
}

pub async fn list_admins(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse<Vec<CompanyAdmin>>> {
    identity.require_company(id)?;
    let admins = state.companies.list_admins(id).await?;
    Ok(ApiResponse::ok("Admins retrieved", admins))
}

pub async fn add_manager(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
    ValidatedJson(req): ValidatedJson<AddManagerRequest>,
) -> ApiResult<ApiResponse<CompanyAdmin>> {
    identity.require_owner(id)?;
    let admin = state
        .companies
        .add_manager(
            id,
            NewManager {
                full_name: req.full_name,
                email: req.email,
                phone: req.phone,
                password: req.password,
            },
        )
        .await?;
    Ok(ApiResponse::created("Manager added", admin))
}

pub async fn activate_admin(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, admin_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<CompanyAdmin>> {
    identity.require_owner(id)?;
    let admin = state.companies.set_admin_active(id, admin_id, true).await?;
    Ok(ApiResponse::ok("Admin activated", admin))
}

pub async fn deactivate_admin(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, admin_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<CompanyAdmin>> {
    identity.require_owner(id)?;
    let admin = state.companies.set_admin_active(id, admin_id, false).await?;
    Ok(ApiResponse::ok("Admin deactivated", admin))
}
