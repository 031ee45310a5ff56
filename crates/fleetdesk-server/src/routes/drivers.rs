//! Driver, shift and performance endpoints. All are scoped to the
//! caller's company.

use axum::extract::State;
use chrono::{DateTime, NaiveDate, Utc};
use fleetdesk_admin::{CreateDriver, DriverChanges, ScheduleShift};
use fleetdesk_core::models::driver::{Driver, DriverFilter, DriverStatus};
use fleetdesk_core::models::shift::{DriverPerformance, Shift, ShiftStatus};
use fleetdesk_core::repository::Pagination;
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiResult;
use crate::extract::{AdminIdentity, Path, Query, ValidatedJson};
use crate::response::{ApiResponse, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DriverQuery {
    pub status: Option<DriverStatus>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    pub store_id: Option<u64>,
    #[validate(length(min = 2, max = 255, message = "full_name must be 2 to 255 characters"))]
    pub full_name: String,
    #[validate(length(min = 3, max = 50, message = "phone must be 3 to 50 characters"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    pub status: Option<DriverStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    pub store_id: Option<u64>,
    #[validate(length(min = 2, max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 3, max = 50))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    pub status: Option<DriverStatus>,
    pub is_online: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ShiftQuery {
    pub status: Option<ShiftStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleShiftRequest {
    pub shift_date: Option<NaiveDate>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<ShiftStatus>,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub completed_orders: u32,
    #[serde(default)]
    pub cancelled_orders: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_distance_km: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_earnings: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    pub rating: f64,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub since: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
    Query(query): Query<DriverQuery>,
) -> ApiResult<ApiResponse<Page<Driver>>> {
    identity.require_company(id)?;
    let filter = DriverFilter {
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let drivers = state
        .drivers
        .list(id, filter, Pagination::from_page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok("Drivers retrieved", drivers.into()))
}

pub async fn create(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<u64>,
    ValidatedJson(req): ValidatedJson<CreateDriverRequest>,
) -> ApiResult<ApiResponse<Driver>> {
    identity.require_company(id)?;
    let driver = state
        .drivers
        .create(
            id,
            CreateDriver {
                store_id: req.store_id,
                full_name: req.full_name,
                phone: req.phone,
                email: req.email,
                password: req.password,
                status: req.status,
            },
        )
        .await?;
    Ok(ApiResponse::created("Driver created", driver))
}

pub async fn get(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<Driver>> {
    identity.require_company(id)?;
    let driver = state.drivers.get(id, driver_id).await?;
    Ok(ApiResponse::ok("Driver retrieved", driver))
}

pub async fn update(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
    ValidatedJson(req): ValidatedJson<UpdateDriverRequest>,
) -> ApiResult<ApiResponse<Driver>> {
    identity.require_company(id)?;
    let changes = DriverChanges {
        store_id: req.store_id,
        full_name: req.full_name,
        phone: req.phone,
        email: req.email,
        password: req.password,
        status: req.status,
        is_online: req.is_online,
    };
    let driver = state.drivers.update(id, driver_id, changes).await?;
    Ok(ApiResponse::ok("Driver updated", driver))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<()>> {
    identity.require_company(id)?;
    state.drivers.delete(id, driver_id).await?;
    Ok(ApiResponse::done("Driver deleted"))
}

pub async fn block(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<Driver>> {
    identity.require_company(id)?;
    let driver = state.drivers.block(id, driver_id).await?;
    Ok(ApiResponse::ok("Driver blocked", driver))
}

pub async fn unblock(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
) -> ApiResult<ApiResponse<Driver>> {
    identity.require_company(id)?;
    let driver = state.drivers.unblock(id, driver_id).await?;
    Ok(ApiResponse::ok("Driver unblocked", driver))
}

pub async fn list_shifts(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
    Query(query): Query<ShiftQuery>,
) -> ApiResult<ApiResponse<Page<Shift>>> {
    identity.require_company(id)?;
    let shifts = state
        .drivers
        .list_shifts(
            id,
            driver_id,
            query.status,
            Pagination::from_page(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::ok("Shifts retrieved", shifts.into()))
}

pub async fn schedule_shift(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
    ValidatedJson(req): ValidatedJson<ScheduleShiftRequest>,
) -> ApiResult<ApiResponse<Shift>> {
    identity.require_company(id)?;
    let input = ScheduleShift {
        shift_date: req.shift_date,
        start_time: req.start_time,
        end_time: req.end_time,
        status: req.status,
        total_orders: req.total_orders,
        completed_orders: req.completed_orders,
        cancelled_orders: req.cancelled_orders,
        total_distance_km: req.total_distance_km,
        total_earnings: req.total_earnings,
        rating: req.rating,
        notes: req.notes,
    };
    let shift = state.drivers.schedule_shift(id, driver_id, input).await?;
    Ok(ApiResponse::created("Shift scheduled", shift))
}

pub async fn performance(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path((id, driver_id)): Path<(u64, u64)>,
    Query(query): Query<PerformanceQuery>,
) -> ApiResult<ApiResponse<DriverPerformance>> {
    identity.require_company(id)?;
    let perf = state.drivers.performance(id, driver_id, query.since).await?;
    Ok(ApiResponse::ok("Driver performance retrieved", perf))
}
