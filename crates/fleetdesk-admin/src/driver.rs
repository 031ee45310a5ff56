//! Company-scoped driver management, shift scheduling and the
//! performance window.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use fleetdesk_auth::password::PasswordHasher;
use fleetdesk_auth::service::normalize_email;
use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::driver::{Driver, DriverFilter, DriverStatus, NewDriver, UpdateDriver};
use fleetdesk_core::models::shift::{DriverPerformance, NewShift, Shift, ShiftStatus};
use fleetdesk_core::repository::{
    CompanyRepository, DriverRepository, PaginatedResult, Pagination, ShiftRepository,
};
use tracing::info;

use crate::ensure_active;

/// Days covered by the performance window when no start date is given.
pub const DEFAULT_PERFORMANCE_DAYS: i64 = 30;
/// Widest performance window accepted.
pub const MAX_PERFORMANCE_DAYS: i64 = 366;

#[derive(Debug, Clone, Default)]
pub struct CreateDriver {
    pub store_id: Option<u64>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<DriverStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct DriverChanges {
    pub store_id: Option<u64>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<DriverStatus>,
    pub is_online: Option<bool>,
}

impl DriverChanges {
    fn is_empty(&self) -> bool {
        self.store_id.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.status.is_none()
            && self.is_online.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleShift {
    pub shift_date: Option<NaiveDate>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<ShiftStatus>,
    pub total_orders: u32,
    pub completed_orders: u32,
    pub cancelled_orders: u32,
    pub total_distance_km: f64,
    pub total_earnings: f64,
    pub rating: f64,
    pub notes: Option<String>,
}

impl ScheduleShift {
    fn check(&self) -> FleetResult<()> {
        let settled = self.completed_orders.saturating_add(self.cancelled_orders);
        if settled > self.total_orders {
            return Err(FleetError::validation(
                "completed and cancelled orders exceed total orders",
            ));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(FleetError::validation("shift ends before it starts"));
            }
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(FleetError::validation("rating must be between 0 and 5"));
        }
        if self.total_distance_km < 0.0 || self.total_earnings < 0.0 {
            return Err(FleetError::validation("distance and earnings cannot be negative"));
        }
        Ok(())
    }
}

pub struct DriverService<D, S, C>
where
    D: DriverRepository,
    S: ShiftRepository,
    C: CompanyRepository,
{
    drivers: D,
    shifts: S,
    companies: C,
    hasher: PasswordHasher,
}

impl<D, S, C> DriverService<D, S, C>
where
    D: DriverRepository,
    S: ShiftRepository,
    C: CompanyRepository,
{
    pub fn new(drivers: D, shifts: S, companies: C, hasher: PasswordHasher) -> Self {
        Self {
            drivers,
            shifts,
            companies,
            hasher,
        }
    }

    pub async fn list(
        &self,
        company_id: u64,
        filter: DriverFilter,
        pagination: Pagination,
    ) -> FleetResult<PaginatedResult<Driver>> {
        self.companies.get_by_id(company_id).await?;
        self.drivers.list(company_id, filter, pagination).await
    }

    pub async fn get(&self, company_id: u64, driver_id: u64) -> FleetResult<Driver> {
        self.drivers.get_by_id(company_id, driver_id).await
    }

    /// Register a driver, enforcing the company's driver allowance.
    pub async fn create(&self, company_id: u64, input: CreateDriver) -> FleetResult<Driver> {
        let company = ensure_active(&self.companies, company_id).await?;
        if input.full_name.trim().is_empty() || input.phone.trim().is_empty() {
            return Err(FleetError::validation("driver name and phone are required"));
        }

        let current = self.drivers.count_by_company(company_id).await?;
        if current >= u64::from(company.max_allowed_drivers) {
            return Err(FleetError::LimitExceeded {
                resource: "drivers".into(),
                limit: company.max_allowed_drivers,
            });
        }

        let password_hash = match input.password {
            Some(password) => self.hasher.hash_blocking(password).await?,
            None => String::new(),
        };

        let driver = self
            .drivers
            .create(NewDriver {
                company_id,
                store_id: input.store_id,
                full_name: input.full_name.trim().to_string(),
                phone: input.phone.trim().to_string(),
                email: input.email.as_deref().map(normalize_email).unwrap_or_default(),
                password_hash,
                status: input.status.unwrap_or_default(),
            })
            .await?;

        info!(company_id, driver_id = driver.id, "driver created");
        Ok(driver)
    }

    pub async fn update(
        &self,
        company_id: u64,
        driver_id: u64,
        input: DriverChanges,
    ) -> FleetResult<Driver> {
        if input.is_empty() {
            return Err(FleetError::validation("no fields to update"));
        }
        ensure_active(&self.companies, company_id).await?;

        let password_hash = match input.password {
            Some(password) => Some(self.hasher.hash_blocking(password).await?),
            None => None,
        };
        let changes = UpdateDriver {
            store_id: input.store_id,
            full_name: input.full_name,
            phone: input.phone,
            email: input.email.as_deref().map(normalize_email),
            password_hash,
            status: input.status,
            is_online: input.is_online,
        };
        self.drivers.update(company_id, driver_id, changes).await
    }

    pub async fn delete(&self, company_id: u64, driver_id: u64) -> FleetResult<()> {
        ensure_active(&self.companies, company_id).await?;
        self.drivers.delete(company_id, driver_id).await?;
        info!(company_id, driver_id, "driver deleted");
        Ok(())
    }

    /// Suspend a driver. Suspended drivers are also taken offline.
    pub async fn block(&self, company_id: u64, driver_id: u64) -> FleetResult<Driver> {
        ensure_active(&self.companies, company_id).await?;
        let driver = self
            .drivers
            .set_status(company_id, driver_id, DriverStatus::Suspended)
            .await?;
        info!(company_id, driver_id, "driver blocked");
        Ok(driver)
    }

    pub async fn unblock(&self, company_id: u64, driver_id: u64) -> FleetResult<Driver> {
        ensure_active(&self.companies, company_id).await?;
        let driver = self
            .drivers
            .set_status(company_id, driver_id, DriverStatus::Active)
            .await?;
        info!(company_id, driver_id, "driver unblocked");
        Ok(driver)
    }

    pub async fn schedule_shift(
        &self,
        company_id: u64,
        driver_id: u64,
        input: ScheduleShift,
    ) -> FleetResult<Shift> {
        ensure_active(&self.companies, company_id).await?;
        self.drivers.get_by_id(company_id, driver_id).await?;
        input.check()?;

        let shift_date = input
            .shift_date
            .or_else(|| input.start_time.map(|t| t.date_naive()))
            .unwrap_or_else(|| Utc::now().date_naive());

        let shift = self
            .shifts
            .create(NewShift {
                company_id,
                driver_id,
                shift_date,
                start_time: input.start_time,
                end_time: input.end_time,
                status: input.status.unwrap_or_default(),
                total_orders: input.total_orders,
                completed_orders: input.completed_orders,
                cancelled_orders: input.cancelled_orders,
                total_distance_km: input.total_distance_km,
                total_earnings: input.total_earnings,
                rating: input.rating,
                notes: input.notes.unwrap_or_default(),
            })
            .await?;

        info!(company_id, driver_id, shift_id = shift.id, "shift scheduled");
        Ok(shift)
    }

    pub async fn list_shifts(
        &self,
        company_id: u64,
        driver_id: u64,
        status: Option<ShiftStatus>,
        pagination: Pagination,
    ) -> FleetResult<PaginatedResult<Shift>> {
        self.drivers.get_by_id(company_id, driver_id).await?;
        self.shifts
            .list_by_driver(company_id, driver_id, status, pagination)
            .await
    }

    pub async fn performance(
        &self,
        company_id: u64,
        driver_id: u64,
        since: Option<NaiveDate>,
    ) -> FleetResult<DriverPerformance> {
        self.performance_at(company_id, driver_id, since, Utc::now().date_naive())
            .await
    }

    /// Aggregate the driver's shifts dated from `since` through `today`.
    pub async fn performance_at(
        &self,
        company_id: u64,
        driver_id: u64,
        since: Option<NaiveDate>,
        today: NaiveDate,
    ) -> FleetResult<DriverPerformance> {
        let since = performance_window(since, today)?;
        self.drivers.get_by_id(company_id, driver_id).await?;
        let shifts = self.shifts.list_since(company_id, driver_id, since).await?;
        Ok(DriverPerformance::from_shifts(driver_id, since, &shifts))
    }
}

fn performance_window(since: Option<NaiveDate>, today: NaiveDate) -> FleetResult<NaiveDate> {
    let Some(since) = since else {
        return Ok(today - Duration::days(DEFAULT_PERFORMANCE_DAYS));
    };
    if since > today {
        return Err(FleetError::validation("performance window starts in the future"));
    }
    if (today - since).num_days() > MAX_PERFORMANCE_DAYS {
        return Err(FleetError::validation(format!(
            "performance window is limited to {MAX_PERFORMANCE_DAYS} days"
        )));
    }
    Ok(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_defaults_to_thirty_days() {
        assert_eq!(performance_window(None, day(2026, 3, 31)).unwrap(), day(2026, 3, 1));
    }

    #[test]
    fn window_rejects_future_and_oversized_starts() {
        let today = day(2026, 3, 31);
        assert!(performance_window(Some(day(2026, 4, 1)), today).is_err());
        assert!(performance_window(Some(day(2025, 1, 1)), today).is_err());
        assert_eq!(performance_window(Some(today), today).unwrap(), today);
    }

    #[test]
    fn shift_counts_must_be_consistent() {
        let shift = ScheduleShift {
            total_orders: 5,
            completed_orders: 4,
            cancelled_orders: 2,
            ..Default::default()
        };
        assert!(matches!(shift.check(), Err(FleetError::Validation { .. })));
    }

    #[test]
    fn shift_cannot_end_before_it_starts() {
        let start = Utc::now();
        let shift = ScheduleShift {
            start_time: Some(start),
            end_time: Some(start - Duration::hours(1)),
            ..Default::default()
        };
        assert!(shift.check().is_err());
    }
}
