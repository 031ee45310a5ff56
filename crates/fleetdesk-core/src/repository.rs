//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Company-scoped repositories take
//! the `company_id` explicitly so one tenant can never address another
//! tenant's rows by id alone.

use chrono::NaiveDate;

use crate::error::FleetResult;
use crate::models::{
    admin::{CompanyAdmin, NewAdmin},
    company::{Company, CompanyFilter, CompanyStatus, CreateCompany, UpdateBranding, UpdateCompany},
    driver::{Driver, DriverFilter, DriverStatus, NewDriver, UpdateDriver},
    module::{AssignedModule, CreateAssignment, Module, ModuleAssignment, UpdateAssignment},
    shift::{NewShift, Shift, ShiftStatus},
    user::{NewUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Largest page a caller may request.
    pub const MAX_LIMIT: u64 = 200;

    /// Largest offset; the store counts in signed 64-bit integers.
    pub const MAX_OFFSET: u64 = i64::MAX as u64;

    /// Build from 1-based page numbers as used by HTTP query strings.
    pub fn from_page(page: Option<u64>, per_page: Option<u64>) -> Self {
        let limit = per_page.unwrap_or(50).clamp(1, Self::MAX_LIMIT);
        let page = page.unwrap_or(1).max(1);
        Self {
            offset: (page - 1).saturating_mul(limit).min(Self::MAX_OFFSET),
            limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Companies & admins
// ---------------------------------------------------------------------------

pub trait CompanyRepository: Send + Sync {
    /// Create the company and its owner admin atomically. Either both
    /// rows exist afterwards or neither does.
    fn create_with_owner(
        &self,
        company: CreateCompany,
        owner: NewAdmin,
    ) -> impl Future<Output = FleetResult<(Company, CompanyAdmin)>> + Send;

    fn get_by_id(&self, id: u64) -> impl Future<Output = FleetResult<Company>> + Send;

    fn update(
        &self,
        id: u64,
        input: UpdateCompany,
    ) -> impl Future<Output = FleetResult<Company>> + Send;

    fn set_status(
        &self,
        id: u64,
        status: CompanyStatus,
    ) -> impl Future<Output = FleetResult<Company>> + Send;

    /// Remove the company together with everything it owns.
    fn delete(&self, id: u64) -> impl Future<Output = FleetResult<()>> + Send;

    fn count(&self) -> impl Future<Output = FleetResult<u64>> + Send;

    fn list(
        &self,
        filter: CompanyFilter,
        pagination: Pagination,
    ) -> impl Future<Output = FleetResult<PaginatedResult<Company>>> + Send;

    fn update_branding(
        &self,
        id: u64,
        input: UpdateBranding,
    ) -> impl Future<Output = FleetResult<Company>> + Send;
}

pub trait AdminRepository: Send + Sync {
    fn create(&self, input: NewAdmin) -> impl Future<Output = FleetResult<CompanyAdmin>> + Send;

    fn get_by_id(&self, id: u64) -> impl Future<Output = FleetResult<CompanyAdmin>> + Send;

    fn get_by_email(&self, email: &str)
    -> impl Future<Output = FleetResult<CompanyAdmin>> + Send;

    fn list_by_company(
        &self,
        company_id: u64,
    ) -> impl Future<Output = FleetResult<Vec<CompanyAdmin>>> + Send;

    fn set_active(
        &self,
        id: u64,
        is_active: bool,
    ) -> impl Future<Output = FleetResult<CompanyAdmin>> + Send;
}

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

pub trait ModuleRepository: Send + Sync {
    fn list_catalog(&self) -> impl Future<Output = FleetResult<Vec<Module>>> + Send;

    fn get_module(&self, id: u64) -> impl Future<Output = FleetResult<Module>> + Send;

    /// Insert an assignment. A duplicate (company, module) pair fails
    /// with `AlreadyExists` from the unique index.
    fn assign(
        &self,
        input: CreateAssignment,
    ) -> impl Future<Output = FleetResult<ModuleAssignment>> + Send;

    fn get_assignment(
        &self,
        company_id: u64,
        module_id: u64,
    ) -> impl Future<Output = FleetResult<ModuleAssignment>> + Send;

    /// Assignments joined with the catalog, ordered by assignment id.
    fn list_for_company(
        &self,
        company_id: u64,
    ) -> impl Future<Output = FleetResult<Vec<AssignedModule>>> + Send;

    fn update_assignment(
        &self,
        company_id: u64,
        module_id: u64,
        input: UpdateAssignment,
    ) -> impl Future<Output = FleetResult<ModuleAssignment>> + Send;

    fn remove(
        &self,
        company_id: u64,
        module_id: u64,
    ) -> impl Future<Output = FleetResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Drivers & shifts (company scope)
// ---------------------------------------------------------------------------

pub trait DriverRepository: Send + Sync {
    fn create(&self, input: NewDriver) -> impl Future<Output = FleetResult<Driver>> + Send;

    fn get_by_id(
        &self,
        company_id: u64,
        id: u64,
    ) -> impl Future<Output = FleetResult<Driver>> + Send;

    fn update(
        &self,
        company_id: u64,
        id: u64,
        input: UpdateDriver,
    ) -> impl Future<Output = FleetResult<Driver>> + Send;

    fn set_status(
        &self,
        company_id: u64,
        id: u64,
        status: DriverStatus,
    ) -> impl Future<Output = FleetResult<Driver>> + Send;

    fn delete(&self, company_id: u64, id: u64) -> impl Future<Output = FleetResult<()>> + Send;

    fn list(
        &self,
        company_id: u64,
        filter: DriverFilter,
        pagination: Pagination,
    ) -> impl Future<Output = FleetResult<PaginatedResult<Driver>>> + Send;

    fn count_by_company(&self, company_id: u64) -> impl Future<Output = FleetResult<u64>> + Send;
}

pub trait ShiftRepository: Send + Sync {
    fn create(&self, input: NewShift) -> impl Future<Output = FleetResult<Shift>> + Send;

    /// Newest shift date first.
    fn list_by_driver(
        &self,
        company_id: u64,
        driver_id: u64,
        status: Option<ShiftStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = FleetResult<PaginatedResult<Shift>>> + Send;

    /// All shifts of a driver dated on or after `since`.
    fn list_since(
        &self,
        company_id: u64,
        driver_id: u64,
        since: NaiveDate,
    ) -> impl Future<Output = FleetResult<Vec<Shift>>> + Send;
}

// ---------------------------------------------------------------------------
// End users (global scope)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: NewUser) -> impl Future<Output = FleetResult<User>> + Send;

    fn get_by_id(&self, id: u64) -> impl Future<Output = FleetResult<User>> + Send;

    fn get_by_email(&self, email: &str) -> impl Future<Output = FleetResult<User>> + Send;

    fn update(&self, id: u64, input: UpdateUser) -> impl Future<Output = FleetResult<User>> + Send;

    fn delete(&self, id: u64) -> impl Future<Output = FleetResult<()>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = FleetResult<PaginatedResult<User>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_map_to_offsets() {
        let p = Pagination::from_page(Some(3), Some(20));
        assert_eq!(p.offset, 40);
        assert_eq!(p.limit, 20);
    }

    #[test]
    fn page_size_is_clamped() {
        let p = Pagination::from_page(Some(0), Some(10_000));
        assert_eq!(p.offset, 0);
        assert_eq!(p.limit, Pagination::MAX_LIMIT);
    }

    #[test]
    fn huge_page_number_saturates_offset() {
        let p = Pagination::from_page(Some(u64::MAX), Some(Pagination::MAX_LIMIT));
        assert_eq!(p.offset, Pagination::MAX_OFFSET);
        assert_eq!(p.limit, Pagination::MAX_LIMIT);
    }
}
