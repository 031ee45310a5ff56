//! FleetDesk Admin: tenant, module assignment and driver services.
//!
//! Services take plain ids. Callers resolve *who* may act on a company
//! (see `fleetdesk_auth::Identity`) before calling in; the services
//! enforce *what* may happen to it, such as the suspension gate.

pub mod company;
pub mod driver;
pub mod module;

pub use company::{CompanyService, CreateTenant, NewManager, TenantCreated};
pub use driver::{CreateDriver, DriverChanges, DriverService, ScheduleShift};
pub use module::{AssignModule, ModuleService};

use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::company::Company;
use fleetdesk_core::repository::CompanyRepository;

/// Load a company and fail with `TenantSuspended` if it is suspended.
pub(crate) async fn ensure_active<C: CompanyRepository>(
    companies: &C,
    company_id: u64,
) -> FleetResult<Company> {
    let company = companies.get_by_id(company_id).await?;
    if company.is_suspended() {
        return Err(FleetError::TenantSuspended { company_id });
    }
    Ok(company)
}
