//! Shared application state handed to every handler.

use std::sync::Arc;

use fleetdesk_admin::{CompanyService, DriverService, ModuleService};
use fleetdesk_auth::config::AuthConfig;
use fleetdesk_auth::gate::AuthGate;
use fleetdesk_auth::password::PasswordHasher;
use fleetdesk_auth::service::AdminAuthService;
use fleetdesk_auth::token::TokenIssuer;
use fleetdesk_auth::user::UserAccountService;
use fleetdesk_core::error::FleetResult;
use fleetdesk_db::repository::{
    SurrealAdminRepository, SurrealCompanyRepository, SurrealDriverRepository,
    SurrealModuleRepository, SurrealShiftRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

pub type AdminAuth = AdminAuthService<SurrealAdminRepository<Any>>;
pub type Accounts = UserAccountService<SurrealUserRepository<Any>>;
pub type Companies = CompanyService<SurrealCompanyRepository<Any>, SurrealAdminRepository<Any>>;
pub type Modules = ModuleService<SurrealModuleRepository<Any>, SurrealCompanyRepository<Any>>;
pub type Drivers = DriverService<
    SurrealDriverRepository<Any>,
    SurrealShiftRepository<Any>,
    SurrealCompanyRepository<Any>,
>;

#[derive(Clone)]
pub struct AppState {
    pub admin_auth: Arc<AdminAuth>,
    pub accounts: Arc<Accounts>,
    pub companies: Arc<Companies>,
    pub modules: Arc<Modules>,
    pub drivers: Arc<Drivers>,
    pub admin_gate: Arc<AuthGate>,
    pub user_gate: Arc<AuthGate>,
}

impl AppState {
    /// Wire every service over one datastore handle.
    pub fn new(db: Surreal<Any>, config: &AuthConfig) -> FleetResult<Self> {
        let hasher = PasswordHasher::new(config.pepper.clone());
        let admin_tokens = TokenIssuer::new(&config.admin_tokens)?;
        let user_tokens = TokenIssuer::new(&config.user_tokens)?;

        let companies = SurrealCompanyRepository::new(db.clone());
        let admins = SurrealAdminRepository::new(db.clone());

        Ok(Self {
            admin_auth: Arc::new(AdminAuthService::new(
                admins.clone(),
                hasher.clone(),
                admin_tokens.clone(),
            )),
            accounts: Arc::new(UserAccountService::new(
                SurrealUserRepository::new(db.clone()),
                hasher.clone(),
                user_tokens.clone(),
                config.min_password_length,
            )),
            companies: Arc::new(CompanyService::new(
                companies.clone(),
                admins,
                hasher.clone(),
                config.min_password_length,
            )),
            modules: Arc::new(ModuleService::new(
                SurrealModuleRepository::new(db.clone()),
                companies.clone(),
            )),
            drivers: Arc::new(DriverService::new(
                SurrealDriverRepository::new(db.clone()),
                SurrealShiftRepository::new(db),
                companies,
                hasher,
            )),
            admin_gate: Arc::new(AuthGate::new(admin_tokens)),
            user_gate: Arc::new(AuthGate::new(user_tokens)),
        })
    }
}
