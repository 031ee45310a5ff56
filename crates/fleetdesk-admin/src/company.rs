//! Tenant lifecycle: creation with an owner, profile updates,
//! suspension and admin management.

use fleetdesk_auth::password::{PasswordHasher, check_strength};
use fleetdesk_auth::service::normalize_email;
use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::admin::{AdminRole, CompanyAdmin, NewAdmin};
use fleetdesk_core::models::company::{
    Company, CompanyFilter, CompanyStatus, CreateCompany, UpdateBranding, UpdateCompany,
};
use fleetdesk_core::repository::{AdminRepository, CompanyRepository, PaginatedResult, Pagination};
use serde::Serialize;
use tracing::info;

use crate::ensure_active;

/// Longest accepted font family name.
const MAX_FONT_FAMILY_LEN: usize = 100;

/// Input for creating a tenant together with its owner.
#[derive(Debug, Clone)]
pub struct CreateTenant {
    pub company: CreateCompany,
    pub owner_full_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
    pub owner_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenantCreated {
    pub company: Company,
    pub owner: CompanyAdmin,
}

#[derive(Debug, Clone)]
pub struct NewManager {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

pub struct CompanyService<C: CompanyRepository, A: AdminRepository> {
    companies: C,
    admins: A,
    hasher: PasswordHasher,
    min_password_length: usize,
}

impl<C: CompanyRepository, A: AdminRepository> CompanyService<C, A> {
    pub fn new(companies: C, admins: A, hasher: PasswordHasher, min_password_length: usize) -> Self {
        Self {
            companies,
            admins,
            hasher,
            min_password_length,
        }
    }

    async fn ensure_email_free(&self, email: &str) -> FleetResult<()> {
        match self.admins.get_by_email(email).await {
            Ok(_) => Err(FleetError::DuplicateOwnerEmail),
            Err(FleetError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Create a company and its owner admin as one atomic unit.
    ///
    /// The email pre-check gives the friendly error; the unique index
    /// on admin email closes the race and maps to the same error.
    pub async fn create_tenant(&self, input: CreateTenant) -> FleetResult<TenantCreated> {
        check_strength(&input.owner_password, self.min_password_length)?;
        let owner_email = normalize_email(&input.owner_email);
        self.ensure_email_free(&owner_email).await?;

        let password_hash = self.hasher.hash_blocking(input.owner_password).await?;

        let mut company = input.company;
        company.email = normalize_email(&company.email);

        let (company, owner) = self
            .companies
            .create_with_owner(
                company,
                NewAdmin {
                    company_id: 0,
                    full_name: input.owner_full_name,
                    email: owner_email,
                    phone: input.owner_phone.unwrap_or_default(),
                    password_hash,
                    role: AdminRole::Owner,
                },
            )
            .await
            .map_err(|e| match e {
                FleetError::AlreadyExists { .. } => FleetError::DuplicateOwnerEmail,
                other => other,
            })?;

        info!(company_id = company.id, owner_id = owner.id, "tenant created");
        Ok(TenantCreated { company, owner })
    }

    pub async fn get(&self, company_id: u64) -> FleetResult<Company> {
        self.companies.get_by_id(company_id).await
    }

    pub async fn update(&self, company_id: u64, mut input: UpdateCompany) -> FleetResult<Company> {
        if input.is_empty() {
            return Err(FleetError::validation("no fields to update"));
        }
        if let Some(email) = input.email.as_deref() {
            input.email = Some(normalize_email(email));
        }
        self.companies.update(company_id, input).await
    }

    pub async fn list(
        &self,
        filter: CompanyFilter,
        pagination: Pagination,
    ) -> FleetResult<PaginatedResult<Company>> {
        let filter = CompanyFilter {
            search: filter
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            ..filter
        };
        self.companies.list(filter, pagination).await
    }

    /// Apply a partial branding change. An empty logo URL clears the logo.
    pub async fn update_branding(
        &self,
        company_id: u64,
        input: UpdateBranding,
    ) -> FleetResult<Company> {
        if input.is_empty() {
            return Err(FleetError::validation("no branding fields to update"));
        }
        if let Some(url) = input.logo_url.as_deref() {
            if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(FleetError::validation("logo_url must be an http(s) URL"));
            }
        }
        if let Some(font) = input.font_family.as_deref() {
            if font.chars().count() > MAX_FONT_FAMILY_LEN {
                return Err(FleetError::validation(format!(
                    "font_family must be at most {MAX_FONT_FAMILY_LEN} characters"
                )));
            }
        }
        if let Some(palette) = &input.color_palette {
            if palette.primary.trim().is_empty() || palette.secondary.trim().is_empty() {
                return Err(FleetError::validation(
                    "color_palette needs primary and secondary colors",
                ));
            }
        }

        let company = self.companies.update_branding(company_id, input).await?;
        info!(company_id, theme = company.branding.theme.as_str(), "branding updated");
        Ok(company)
    }

    pub async fn delete(&self, company_id: u64) -> FleetResult<()> {
        self.companies.delete(company_id).await?;
        info!(company_id, "tenant deleted");
        Ok(())
    }

    /// Idempotent: suspending a suspended company returns it unchanged.
    pub async fn suspend(&self, company_id: u64) -> FleetResult<Company> {
        self.transition(company_id, CompanyStatus::Suspended).await
    }

    /// Idempotent: activating an active company returns it unchanged.
    pub async fn activate(&self, company_id: u64) -> FleetResult<Company> {
        self.transition(company_id, CompanyStatus::Active).await
    }

    async fn transition(&self, company_id: u64, target: CompanyStatus) -> FleetResult<Company> {
        let company = self.companies.get_by_id(company_id).await?;
        if company.status == target {
            return Ok(company);
        }
        let company = self.companies.set_status(company_id, target).await?;
        info!(company_id, status = %target, "tenant status changed");
        Ok(company)
    }

    pub async fn list_admins(&self, company_id: u64) -> FleetResult<Vec<CompanyAdmin>> {
        self.companies.get_by_id(company_id).await?;
        self.admins.list_by_company(company_id).await
    }

    /// Add a `manager` admin. Owners are only ever created with the
    /// company.
    pub async fn add_manager(&self, company_id: u64, input: NewManager) -> FleetResult<CompanyAdmin> {
        ensure_active(&self.companies, company_id).await?;
        check_strength(&input.password, self.min_password_length)?;

        let email = normalize_email(&input.email);
        if self.admins.get_by_email(&email).await.is_ok() {
            return Err(FleetError::AlreadyExists {
                entity: "company_admin".into(),
            });
        }

        let password_hash = self.hasher.hash_blocking(input.password).await?;
        let admin = self
            .admins
            .create(NewAdmin {
                company_id,
                full_name: input.full_name,
                email,
                phone: input.phone.unwrap_or_default(),
                password_hash,
                role: AdminRole::Manager,
            })
            .await?;

        info!(company_id, admin_id = admin.id, "manager added");
        Ok(admin)
    }

    /// Activate or deactivate one of the company's admins. The owner
    /// cannot be deactivated.
    pub async fn set_admin_active(
        &self,
        company_id: u64,
        admin_id: u64,
        is_active: bool,
    ) -> FleetResult<CompanyAdmin> {
        let admin = self.admins.get_by_id(admin_id).await?;
        if admin.company_id != company_id {
            return Err(FleetError::not_found("company_admin", admin_id));
        }
        if !is_active && admin.role == AdminRole::Owner {
            return Err(FleetError::validation("the company owner cannot be deactivated"));
        }
        if admin.is_active == is_active {
            return Ok(admin);
        }

        let admin = self.admins.set_active(admin_id, is_active).await?;
        info!(company_id, admin_id, is_active, "admin activation changed");
        Ok(admin)
    }
}
