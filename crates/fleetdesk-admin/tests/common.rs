//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use fleetdesk_admin::{CompanyService, CreateTenant, TenantCreated};
use fleetdesk_auth::password::PasswordHasher;
use fleetdesk_core::models::company::CreateCompany;
use fleetdesk_db::repository::{SurrealAdminRepository, SurrealCompanyRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

pub type Companies = CompanyService<SurrealCompanyRepository<Db>, SurrealAdminRepository<Db>>;

pub async fn database() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fleetdesk_db::run_migrations(&db).await.unwrap();
    db
}

pub fn companies(db: &Surreal<Db>) -> Companies {
    CompanyService::new(
        SurrealCompanyRepository::new(db.clone()),
        SurrealAdminRepository::new(db.clone()),
        PasswordHasher::default(),
        8,
    )
}

pub fn tenant(name: &str, owner_email: &str) -> CreateTenant {
    CreateTenant {
        company: CreateCompany {
            name: name.into(),
            legal_name: None,
            email: format!("contact@{}.test", name.to_lowercase()),
            phone: None,
            address: None,
            country: None,
            timezone: None,
            locale: None,
            currency: None,
            plan: None,
            max_allowed_drivers: None,
            settings: None,
        },
        owner_full_name: format!("{name} Owner"),
        owner_email: owner_email.into(),
        owner_phone: None,
        owner_password: "owner-password-1".into(),
    }
}

pub async fn create_tenant(service: &Companies, name: &str) -> TenantCreated {
    let email = format!("owner@{}.test", name.to_lowercase());
    service.create_tenant(tenant(name, &email)).await.unwrap()
}
