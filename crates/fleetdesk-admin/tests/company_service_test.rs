//! Tenant lifecycle against in-memory SurrealDB.

mod common;

use fleetdesk_admin::NewManager;
use fleetdesk_core::error::FleetError;
use fleetdesk_core::models::admin::AdminRole;
use fleetdesk_core::models::company::{
    ColorPalette, CompanyFilter, CompanyStatus, Theme, UpdateBranding, UpdateCompany,
};
use fleetdesk_core::repository::{CompanyRepository, Pagination};
use fleetdesk_db::repository::SurrealCompanyRepository;

use common::{companies, create_tenant, database, tenant};

#[tokio::test]
async fn tenant_is_created_with_an_active_owner() {
    let db = database().await;
    let service = companies(&db);

    let created = service
        .create_tenant(tenant("Acme", "  Boss@Acme.TEST "))
        .await
        .unwrap();

    assert_eq!(created.company.status, CompanyStatus::Active);
    assert_eq!(created.owner.company_id, created.company.id);
    assert_eq!(created.owner.role, AdminRole::Owner);
    assert_eq!(created.owner.email, "boss@acme.test");
    assert!(created.owner.is_active);
    assert!(created.owner.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn duplicate_owner_email_creates_no_second_company() {
    let db = database().await;
    let service = companies(&db);

    service
        .create_tenant(tenant("Acme", "owner@shared.test"))
        .await
        .unwrap();
    let err = service
        .create_tenant(tenant("Globex", "OWNER@shared.test"))
        .await
        .unwrap_err();

    assert!(matches!(err, FleetError::DuplicateOwnerEmail));
    let count = SurrealCompanyRepository::new(db.clone()).count().await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn weak_owner_password_is_rejected_before_any_write() {
    let db = database().await;
    let service = companies(&db);

    let mut input = tenant("Acme", "owner@acme.test");
    input.owner_password = "short".into();
    let err = service.create_tenant(input).await.unwrap_err();

    assert!(matches!(err, FleetError::Validation { .. }));
    let count = SurrealCompanyRepository::new(db.clone()).count().await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn suspend_and_activate_are_idempotent() {
    let db = database().await;
    let service = companies(&db);
    let created = create_tenant(&service, "Acme").await;
    let id = created.company.id;

    let first = service.suspend(id).await.unwrap();
    let second = service.suspend(id).await.unwrap();
    assert_eq!(first.status, CompanyStatus::Suspended);
    assert_eq!(second.status, CompanyStatus::Suspended);
    assert_eq!(first.updated_at, second.updated_at);

    let active = service.activate(id).await.unwrap();
    assert_eq!(active.status, CompanyStatus::Active);
    let again = service.activate(id).await.unwrap();
    assert_eq!(again.status, CompanyStatus::Active);
}

#[tokio::test]
async fn suspending_an_unknown_company_is_not_found() {
    let db = database().await;
    let err = companies(&db).suspend(404).await.unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
}

#[tokio::test]
async fn empty_update_is_a_validation_error() {
    let db = database().await;
    let service = companies(&db);
    let created = create_tenant(&service, "Acme").await;

    let err = service
        .update(created.company.id, UpdateCompany::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::Validation { .. }));

    let updated = service
        .update(
            created.company.id,
            UpdateCompany {
                max_allowed_drivers: Some(25),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.max_allowed_drivers, 25);
    assert_eq!(updated.name, "Acme");
}

#[tokio::test]
async fn managers_are_added_and_owner_stays_active() {
    let db = database().await;
    let service = companies(&db);
    let created = create_tenant(&service, "Acme").await;
    let company_id = created.company.id;

    let manager = service
        .add_manager(
            company_id,
            NewManager {
                full_name: "Mia Manager".into(),
                email: "mia@acme.test".into(),
                phone: None,
                password: "manager-pass-1".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(manager.role, AdminRole::Manager);

    let admins = service.list_admins(company_id).await.unwrap();
    assert_eq!(admins.len(), 2);

    let off = service
        .set_admin_active(company_id, manager.id, false)
        .await
        .unwrap();
    assert!(!off.is_active);

    let err = service
        .set_admin_active(company_id, created.owner.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::Validation { .. }));
}

#[tokio::test]
async fn admins_of_other_companies_are_invisible() {
    let db = database().await;
    let service = companies(&db);
    let acme = create_tenant(&service, "Acme").await;
    let globex = create_tenant(&service, "Globex").await;

    let err = service
        .set_admin_active(acme.company.id, globex.owner.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
}

#[tokio::test]
async fn suspended_tenant_cannot_add_managers() {
    let db = database().await;
    let service = companies(&db);
    let created = create_tenant(&service, "Acme").await;
    service.suspend(created.company.id).await.unwrap();

    let err = service
        .add_manager(
            created.company.id,
            NewManager {
                full_name: "Late Hire".into(),
                email: "late@acme.test".into(),
                phone: None,
                password: "manager-pass-1".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::TenantSuspended { .. }));
}

#[tokio::test]
async fn deleting_a_tenant_removes_it() {
    let db = database().await;
    let service = companies(&db);
    let created = create_tenant(&service, "Acme").await;

    service.delete(created.company.id).await.unwrap();
    let err = service.get(created.company.id).await.unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
    assert!(service.list_admins(created.company.id).await.is_err());
}

#[tokio::test]
async fn branding_is_validated_then_stored() {
    let db = database().await;
    let service = companies(&db);
    let acme = create_tenant(&service, "Acme").await;

    for bad in [
        UpdateBranding::default(),
        UpdateBranding {
            logo_url: Some("ftp://acme.test/logo.png".into()),
            ..Default::default()
        },
        UpdateBranding {
            font_family: Some("x".repeat(101)),
            ..Default::default()
        },
        UpdateBranding {
            color_palette: Some(ColorPalette {
                primary: "#000000".into(),
                secondary: "  ".into(),
                accent: None,
            }),
            ..Default::default()
        },
    ] {
        let err = service
            .update_branding(acme.company.id, bad)
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::Validation { .. }), "got {err:?}");
    }

    let company = service
        .update_branding(
            acme.company.id,
            UpdateBranding {
                logo_url: Some("https://acme.test/logo.svg".into()),
                theme: Some(Theme::Custom),
                custom_css: Some(".header { color: red; }".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(company.branding.theme, Theme::Custom);
    assert_eq!(company.branding.logo_url, "https://acme.test/logo.svg");
    assert_eq!(company.branding.custom_css, ".header { color: red; }");
}

#[tokio::test]
async fn listing_trims_search_and_respects_scope() {
    let db = database().await;
    let service = companies(&db);
    let acme = create_tenant(&service, "Acme").await;
    create_tenant(&service, "Globex").await;

    let everything = service
        .list(
            CompanyFilter {
                search: Some("   ".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(everything.total, 2);

    let scoped = service
        .list(
            CompanyFilter {
                id: Some(acme.company.id),
                search: Some(" globex ".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(scoped.total, 0);
}
