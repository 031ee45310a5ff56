//! Integration tests for tenant admin login using in-memory SurrealDB.

use std::time::{Duration, Instant};

use fleetdesk_auth::config::TokenConfig;
use fleetdesk_auth::gate::Identity;
use fleetdesk_auth::password::PasswordHasher;
use fleetdesk_auth::service::AdminAuthService;
use fleetdesk_auth::token::{IdentityClaims, TokenIssuer};
use fleetdesk_core::error::FleetError;
use fleetdesk_core::models::admin::{AdminRole, NewAdmin};
use fleetdesk_core::models::company::CreateCompany;
use fleetdesk_core::repository::{AdminRepository, CompanyRepository};
use fleetdesk_db::repository::{SurrealAdminRepository, SurrealCompanyRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

const PASSWORD: &str = "correct-horse-battery";

fn issuer() -> TokenIssuer {
    TokenIssuer::new(&TokenConfig::new("admin-test-secret", 3600, "fleetdesk-admin")).unwrap()
}

/// Spin up in-memory DB, run migrations, create a company with owner.
async fn setup() -> (
    AdminAuthService<SurrealAdminRepository<Db>>,
    SurrealAdminRepository<Db>,
    u64,
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fleetdesk_db::run_migrations(&db).await.unwrap();

    let hasher = PasswordHasher::default();
    let (_, owner) = SurrealCompanyRepository::new(db.clone())
        .create_with_owner(
            CreateCompany {
                name: "Acme".into(),
                legal_name: None,
                email: "hello@acme.test".into(),
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
            NewAdmin {
                company_id: 0,
                full_name: "Olivia Owner".into(),
                email: "owner@acme.test".into(),
                phone: String::new(),
                password_hash: hasher.hash(PASSWORD).unwrap(),
                role: AdminRole::Owner,
            },
        )
        .await
        .unwrap();

    let admins = SurrealAdminRepository::new(db);
    let service = AdminAuthService::new(admins.clone(), hasher, issuer());
    (service, admins, owner.id)
}

#[tokio::test]
async fn login_issues_a_token_with_tenant_claims() {
    let (service, _, owner_id) = setup().await;

    let output = service.login("Owner@Acme.test", PASSWORD).await.unwrap();
    assert_eq!(output.token_type, "Bearer");
    assert_eq!(output.expires_in, 3600);
    assert_eq!(output.identity.id, owner_id);

    let claims = issuer().validate(&output.access_token).unwrap();
    assert_eq!(claims.subject_id().unwrap(), owner_id);
    assert_eq!(claims.role.as_deref(), Some("owner"));
    assert_eq!(claims.company_id, Some(output.identity.company_id));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let (service, _, _) = setup().await;

    let wrong_password = service.login("owner@acme.test", "nope-nope").await.unwrap_err();
    let unknown_email = service.login("ghost@acme.test", PASSWORD).await.unwrap_err();

    assert!(matches!(wrong_password, FleetError::InvalidCredentials));
    assert!(matches!(unknown_email, FleetError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.kind(), unknown_email.kind());
}

#[test]
fn tokens_sign_and_verify_with_the_database_linked_in() {
    let issued = issuer()
        .issue(
            9,
            IdentityClaims {
                company_id: Some(2),
                ..IdentityClaims::default()
            },
        )
        .unwrap();
    let claims = issuer().validate(&issued.token).unwrap();
    assert_eq!(claims.subject_id().unwrap(), 9);
    assert_eq!(claims.company_id, Some(2));
}

async fn timed_failure(
    service: &AdminAuthService<SurrealAdminRepository<Db>>,
    email: &str,
    password: &str,
) -> Duration {
    let started = Instant::now();
    let err = service.login(email, password).await.unwrap_err();
    assert!(matches!(err, FleetError::InvalidCredentials), "got {err:?}");
    started.elapsed()
}

#[tokio::test]
async fn unknown_email_costs_a_password_verification() {
    let (service, _, _) = setup().await;
    // Warm up so the one-off decoy hash is not measured.
    timed_failure(&service, "ghost@acme.test", PASSWORD).await;

    let mut unknown = Duration::ZERO;
    let mut wrong = Duration::ZERO;
    for _ in 0..3 {
        unknown += timed_failure(&service, "ghost@acme.test", PASSWORD).await;
        wrong += timed_failure(&service, "owner@acme.test", "nope-nope").await;
    }
    assert!(
        unknown * 3 >= wrong,
        "unknown email took {unknown:?}, wrong password took {wrong:?}"
    );
}

#[tokio::test]
async fn deactivated_admin_is_inactive_not_invalid() {
    let (service, admins, owner_id) = setup().await;
    admins.set_active(owner_id, false).await.unwrap();

    let err = service.login("owner@acme.test", PASSWORD).await.unwrap_err();
    assert!(matches!(err, FleetError::AccountInactive), "got {err:?}");
}

#[tokio::test]
async fn deactivated_admin_with_wrong_password_is_invalid() {
    let (service, admins, owner_id) = setup().await;
    admins.set_active(owner_id, false).await.unwrap();

    let err = service.login("owner@acme.test", "nope-nope").await.unwrap_err();
    assert!(matches!(err, FleetError::InvalidCredentials), "got {err:?}");
}

#[tokio::test]
async fn profile_resolves_the_token_identity() {
    let (service, admins, owner_id) = setup().await;
    let identity = Identity {
        id: owner_id,
        email: None,
        role: Some(AdminRole::Owner),
        company_id: None,
    };

    let admin = service.profile(&identity).await.unwrap();
    assert_eq!(admin.email, "owner@acme.test");

    admins.set_active(owner_id, false).await.unwrap();
    assert!(matches!(
        service.profile(&identity).await,
        Err(FleetError::AccountInactive)
    ));
}

#[tokio::test]
async fn password_hash_never_serializes() {
    let (service, _, _) = setup().await;
    let output = service.login("owner@acme.test", PASSWORD).await.unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert!(json["identity"].get("password_hash").is_none());
    assert_eq!(json["identity"]["role"], "owner");
}
