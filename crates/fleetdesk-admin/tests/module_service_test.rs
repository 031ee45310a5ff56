//! Module assignment against in-memory SurrealDB.

mod common;

use fleetdesk_admin::{AssignModule, ModuleService};
use fleetdesk_core::error::FleetError;
use fleetdesk_db::repository::{SurrealCompanyRepository, SurrealModuleRepository};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use common::{companies, create_tenant, database};

type Modules = ModuleService<SurrealModuleRepository<Db>, SurrealCompanyRepository<Db>>;

fn modules(db: &Surreal<Db>) -> Modules {
    ModuleService::new(
        SurrealModuleRepository::new(db.clone()),
        SurrealCompanyRepository::new(db.clone()),
    )
}

/// Three tenants so the third one has id 3.
async fn three_tenants(db: &Surreal<Db>) -> u64 {
    let service = companies(db);
    create_tenant(&service, "Alpha").await;
    create_tenant(&service, "Bravo").await;
    create_tenant(&service, "Charlie").await.company.id
}

fn module(module_id: u64) -> AssignModule {
    AssignModule {
        module_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn assigning_twice_is_rejected_and_listed_once() {
    let db = database().await;
    let company_id = three_tenants(&db).await;
    assert_eq!(company_id, 3);
    let service = modules(&db);

    let assignment = service.assign(3, module(7)).await.unwrap();
    assert!(assignment.is_enabled);
    assert_eq!(assignment.config, json!({}));

    let err = service.assign(3, module(7)).await.unwrap_err();
    assert!(matches!(
        err,
        FleetError::AlreadyAssigned {
            company_id: 3,
            module_id: 7
        }
    ));

    let listed = service.list_for_tenant(3).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].module.module_key, "customer_notifications");
}

#[tokio::test]
async fn removing_an_unassigned_module_is_not_assigned() {
    let db = database().await;
    three_tenants(&db).await;

    let err = modules(&db).remove(3, 99).await.unwrap_err();
    assert!(matches!(
        err,
        FleetError::NotAssigned {
            company_id: 3,
            module_id: 99
        }
    ));
}

#[tokio::test]
async fn unknown_catalog_module_is_not_found() {
    let db = database().await;
    three_tenants(&db).await;

    let err = modules(&db).assign(1, module(99)).await.unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
}

#[tokio::test]
async fn config_and_enabled_flag_can_change() {
    let db = database().await;
    three_tenants(&db).await;
    let service = modules(&db);

    service
        .assign(
            2,
            AssignModule {
                module_id: 3,
                is_enabled: Some(false),
                config: Some(json!({"max_shifts": 2})),
            },
        )
        .await
        .unwrap();

    let enabled = service.set_enabled(2, 3, true).await.unwrap();
    assert!(enabled.is_enabled);
    assert_eq!(enabled.config, json!({"max_shifts": 2}));

    let updated = service
        .update_config(2, 3, json!({"max_shifts": 4}))
        .await
        .unwrap();
    assert_eq!(updated.config, json!({"max_shifts": 4}));

    let err = service.set_enabled(2, 4, false).await.unwrap_err();
    assert!(matches!(err, FleetError::NotAssigned { .. }));

    service.remove(2, 3).await.unwrap();
    assert!(service.list_for_tenant(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn suspended_tenant_cannot_change_modules() {
    let db = database().await;
    three_tenants(&db).await;
    companies(&db).suspend(1).await.unwrap();

    let err = modules(&db).assign(1, module(1)).await.unwrap_err();
    assert!(matches!(err, FleetError::TenantSuspended { company_id: 1 }));
}

#[tokio::test]
async fn listing_is_ordered_by_assignment() {
    let db = database().await;
    three_tenants(&db).await;
    let service = modules(&db);

    for module_id in [5, 2, 8] {
        service.assign(1, module(module_id)).await.unwrap();
    }
    let listed: Vec<u64> = service
        .list_for_tenant(1)
        .await
        .unwrap()
        .iter()
        .map(|m| m.module.id)
        .collect();
    assert_eq!(listed, vec![5, 2, 8]);
}
