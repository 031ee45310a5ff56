//! Integration tests for the Module repository using in-memory
//! SurrealDB.

use fleetdesk_core::error::FleetError;
use fleetdesk_core::models::module::{CreateAssignment, UpdateAssignment};
use fleetdesk_core::repository::ModuleRepository;
use fleetdesk_db::repository::SurrealModuleRepository;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> SurrealModuleRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fleetdesk_db::run_migrations(&db).await.unwrap();
    SurrealModuleRepository::new(db)
}

fn assignment(company_id: u64, module_id: u64) -> CreateAssignment {
    CreateAssignment {
        company_id,
        module_id,
        is_enabled: true,
        config: json!({"limit": 5}),
    }
}

#[tokio::test]
async fn catalog_is_seeded_in_id_order() {
    let repo = setup().await;
    let catalog = repo.list_catalog().await.unwrap();

    assert_eq!(catalog.len(), 8);
    let ids: Vec<u64> = catalog.iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    assert_eq!(catalog[0].module_key, "order_management");

    let module = repo.get_module(7).await.unwrap();
    assert_eq!(module.module_key, "customer_notifications");
}

#[tokio::test]
async fn unknown_module_is_not_found() {
    let repo = setup().await;
    let err = repo.get_module(99).await.unwrap_err();
    assert!(matches!(err, FleetError::NotFound { ref entity, .. } if entity == "module"));
}

#[tokio::test]
async fn unique_pair_is_enforced_by_the_index() {
    let repo = setup().await;

    repo.assign(assignment(3, 7)).await.unwrap();
    let err = repo.assign(assignment(3, 7)).await.unwrap_err();
    assert!(
        matches!(err, FleetError::AlreadyExists { ref entity } if entity == "company_module"),
        "unexpected error: {err:?}"
    );

    // A different company may still take the same module.
    repo.assign(assignment(4, 7)).await.unwrap();

    let listed = repo.list_for_company(3).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].module.id, 7);
}

#[tokio::test]
async fn list_joins_catalog_and_sorts_by_assignment_id() {
    let repo = setup().await;

    let a = repo.assign(assignment(3, 5)).await.unwrap();
    let b = repo.assign(assignment(3, 2)).await.unwrap();
    let c = repo.assign(assignment(3, 8)).await.unwrap();

    let listed = repo.list_for_company(3).await.unwrap();
    let ids: Vec<u64> = listed.iter().map(|m| m.assignment.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
    assert_eq!(listed[1].module.module_key, "driver_app");

    let again = repo.list_for_company(3).await.unwrap();
    let again_ids: Vec<u64> = again.iter().map(|m| m.assignment.id).collect();
    assert_eq!(ids, again_ids);
}

#[tokio::test]
async fn update_assignment_changes_only_given_fields() {
    let repo = setup().await;
    repo.assign(assignment(3, 7)).await.unwrap();

    let disabled = repo
        .update_assignment(
            3,
            7,
            UpdateAssignment {
                is_enabled: Some(false),
                config: None,
            },
        )
        .await
        .unwrap();
    assert!(!disabled.is_enabled);
    assert_eq!(disabled.config, json!({"limit": 5}));

    let reconfigured = repo
        .update_assignment(
            3,
            7,
            UpdateAssignment {
                is_enabled: None,
                config: Some(json!({"channels": ["sms"]})),
            },
        )
        .await
        .unwrap();
    assert!(!reconfigured.is_enabled);
    assert_eq!(reconfigured.config["channels"][0], "sms");
}

#[tokio::test]
async fn update_missing_assignment_is_not_found() {
    let repo = setup().await;
    let err = repo
        .update_assignment(3, 7, UpdateAssignment::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::NotFound { .. }));
}

#[tokio::test]
async fn remove_is_a_hard_delete() {
    let repo = setup().await;
    repo.assign(assignment(3, 7)).await.unwrap();

    repo.remove(3, 7).await.unwrap();
    assert!(repo.list_for_company(3).await.unwrap().is_empty());
    assert!(matches!(
        repo.get_assignment(3, 7).await,
        Err(FleetError::NotFound { .. })
    ));

    // Removing again reports the missing row.
    assert!(matches!(
        repo.remove(3, 7).await,
        Err(FleetError::NotFound { .. })
    ));

    // The pair can be assigned again after removal.
    repo.assign(assignment(3, 7)).await.unwrap();
}
