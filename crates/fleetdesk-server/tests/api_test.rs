//! End-to-end tests that drive the router with in-memory SurrealDB.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use fleetdesk_auth::config::AuthConfig;
use fleetdesk_db::{DbConfig, DbManager};
use fleetdesk_server::{AppState, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = DbManager::connect(&DbConfig::default()).await.unwrap();
    let config = AuthConfig::new(
        "admin-test-secret".into(),
        3600,
        "user-test-secret".into(),
        3600,
    );
    let state = AppState::new(db.client().clone(), &config).unwrap();
    router(state, Duration::from_secs(10))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn company_body(name: &str, owner_email: &str) -> Value {
    json!({
        "name": name,
        "email": format!("contact@{}.test", name.to_lowercase()),
        "owner_full_name": format!("{name} Owner"),
        "owner_email": owner_email,
        "owner_password": "owner-password-1",
    })
}

/// Create a tenant and log its owner in. Returns (company id, token).
async fn tenant(app: &Router, name: &str) -> (u64, String) {
    let email = format!("owner@{}.test", name.to_lowercase());
    let (status, body) = send(
        app,
        Method::POST,
        "/admin/companies",
        None,
        Some(company_body(name, &email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let company_id = body["data"]["company"]["id"].as_u64().unwrap();

    let token = admin_login(app, &email, "owner-password-1").await;
    (company_id, token)
}

async fn admin_login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/admin/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_answers_with_the_envelope() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn owner_logs_in_and_reads_profile() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;

    let (status, body) = send(&app, Method::GET, "/admin/auth/me", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "owner@acme.test");
    assert_eq!(body["data"]["role"], "owner");
    assert_eq!(body["data"]["company_id"], company_id);
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = app().await;
    tenant(&app, "Acme").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/admin/auth/login",
        None,
        Some(json!({"email": "owner@acme.test", "password": "not-the-password"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/admin/auth/login",
        None,
        Some(json!({"email": "ghost@acme.test", "password": "not-the-password"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["success"], false);
}

#[tokio::test]
async fn bearer_gate_reports_each_rejection() {
    let app = app().await;
    let cases = [
        (None, "Authorization header required"),
        (Some("Basic abc"), "Invalid authorization format"),
        (Some("Bearer not.a.token"), "Invalid token"),
    ];
    for (header, message) in cases {
        let (status, body) = send(&app, Method::GET, "/admin/modules", header, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn user_tokens_do_not_open_admin_routes() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"name": "Una User", "email": "una@example.test", "password": "user-pass-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/admin/modules", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn duplicate_owner_email_is_a_conflict() {
    let app = app().await;
    tenant(&app, "Acme").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/companies",
        None,
        Some(company_body("Globex", "owner@acme.test")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_body_lists_field_errors() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/auth/login",
        None,
        Some(json!({"email": "not-an-email", "password": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn admins_cannot_reach_other_tenants() {
    let app = app().await;
    let (acme, _) = tenant(&app, "Acme").await;
    let (_, globex_token) = tenant(&app, "Globex").await;

    let uri = format!("/admin/companies/{acme}");
    let (status, _) = send(&app, Method::GET, &uri, Some(&bearer(&globex_token)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn module_assignment_round_trip() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    let auth = bearer(&token);
    let uri = format!("/admin/companies/{company_id}/modules");

    let (status, body) = send(&app, Method::POST, &uri, Some(&auth), Some(json!({"module_id": 7}))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["is_enabled"], true);

    let (status, _) = send(&app, Method::POST, &uri, Some(&auth), Some(json!({"module_id": 7}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["module"]["module_key"], "customer_notifications");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("{uri}/7"),
        Some(&auth),
        Some(json!({"config": {"channel": "sms"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["config"]["channel"], "sms");

    let (status, _) = send(&app, Method::DELETE, &format!("{uri}/99"), Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("{uri}/7"), Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn suspension_is_idempotent_and_blocks_mutations() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    let auth = bearer(&token);
    let suspend = format!("/admin/companies/{company_id}/suspend");

    for _ in 0..2 {
        let (status, body) = send(&app, Method::PUT, &suspend, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "suspended");
    }

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/admin/companies/{company_id}/drivers"),
        Some(&auth),
        Some(json!({"full_name": "Dee Driver", "phone": "+4915100"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{company_id}/activate"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
}

#[tokio::test]
async fn managers_cannot_suspend_and_deactivated_managers_cannot_log_in() {
    let app = app().await;
    let (company_id, owner_token) = tenant(&app, "Acme").await;
    let owner = bearer(&owner_token);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/admin/companies/{company_id}/admins"),
        Some(&owner),
        Some(json!({
            "full_name": "Mia Manager",
            "email": "mia@acme.test",
            "password": "manager-pass-1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let manager_id = body["data"]["id"].as_u64().unwrap();

    let manager_token = admin_login(&app, "mia@acme.test", "manager-pass-1").await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{company_id}/suspend"),
        Some(&bearer(&manager_token)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{company_id}/admins/{manager_id}/deactivate"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/auth/login",
        None,
        Some(json!({"email": "mia@acme.test", "password": "manager-pass-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Account is inactive");
}

#[tokio::test]
async fn drivers_shifts_and_performance() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    let auth = bearer(&token);
    let drivers = format!("/admin/companies/{company_id}/drivers");

    let (status, body) = send(
        &app,
        Method::POST,
        &drivers,
        Some(&auth),
        Some(json!({"full_name": "Dee Driver", "phone": "+4915100"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let driver_id = body["data"]["id"].as_u64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("{drivers}?search=dee"), Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);

    let today = chrono::Utc::now().date_naive();
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("{drivers}/{driver_id}/shifts"),
        Some(&auth),
        Some(json!({
            "shift_date": today.to_string(),
            "status": "completed",
            "total_orders": 8,
            "completed_orders": 6,
            "cancelled_orders": 2,
            "rating": 4.5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("{drivers}/{driver_id}/performance"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_shifts"], 1);
    assert_eq!(body["data"]["completion_rate"], 0.75);

    let (status, body) = send(&app, Method::PUT, &format!("{drivers}/{driver_id}/block"), Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "suspended");
}

#[tokio::test]
async fn malformed_path_and_query_values_use_the_envelope() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    let auth = bearer(&token);

    let (status, body) = send(&app, Method::GET, "/admin/companies/abc", Some(&auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid path parameter");
    assert_eq!(body["errors"][0]["field"], "path");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/admin/companies/{company_id}/drivers?page=first"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid query parameter");
}

#[tokio::test]
async fn unknown_routes_answer_with_a_json_404() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/admin/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[tokio::test]
async fn huge_page_numbers_return_an_empty_page() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/admin/companies/{company_id}/drivers?page=18446744073709551615&limit=200"),
        Some(&bearer(&token)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn company_listing_is_scoped_and_filtered() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    tenant(&app, "Globex").await;
    let auth = bearer(&token);

    let (status, body) = send(&app, Method::GET, "/admin/companies", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], company_id);
    assert_eq!(body["data"]["page"], 1);

    let (_, body) = send(
        &app,
        Method::GET,
        "/admin/companies?search=globex",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 0);

    let (_, body) = send(
        &app,
        Method::GET,
        "/admin/companies?status=active&search=ACME",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);

    let (status, _) = send(&app, Method::GET, "/admin/companies", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::GET,
        "/admin/companies?status=archived",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn branding_is_updated_per_tenant() {
    let app = app().await;
    let (company_id, token) = tenant(&app, "Acme").await;
    let (other_id, _) = tenant(&app, "Globex").await;
    let auth = bearer(&token);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{company_id}/branding"),
        Some(&auth),
        Some(json!({
            "logo_url": "https://cdn.acme.test/logo.png",
            "color_palette": {"primary": "#0A2540", "secondary": "#FFFFFF"},
            "font_family": "Inter",
            "theme": "dark",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let branding = &body["data"]["branding"];
    assert_eq!(branding["theme"], "dark");
    assert_eq!(branding["color_palette"]["primary"], "#0A2540");
    assert!(branding["color_palette"].get("accent").is_none());
    assert_eq!(branding["custom_css"], "");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{company_id}/branding"),
        Some(&auth),
        Some(json!({"theme": "neon"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{company_id}/branding"),
        Some(&auth),
        Some(json!({"font_family": "x".repeat(101)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "font_family");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/admin/companies/{other_id}/branding"),
        Some(&auth),
        Some(json!({"theme": "light"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
