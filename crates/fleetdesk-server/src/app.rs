//! Router assembly.

use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{require_admin, require_user};
use crate::routes::{self, auth, companies, drivers, health, modules, users};
use crate::state::AppState;

/// Build the full application router.
///
/// Routes:
/// - `GET /health`, `POST /admin/auth/login`, `POST /admin/companies`,
///   `POST /api/v1/auth/{register,login}` are public
/// - everything else under `/admin` requires an admin bearer token
/// - everything else under `/api/v1` requires an end-user bearer token
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/admin/auth/login", post(auth::admin_login))
        .route("/admin/companies", post(companies::create))
        .route("/api/v1/auth/register", post(auth::user_register))
        .route("/api/v1/auth/login", post(auth::user_login));

    let admin = Router::new()
        .route("/admin/auth/me", get(auth::admin_me))
        .route("/admin/modules", get(modules::catalog))
        .route("/admin/companies", get(companies::list))
        .route(
            "/admin/companies/{id}",
            get(companies::get)
                .put(companies::update)
                .delete(companies::delete),
        )
        .route(
            "/admin/companies/{id}/branding",
            put(companies::update_branding),
        )
        .route("/admin/companies/{id}/suspend", put(companies::suspend))
        .route("/admin/companies/{id}/activate", put(companies::activate))
        .route(
            "/admin/companies/{id}/admins",
            get(companies::list_admins).post(companies::add_manager),
        )
        .route(
            "/admin/companies/{id}/admins/{admin_id}/activate",
            put(companies::activate_admin),
        )
        .route(
            "/admin/companies/{id}/admins/{admin_id}/deactivate",
            put(companies::deactivate_admin),
        )
        .route(
            "/admin/companies/{id}/modules",
            get(modules::list).post(modules::assign),
        )
        .route(
            "/admin/companies/{id}/modules/{module_id}",
            put(modules::update).delete(modules::remove),
        )
        .route(
            "/admin/companies/{id}/drivers",
            get(drivers::list).post(drivers::create),
        )
        .route(
            "/admin/companies/{id}/drivers/{driver_id}",
            get(drivers::get)
                .put(drivers::update)
                .delete(drivers::delete),
        )
        .route(
            "/admin/companies/{id}/drivers/{driver_id}/block",
            put(drivers::block),
        )
        .route(
            "/admin/companies/{id}/drivers/{driver_id}/unblock",
            put(drivers::unblock),
        )
        .route(
            "/admin/companies/{id}/drivers/{driver_id}/shifts",
            get(drivers::list_shifts).post(drivers::schedule_shift),
        )
        .route(
            "/admin/companies/{id}/drivers/{driver_id}/performance",
            get(drivers::performance),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let user = Router::new()
        .route("/api/v1/auth/me", get(auth::user_me))
        .route("/api/v1/users", get(users::list).post(users::create))
        .route(
            "/api/v1/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), require_user));

    Router::new()
        .merge(public)
        .merge(admin)
        .merge(user)
        .fallback(routes::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
