//! Bearer-token middleware for the two token namespaces.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use fleetdesk_auth::gate::{AuthGate, Identity};
use tracing::debug;

use crate::error::ApiError;
use crate::extract::{AdminIdentity, UserIdentity};
use crate::state::AppState;

fn authenticate(gate: &AuthGate, request: &Request) -> Result<Identity, ApiError> {
    // A header that is not visible ASCII cannot carry a bearer token.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());
    gate.authenticate(header).map_err(|rejection| {
        debug!(path = %request.uri().path(), ?rejection, "bearer rejected");
        ApiError::from(rejection)
    })
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(&state.admin_gate, &request)?;
    request.extensions_mut().insert(AdminIdentity(identity));
    Ok(next.run(request).await)
}

pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(&state.user_gate, &request)?;
    request.extensions_mut().insert(UserIdentity(identity));
    Ok(next.run(request).await)
}
