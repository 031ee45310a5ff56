//! HTTP handlers grouped by resource.

pub mod auth;
pub mod companies;
pub mod drivers;
pub mod health;
pub mod modules;
pub mod users;

use axum::http::StatusCode;
use serde::Deserialize;

use fleetdesk_core::repository::Pagination;

use crate::response::ApiResponse;

/// Answer for any path no route matches.
pub async fn fallback() -> ApiResponse<()> {
    ApiResponse::failure(StatusCode::NOT_FOUND, "Route not found", None)
}

/// `?page=&limit=` query parameters, 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_page(self.page, self.limit)
    }
}
