use serde_json::{Value, json};

use crate::response::ApiResponse;

pub async fn health() -> ApiResponse<Value> {
    ApiResponse::ok(
        "Service is healthy",
        json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
    )
}
