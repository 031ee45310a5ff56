//! FleetDesk Server: HTTP surface over the admin and account services.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use app::router;
pub use config::{Args, ConfigError};
pub use error::ApiError;
pub use response::ApiResponse;
pub use state::AppState;
