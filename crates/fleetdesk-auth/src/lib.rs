//! FleetDesk Auth: password hashing, bearer tokens, the request gate
//! and the login flows for tenant admins and end users.

pub mod config;
pub mod error;
pub mod gate;
pub mod password;
pub mod service;
pub mod token;
pub mod user;

pub use config::{AuthConfig, TokenConfig};
pub use error::AuthError;
pub use gate::{AuthGate, GateRejection, Identity};
pub use password::PasswordHasher;
pub use service::{AdminAuthService, LoginOutput, normalize_email};
pub use token::{IdentityClaims, TokenClaims, TokenIssuer};
pub use user::{RegisterUser, UserAccountService, UserChanges};
