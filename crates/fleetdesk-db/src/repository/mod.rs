//! SurrealDB repository implementations.

mod admin;
mod company;
mod driver;
mod module;
mod sequence;
mod shift;
mod user;

pub use admin::SurrealAdminRepository;
pub use company::SurrealCompanyRepository;
pub use driver::SurrealDriverRepository;
pub use module::SurrealModuleRepository;
pub use shift::SurrealShiftRepository;
pub use user::SurrealUserRepository;
