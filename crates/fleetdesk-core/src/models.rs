//! Domain models for FleetDesk.
//!
//! Each entity has a read model plus `Create*` / `Update*` inputs.
//! Update inputs carry only `Option` fields; `None` leaves a field as is.

pub mod admin;
pub mod company;
pub mod driver;
pub mod module;
pub mod shift;
pub mod user;
