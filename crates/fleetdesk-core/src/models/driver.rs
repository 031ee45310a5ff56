//! Driver domain model. Drivers always belong to exactly one company.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FleetError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Active,
    OffDuty,
    Suspended,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Active => "active",
            DriverStatus::OffDuty => "off_duty",
            DriverStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for DriverStatus {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DriverStatus::Active),
            "off_duty" => Ok(DriverStatus::OffDuty),
            "suspended" => Ok(DriverStatus::Suspended),
            other => Err(FleetError::validation(format!(
                "unknown driver status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: u64,
    pub company_id: u64,
    pub store_id: Option<u64>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub status: DriverStatus,
    pub is_online: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A driver record ready for storage.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub company_id: u64,
    pub store_id: Option<u64>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// Empty when the driver has no app login yet.
    pub password_hash: String,
    pub status: DriverStatus,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDriver {
    pub store_id: Option<u64>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<DriverStatus>,
    pub is_online: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct DriverFilter {
    pub status: Option<DriverStatus>,
    /// Case-insensitive substring match on name or phone.
    pub search: Option<String>,
}
