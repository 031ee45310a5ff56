//! Tenant admin identity.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FleetError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Owner,
    Manager,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Owner => "owner",
            AdminRole::Manager => "manager",
        }
    }
}

impl FromStr for AdminRole {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(AdminRole::Owner),
            "manager" => Ok(AdminRole::Manager),
            other => Err(FleetError::validation(format!("unknown admin role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAdmin {
    pub id: u64,
    pub company_id: u64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully prepared admin record. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub company_id: u64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: AdminRole,
}
