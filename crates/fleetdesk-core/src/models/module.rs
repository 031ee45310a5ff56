//! Module catalog entries and per-company assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A capability from the platform catalog. Not tenant specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: u64,
    pub module_key: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub default_enabled: bool,
}

/// Links a company to a catalog module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleAssignment {
    pub id: u64,
    pub company_id: u64,
    pub module_id: u64,
    pub is_enabled: bool,
    /// Opaque configuration owned by the module.
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An assignment joined with its catalog definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedModule {
    #[serde(flatten)]
    pub assignment: ModuleAssignment,
    pub module: Module,
}

#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub company_id: u64,
    pub module_id: u64,
    pub is_enabled: bool,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAssignment {
    pub is_enabled: Option<bool>,
    pub config: Option<serde_json::Value>,
}
