//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. Records use numeric ids
//! allocated from `id_sequence`. Enums are stored as snake_case strings
//! with ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "seed_module_catalog",
        sql: SEED_MODULES_V2,
    },
    Migration {
        version: 3,
        name: "company_branding",
        sql: BRANDING_V3,
    },
];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Id sequences
-- =======================================================================
DEFINE TABLE id_sequence SCHEMAFULL;
DEFINE FIELD next_id ON TABLE id_sequence TYPE int DEFAULT 0;

-- =======================================================================
-- Companies (tenants)
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD name ON TABLE company TYPE string;
DEFINE FIELD legal_name ON TABLE company TYPE string DEFAULT '';
DEFINE FIELD email ON TABLE company TYPE string;
DEFINE FIELD phone ON TABLE company TYPE string DEFAULT '';
DEFINE FIELD address ON TABLE company TYPE string DEFAULT '';
DEFINE FIELD country ON TABLE company TYPE string DEFAULT '';
DEFINE FIELD timezone ON TABLE company TYPE string DEFAULT 'UTC';
DEFINE FIELD locale ON TABLE company TYPE string DEFAULT 'en';
DEFINE FIELD currency ON TABLE company TYPE string DEFAULT 'USD';
DEFINE FIELD plan ON TABLE company TYPE string \
    ASSERT $value IN ['free', 'basic', 'pro', 'enterprise'];
DEFINE FIELD max_allowed_drivers ON TABLE company TYPE int DEFAULT 10;
DEFINE FIELD settings ON TABLE company TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD status ON TABLE company TYPE string \
    ASSERT $value IN ['active', 'suspended'];
DEFINE FIELD created_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Company admins (email is globally unique)
-- =======================================================================
DEFINE TABLE company_admin SCHEMAFULL;
DEFINE FIELD company_id ON TABLE company_admin TYPE int;
DEFINE FIELD full_name ON TABLE company_admin TYPE string;
DEFINE FIELD email ON TABLE company_admin TYPE string;
DEFINE FIELD phone ON TABLE company_admin TYPE string DEFAULT '';
DEFINE FIELD password_hash ON TABLE company_admin TYPE string;
DEFINE FIELD role ON TABLE company_admin TYPE string \
    ASSERT $value IN ['owner', 'manager'];
DEFINE FIELD is_active ON TABLE company_admin TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE company_admin TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company_admin TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_admin_email ON TABLE company_admin \
    COLUMNS email UNIQUE;
DEFINE INDEX idx_company_admin_company ON TABLE company_admin \
    COLUMNS company_id;

-- =======================================================================
-- Module catalog
-- =======================================================================
DEFINE TABLE module SCHEMAFULL;
DEFINE FIELD module_key ON TABLE module TYPE string;
DEFINE FIELD name ON TABLE module TYPE string;
DEFINE FIELD category ON TABLE module TYPE string;
DEFINE FIELD description ON TABLE module TYPE string DEFAULT '';
DEFINE FIELD default_enabled ON TABLE module TYPE bool DEFAULT false;
DEFINE INDEX idx_module_key ON TABLE module COLUMNS module_key UNIQUE;

-- =======================================================================
-- Company module assignments
-- =======================================================================
DEFINE TABLE company_module SCHEMAFULL;
DEFINE FIELD company_id ON TABLE company_module TYPE int;
DEFINE FIELD module_id ON TABLE company_module TYPE int;
DEFINE FIELD is_enabled ON TABLE company_module TYPE bool DEFAULT true;
DEFINE FIELD config ON TABLE company_module TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE company_module TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company_module TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_module_pair ON TABLE company_module \
    COLUMNS company_id, module_id UNIQUE;

-- =======================================================================
-- Drivers (company scope, phone unique per company)
-- =======================================================================
DEFINE TABLE driver SCHEMAFULL;
DEFINE FIELD company_id ON TABLE driver TYPE int;
DEFINE FIELD store_id ON TABLE driver TYPE option<int>;
DEFINE FIELD full_name ON TABLE driver TYPE string;
DEFINE FIELD phone ON TABLE driver TYPE string;
DEFINE FIELD email ON TABLE driver TYPE string DEFAULT '';
DEFINE FIELD password_hash ON TABLE driver TYPE string DEFAULT '';
DEFINE FIELD status ON TABLE driver TYPE string \
    ASSERT $value IN ['active', 'off_duty', 'suspended'];
DEFINE FIELD is_online ON TABLE driver TYPE bool DEFAULT false;
DEFINE FIELD rating ON TABLE driver TYPE float DEFAULT 0.0;
DEFINE FIELD created_at ON TABLE driver TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE driver TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_driver_company_phone ON TABLE driver \
    COLUMNS company_id, phone UNIQUE;

-- =======================================================================
-- Driver shifts
-- =======================================================================
DEFINE TABLE shift SCHEMAFULL;
DEFINE FIELD company_id ON TABLE shift TYPE int;
DEFINE FIELD driver_id ON TABLE shift TYPE int;
DEFINE FIELD shift_date ON TABLE shift TYPE string;
DEFINE FIELD start_time ON TABLE shift TYPE option<datetime>;
DEFINE FIELD end_time ON TABLE shift TYPE option<datetime>;
DEFINE FIELD status ON TABLE shift TYPE string \
    ASSERT $value IN ['scheduled', 'ongoing', 'completed', 'cancelled'];
DEFINE FIELD total_orders ON TABLE shift TYPE int DEFAULT 0;
DEFINE FIELD completed_orders ON TABLE shift TYPE int DEFAULT 0;
DEFINE FIELD cancelled_orders ON TABLE shift TYPE int DEFAULT 0;
DEFINE FIELD total_distance_km ON TABLE shift TYPE float DEFAULT 0.0;
DEFINE FIELD total_earnings ON TABLE shift TYPE float DEFAULT 0.0;
DEFINE FIELD rating ON TABLE shift TYPE float DEFAULT 0.0;
DEFINE FIELD notes ON TABLE shift TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE shift TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_shift_driver_date ON TABLE shift \
    COLUMNS company_id, driver_id, shift_date;

-- =======================================================================
-- End users (email is globally unique)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
";

// -----------------------------------------------------------------------
// v2: module catalog seed
// -----------------------------------------------------------------------

const SEED_MODULES_V2: &str = "\
CREATE module:1 SET module_key = 'order_management', name = 'Order Management', \
    category = 'operations', description = 'Receive, dispatch and track orders', \
    default_enabled = true;
CREATE module:2 SET module_key = 'driver_app', name = 'Driver App', \
    category = 'operations', description = 'Mobile app access for drivers', \
    default_enabled = true;
CREATE module:3 SET module_key = 'shift_planning', name = 'Shift Planning', \
    category = 'workforce', description = 'Schedule and review driver shifts', \
    default_enabled = true;
CREATE module:4 SET module_key = 'route_optimization', name = 'Route Optimization', \
    category = 'operations', description = 'Multi-stop route planning', \
    default_enabled = false;
CREATE module:5 SET module_key = 'proof_of_delivery', name = 'Proof of Delivery', \
    category = 'operations', description = 'Photo and signature capture at drop-off', \
    default_enabled = false;
CREATE module:6 SET module_key = 'cash_collection', name = 'Cash Collection', \
    category = 'finance', description = 'Cash on delivery reconciliation', \
    default_enabled = false;
CREATE module:7 SET module_key = 'customer_notifications', name = 'Customer Notifications', \
    category = 'engagement', description = 'SMS and WhatsApp status updates', \
    default_enabled = false;
CREATE module:8 SET module_key = 'analytics', name = 'Analytics', \
    category = 'insights', description = 'Fleet and driver performance dashboards', \
    default_enabled = false;
UPSERT id_sequence:module SET next_id = 8;
";

// -----------------------------------------------------------------------
// v3: company branding
// -----------------------------------------------------------------------

// The palette is stored flat; a company has a palette when both
// primary and secondary are set.
const BRANDING_V3: &str = "\
DEFINE FIELD logo_url ON TABLE company TYPE string DEFAULT '';
DEFINE FIELD palette_primary ON TABLE company TYPE option<string>;
DEFINE FIELD palette_secondary ON TABLE company TYPE option<string>;
DEFINE FIELD palette_accent ON TABLE company TYPE option<string>;
DEFINE FIELD font_family ON TABLE company TYPE string DEFAULT '';
DEFINE FIELD theme ON TABLE company TYPE string DEFAULT 'light' \
    ASSERT $value IN ['light', 'dark', 'custom'];
DEFINE FIELD custom_css ON TABLE company TYPE string DEFAULT '';
UPDATE company SET logo_url = '', font_family = '', theme = 'light', custom_css = '';
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied successfully");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
