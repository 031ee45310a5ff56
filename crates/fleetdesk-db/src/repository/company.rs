//! SurrealDB implementation of [`CompanyRepository`].

use chrono::{DateTime, Utc};
use fleetdesk_core::error::FleetResult;
use fleetdesk_core::models::admin::{CompanyAdmin, NewAdmin};
use fleetdesk_core::models::company::{
    Branding, ColorPalette, Company, CompanyFilter, CompanyStatus, CreateCompany,
    DEFAULT_MAX_DRIVERS, Plan, Theme, UpdateBranding, UpdateCompany,
};
use fleetdesk_core::repository::{
    AdminRepository, CompanyRepository, PaginatedResult, Pagination,
};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;

use super::admin::SurrealAdminRepository;
use super::sequence::next_id;
use crate::error::DbError;

const SELECT_BY_ID: &str = "SELECT meta::id(id) AS record_id, * \
     FROM type::record('company', $id)";

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CompanyRow {
    record_id: u64,
    name: String,
    legal_name: String,
    email: String,
    phone: String,
    address: String,
    country: String,
    timezone: String,
    locale: String,
    currency: String,
    plan: String,
    max_allowed_drivers: u32,
    settings: serde_json::Value,
    status: String,
    logo_url: String,
    palette_primary: Option<String>,
    palette_secondary: Option<String>,
    palette_accent: Option<String>,
    font_family: String,
    theme: String,
    custom_css: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn try_into_company(self) -> Result<Company, DbError> {
        let plan = self
            .plan
            .parse::<Plan>()
            .map_err(|e| DbError::decode("company", e))?;
        let status = self
            .status
            .parse::<CompanyStatus>()
            .map_err(|e| DbError::decode("company", e))?;
        let theme = self
            .theme
            .parse::<Theme>()
            .map_err(|e| DbError::decode("company", e))?;
        let color_palette = match (self.palette_primary, self.palette_secondary) {
            (Some(primary), Some(secondary)) => Some(ColorPalette {
                primary,
                secondary,
                accent: self.palette_accent,
            }),
            _ => None,
        };
        Ok(Company {
            id: self.record_id,
            name: self.name,
            legal_name: self.legal_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            country: self.country,
            timezone: self.timezone,
            locale: self.locale,
            currency: self.currency,
            plan,
            max_allowed_drivers: self.max_allowed_drivers,
            settings: self.settings,
            status,
            branding: Branding {
                logo_url: self.logo_url,
                color_palette,
                font_family: self.font_family,
                theme,
                custom_css: self.custom_css,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn filter_clause(filter: &CompanyFilter) -> String {
    let mut clauses = Vec::new();
    if filter.id.is_some() {
        clauses.push("id = type::record('company', $filter_id)");
    }
    if filter.status.is_some() {
        clauses.push("status = $status");
    }
    if filter.search.is_some() {
        clauses.push(
            "(string::lowercase(name) CONTAINS $search \
             OR string::lowercase(email) CONTAINS $search)",
        );
    }
    if clauses.is_empty() {
        return "true".into();
    }
    clauses.join(" AND ")
}

/// SurrealDB implementation of the Company repository.
#[derive(Clone)]
pub struct SurrealCompanyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: u64) -> Result<Company, DbError> {
        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company", id))?
            .try_into_company()
    }
}

impl<C: Connection> CompanyRepository for SurrealCompanyRepository<C> {
    async fn create_with_owner(
        &self,
        company: CreateCompany,
        owner: NewAdmin,
    ) -> FleetResult<(Company, CompanyAdmin)> {
        let company_id = next_id(&self.db, "company").await?;
        let admin_id = next_id(&self.db, "company_admin").await?;

        // The admin insert runs first so a duplicate email is the first
        // failing statement of the transaction.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('company_admin', $admin_id) SET \
                    company_id = $company_id, full_name = $full_name, \
                    email = $admin_email, phone = $admin_phone, \
                    password_hash = $password_hash, role = $role, \
                    is_active = true; \
                 CREATE type::record('company', $company_id) SET \
                    name = $name, legal_name = $legal_name, email = $email, \
                    phone = $phone, address = $address, country = $country, \
                    timezone = $timezone, locale = $locale, \
                    currency = $currency, plan = $plan, \
                    max_allowed_drivers = $max_allowed_drivers, \
                    settings = $settings, status = 'active'; \
                 COMMIT TRANSACTION;",
            )
            .bind(("admin_id", admin_id))
            .bind(("company_id", company_id))
            .bind(("full_name", owner.full_name))
            .bind(("admin_email", owner.email))
            .bind(("admin_phone", owner.phone))
            .bind(("password_hash", owner.password_hash))
            .bind(("role", owner.role.as_str()))
            .bind(("name", company.name))
            .bind(("legal_name", company.legal_name.unwrap_or_default()))
            .bind(("email", company.email))
            .bind(("phone", company.phone.unwrap_or_default()))
            .bind(("address", company.address.unwrap_or_default()))
            .bind(("country", company.country.unwrap_or_default()))
            .bind(("timezone", company.timezone.unwrap_or_else(|| "UTC".into())))
            .bind(("locale", company.locale.unwrap_or_else(|| "en".into())))
            .bind(("currency", company.currency.unwrap_or_else(|| "USD".into())))
            .bind(("plan", company.plan.unwrap_or_default().as_str()))
            .bind((
                "max_allowed_drivers",
                company.max_allowed_drivers.unwrap_or(DEFAULT_MAX_DRIVERS),
            ))
            .bind((
                "settings",
                company
                    .settings
                    .unwrap_or(serde_json::Value::Object(Default::default())),
            ))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::statement(e, "company_admin"))?;

        debug!(company_id, admin_id, "company and owner committed");

        let company = self.fetch(company_id).await?;
        let admin = SurrealAdminRepository::new(self.db.clone())
            .get_by_id(admin_id)
            .await?;
        Ok((company, admin))
    }

    async fn get_by_id(&self, id: u64) -> FleetResult<Company> {
        Ok(self.fetch(id).await?)
    }

    async fn update(&self, id: u64, input: UpdateCompany) -> FleetResult<Company> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.legal_name.is_some() {
            sets.push("legal_name = $legal_name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.country.is_some() {
            sets.push("country = $country");
        }
        if input.timezone.is_some() {
            sets.push("timezone = $timezone");
        }
        if input.locale.is_some() {
            sets.push("locale = $locale");
        }
        if input.currency.is_some() {
            sets.push("currency = $currency");
        }
        if input.plan.is_some() {
            sets.push("plan = $plan");
        }
        if input.max_allowed_drivers.is_some() {
            sets.push("max_allowed_drivers = $max_allowed_drivers");
        }
        if input.settings.is_some() {
            sets.push("settings = $settings");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('company', $id) SET {}; {SELECT_BY_ID};",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(legal_name) = input.legal_name {
            builder = builder.bind(("legal_name", legal_name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(country) = input.country {
            builder = builder.bind(("country", country));
        }
        if let Some(timezone) = input.timezone {
            builder = builder.bind(("timezone", timezone));
        }
        if let Some(locale) = input.locale {
            builder = builder.bind(("locale", locale));
        }
        if let Some(currency) = input.currency {
            builder = builder.bind(("currency", currency));
        }
        if let Some(plan) = input.plan {
            builder = builder.bind(("plan", plan.as_str()));
        }
        if let Some(max) = input.max_allowed_drivers {
            builder = builder.bind(("max_allowed_drivers", max));
        }
        if let Some(settings) = input.settings {
            builder = builder.bind(("settings", settings));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company"))?;

        let rows: Vec<CompanyRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company", id))?;
        Ok(row.try_into_company()?)
    }

    async fn set_status(&self, id: u64, status: CompanyStatus) -> FleetResult<Company> {
        let result = self
            .db
            .query(
                "UPDATE type::record('company', $id) SET status = $status, \
                 updated_at = time::now(); \
                 SELECT meta::id(id) AS record_id, * FROM type::record('company', $id);",
            )
            .bind(("id", id))
            .bind(("status", status.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company"))?;

        let rows: Vec<CompanyRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company", id))?;
        Ok(row.try_into_company()?)
    }

    async fn delete(&self, id: u64) -> FleetResult<()> {
        // Surface NotFound instead of silently deleting nothing.
        self.fetch(id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE shift WHERE company_id = $id; \
                 DELETE driver WHERE company_id = $id; \
                 DELETE company_module WHERE company_id = $id; \
                 DELETE company_admin WHERE company_id = $id; \
                 DELETE type::record('company', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(e, "company"))?;

        Ok(())
    }

    async fn count(&self) -> FleetResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM company GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn list(
        &self,
        filter: CompanyFilter,
        pagination: Pagination,
    ) -> FleetResult<PaginatedResult<Company>> {
        let clause = filter_clause(&filter);
        let query = format!(
            "SELECT count() AS total FROM company WHERE {clause} GROUP ALL; \
             SELECT meta::id(id) AS record_id, * FROM company WHERE {clause} \
             ORDER BY id ASC LIMIT $limit START $offset;"
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(id) = filter.id {
            builder = builder.bind(("filter_id", id));
        }
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(search) = filter.search {
            builder = builder.bind(("search", search.to_lowercase()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<CompanyRow> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(CompanyRow::try_into_company)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn update_branding(&self, id: u64, input: UpdateBranding) -> FleetResult<Company> {
        // Surface NotFound instead of UPDATE creating nothing.
        self.fetch(id).await?;

        let mut sets = Vec::new();
        if input.logo_url.is_some() {
            sets.push("logo_url = $logo_url");
        }
        if let Some(palette) = &input.color_palette {
            sets.push("palette_primary = $palette_primary");
            sets.push("palette_secondary = $palette_secondary");
            sets.push(if palette.accent.is_some() {
                "palette_accent = $palette_accent"
            } else {
                "palette_accent = NONE"
            });
        }
        if input.font_family.is_some() {
            sets.push("font_family = $font_family");
        }
        if input.theme.is_some() {
            sets.push("theme = $theme");
        }
        if input.custom_css.is_some() {
            sets.push("custom_css = $custom_css");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('company', $id) SET {}; {SELECT_BY_ID};",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id));
        if let Some(logo_url) = input.logo_url {
            builder = builder.bind(("logo_url", logo_url));
        }
        if let Some(palette) = input.color_palette {
            builder = builder
                .bind(("palette_primary", palette.primary))
                .bind(("palette_secondary", palette.secondary));
            if let Some(accent) = palette.accent {
                builder = builder.bind(("palette_accent", accent));
            }
        }
        if let Some(font_family) = input.font_family {
            builder = builder.bind(("font_family", font_family));
        }
        if let Some(theme) = input.theme {
            builder = builder.bind(("theme", theme.as_str()));
        }
        if let Some(custom_css) = input.custom_css {
            builder = builder.bind(("custom_css", custom_css));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(e, "company"))?;

        let rows: Vec<CompanyRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("company", id))?;
        Ok(row.try_into_company()?)
    }
}
