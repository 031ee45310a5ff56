//! Company (tenant) domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FleetError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    Active,
    Suspended,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "active",
            CompanyStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyStatus {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CompanyStatus::Active),
            "suspended" => Ok(CompanyStatus::Suspended),
            other => Err(FleetError::validation(format!(
                "unknown company status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Basic,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Basic => "basic",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }
}

impl FromStr for Plan {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "basic" => Ok(Plan::Basic),
            "pro" => Ok(Plan::Pro),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(FleetError::validation(format!("unknown plan: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Custom,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Custom => "custom",
        }
    }
}

impl FromStr for Theme {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "custom" => Ok(Theme::Custom),
            other => Err(FleetError::validation(format!("unknown theme: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

/// Look and feel a tenant applies to its own apps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub logo_url: String,
    pub color_palette: Option<ColorPalette>,
    pub font_family: String,
    pub theme: Theme,
    pub custom_css: String,
}

/// Partial branding update; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBranding {
    pub logo_url: Option<String>,
    pub color_palette: Option<ColorPalette>,
    pub font_family: Option<String>,
    pub theme: Option<Theme>,
    pub custom_css: Option<String>,
}

impl UpdateBranding {
    pub fn is_empty(&self) -> bool {
        self.logo_url.is_none()
            && self.color_palette.is_none()
            && self.font_family.is_none()
            && self.theme.is_none()
            && self.custom_css.is_none()
    }
}

/// Company listing filter. Every set field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    /// Restrict to one company, e.g. the caller's own tenant.
    pub id: Option<u64>,
    pub status: Option<CompanyStatus>,
    /// Case-insensitive substring match on name or email.
    pub search: Option<String>,
}

/// Default cap on drivers for a newly created company.
pub const DEFAULT_MAX_DRIVERS: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub legal_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub country: String,
    pub timezone: String,
    pub locale: String,
    pub currency: String,
    pub plan: Plan,
    pub max_allowed_drivers: u32,
    /// Free-form business settings owned by the tenant.
    pub settings: serde_json::Value,
    pub status: CompanyStatus,
    pub branding: Branding,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn is_suspended(&self) -> bool {
        self.status == CompanyStatus::Suspended
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub legal_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub currency: Option<String>,
    pub plan: Option<Plan>,
    pub max_allowed_drivers: Option<u32>,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub currency: Option<String>,
    pub plan: Option<Plan>,
    pub max_allowed_drivers: Option<u32>,
    pub settings: Option<serde_json::Value>,
}

impl UpdateCompany {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.legal_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.country.is_none()
            && self.timezone.is_none()
            && self.locale.is_none()
            && self.currency.is_none()
            && self.plan.is_none()
            && self.max_allowed_drivers.is_none()
            && self.settings.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_strings_round_trip() {
        for theme in [Theme::Light, Theme::Dark, Theme::Custom] {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
        assert!("neon".parse::<Theme>().is_err());
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn palette_accent_is_optional_on_the_wire() {
        let palette: ColorPalette =
            serde_json::from_str(r##"{"primary":"#112233","secondary":"#445566"}"##).unwrap();
        assert!(palette.accent.is_none());
        let json = serde_json::to_value(&palette).unwrap();
        assert!(json.get("accent").is_none());
    }

    #[test]
    fn empty_branding_update_is_detected() {
        assert!(UpdateBranding::default().is_empty());
        let update = UpdateBranding {
            theme: Some(Theme::Dark),
            ..UpdateBranding::default()
        };
        assert!(!update.is_empty());
    }
}
