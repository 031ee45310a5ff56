//! Authentication configuration.

/// Settings for one token namespace.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret shared by issuer and validator.
    pub secret: String,
    /// Token lifetime in seconds.
    pub lifetime_secs: u64,
    /// `iss` claim written on issue and required on validation.
    pub issuer: String,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
            issuer: issuer.into(),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("lifetime_secs", &self.lifetime_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Longest token lifetime accepted: ten years.
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Issuer string of the tenant-admin namespace.
pub const ADMIN_ISSUER: &str = "fleetdesk-admin";
/// Issuer string of the end-user namespace.
pub const USER_ISSUER: &str = "fleetdesk-user";

/// Configuration for the authentication services.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin_tokens: TokenConfig,
    pub user_tokens: TokenConfig,
    /// Optional pepper prepended to passwords before Argon2id.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl AuthConfig {
    /// Build a config with the default issuers and password policy.
    pub fn new(
        admin_secret: String,
        admin_lifetime_secs: u64,
        user_secret: String,
        user_lifetime_secs: u64,
    ) -> Self {
        Self {
            admin_tokens: TokenConfig::new(admin_secret, admin_lifetime_secs, ADMIN_ISSUER),
            user_tokens: TokenConfig::new(user_secret, user_lifetime_secs, USER_ISSUER),
            pepper: None,
            min_password_length: 8,
        }
    }
}
