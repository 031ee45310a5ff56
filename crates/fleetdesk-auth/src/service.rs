//! Tenant admin authentication: login and profile resolution.

use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::admin::CompanyAdmin;
use fleetdesk_core::repository::AdminRepository;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::gate::Identity;
use crate::password::PasswordHasher;
use crate::token::{IdentityClaims, TokenIssuer};

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput<T> {
    /// Signed bearer token.
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// The authenticated identity.
    pub identity: T,
}

/// Canonical form of an email address for lookups and uniqueness.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authenticates tenant admins.
///
/// Generic over the repository implementation so that the auth layer
/// has no dependency on the database crate.
pub struct AdminAuthService<A: AdminRepository> {
    admins: A,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl<A: AdminRepository> AdminAuthService<A> {
    pub fn new(admins: A, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            admins,
            hasher,
            tokens,
        }
    }

    /// Exchange admin credentials for a bearer token.
    ///
    /// Unknown email and wrong password fail identically with
    /// `InvalidCredentials`, after the same Argon2 work. A deactivated
    /// admin presenting the right password fails with `AccountInactive`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> FleetResult<LoginOutput<CompanyAdmin>> {
        // 1. Look up the admin. A miss still pays for one verification.
        let admin = match self.admins.get_by_email(&normalize_email(email)).await {
            Ok(admin) => admin,
            Err(FleetError::NotFound { .. }) => {
                self.hasher.verify_decoy_blocking(password.to_string()).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = self
            .hasher
            .verify_blocking(password.to_string(), admin.password_hash.clone())
            .await?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Operational state, only reported to the credential holder.
        if !admin.is_active {
            warn!(admin_id = admin.id, "login attempt on inactive admin");
            return Err(AuthError::AccountInactive.into());
        }

        // 4. Issue token.
        let issued = self.tokens.issue(
            admin.id,
            IdentityClaims {
                email: Some(admin.email.clone()),
                role: Some(admin.role.as_str().to_string()),
                company_id: Some(admin.company_id),
            },
        )?;

        info!(admin_id = admin.id, company_id = admin.company_id, "admin logged in");

        Ok(LoginOutput {
            access_token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            identity: admin,
        })
    }

    /// Resolve the caller's admin record.
    pub async fn profile(&self, identity: &Identity) -> FleetResult<CompanyAdmin> {
        let admin = self.admins.get_by_id(identity.id).await?;
        if !admin.is_active {
            return Err(AuthError::AccountInactive.into());
        }
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Owner@Acme.TEST "), "owner@acme.test");
    }
}
