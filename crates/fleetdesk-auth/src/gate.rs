//! Bearer token gate.
//!
//! Turns the raw `Authorization` header of a request into an
//! [`Identity`], or a [`GateRejection`] saying why the request must not
//! reach business logic. The HTTP layer decides how to render the
//! rejection; this module never touches persisted state.

use chrono::{DateTime, Utc};
use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::admin::AdminRole;
use tracing::debug;

use crate::error::AuthError;
use crate::token::TokenIssuer;

/// The caller resolved from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: u64,
    pub email: Option<String>,
    /// Present for tenant admins only.
    pub role: Option<AdminRole>,
    /// Present for tenant admins only.
    pub company_id: Option<u64>,
}

impl Identity {
    /// Allow access only to the caller's own company.
    pub fn require_company(&self, company_id: u64) -> FleetResult<()> {
        match self.company_id {
            Some(own) if own == company_id => Ok(()),
            _ => Err(FleetError::denied(format!(
                "no access to company {company_id}"
            ))),
        }
    }

    /// Allow only the owner of `company_id`.
    pub fn require_owner(&self, company_id: u64) -> FleetResult<()> {
        self.require_company(company_id)?;
        if self.role == Some(AdminRole::Owner) {
            Ok(())
        } else {
            Err(FleetError::denied("owner role required"))
        }
    }
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    MissingHeader,
    MalformedScheme,
    EmptyToken,
    Expired,
    Invalid,
}

impl GateRejection {
    /// Client-facing reason. Signature and shape failures share one
    /// message.
    pub fn message(&self) -> &'static str {
        match self {
            GateRejection::MissingHeader => "Authorization header required",
            GateRejection::MalformedScheme => "Invalid authorization format",
            GateRejection::EmptyToken => "Token is required",
            GateRejection::Expired => "Token has expired",
            GateRejection::Invalid => "Invalid token",
        }
    }
}

impl From<GateRejection> for FleetError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::Expired => FleetError::TokenExpired,
            _ => FleetError::TokenInvalid,
        }
    }
}

const BEARER: &str = "bearer ";

/// Validates bearer headers against one token namespace.
#[derive(Debug, Clone)]
pub struct AuthGate {
    issuer: TokenIssuer,
}

impl AuthGate {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self { issuer }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn authenticate(&self, header: Option<&str>) -> Result<Identity, GateRejection> {
        self.authenticate_at(header, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, GateRejection> {
        let header = header.ok_or(GateRejection::MissingHeader)?;

        let scheme_ok = header
            .get(..BEARER.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BEARER));
        if !scheme_ok {
            return Err(GateRejection::MalformedScheme);
        }

        let token = header[BEARER.len()..].trim();
        if token.is_empty() {
            return Err(GateRejection::EmptyToken);
        }

        let claims = self.issuer.validate_at(token, now).map_err(|e| {
            debug!(namespace = self.issuer.issuer(), error = %e, "bearer token rejected");
            match e {
                AuthError::TokenExpired => GateRejection::Expired,
                _ => GateRejection::Invalid,
            }
        })?;

        let id = claims.subject_id().map_err(|_| GateRejection::Invalid)?;
        let role = claims
            .role
            .as_deref()
            .map(str::parse::<AdminRole>)
            .transpose()
            .map_err(|_| GateRejection::Invalid)?;

        Ok(Identity {
            id,
            email: claims.email,
            role,
            company_id: claims.company_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::config::TokenConfig;
    use crate::token::IdentityClaims;

    fn gate() -> AuthGate {
        AuthGate::new(TokenIssuer::new(&TokenConfig::new("gate-secret", 600, "admin")).unwrap())
    }

    fn owner_token(gate: &AuthGate) -> String {
        gate.issuer()
            .issue(
                7,
                IdentityClaims {
                    email: Some("o@acme.test".into()),
                    role: Some("owner".into()),
                    company_id: Some(3),
                },
            )
            .unwrap()
            .token
    }

    #[test]
    fn decision_sequence() {
        let gate = gate();
        assert_eq!(gate.authenticate(None), Err(GateRejection::MissingHeader));
        assert_eq!(
            gate.authenticate(Some("Basic dXNlcjpwYXNz")),
            Err(GateRejection::MalformedScheme)
        );
        assert_eq!(
            gate.authenticate(Some("Bearer")),
            Err(GateRejection::MalformedScheme)
        );
        assert_eq!(
            gate.authenticate(Some("Bearer    ")),
            Err(GateRejection::EmptyToken)
        );
        assert_eq!(
            gate.authenticate(Some("Bearer not.a.jwt")),
            Err(GateRejection::Invalid)
        );
    }

    #[test]
    fn expired_is_distinguishable() {
        let gate = gate();
        let header = format!("Bearer {}", owner_token(&gate));
        let later = Utc::now() + TimeDelta::seconds(601);
        assert_eq!(
            gate.authenticate_at(Some(&header), later),
            Err(GateRejection::Expired)
        );
        assert_ne!(GateRejection::Expired.message(), GateRejection::Invalid.message());
    }

    #[test]
    fn foreign_signature_reads_as_invalid() {
        let other = AuthGate::new(
            TokenIssuer::new(&TokenConfig::new("another-secret", 600, "admin")).unwrap(),
        );
        let header = format!("Bearer {}", owner_token(&other));
        assert_eq!(gate().authenticate(Some(&header)), Err(GateRejection::Invalid));
    }

    #[test]
    fn valid_token_resolves_identity() {
        let gate = gate();
        let header = format!("bearer {}", owner_token(&gate));
        let identity = gate.authenticate(Some(&header)).unwrap();
        assert_eq!(identity.id, 7);
        assert_eq!(identity.role, Some(AdminRole::Owner));
        assert_eq!(identity.company_id, Some(3));

        assert!(identity.require_company(3).is_ok());
        assert!(identity.require_owner(3).is_ok());
        assert!(matches!(
            identity.require_company(4),
            Err(FleetError::AuthorizationDenied { .. })
        ));
    }

    #[test]
    fn manager_is_not_owner() {
        let identity = Identity {
            id: 9,
            email: None,
            role: Some(AdminRole::Manager),
            company_id: Some(3),
        };
        assert!(identity.require_company(3).is_ok());
        assert!(identity.require_owner(3).is_err());
    }
}
