//! HS256 bearer token issuance and validation.
//!
//! One [`TokenIssuer`] type serves every token namespace. Each
//! namespace gets its own instance with its own secret, lifetime and
//! `iss` value, so a token from one namespace never validates in
//! another.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{MAX_TOKEN_LIFETIME_SECS, TokenConfig};
use crate::error::AuthError;

/// JWT claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: numeric identity id as a string.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,
    /// Issuer (token namespace).
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Not-before (Unix timestamp).
    pub nbf: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl TokenClaims {
    pub fn subject_id(&self) -> Result<u64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::TokenInvalid("subject is not a numeric id".into()))
    }
}

/// Optional identity data carried next to the subject.
#[derive(Debug, Clone, Default)]
pub struct IdentityClaims {
    pub email: Option<String>,
    pub role: Option<String>,
    pub company_id: Option<u64>,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Issues and validates signed, time-bounded bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    lifetime_secs: u64,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer. Fails on an empty secret or a lifetime outside
    /// `1..=MAX_TOKEN_LIFETIME_SECS`.
    pub fn new(config: &TokenConfig) -> Result<Self, AuthError> {
        if config.secret.is_empty() {
            return Err(AuthError::Crypto("token signing secret is empty".into()));
        }
        if config.lifetime_secs == 0 {
            return Err(AuthError::Crypto("token lifetime must be positive".into()));
        }
        if config.lifetime_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(AuthError::Crypto(format!(
                "token lifetime exceeds {MAX_TOKEN_LIFETIME_SECS} seconds"
            )));
        }

        // Expiry and not-before are checked against an explicit clock in
        // `validate_at`, so the library checks are turned off here.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "nbf", "iss"]);

        Ok(Self {
            issuer: config.issuer.clone(),
            lifetime_secs: config.lifetime_secs,
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Sign a token for `subject` valid from now.
    pub fn issue(&self, subject: u64, extra: IdentityClaims) -> Result<IssuedToken, AuthError> {
        self.issue_at(subject, extra, Utc::now())
    }

    /// Sign a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: u64,
        extra: IdentityClaims,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = i64::try_from(self.lifetime_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::Crypto("token expiry out of range".into()))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            email: extra.email,
            role: extra.role,
            company_id: extra.company_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: self.lifetime_secs,
        })
    }

    /// Validate against the current wall clock.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate as if the current time were `now`.
    ///
    /// A token is expired from its `exp` second onwards. Signature,
    /// algorithm, issuer and shape failures are all `TokenInvalid`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })?;

        let now = now.timestamp();
        if now >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        if now < claims.nbf {
            return Err(AuthError::TokenInvalid("token is not yet valid".into()));
        }
        Ok(claims)
    }
}
