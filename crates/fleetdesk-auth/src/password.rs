//! Password hashing and verification using Argon2id.

use std::sync::{Arc, OnceLock};

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};

use crate::error::AuthError;

/// Argon2id cost: 19 MiB memory, 2 passes, 1 lane.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

/// Hash checked when the account does not exist, so that a miss costs
/// the same Argon2 work as a wrong password.
static DECOY_HASH: OnceLock<String> = OnceLock::new();

fn decoy_hash() -> Result<&'static str, AuthError> {
    if let Some(hash) = DECOY_HASH.get() {
        return Ok(hash);
    }
    let hash = PasswordHasher::default().hash("fleetdesk-decoy-credential")?;
    Ok(DECOY_HASH.get_or_init(|| hash))
}

/// Reject passwords shorter than `min_length` characters.
pub fn check_strength(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword { min: min_length });
    }
    Ok(())
}

/// Salted, adaptive password hasher with a fixed work factor.
///
/// The salt is generated per call and embedded in the PHC string, so
/// hashing the same password twice gives two different outputs.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    pepper: Option<Arc<str>>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("peppered", &self.pepper.is_some())
            .finish()
    }
}

impl PasswordHasher {
    pub fn new(pepper: Option<String>) -> Self {
        Self {
            pepper: pepper.map(Arc::from),
        }
    }

    fn argon2() -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, None)
            .map_err(|e| AuthError::Crypto(format!("argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn peppered(&self, password: &str) -> String {
        match &self.pepper {
            Some(p) => format!("{p}{password}"),
            None => password.to_string(),
        }
    }

    /// Hash a plaintext password into a PHC-format string.
    ///
    /// Fails with [`AuthError::Encoding`] only when the input contains a
    /// NUL byte.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.contains('\0') {
            return Err(AuthError::Encoding("password contains a NUL byte".into()));
        }
        let input = self.peppered(password);
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
        Self::argon2()?
            .hash_password(input.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch and [`AuthError::CorruptHash`]
    /// only when the stored hash cannot be parsed. The comparison is the
    /// algorithm's own constant-time check.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::CorruptHash(e.to_string()))?;
        let input = self.peppered(password);
        match Argon2::default().verify_password(input.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::CorruptHash(e.to_string())),
        }
    }

    /// Run a full verification against the decoy hash and discard the
    /// outcome.
    pub fn verify_decoy(&self, password: &str) -> Result<(), AuthError> {
        self.verify(password, decoy_hash()?).map(|_| ())
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Crypto(format!("hashing task failed: {e}")))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Crypto(format!("verification task failed: {e}")))?
    }

    /// [`verify_decoy`](Self::verify_decoy) on the blocking pool.
    pub async fn verify_decoy_blocking(&self, password: String) -> Result<(), AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_decoy(&password))
            .await
            .map_err(|e| AuthError::Crypto(format!("verification task failed: {e}")))?
    }
}
