//! End-user accounts: registration, login and management.
//!
//! End users live in their own token namespace and have no tenant.

use fleetdesk_core::error::{FleetError, FleetResult};
use fleetdesk_core::models::user::{NewUser, UpdateUser, User};
use fleetdesk_core::repository::{PaginatedResult, Pagination, UserRepository};
use tracing::info;

use crate::error::AuthError;
use crate::password::{PasswordHasher, check_strength};
use crate::service::{LoginOutput, normalize_email};
use crate::token::{IdentityClaims, TokenIssuer};

/// Input for registration and admin-side user creation.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial user update. A new password is hashed before storage.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserAccountService<U: UserRepository> {
    users: U,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    min_password_length: usize,
}

impl<U: UserRepository> UserAccountService<U> {
    pub fn new(
        users: U,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
        min_password_length: usize,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            min_password_length,
        }
    }

    fn issue(&self, user: User) -> FleetResult<LoginOutput<User>> {
        let issued = self.tokens.issue(
            user.id,
            IdentityClaims {
                email: Some(user.email.clone()),
                ..Default::default()
            },
        )?;
        Ok(LoginOutput {
            access_token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            identity: user,
        })
    }

    /// Create an account without logging in.
    pub async fn create(&self, input: RegisterUser) -> FleetResult<User> {
        check_strength(&input.password, self.min_password_length)?;
        let password_hash = self.hasher.hash_blocking(input.password).await?;

        let user = self
            .users
            .create(NewUser {
                name: input.name.trim().to_string(),
                email: normalize_email(&input.email),
                password_hash,
            })
            .await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Create an account and return a token for it.
    pub async fn register(&self, input: RegisterUser) -> FleetResult<LoginOutput<User>> {
        let user = self.create(input).await?;
        self.issue(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> FleetResult<LoginOutput<User>> {
        let user = match self.users.get_by_email(&normalize_email(email)).await {
            Ok(user) => user,
            Err(FleetError::NotFound { .. }) => {
                self.hasher.verify_decoy_blocking(password.to_string()).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = user.id, "user logged in");
        self.issue(user)
    }

    pub async fn get(&self, id: u64) -> FleetResult<User> {
        self.users.get_by_id(id).await
    }

    pub async fn update(&self, id: u64, changes: UserChanges) -> FleetResult<User> {
        let password_hash = match changes.password {
            Some(password) => {
                check_strength(&password, self.min_password_length)?;
                Some(self.hasher.hash_blocking(password).await?)
            }
            None => None,
        };

        self.users
            .update(
                id,
                UpdateUser {
                    name: changes.name.map(|n| n.trim().to_string()),
                    email: changes.email.as_deref().map(normalize_email),
                    password_hash,
                },
            )
            .await
    }

    pub async fn delete(&self, id: u64) -> FleetResult<()> {
        self.users.delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    pub async fn list(&self, pagination: Pagination) -> FleetResult<PaginatedResult<User>> {
        self.users.list(pagination).await
    }
}
