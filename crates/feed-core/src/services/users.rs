use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};
use crate::validation;

use super::AuthContext;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginData {
    pub token: String,
    pub user_id: Uuid,
}

/// Registration, login and account status.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Create an account. The password is stored only as a salted hash.
    pub async fn register(&self, input: NewUser) -> Result<User, DomainError> {
        validation::validate_new_user(&input)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Duplicate("User already exists".to_string()));
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = User::new(input.email, input.name, password_hash);

        let user = self.users.insert(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::Duplicate("User already exists".to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::Unauthenticated("User not found"))?;

        if !self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::Unauthenticated("Wrong password"));
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        tracing::info!(
            user_id = %user.id,
            expires_in = self.tokens.expiration_seconds(),
            "User logged in"
        );

        Ok(LoginData {
            token,
            user_id: user.id,
        })
    }

    /// Current status of the authenticated user.
    pub async fn status(&self, auth: &AuthContext) -> Result<String, DomainError> {
        let user = self.current_user(auth).await?;
        Ok(user.status)
    }

    /// Replace the authenticated user's status verbatim and echo it back.
    pub async fn update_status(
        &self,
        auth: &AuthContext,
        status: String,
    ) -> Result<String, DomainError> {
        let mut user = self.current_user(auth).await?;
        let user_id = user.id;
        user.set_status(status);
        let user = self.users.update(user).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("user", user_id),
            other => other.into(),
        })?;
        Ok(user.status)
    }

    /// Look up a user by id, e.g. to resolve a post's creator.
    pub async fn find(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }

    async fn current_user(&self, auth: &AuthContext) -> Result<User, DomainError> {
        let user_id = auth.require()?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    // Hashing is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let passwords = Arc::clone(&self.passwords);
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, DomainError> {
        let passwords = Arc::clone(&self.passwords);
        tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}
