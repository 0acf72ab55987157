//! User accounts: signup and login

pub mod password;

use crate::error::AccountError;
use crate::storage::UserStore;
use crate::types::{User, UserProfile};
use std::sync::Arc;

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct Signup {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Signup and login against a [`UserStore`]
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Create an account. Duplicate usernames or emails are a `Conflict`.
    pub async fn signup(&self, signup: Signup) -> Result<UserProfile, AccountError> {
        let missing: Vec<&str> = [
            ("fullName", &signup.full_name),
            ("username", &signup.username),
            ("email", &signup.email),
            ("password", &signup.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(AccountError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        // Checked up front so a duplicate never pays for a hash
        if self.users.find_by_username(&signup.username).await?.is_some()
            || self.users.find_by_email(&signup.email).await?.is_some()
        {
            return Err(AccountError::Conflict);
        }

        let hash = password::hash_password_blocking(signup.password)
            .await
            .map_err(AccountError::Hash)?;
        let user = self
            .users
            .insert(User::new(signup.full_name, signup.username, signup.email, hash))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "account created");
        Ok(UserProfile::from(&user))
    }

    /// Authenticate by username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, AccountError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let valid =
            password::verify_password_blocking(password.to_string(), user.password_hash.clone())
                .await
                .map_err(AccountError::Hash)?;
        if !valid {
            tracing::debug!(username, "login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(UserProfile::from(&user))
    }
}
