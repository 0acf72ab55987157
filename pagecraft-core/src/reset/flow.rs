//! The request -> verify -> reset protocol wired to its collaborators

use super::entry::{self, generate_code, OtpEntry, ResetState, StoreAction};
use super::store::OtpStore;
use crate::auth::password;
use crate::error::ResetError;
use crate::mail::{Mailer, OtpMessage};
use crate::storage::UserStore;
use std::sync::Arc;

/// Drives password resets for users identified by email
#[derive(Clone)]
pub struct PasswordResetFlow {
    otps: Arc<dyn OtpStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
}

impl PasswordResetFlow {
    pub fn new(
        otps: Arc<dyn OtpStore>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            otps,
            users,
            mailer,
        }
    }

    /// Current protocol state for an email
    pub async fn state(&self, email: &str) -> Result<ResetState, ResetError> {
        Ok(self
            .otps
            .get(email)
            .await?
            .map_or(ResetState::None, |e| e.state()))
    }

    /// Issue a fresh OTP and email it. Overwrites any earlier entry.
    pub async fn request_reset(&self, email: &str) -> Result<(), ResetError> {
        if self.users.find_by_email(email).await?.is_none() {
            return Err(ResetError::NotFound);
        }

        let code = generate_code();
        self.otps
            .set(email, OtpEntry::issue(code.clone(), self.otps.now()))
            .await?;

        self.mailer
            .send_otp(&OtpMessage {
                to: email.to_string(),
                code,
            })
            .await
            .map_err(|e| {
                tracing::error!(email, error = %e, "failed to deliver OTP");
                ResetError::DeliveryFailed(e)
            })?;

        tracing::info!(email, "password reset OTP issued");
        Ok(())
    }

    /// Check a code and, on success, return the reset token
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<String, ResetError> {
        let current = self.otps.get(email).await?;
        let step = entry::verify(current.as_ref(), code, self.otps.now(), generate_code());

        match step.action {
            StoreAction::Keep => {}
            StoreAction::Put(next) => self.otps.set(email, next).await?,
            StoreAction::Remove => {
                tracing::debug!(email, "evicting expired OTP");
                self.otps.delete(email).await?
            }
        }

        if step.outcome.is_ok() {
            tracing::info!(email, "OTP verified");
        }
        step.outcome
    }

    /// Set a new password using a token from [`verify_otp`](Self::verify_otp)
    pub async fn reset_password(
        &self,
        email: &str,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), ResetError> {
        if email.is_empty() || reset_token.is_empty() || new_password.is_empty() {
            return Err(ResetError::Validation(
                "email, resetToken and newPassword are required".to_string(),
            ));
        }

        let current = self.otps.get(email).await?;
        if let Err(e) = entry::authorize_reset(current.as_ref(), reset_token) {
            tracing::warn!(email, "invalid reset token");
            return Err(e);
        }

        if self.users.find_by_email(email).await?.is_none() {
            return Err(ResetError::NotFound);
        }
        entry::check_password(new_password)?;

        let hash = password::hash_password_blocking(new_password.to_string())
            .await
            .map_err(ResetError::Hash)?;
        self.users.update_password(email, hash).await?;
        self.otps.delete(email).await?;

        tracing::info!(email, "password reset");
        Ok(())
    }
}
