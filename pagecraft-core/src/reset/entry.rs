//! OTP entries and the pure transitions of the reset protocol
//!
//! Nothing here touches a store. Each transition takes the current entry (if
//! any) and returns what the caller should do with the store alongside the
//! outcome, which keeps the protocol testable on its own.

use crate::error::ResetError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lifetime of an issued OTP
pub const OTP_TTL_MS: i64 = 5 * 60 * 1000;

/// Shortest accepted new password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Uniformly random six-digit numeric code
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Where an email address is in the reset protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetState {
    None,
    Pending,
    Verified,
}

/// Pending or verified reset for one email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpEntry {
    pub otp: String,
    pub issued_at: DateTime<Utc>,
    pub ttl_ms: i64,
    reset_token: Option<String>,
    is_verified: bool,
}

impl OtpEntry {
    /// A fresh, unverified entry
    pub fn issue(otp: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            otp: otp.into(),
            issued_at: now,
            ttl_ms: OTP_TTL_MS,
            reset_token: None,
            is_verified: false,
        }
    }

    /// Expired once more than `ttl_ms` has passed since issue, verified or not
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.issued_at).num_milliseconds() > self.ttl_ms
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Set only once the entry is verified
    pub fn reset_token(&self) -> Option<&str> {
        self.reset_token.as_deref()
    }

    pub fn state(&self) -> ResetState {
        if self.is_verified {
            ResetState::Verified
        } else {
            ResetState::Pending
        }
    }

    fn verified(self, token: String) -> Self {
        Self {
            reset_token: Some(token),
            is_verified: true,
            ..self
        }
    }
}

/// What to do with the stored entry after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    Keep,
    Put(OtpEntry),
    Remove,
}

/// Result of a transition: the store action plus the caller-visible outcome
#[derive(Debug)]
pub struct Step<T> {
    pub action: StoreAction,
    pub outcome: Result<T, ResetError>,
}

impl<T> Step<T> {
    fn fail(action: StoreAction, err: ResetError) -> Self {
        Self {
            action,
            outcome: Err(err),
        }
    }
}

/// PENDING/VERIFIED -> VERIFIED on a matching, unexpired code
///
/// `minted_token` becomes the reset token on success. An expired entry is
/// removed; a wrong code leaves the entry in place for another attempt.
pub fn verify(
    current: Option<&OtpEntry>,
    code: &str,
    now: DateTime<Utc>,
    minted_token: String,
) -> Step<String> {
    let entry = match current {
        None => return Step::fail(StoreAction::Keep, ResetError::NotFoundOrExpired),
        Some(entry) if entry.is_expired(now) => {
            return Step::fail(StoreAction::Remove, ResetError::NotFoundOrExpired)
        }
        Some(entry) => entry,
    };

    if entry.otp != code {
        return Step::fail(StoreAction::Keep, ResetError::InvalidCode);
    }

    Step {
        action: StoreAction::Put(entry.clone().verified(minted_token.clone())),
        outcome: Ok(minted_token),
    }
}

/// Checks that a reset may proceed: the entry is VERIFIED and the token
/// matches exactly. TTL is not re-checked here.
pub fn authorize_reset(current: Option<&OtpEntry>, token: &str) -> Result<(), ResetError> {
    match current {
        Some(entry) if entry.is_verified && entry.reset_token.as_deref() == Some(token) => Ok(()),
        _ => Err(ResetError::InvalidOrExpiredToken),
    }
}

/// Length rule for new passwords
pub fn check_password(password: &str) -> Result<(), ResetError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(ResetError::PasswordTooShort(MIN_PASSWORD_LEN))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_issue_is_pending_without_token() {
        let entry = OtpEntry::issue("123456", t0());
        assert_eq!(entry.state(), ResetState::Pending);
        assert_eq!(entry.reset_token(), None);
        assert_eq!(entry.ttl_ms, 300_000);
    }

    #[test]
    fn test_expiry_boundary() {
        let entry = OtpEntry::issue("123456", t0());
        assert!(!entry.is_expired(t0() + Duration::milliseconds(OTP_TTL_MS)));
        assert!(entry.is_expired(t0() + Duration::milliseconds(OTP_TTL_MS + 1)));
    }

    #[test]
    fn test_verify_success_mints_token() {
        let entry = OtpEntry::issue("123456", t0());
        let step = verify(Some(&entry), "123456", t0(), "654321".to_string());

        assert_eq!(step.outcome.unwrap(), "654321");
        match step.action {
            StoreAction::Put(next) => {
                assert_eq!(next.state(), ResetState::Verified);
                assert_eq!(next.reset_token(), Some("654321"));
                assert_eq!(next.issued_at, t0());
            }
            other => panic!("expected Put, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_wrong_code_keeps_entry() {
        let entry = OtpEntry::issue("123456", t0());
        let step = verify(Some(&entry), "000000", t0(), "654321".to_string());
        assert_eq!(step.action, StoreAction::Keep);
        assert!(matches!(step.outcome, Err(ResetError::InvalidCode)));
    }

    #[test]
    fn test_verify_expired_removes_entry() {
        let entry = OtpEntry::issue("123456", t0());
        let later = t0() + Duration::minutes(6);
        let step = verify(Some(&entry), "123456", later, "654321".to_string());
        assert_eq!(step.action, StoreAction::Remove);
        assert!(matches!(step.outcome, Err(ResetError::NotFoundOrExpired)));
    }

    #[test]
    fn test_verify_missing() {
        let step = verify(None, "123456", t0(), "654321".to_string());
        assert_eq!(step.action, StoreAction::Keep);
        assert!(matches!(step.outcome, Err(ResetError::NotFoundOrExpired)));
    }

    #[test]
    fn test_authorize_reset() {
        let pending = OtpEntry::issue("123456", t0());
        assert!(authorize_reset(Some(&pending), "123456").is_err());
        assert!(authorize_reset(None, "x").is_err());

        let verified = pending.verified("777777".to_string());
        assert!(authorize_reset(Some(&verified), "777777").is_ok());
        assert!(matches!(
            authorize_reset(Some(&verified), "777778"),
            Err(ResetError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_password_length() {
        assert!(matches!(
            check_password("five5"),
            Err(ResetError::PasswordTooShort(6))
        ));
        assert!(check_password("sixsix").is_ok());
    }
}
