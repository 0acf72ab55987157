//! OTP-based password reset
//!
//! States per email: `NONE` (no entry) -> `PENDING` (code issued) ->
//! `VERIFIED` (code confirmed, reset token issued) -> `NONE` (password reset,
//! or the entry expired and was evicted on a verify attempt).

pub mod entry;
mod flow;
pub mod store;

pub use entry::{OtpEntry, ResetState, MIN_PASSWORD_LEN, OTP_TTL_MS};
pub use flow::PasswordResetFlow;
pub use store::{Clock, ManualClock, MemoryOtpStore, OtpStore, SystemClock};
