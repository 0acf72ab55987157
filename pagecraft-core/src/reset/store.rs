//! Where OTP entries live between requests

use super::entry::OtpEntry;
use crate::storage::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to (for testing)
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Key-value store for OTP entries, keyed by email
///
/// Writes are last-write-wins; nothing here locks across calls.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn get(&self, email: &str) -> StoreResult<Option<OtpEntry>>;

    async fn set(&self, email: &str, entry: OtpEntry) -> StoreResult<()>;

    async fn delete(&self, email: &str) -> StoreResult<()>;

    /// Current time as seen by the store
    fn now(&self) -> DateTime<Utc>;
}

/// Process-lifetime OTP store; entries are lost on restart
///
/// Each write also drops pending entries whose code has expired. Verified
/// entries stay until they are consumed or replaced.
pub struct MemoryOtpStore {
    entries: RwLock<HashMap<String, OtpEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn get(&self, email: &str) -> StoreResult<Option<OtpEntry>> {
        Ok(self.entries.read().await.get(email).cloned())
    }

    async fn set(&self, email: &str, entry: OtpEntry) -> StoreResult<()> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.is_verified() || !e.is_expired(now));
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!(swept, "dropped expired OTP entries");
        }
        entries.insert(email.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, email: &str) -> StoreResult<()> {
        self.entries.write().await.remove(email);
        Ok(())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
