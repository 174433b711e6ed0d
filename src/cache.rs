//! Short-lived store of analysis results keyed by their token.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use foldhash::{HashMap, HashMapExt};

use crate::result::AnalysisResult;

/// How long a cached result stays retrievable.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct Entry {
    result: AnalysisResult,
    expires_at: DateTime<Utc>,
}

/// Thread-safe result cache with a fixed time-to-live per entry.
///
/// Expired entries are never returned and are dropped lazily.
#[derive(Debug)]
pub struct ResultCache {
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a result and return the token it can be fetched with.
    pub fn put(&self, result: AnalysisResult) -> String {
        let token = result.token.clone();
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.lock().insert(token.clone(), Entry { result, expires_at });
        tracing::debug!(%token, %expires_at, "cached analysis result");
        token
    }

    /// Fetch a result that has not expired.
    pub fn try_get(&self, token: &str) -> Option<AnalysisResult> {
        let mut entries = self.lock();
        match entries.get(token) {
            Some(entry) if entry.expires_at > Utc::now() => Some(entry.result.clone()),
            Some(_) => {
                entries.remove(token);
                None
            }
            None => None,
        }
    }

    /// Expiry time of a live entry.
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.lock()
            .get(token)
            .map(|entry| entry.expires_at)
            .filter(|&at| at > Utc::now())
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
