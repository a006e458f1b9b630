use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::data::schema::SheetSchema;
use crate::data::snapshot::Snapshot;
use crate::data::source::RowSource;
use crate::error::BotError;

/// Time source for cache expiry. Production uses the system clock; tests
/// drive a fake one instead of sleeping through TTL windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// (spreadsheet id, worksheet title)
pub type CacheKey = (String, String);

struct CacheEntry {
    snapshot: Arc<Snapshot>,
    inserted_at: Instant,
}

/// Time-bounded cache of worksheet snapshots, shared by every
/// conversation handler.
///
/// An entry older than the TTL is never served; an expired or absent
/// entry always triggers a fetch before the read proceeds, and the fetch
/// result replaces the entry wholesale. The entry map's lock is held
/// across the fetch, so concurrent misses for the same key collapse into
/// a single source call. A failed fetch stores nothing.
pub struct SnapshotCache {
    source: Arc<dyn RowSource>,
    schema: SheetSchema,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn RowSource>, schema: SheetSchema, ttl: Duration) -> Self {
        Self::with_clock(source, schema, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn RowSource>,
        schema: SheetSchema,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            schema,
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Serve the cached snapshot for `(sheet_id, worksheet)`, fetching a
    /// fresh one when absent or expired.
    pub async fn get(&self, sheet_id: &str, worksheet: &str) -> Result<Arc<Snapshot>, BotError> {
        let key: CacheKey = (sheet_id.to_string(), worksheet.to_string());
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(&key) {
            let age = self.clock.now().saturating_duration_since(entry.inserted_at);
            if age < self.ttl {
                debug!(target: "cache", worksheet, age_secs = age.as_secs(), "snapshot served from cache");
                return Ok(Arc::clone(&entry.snapshot));
            }
            debug!(target: "cache", worksheet, age_secs = age.as_secs(), "cached snapshot expired");
        }

        let snapshot = self.source.fetch(sheet_id, worksheet).await?;
        self.schema.validate(&snapshot)?;

        let snapshot = Arc::new(snapshot);
        info!(target: "cache", worksheet, rows = snapshot.record_count(), "snapshot refreshed");
        entries.insert(
            key,
            CacheEntry {
                snapshot: Arc::clone(&snapshot),
                inserted_at: self.clock.now(),
            },
        );
        Ok(snapshot)
    }

    /// Drop every cached entry, forcing the next read to refetch.
    pub async fn invalidate(&self) {
        self.entries.lock().await.clear();
    }
}
