//! Explicit snapshot cache with a staleness TTL
//!
//! The caller owns the cache. A snapshot is replaced wholesale on reload and
//! never mutated in place; readers hold an `Arc` to the version they got.

use crate::error::StaffingResult;
use crate::snapshot::StaffingSnapshot;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default time before a loaded snapshot is considered stale (15 minutes)
pub const DEFAULT_TTL_SECS: i64 = 900;

/// A loaded snapshot and the time it was loaded
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Arc<StaffingSnapshot>,
    pub loaded_at: DateTime<Utc>,
}

impl CachedSnapshot {
    pub fn new(snapshot: StaffingSnapshot, loaded_at: DateTime<Utc>) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            loaded_at,
        }
    }

    /// Stale once strictly more than `ttl` has elapsed since loading
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.loaded_at) > ttl
    }
}

#[derive(Debug)]
pub struct SnapshotCache {
    entry: Option<CachedSnapshot>,
    ttl: Duration,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn current(&self) -> Option<&CachedSnapshot> {
        self.entry.as_ref()
    }

    /// An empty cache is always stale
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.entry
            .as_ref()
            .map_or(true, |entry| entry.is_stale(now, self.ttl))
    }

    /// Drop the cached snapshot so the next access reloads
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("snapshot cache invalidated");
        }
    }

    /// Return the cached snapshot, reloading through `load` when stale.
    ///
    /// A failed load empties the cache and returns the error; the previous
    /// snapshot is not served in its place.
    pub fn get_or_load<F>(&mut self, now: DateTime<Utc>, load: F) -> StaffingResult<CachedSnapshot>
    where
        F: FnOnce() -> StaffingResult<StaffingSnapshot>,
    {
        if !self.is_stale(now) {
            if let Some(entry) = &self.entry {
                return Ok(entry.clone());
            }
        }

        self.entry = None;
        match load() {
            Ok(snapshot) => {
                info!(
                    summary_rows = snapshot.summary.len(),
                    detailed_rows = snapshot.detailed.len(),
                    "snapshot loaded"
                );
                let entry = CachedSnapshot::new(snapshot, now);
                self.entry = Some(entry.clone());
                Ok(entry)
            }
            Err(e) => {
                warn!(error = %e, "snapshot load failed");
                Err(e)
            }
        }
    }

    /// Invalidate, then load immediately
    pub fn refresh<F>(&mut self, now: DateTime<Utc>, load: F) -> StaffingResult<CachedSnapshot>
    where
        F: FnOnce() -> StaffingResult<StaffingSnapshot>,
    {
        self.invalidate();
        self.get_or_load(now, load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StaffingError;
    use chrono::TimeZone;
    use std::cell::Cell;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap()
    }

    fn ok_loader(calls: &Cell<u32>) -> impl FnOnce() -> StaffingResult<StaffingSnapshot> + '_ {
        move || {
            calls.set(calls.get() + 1);
            Ok(StaffingSnapshot::from_rows("test.xlsx", vec![], vec![]))
        }
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = SnapshotCache::default();
        assert!(cache.is_stale(t0()));
        assert_eq!(cache.ttl(), Duration::seconds(900));
    }

    #[test]
    fn test_staleness_boundary() {
        let entry = CachedSnapshot::new(StaffingSnapshot::from_rows("x", vec![], vec![]), t0());
        let ttl = Duration::seconds(900);
        assert!(!entry.is_stale(t0() + Duration::seconds(900), ttl));
        assert!(entry.is_stale(t0() + Duration::seconds(901), ttl));
    }

    #[test]
    fn test_get_or_load_reuses_fresh_snapshot() {
        let calls = Cell::new(0);
        let mut cache = SnapshotCache::default();

        let first = cache.get_or_load(t0(), ok_loader(&calls)).unwrap();
        let second = cache
            .get_or_load(t0() + Duration::minutes(10), ok_loader(&calls))
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first.snapshot, &second.snapshot));
        assert_eq!(second.loaded_at, t0());
    }

    #[test]
    fn test_get_or_load_reloads_when_stale() {
        let calls = Cell::new(0);
        let mut cache = SnapshotCache::default();

        cache.get_or_load(t0(), ok_loader(&calls)).unwrap();
        let later = t0() + Duration::minutes(16);
        let entry = cache.get_or_load(later, ok_loader(&calls)).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(entry.loaded_at, later);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let calls = Cell::new(0);
        let mut cache = SnapshotCache::default();

        cache.get_or_load(t0(), ok_loader(&calls)).unwrap();
        cache.invalidate();
        assert!(cache.current().is_none());
        cache.get_or_load(t0(), ok_loader(&calls)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_load_clears_cache() {
        let calls = Cell::new(0);
        let mut cache = SnapshotCache::default();
        cache.get_or_load(t0(), ok_loader(&calls)).unwrap();

        let result = cache.refresh(t0(), || {
            Err(StaffingError::Workbook("file is locked".to_string()))
        });

        assert!(result.is_err());
        assert!(cache.current().is_none());
        assert!(cache.is_stale(t0()));
    }
}
