//! Parse cache with TTL and mtime invalidation.
//!
//! One process-wide map from cache key to the last parsed record. An entry is
//! served only while it is younger than the TTL *and* the tracked mtime
//! signature is unchanged; otherwise the parser runs again and the entry is
//! replaced. Records are handed out as `Arc<T>` so repeated hits share one
//! allocation.
//!
//! Time and file metadata come from injected [`Clock`] / [`FileStat`]
//! providers so the staleness rules can be tested without timers or files.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::resolver::file_mtime;

/// Source of "now" for TTL checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of file modification times (milliseconds, 0 when unreadable).
pub trait FileStat: Send + Sync {
    fn mtime(&self, path: &Path) -> i64;
}

pub struct FsStat;

impl FileStat for FsStat {
    fn mtime(&self, path: &Path) -> i64 {
        file_mtime(path)
    }
}

struct CacheEntry {
    data: Arc<dyn Any + Send + Sync>,
    mtime: i64,
    computed_at: DateTime<Utc>,
}

pub struct ParseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stat: Arc<dyn FileStat>,
}

impl ParseCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_providers(ttl, Arc::new(SystemClock), Arc::new(FsStat))
    }

    pub fn with_providers(ttl: Duration, clock: Arc<dyn Clock>, stat: Arc<dyn FileStat>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
            stat,
        }
    }

    /// Parse a single file, keyed by its path.
    pub fn cached_parse<T, E, F>(&self, path: &Path, parse: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&Path) -> Result<T, E>,
    {
        let key = path.to_string_lossy();
        self.cached_parse_keyed(&key, path, parse)
    }

    /// Parse a single file under an explicit key. Used when several records
    /// are derived from one file (e.g. `<path>:monthly`); staleness still
    /// follows that file's mtime.
    pub fn cached_parse_keyed<T, E, F>(&self, key: &str, path: &Path, parse: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&Path) -> Result<T, E>,
    {
        let mtime = self.stat.mtime(path);
        self.get_or_compute(key, mtime, || parse(path))
    }

    /// Parse a set of files as one record. The mtime signature is the
    /// maximum mtime across `paths`.
    pub fn cached_multi_parse<T, E, F>(&self, paths: &[PathBuf], parse: F, cache_key: &str) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&[PathBuf]) -> Result<T, E>,
    {
        let mtime = paths.iter().map(|p| self.stat.mtime(p)).max().unwrap_or(0);
        self.get_or_compute(cache_key, mtime, || parse(paths))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_or_compute<T, E>(&self, key: &str, mtime: i64, compute: impl FnOnce() -> Result<T, E>) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
    {
        if let Some(hit) = self.lookup::<T>(key, mtime) {
            log::debug!("Cache hit: {}", key);
            return Ok(hit);
        }

        // Lock released while parsing; concurrent misses both parse and the
        // later store wins.
        log::debug!("Cache miss, parsing: {}", key);
        let value = Arc::new(compute()?);
        self.entries.lock().insert(
            key.to_string(),
            CacheEntry {
                data: value.clone(),
                mtime,
                computed_at: self.clock.now(),
            },
        );
        Ok(value)
    }

    fn lookup<T>(&self, key: &str, mtime: i64) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;

        let age_ms = (self.clock.now() - entry.computed_at).num_milliseconds();
        if age_ms > self.ttl.as_millis() as i64 || entry.mtime != mtime {
            return None;
        }
        entry.data.clone().downcast::<T>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(
                DateTime::parse_from_rfc3339("2026-01-01T12:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            )))
        }

        fn advance(&self, secs: i64) {
            let mut now = self.0.lock();
            *now += chrono::Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }

    #[derive(Default)]
    struct FakeStat(Mutex<HashMap<PathBuf, i64>>);

    impl FakeStat {
        fn set(&self, path: &str, mtime: i64) {
            self.0.lock().insert(PathBuf::from(path), mtime);
        }
    }

    impl FileStat for FakeStat {
        fn mtime(&self, path: &Path) -> i64 {
            self.0.lock().get(path).copied().unwrap_or(0)
        }
    }

    fn setup() -> (ParseCache, Arc<ManualClock>, Arc<FakeStat>) {
        let clock = ManualClock::new();
        let stat = Arc::new(FakeStat::default());
        let cache = ParseCache::with_providers(Duration::from_secs(300), clock.clone(), stat.clone());
        (cache, clock, stat)
    }

    fn counting_parse(calls: &AtomicUsize) -> impl FnOnce(&Path) -> Result<String, ()> + '_ {
        move |p: &Path| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(p.display().to_string())
        }
    }

    #[test]
    fn test_hit_within_ttl_returns_same_arc() {
        let (cache, clock, stat) = setup();
        stat.set("/data/budget.xlsx", 1000);
        let calls = AtomicUsize::new(0);
        let path = Path::new("/data/budget.xlsx");

        let first = cache.cached_parse(path, counting_parse(&calls)).unwrap();
        clock.advance(299);
        let second = cache.cached_parse(path, counting_parse(&calls)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_mtime_change_reparses_within_ttl() {
        let (cache, clock, stat) = setup();
        stat.set("/data/budget.xlsx", 1000);
        let calls = AtomicUsize::new(0);
        let path = Path::new("/data/budget.xlsx");

        let first = cache.cached_parse(path, counting_parse(&calls)).unwrap();
        clock.advance(5);
        stat.set("/data/budget.xlsx", 2000);
        let second = cache.cached_parse(path, counting_parse(&calls)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_ttl_expiry_reparses_untouched_file() {
        let (cache, clock, stat) = setup();
        stat.set("/data/budget.xlsx", 1000);
        let calls = AtomicUsize::new(0);
        let path = Path::new("/data/budget.xlsx");

        cache.cached_parse(path, counting_parse(&calls)).unwrap();
        clock.advance(301);
        cache.cached_parse(path, counting_parse(&calls)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_multi_parse_tracks_max_mtime() {
        let (cache, _clock, stat) = setup();
        stat.set("/a.xlsx", 100);
        stat.set("/b.xlsx", 500);
        let paths = vec![PathBuf::from("/a.xlsx"), PathBuf::from("/b.xlsx")];
        let calls = AtomicUsize::new(0);
        let parse = |ps: &[PathBuf]| -> Result<usize, ()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ps.len())
        };

        assert_eq!(*cache.cached_multi_parse(&paths, parse, "historical").unwrap(), 2);
        cache.cached_multi_parse(&paths, parse, "historical").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Bumping an older file below the max keeps the signature
        stat.set("/a.xlsx", 400);
        cache.cached_multi_parse(&paths, parse, "historical").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        stat.set("/a.xlsx", 900);
        cache.cached_multi_parse(&paths, parse, "historical").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let (cache, _clock, stat) = setup();
        stat.set("/bad.xlsx", 1);
        let path = Path::new("/bad.xlsx");

        let err: Result<Arc<String>, &str> = cache.cached_parse(path, |_| Err("corrupt"));
        assert!(err.is_err());
        assert!(cache.is_empty());

        let ok: Result<Arc<String>, &str> = cache.cached_parse(path, |_| Ok("fixed".to_string()));
        assert_eq!(ok.unwrap().as_str(), "fixed");
    }

    #[test]
    fn test_keyed_entries_are_independent() {
        let (cache, _clock, stat) = setup();
        stat.set("/budget.xlsx", 1);
        let path = Path::new("/budget.xlsx");

        let a: Arc<u32> = cache.cached_parse_keyed::<_, (), _>("budget", path, |_| Ok(1)).unwrap();
        let b: Arc<u32> = cache.cached_parse_keyed::<_, (), _>("budget:monthly", path, |_| Ok(2)).unwrap();
        assert_eq!((*a, *b), (1, 2));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_real_file_mtime_bump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Budget.xlsx");
        std::fs::write(&path, b"v1").unwrap();

        let cache = ParseCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);
        cache.cached_parse(&path, counting_parse(&calls)).unwrap();
        cache.cached_parse(&path, counting_parse(&calls)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let later = filetime::FileTime::from_unix_time(4_000_000_000, 0);
        filetime::set_file_mtime(&path, later).unwrap();
        cache.cached_parse(&path, counting_parse(&calls)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
