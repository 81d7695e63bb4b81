//! Typed accessors over the synced document tree.
//!
//! A [`Dashboard`] bundles the file resolver, the parse cache and the loaded
//! configuration. Every accessor resolves its source, runs the parse through
//! the cache on the blocking pool and hands back a shared record. Accessors
//! never fail: a missing source is logged at `info`, anything else at `warn`,
//! and the caller gets the record's empty value.

pub mod financials;
pub mod governance;
pub mod operations;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::ParseCache;
use crate::error::IngestError;
use crate::notification;
use crate::queries::search;
use crate::resolver::FileResolver;
use crate::types::{Config, Notification, SearchItem};

/// Cloneable handle shared by every accessor.
#[derive(Clone)]
pub struct Dashboard {
    resolver: Arc<FileResolver>,
    cache: Arc<ParseCache>,
    config: Arc<Config>,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        let cache = ParseCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self::with_cache(config, cache)
    }

    /// Build with a caller-supplied cache (tests inject clocks this way).
    pub fn with_cache(config: Config, cache: ParseCache) -> Self {
        Self {
            resolver: Arc::new(FileResolver::new(config.data_dir.clone())),
            cache: Arc::new(cache),
            config: Arc::new(config),
        }
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Deadline notifications as of now.
    pub fn notifications(&self) -> Vec<Notification> {
        notification::notifications()
    }

    pub fn search_index(&self) -> Vec<SearchItem> {
        search::build_search_index(&self.config.alumni)
    }

    pub fn search(&self, query: &str) -> Vec<SearchItem> {
        let index = self.search_index();
        search::search(&index, query).into_iter().cloned().collect()
    }

    pub async fn last_sync_time(&self) -> DateTime<Utc> {
        let resolver = self.resolver.clone();
        match tokio::task::spawn_blocking(move || resolver.last_sync_time()).await {
            Ok(time) => time,
            Err(e) => {
                log::warn!("Last sync time: task failed: {}", e);
                DateTime::<Utc>::default()
            }
        }
    }
}

/// Log an ingest failure at the level its kind deserves.
pub(crate) fn log_degraded(what: &str, e: &IngestError) {
    if e.is_missing() {
        log::info!("{}: {}", what, e);
    } else {
        log::warn!("{}: {}", what, e);
    }
}

/// Run `load` on the blocking pool, substituting the empty record on any
/// failure.
pub(crate) async fn load_or_default<T, F>(what: &'static str, load: F) -> Arc<T>
where
    T: Default + Send + Sync + 'static,
    F: FnOnce() -> Result<Arc<T>, IngestError> + Send + 'static,
{
    match tokio::task::spawn_blocking(load).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            log_degraded(what, &e);
            Arc::new(T::default())
        }
        Err(e) => {
            log::warn!("{}: task failed: {}", what, e);
            Arc::new(T::default())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    pub(crate) fn dashboard_at(root: &Path) -> Dashboard {
        Dashboard::new(Config {
            data_dir: root.to_path_buf(),
            ..Config::default()
        })
    }

    pub(crate) fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[tokio::test]
    async fn test_last_sync_time_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());
        assert_eq!(dashboard.last_sync_time().await.timestamp(), 0);
    }

    #[tokio::test]
    async fn test_last_sync_time_follows_newest_doc() {
        let dir = tempfile::tempdir().unwrap();
        let bylaws = touch(
            dir.path(),
            crate::resolver::LogicalDoc::Bylaws.relative_path(),
        );
        let when = filetime::FileTime::from_unix_time(1_760_000_000, 0);
        filetime::set_file_mtime(&bylaws, when).unwrap();

        let dashboard = dashboard_at(dir.path());
        assert_eq!(dashboard.last_sync_time().await.timestamp(), 1_760_000_000);
    }

    #[test]
    fn test_search_includes_configured_alumni() {
        let dashboard = Dashboard::new(Config {
            alumni: vec![crate::types::Alumnus {
                name: "Jordan Reyes".to_string(),
                grad_year: 2021,
                teams: "Whitworth".to_string(),
            }],
            ..Config::default()
        });
        let hits = dashboard.search("jordan");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].href, "/sponsorships");
        assert!(dashboard.search("").is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_yields_default() {
        let value: Arc<Vec<u8>> = load_or_default("test", || {
            Err(IngestError::NotFound(PathBuf::from("gone.xlsx")))
        })
        .await;
        assert!(value.is_empty());
    }
}
