//! Populated reports kept until the next reload

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Report, ReportKind};
use crate::config::DataFiles;
use crate::source::DataSource;

/// Report cache keyed by kind
///
/// A report is populated on first request; every later request for the same
/// kind, in any format, re-renders the cached records. Each [`clear`] starts a
/// new generation, and a populate that began in an older generation is
/// returned to its caller but never cached.
///
/// [`clear`]: ReportCache::clear
#[derive(Default)]
pub struct ReportCache {
    slots: RwLock<Slots>,
}

#[derive(Default)]
struct Slots {
    generation: u64,
    reports: HashMap<ReportKind, Arc<Report>>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_populate(
        &self,
        kind: ReportKind,
        source: &dyn DataSource,
        files: &DataFiles,
    ) -> Arc<Report> {
        let started = {
            let slots = self.slots.read().await;
            if let Some(report) = slots.reports.get(&kind) {
                debug!(report = %kind, "Report served from cache");
                return Arc::clone(report);
            }
            slots.generation
        };

        let report = Arc::new(Report::populate(kind, source, files).await);

        let mut slots = self.slots.write().await;
        if slots.generation != started {
            debug!(
                report = %kind,
                started,
                current = slots.generation,
                "Report populated before a reload, not caching"
            );
            return report;
        }
        // Another request may have populated it meanwhile; keep the first one
        Arc::clone(slots.reports.entry(kind).or_insert(report))
    }

    pub async fn cached(&self, kind: ReportKind) -> Option<Arc<Report>> {
        self.slots.read().await.reports.get(&kind).cloned()
    }

    /// Forget every populated report and start a new generation
    pub async fn clear(&self) {
        let mut slots = self.slots.write().await;
        debug!(cleared = slots.reports.len(), "Report cache cleared");
        slots.reports.clear();
        slots.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportFormat;
    use crate::source::StaticSource;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct CountingSource {
        inner: StaticSource,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for CountingSource {
        async fn fetch_text(&self, file_name: &str) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_text(file_name).await
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    fn source() -> CountingSource {
        CountingSource {
            inner: StaticSource::new().with_file("writers.yml", "- code: W1\n  name: Sid Tepper\n- code: W2\n  name: Roy C. Bennett\n"),
            fetches: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_format_switch_does_not_refetch() {
        let cache = ReportCache::new();
        let source = source();
        let files = DataFiles::default();

        for format in ReportFormat::ALL {
            let report = cache.get_or_populate(ReportKind::Writers, &source, &files).await;
            assert!(!report.render(format).is_empty());
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_forces_repopulate() {
        let cache = ReportCache::new();
        let source = source();
        let files = DataFiles::default();

        cache.get_or_populate(ReportKind::Writers, &source, &files).await;
        assert!(cache.cached(ReportKind::Writers).await.is_some());

        cache.clear().await;
        assert!(cache.cached(ReportKind::Writers).await.is_none());

        cache.get_or_populate(ReportKind::Writers, &source, &files).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    /// Reads the writers file, then holds the first fetch until released
    struct GatedSource {
        writers: Mutex<String>,
        gated: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl DataSource for GatedSource {
        async fn fetch_text(&self, _file_name: &str) -> Result<String> {
            let text = self.writers.lock().unwrap().clone();
            if self.gated.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(text)
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    #[tokio::test]
    async fn test_populate_overtaken_by_clear_is_not_cached() {
        let cache = Arc::new(ReportCache::new());
        let source = Arc::new(GatedSource {
            writers: Mutex::new("- code: W1\n  name: OLD\n".to_string()),
            gated: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        });

        let pending = {
            let cache = Arc::clone(&cache);
            let source = Arc::clone(&source);
            tokio::spawn(async move {
                cache
                    .get_or_populate(ReportKind::Writers, source.as_ref(), &DataFiles::default())
                    .await
            })
        };

        source.entered.notified().await;
        *source.writers.lock().unwrap() = "- code: W1\n  name: NEW\n".to_string();
        cache.clear().await;
        source.release.notify_one();

        // The caller still gets what it asked for
        let stale = pending.await.unwrap();
        assert!(stale.render(ReportFormat::Text).contains("OLD"));
        assert!(cache.cached(ReportKind::Writers).await.is_none());

        let fresh = cache
            .get_or_populate(ReportKind::Writers, source.as_ref(), &DataFiles::default())
            .await;
        assert!(fresh.render(ReportFormat::Text).contains("NEW"));
    }
}
