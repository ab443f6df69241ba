//! Shared holder of the currently displayed catalog
//!
//! Loads are numbered when they start. A finished load is installed only if
//! nothing newer has been installed in the meantime, so a slow, stale reload
//! can never overwrite the result of a later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{Catalog, CatalogLoader};
use crate::{Error, Result};

/// Generation number handed out when a load starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// What the views currently have to work with
#[derive(Debug, Clone)]
pub enum CatalogSnapshot {
    /// No load has finished yet
    Loading,
    Ready(Arc<Catalog>),
    /// The most recent installed load failed; no rows are shown
    Failed(Arc<Error>),
}

/// Result of handing a finished load to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// A newer load was installed first; this result was dropped
    Superseded,
}

struct Installed {
    generation: u64,
    snapshot: CatalogSnapshot,
}

/// Thread-safe catalog slot with generation guarding
pub struct CatalogStore {
    next_generation: AtomicU64,
    installed: RwLock<Installed>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            next_generation: AtomicU64::new(1),
            installed: RwLock::new(Installed {
                generation: 0,
                snapshot: CatalogSnapshot::Loading,
            }),
        }
    }

    /// Reserve a generation for a load that is about to start
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.next_generation.fetch_add(1, Ordering::SeqCst))
    }

    /// Install a finished load unless a newer one already landed
    pub async fn install(&self, ticket: LoadTicket, result: Result<Catalog>) -> InstallOutcome {
        let mut installed = self.installed.write().await;
        if ticket.0 <= installed.generation {
            debug!(
                generation = ticket.0,
                installed = installed.generation,
                "Dropping superseded catalog load"
            );
            return InstallOutcome::Superseded;
        }

        installed.generation = ticket.0;
        installed.snapshot = match result {
            Ok(catalog) => {
                info!(
                    generation = ticket.0,
                    rows = catalog.display_rows().len(),
                    "Catalog installed"
                );
                CatalogSnapshot::Ready(Arc::new(catalog))
            }
            Err(e) => {
                warn!(generation = ticket.0, "Catalog load failed: {}", e);
                CatalogSnapshot::Failed(Arc::new(e))
            }
        };
        InstallOutcome::Installed
    }

    /// Run a full load and install it
    pub async fn reload(&self, loader: &CatalogLoader) -> InstallOutcome {
        let ticket = self.begin();
        let result = loader.load().await;
        self.install(ticket, result).await
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.installed.read().await.snapshot.clone()
    }

    /// Generation of the installed load, 0 before the first one
    pub async fn generation(&self) -> u64 {
        self.installed.read().await.generation
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RightsAdminIndex, SongPlay};

    fn catalog_with_plays(count: usize) -> Catalog {
        let plays = (0..count)
            .map(|i| SongPlay {
                song_code: format!("S{}", i),
                performer_codes: String::new(),
                youtube_key: None,
            })
            .collect();
        Catalog::from_parts(plays, Vec::new(), Vec::new(), Vec::new(), &RightsAdminIndex::default())
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let store = CatalogStore::new();
        assert!(matches!(store.snapshot().await, CatalogSnapshot::Loading));
        assert_eq!(store.generation().await, 0);
    }

    #[tokio::test]
    async fn test_newer_load_wins_when_older_finishes_last() {
        let store = CatalogStore::new();
        let first = store.begin();
        let second = store.begin();
        assert!(second > first);

        assert_eq!(
            store.install(second, Ok(catalog_with_plays(2))).await,
            InstallOutcome::Installed
        );
        assert_eq!(
            store.install(first, Ok(catalog_with_plays(5))).await,
            InstallOutcome::Superseded
        );

        match store.snapshot().await {
            CatalogSnapshot::Ready(catalog) => assert_eq!(catalog.display_rows().len(), 2),
            other => panic!("unexpected snapshot: {:?}", other),
        }
        assert_eq!(store.generation().await, second.generation());
    }

    #[tokio::test]
    async fn test_failed_load_replaces_catalog() {
        let store = CatalogStore::new();
        let ticket = store.begin();
        store.install(ticket, Ok(catalog_with_plays(1))).await;

        let ticket = store.begin();
        let outcome = store
            .install(
                ticket,
                Err(Error::EmptyCriticalData {
                    file: "song-plays.yml".to_string(),
                }),
            )
            .await;

        assert_eq!(outcome, InstallOutcome::Installed);
        assert!(matches!(store.snapshot().await, CatalogSnapshot::Failed(_)));
    }
}
