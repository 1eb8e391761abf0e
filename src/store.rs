//! Process-wide catalog snapshot.
//!
//! Readers clone an `Arc` to the current snapshot and never observe a
//! partially applied refresh. Refreshes are serialised, fetch outside the
//! snapshot lock, and publish by swapping the whole `Arc`.

use crate::loader::{Catalog, FetchError, MetaFetcher};
use parking_lot::{Mutex, RwLock};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Holder of the current catalog snapshot.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
    refresh_lock: Mutex<()>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Catalog::load_default())
    }
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The current snapshot. Cheap; holds the read lock only to clone the `Arc`.
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read())
    }

    /// Replace the snapshot wholesale.
    pub fn publish(&self, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        *self.current.write() = Arc::clone(&catalog);
        tracing::info!(
            classes = catalog.classes.len(),
            props = catalog.props.len(),
            "published catalog snapshot"
        );
        catalog
    }

    /// Fetch, parse and publish a new snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn refresh(
        &self,
        fetcher: &dyn MetaFetcher,
        url: &str,
        origin_override: Option<&str>,
    ) -> Result<Arc<Catalog>, FetchError> {
        let _writer = self.refresh_lock.lock();
        tracing::info!("refreshing catalog from {}", url);

        match Catalog::fetch(fetcher, url, origin_override) {
            Ok(catalog) => Ok(self.publish(catalog)),
            Err(e) => {
                tracing::warn!("catalog refresh failed: {}", e);
                Err(e)
            }
        }
    }

    /// Run [`refresh`](Self::refresh) on a background thread and report the
    /// outcome to `on_done`.
    ///
    /// The callback runs on the background thread; hosts with a UI thread
    /// marshal it themselves.
    pub fn spawn_refresh<F>(
        self: &Arc<Self>,
        fetcher: Arc<dyn MetaFetcher>,
        url: String,
        origin_override: Option<String>,
        on_done: F,
    ) -> io::Result<JoinHandle<bool>>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let store = Arc::clone(self);
        thread::Builder::new()
            .name("hywind-refresh".to_string())
            .spawn(move || {
                let ok = store
                    .refresh(fetcher.as_ref(), &url, origin_override.as_deref())
                    .is_ok();
                on_done(ok);
                ok
            })
    }
}
