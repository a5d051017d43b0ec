//! Shelf store: holds the catalog snapshot after load and hands it out read-only.
//!
//! Readers get an `Arc<Catalog>` and never observe a partial catalog: a load
//! shapes every record first, then swaps the whole snapshot in one step.

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use metrics::{counter, gauge, histogram};
use shelf_core::{Catalog, CatalogSource, LoadError, Product};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Shapes raw records into a catalog snapshot.
pub struct CatalogBuilder {
    epoch: u64,
    items: Vec<Product>,
}

impl CatalogBuilder {
    pub fn new(epoch: u64) -> Self { Self { epoch, items: Vec::new() } }

    /// Shape a batch of raw records; images are normalized, everything else passes through.
    pub fn extend(&mut self, raw: Vec<serde_json::Value>) {
        self.items.reserve(raw.len());
        for r in raw {
            self.items.push(Product::from_raw(r));
        }
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn freeze(self) -> Arc<Catalog> {
        let without_images = self.items.iter().filter(|p| p.images.is_empty()).count();
        if without_images > 0 {
            debug!(count = without_images, "products without usable images");
        }
        Arc::new(Catalog { epoch: self.epoch, loaded_at: chrono::Utc::now().timestamp(), items: self.items })
    }
}

/// Owner of the current catalog. `load` is the only mutator.
pub struct CatalogStore {
    snap: Arc<ArcSwap<Catalog>>,
    epoch_tx: watch::Sender<u64>,
    epoch_rx: watch::Receiver<u64>,
    closed: AtomicBool,
}

impl Default for CatalogStore {
    fn default() -> Self { Self::new() }
}

impl CatalogStore {
    pub fn new() -> Self {
        let (epoch_tx, epoch_rx) = watch::channel(0u64);
        Self { snap: Arc::new(ArcSwap::from_pointee(Catalog::default())), epoch_tx, epoch_rx, closed: AtomicBool::new(false) }
    }

    /// Current snapshot; the empty epoch-0 catalog until a load succeeds.
    pub fn get(&self) -> Arc<Catalog> { self.snap.load_full() }

    pub fn is_loaded(&self) -> bool { self.snap.load().epoch > 0 }

    /// Epoch of the latest swapped-in catalog (0 = never loaded).
    pub fn subscribe_epoch(&self) -> watch::Receiver<u64> { self.epoch_rx.clone() }

    /// Mark the store discarded. Loads finishing afterwards leave the catalog untouched.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!("catalog store closed");
    }

    pub fn is_closed(&self) -> bool { self.closed.load(Ordering::SeqCst) }

    /// Fetch from `source`, shape every record, and swap the new catalog in.
    /// On failure the previous catalog stays in place.
    pub async fn load(&self, source: &dyn CatalogSource) -> Result<Arc<Catalog>, LoadError> {
        let started = Instant::now();
        let origin = source.describe();
        info!(source = %origin, "loading catalog");
        let raw = match source.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                counter!("catalog_load_total", 1u64, "outcome" => "error");
                warn!(source = %origin, error = %e, "catalog load failed; keeping previous catalog");
                return Err(e);
            }
        };
        if self.is_closed() {
            counter!("catalog_load_total", 1u64, "outcome" => "discarded");
            debug!(source = %origin, "store closed while loading; dropping result");
            return Err(LoadError::Discarded);
        }
        let mut builder = CatalogBuilder::new(self.snap.load().epoch.saturating_add(1));
        builder.extend(raw);
        let next = builder.freeze();
        let epoch = next.epoch;
        self.snap.store(Arc::clone(&next));
        let _ = self.epoch_tx.send(epoch);
        counter!("catalog_load_total", 1u64, "outcome" => "ok");
        gauge!("catalog_items", next.items.len() as f64);
        histogram!("catalog_load_ms", started.elapsed().as_secs_f64() * 1000.0);
        info!(source = %origin, epoch, items = next.items.len(), "catalog loaded");
        Ok(next)
    }
}
