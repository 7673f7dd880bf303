//! In-memory cache that owns regions and announces their lifecycle.

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::region::{InMemoryRegion, Region};

/// Callbacks fired around region creation and destruction.
pub trait RegionLifecycleListener: Send + Sync {
    /// Called once a region exists. An error aborts the creation.
    fn after_create(&self, _region: &dyn Region) -> Result<()> {
        Ok(())
    }

    /// Called while a region still holds its entries, right before it is removed.
    fn before_destroy(&self, _region: &dyn Region) -> Result<()> {
        Ok(())
    }
}

/// A set of named regions plus the listeners observing them.
#[derive(Default)]
pub struct InMemoryCache {
    regions: RwLock<HashMap<String, Arc<InMemoryRegion>>>,
    listeners: RwLock<Vec<Arc<dyn RegionLifecycleListener>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn RegionLifecycleListener>) {
        self.listeners.write().push(listener);
    }

    /// Create a region and notify listeners.
    ///
    /// If a listener fails the region is removed again and the error returned.
    pub fn create_region(&self, name: &str) -> Result<Arc<InMemoryRegion>> {
        if name.trim().is_empty() {
            return Err(anyhow!("Region name must not be blank"));
        }
        let region = {
            let mut regions = self.regions.write();
            if regions.contains_key(name) {
                return Err(anyhow!("Region {} already exists", name));
            }
            let region = Arc::new(InMemoryRegion::new(name));
            regions.insert(name.to_string(), Arc::clone(&region));
            region
        };

        let listeners = self.listeners.read().clone();
        for listener in listeners {
            if let Err(e) = listener.after_create(region.as_ref()) {
                self.regions.write().remove(name);
                return Err(e.context(format!("Failed to create region {}", region.full_path())));
            }
        }
        tracing::debug!("created region {}", region.full_path());
        Ok(region)
    }

    pub fn get_region(&self, name: &str) -> Option<Arc<InMemoryRegion>> {
        self.regions.read().get(name).cloned()
    }

    pub fn region_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.regions.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Notify listeners and remove the region.
    ///
    /// The region is removed even when a listener fails; the first listener
    /// error is returned afterwards. Returns `Ok(false)` for unknown regions.
    pub fn destroy_region(&self, name: &str) -> Result<bool> {
        let Some(region) = self.get_region(name) else {
            return Ok(false);
        };

        let listeners = self.listeners.read().clone();
        let mut first_error = None;
        for listener in listeners {
            if let Err(e) = listener.before_destroy(region.as_ref()) {
                tracing::warn!("listener failed while destroying {}: {:#}", region.full_path(), e);
                first_error.get_or_insert(e);
            }
        }

        self.regions.write().remove(name);
        tracing::debug!("destroyed region {}", region.full_path());

        match first_error {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }
}
