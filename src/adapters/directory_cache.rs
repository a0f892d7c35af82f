//! Time-to-live cache in front of a ticker directory source.

use crate::domain::directory::SymbolDirectory;
use crate::domain::error::StockboardError;
use crate::ports::directory_port::DirectoryPort;
use cached::{Cached, TimedCache};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Wraps any `DirectoryPort`. The directory takes no parameters, so the
/// cache holds at most one entry under the unit key. Failed loads are never
/// stored.
pub struct DirectoryCache<D: DirectoryPort> {
    inner: D,
    cache: Mutex<TimedCache<(), SymbolDirectory>>,
}

impl<D: DirectoryPort> DirectoryCache<D> {
    pub fn new(inner: D, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(TimedCache::with_lifespan(ttl)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimedCache<(), SymbolDirectory>> {
        // poisoned: the entry is still a whole value or absent
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached directory, loading it from the source on a miss or expiry.
    pub fn get(&self) -> Result<SymbolDirectory, StockboardError> {
        if let Some(directory) = self.lock().cache_get(&()) {
            tracing::debug!(source = %self.inner.source_name(), "directory cache hit");
            return Ok(directory.clone());
        }

        tracing::debug!(source = %self.inner.source_name(), "directory cache miss");
        let directory = self.inner.list_symbols()?;
        self.lock().cache_set((), directory.clone());
        Ok(directory)
    }

    /// Drop the cached entry and load again.
    pub fn refresh(&self) -> Result<SymbolDirectory, StockboardError> {
        self.invalidate();
        self.get()
    }

    pub fn invalidate(&self) {
        self.lock().cache_remove(&());
    }
}

impl<D: DirectoryPort> DirectoryPort for DirectoryCache<D> {
    fn list_symbols(&self) -> Result<SymbolDirectory, StockboardError> {
        self.get()
    }

    fn source_name(&self) -> String {
        self.inner.source_name()
    }
}
