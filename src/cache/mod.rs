//! Single-entry time-based cache
//!
//! Holds the last successfully fetched value of a remote document. A value
//! is *fresh* while it is younger than the cache's TTL; once it expires it is
//! still kept around as a stale fallback until it is replaced or invalidated.

use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A cached value and the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// One-slot cache with a fixed time-to-live
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value if it is still within the TTL
    pub fn get(&self) -> Option<T> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// The cached value regardless of age
    pub fn get_stale(&self) -> Option<T> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|entry| entry.value.clone())
    }

    /// Replace the cached value, restarting its TTL
    pub fn set(&self, value: T) {
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(CacheEntry {
            value,
            stored_at: Instant::now(),
        });
    }

    /// Drop the cached value entirely
    pub fn invalidate(&self) {
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Age of the cached value, if any
    pub fn age(&self) -> Option<Duration> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|entry| entry.stored_at.elapsed())
    }
}
