//! Client-keyed bucket map with scheduled eviction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use swiftreg_shared::RateLimitConfig;

use super::bucket::TokenBucket;

/// Per-client rate limiter.
///
/// Cloning is cheap and every clone shares the same buckets.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

struct Inner {
    config: RateLimitConfig,
    buckets: DashMap<String, Tracked>,
    next_entry_id: AtomicU64,
}

struct Tracked {
    id: u64,
    bucket: Arc<TokenBucket>,
    eviction: JoinHandle<()>,
}

impl RateLimiter {
    /// Creates a limiter with no tracked clients.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                buckets: DashMap::new(),
                next_entry_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the limiter configuration.
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.inner.config
    }

    /// Consumes one token from the client's bucket.
    ///
    /// Returns `false` when the bucket is empty; the caller must reject the
    /// request. A client seen for the first time starts with a full bucket,
    /// which is removed one eviction window after creation regardless of use.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since eviction is scheduled
    /// on it.
    pub fn allow(&self, client_id: &str) -> bool {
        self.bucket_for(client_id).try_acquire()
    }

    /// Returns the number of clients currently holding a bucket.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.inner.buckets.len()
    }

    /// Returns the tokens left for a client, or `None` if it has no bucket.
    #[must_use]
    pub fn remaining(&self, client_id: &str) -> Option<u32> {
        self.inner
            .buckets
            .get(client_id)
            .map(|tracked| tracked.bucket.available())
    }

    /// Drops every bucket and cancels all pending evictions.
    pub fn shutdown(&self) {
        let mut count = 0usize;

        self.inner.buckets.retain(|_, tracked| {
            tracked.eviction.abort();
            count += 1;
            false
        });

        info!(clients = count, "Rate limiter drained");
    }

    fn bucket_for(&self, client_id: &str) -> Arc<TokenBucket> {
        if let Some(tracked) = self.inner.buckets.get(client_id) {
            return Arc::clone(&tracked.bucket);
        }

        // The shard stays locked until the entry is in place, so racing
        // first requests from one client share a single bucket and timer.
        let tracked = self
            .inner
            .buckets
            .entry(client_id.to_string())
            .or_insert_with(|| {
                let id = self.inner.next_entry_id.fetch_add(1, Ordering::Relaxed);
                debug!(client_id, "Tracking new client");

                Tracked {
                    id,
                    bucket: Arc::new(TokenBucket::new(
                        self.inner.config.burst,
                        self.inner.config.refill_per_second,
                    )),
                    eviction: self.schedule_eviction(client_id.to_string(), id),
                }
            });

        Arc::clone(&tracked.bucket)
    }

    fn schedule_eviction(&self, client_id: String, id: u64) -> JoinHandle<()> {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let window = self.inner.config.idle_eviction();

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(inner) = inner.upgrade() {
                inner.evict(&client_id, id);
            }
        })
    }
}

impl Inner {
    fn evict(&self, client_id: &str, id: u64) {
        // A drained and recreated entry has its own timer.
        if self
            .buckets
            .remove_if(client_id, |_, tracked| tracked.id == id)
            .is_some()
        {
            debug!(client_id, "Evicted client bucket");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for tracked in self.buckets.iter() {
            tracked.eviction.abort();
        }
    }
}
