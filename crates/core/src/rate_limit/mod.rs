//! Per-client rate limiting.
//!
//! Each client identity gets its own token bucket on first use. Buckets are
//! dropped a fixed window after creation, so memory stays bounded by the
//! number of clients seen within one window.

mod bucket;
mod limiter;

pub use bucket::TokenBucket;
pub use limiter::RateLimiter;
