//! Cache freshness: a nullable stamp and a fixed time-to-live.
//!
//! Uses [`tokio::time::Instant`] so tests can pause and advance the clock.

use std::time::Duration;

use tokio::time::Instant;

/// When a store was last successfully fetched, and for how long that counts.
///
/// # Examples
///
/// ```
/// use gb_store::CacheState;
/// use std::time::Duration;
///
/// let mut cache = CacheState::new(Duration::from_secs(300));
/// assert!(!cache.is_valid());
///
/// cache.touch();
/// assert!(cache.is_valid());
///
/// cache.invalidate();
/// assert!(!cache.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheState {
    stamp: Option<Instant>,
    ttl: Duration,
}

impl CacheState {
    /// Creates an empty (invalid) cache with the given TTL.
    #[inline]
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { stamp: None, ttl }
    }

    /// The freshness window.
    #[inline]
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// When the cache was last stamped.
    #[inline]
    #[must_use]
    pub const fn stamp(&self) -> Option<Instant> {
        self.stamp
    }

    /// `true` iff a stamp exists and `now - stamp < ttl`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    /// [`is_valid`](Self::is_valid) against an explicit clock reading.
    #[must_use]
    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.stamp
            .is_some_and(|stamp| now.saturating_duration_since(stamp) < self.ttl)
    }

    /// Time since the last stamp.
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        self.stamp.map(|stamp| stamp.elapsed())
    }

    /// Stamps the cache with the current time.
    pub fn touch(&mut self) {
        self.stamp = Some(Instant::now());
    }

    /// Drops the stamp.
    pub fn invalidate(&mut self) {
        self.stamp = None;
    }
}
