//! Telemetry Cache
//!
//! Single-slot read-through cache in front of a `TelemetrySource`.
//! Only the latest reading matters. A failed refresh falls back to the
//! previous reading when one exists (stale-but-available).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;

use super::client::TelemetrySource;
use super::reading::Reading;

/// Cache errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// Refresh failed and nothing was cached before
    #[error("no telemetry reading available")]
    NoData,
}

/// The cached reading and when it was fetched
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub reading: Reading,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Fresh while `now - fetched_at < ttl`. A negative elapsed time counts as zero.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.fetched_at)
            .to_std()
            .map_or(true, |elapsed| elapsed < ttl)
    }
}

pub struct TelemetryCache<S> {
    source: S,
    /// Entries are swapped whole, readers never see a torn entry
    entry: RwLock<Option<Arc<CacheEntry>>>,
    /// Allows one refresh in flight at a time
    refresh_gate: tokio::sync::Mutex<()>,
}

impl<S: TelemetrySource> TelemetryCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entry: RwLock::new(None),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Current entry, if any
    pub fn snapshot(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached reading while fresh, otherwise refetch.
    pub async fn get_or_refresh(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Reading, CacheError> {
        if let Some(entry) = self.fresh_entry(now, ttl) {
            return Ok(entry.reading.clone());
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited on the gate
        if let Some(entry) = self.fresh_entry(now, ttl) {
            return Ok(entry.reading.clone());
        }

        match self.source.fetch().await {
            Ok(reading) => {
                let entry = Arc::new(CacheEntry {
                    reading: reading.clone(),
                    fetched_at: now,
                });
                *self.entry.write() = Some(entry);
                Ok(reading)
            }
            Err(e) => match self.snapshot() {
                Some(previous) => {
                    log::warn!(
                        "Telemetry refresh failed ({}), serving reading fetched at {}",
                        e,
                        previous.fetched_at
                    );
                    Ok(previous.reading.clone())
                }
                None => {
                    log::error!("Telemetry refresh failed ({}) and no cached reading exists", e);
                    Err(CacheError::NoData)
                }
            },
        }
    }

    fn fresh_entry(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Arc<CacheEntry>> {
        self.snapshot().filter(|entry| entry.is_fresh(now, ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::testing::StubSource;
    use crate::logic::telemetry::FetchError;

    const TTL: Duration = Duration::from_secs(10);

    fn reading(amplitude: f64) -> Reading {
        Reading::new("2024-03-01T10:00:00Z", amplitude, 1, false, false)
    }

    #[tokio::test]
    async fn first_request_fetches() {
        let cache = TelemetryCache::new(StubSource::new(vec![Ok(reading(300.0))]));
        let now = Utc::now();

        let got = cache.get_or_refresh(now, TTL).await.unwrap();
        assert_eq!(got.amplitude, 300.0);
        assert_eq!(cache.source().calls(), 1);
        assert_eq!(cache.snapshot().unwrap().fetched_at, now);
    }

    #[tokio::test]
    async fn fresh_entry_skips_fetcher() {
        let cache = TelemetryCache::new(StubSource::new(vec![
            Ok(reading(300.0)),
            Ok(reading(900.0)),
        ]));
        let t0 = Utc::now();

        cache.get_or_refresh(t0, TTL).await.unwrap();
        let got = cache
            .get_or_refresh(t0 + chrono::Duration::seconds(9), TTL)
            .await
            .unwrap();

        assert_eq!(got.amplitude, 300.0);
        assert_eq!(cache.source().calls(), 1);
    }

    #[tokio::test]
    async fn expired_entry_refetches() {
        let cache = TelemetryCache::new(StubSource::new(vec![
            Ok(reading(300.0)),
            Ok(reading(900.0)),
        ]));
        let t0 = Utc::now();

        cache.get_or_refresh(t0, TTL).await.unwrap();
        let got = cache
            .get_or_refresh(t0 + chrono::Duration::seconds(10), TTL)
            .await
            .unwrap();

        assert_eq!(got.amplitude, 900.0);
        assert_eq!(cache.source().calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_serves_previous_reading() {
        let cache = TelemetryCache::new(StubSource::new(vec![
            Ok(reading(300.0)),
            Err(FetchError::Transport("timeout".to_string())),
        ]));
        let t0 = Utc::now();
        let t1 = t0 + chrono::Duration::seconds(30);

        cache.get_or_refresh(t0, TTL).await.unwrap();
        let got = cache.get_or_refresh(t1, TTL).await.unwrap();

        assert_eq!(got.amplitude, 300.0);
        assert_eq!(cache.source().calls(), 2);
        // Entry keeps its original fetch time so the next request retries
        assert_eq!(cache.snapshot().unwrap().fetched_at, t0);
    }

    #[tokio::test]
    async fn failed_first_fetch_is_no_data() {
        let cache = TelemetryCache::new(StubSource::new(vec![Err(FetchError::NoFeed)]));

        let result = cache.get_or_refresh(Utc::now(), TTL).await;
        assert_eq!(result, Err(CacheError::NoData));
        assert!(cache.snapshot().is_none());
    }

    #[tokio::test]
    async fn entry_newer_than_now_is_fresh() {
        let cache = TelemetryCache::new(StubSource::new(vec![
            Ok(reading(300.0)),
            Ok(reading(450.0)),
        ]));
        let t0 = Utc::now();

        cache.get_or_refresh(t0, TTL).await.unwrap();
        let got = cache
            .get_or_refresh(t0 - chrono::Duration::seconds(1), TTL)
            .await
            .unwrap();

        assert_eq!(got.amplitude, 300.0);
        assert_eq!(cache.source().calls(), 1);
    }

    #[tokio::test]
    async fn waiter_behind_later_refresh_does_not_refetch() {
        let cache = Arc::new(TelemetryCache::new(StubSource::new(vec![
            Ok(reading(300.0)),
            Ok(reading(900.0)),
        ])));
        let t0 = Utc::now();
        let later = t0 + chrono::Duration::milliseconds(5);

        // Hold the gate so the request at t0 queues behind the refresh at t0 + 5ms
        let gate = cache.refresh_gate.lock().await;
        let waiter = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_refresh(t0, TTL).await })
        };
        tokio::task::yield_now().await;
        *cache.entry.write() = Some(Arc::new(CacheEntry {
            reading: reading(300.0),
            fetched_at: later,
        }));
        drop(gate);

        let got = waiter.await.unwrap().unwrap();
        assert_eq!(got.amplitude, 300.0);
        assert_eq!(cache.source().calls(), 0);
        assert_eq!(cache.snapshot().unwrap().fetched_at, later);
    }

    #[test]
    fn freshness_bounds() {
        let t0 = Utc::now();
        let entry = CacheEntry { reading: reading(1.0), fetched_at: t0 };

        assert!(entry.is_fresh(t0, TTL));
        assert!(entry.is_fresh(t0 + chrono::Duration::milliseconds(9_999), TTL));
        assert!(!entry.is_fresh(t0 + chrono::Duration::seconds(10), TTL));
        assert!(entry.is_fresh(t0 - chrono::Duration::seconds(3), TTL));
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let cache = Arc::new(TelemetryCache::new(StubSource::new(vec![Ok(reading(500.0))])));
        let now = Utc::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_or_refresh(now, TTL).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().amplitude, 500.0);
        }
        assert_eq!(cache.source().calls(), 1);
    }
}
