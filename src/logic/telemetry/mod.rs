//! Telemetry Module
//!
//! Everything between the remote sensor channel and a canonical `Reading`.
//!
//! ## Structure
//! - `reading.rs` - `Reading` + feed wire format and lossy normalization
//! - `client.rs` - `TelemetrySource` trait and the HTTP channel client
//! - `cache.rs` - single-slot read-through cache with stale fallback
//! - `sample.rs` - offline sample feed
//!
//! ## Usage
//! ```ignore
//! use crate::logic::telemetry::{TelemetryCache, ThingSpeakClient, FeedConfig};
//!
//! let cache = TelemetryCache::new(ThingSpeakClient::new(FeedConfig::from(&config))?);
//! let reading = cache.get_or_refresh(Utc::now(), config.cache_ttl).await?;
//! ```

pub mod reading;
pub mod client;
pub mod cache;
pub mod sample;

pub use reading::{parse_feed_body, FeedEntry, FeedResponse, Reading};
pub use client::{FeedConfig, FetchError, TelemetrySource, ThingSpeakClient};
pub use cache::{CacheEntry, CacheError, TelemetryCache};
pub use sample::{load_sample_reading, SampleFeedError};
