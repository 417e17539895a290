//! Offline sample feed
//!
//! A local file shaped like the channel response, used when neither the
//! cache nor the live feed has a reading.

use std::path::Path;

use thiserror::Error;

use super::client::FetchError;
use super::reading::{parse_feed_body, Reading};

#[derive(Debug, Error)]
pub enum SampleFeedError {
    #[error("failed to read sample feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sample feed unusable: {0}")]
    Feed(#[from] FetchError),
}

/// Load the first entry of the sample feed at `path`
pub fn load_sample_reading(path: &Path) -> Result<Reading, SampleFeedError> {
    let body = std::fs::read(path)?;
    let reading = parse_feed_body(&body)?;
    log::info!("Using sample data from {:?}: {:?}", path, reading);
    Ok(reading)
}
