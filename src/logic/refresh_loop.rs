//! Background cache refresh
//!
//! Re-primes the telemetry cache every cache TTL until cancelled. Failed
//! refreshes are left to the cache's stale fallback; the next tick retries.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::logic::pipeline::Analyzer;
use crate::logic::telemetry::TelemetrySource;

#[derive(Debug, Error)]
pub enum RefreshLoopError {
    #[error("refresh loop already running")]
    AlreadyRunning,

    #[error("refresh loop task failed to join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn refresh_loop<S: TelemetrySource>(analyzer: Arc<Analyzer<S>>, cancel_token: CancellationToken) {
    let ttl = analyzer.cache_ttl();
    let mut ticker = tokio::time::interval(ttl);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!("Background refresh started (every {:?})", ttl);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = analyzer.cache().get_or_refresh(Utc::now(), ttl).await {
                    log::warn!("Background refresh: {}", e);
                }
            }
            _ = cancel_token.cancelled() => {
                log::info!("Background refresh shutting down");
                break;
            }
        }
    }
}

#[derive(Default)]
pub struct RefreshController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RefreshController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start<S>(&mut self, analyzer: Arc<Analyzer<S>>) -> Result<(), RefreshLoopError>
    where
        S: TelemetrySource + 'static,
    {
        if self.handle.is_some() {
            return Err(RefreshLoopError::AlreadyRunning);
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(analyzer, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel and wait for the loop to exit
    pub async fn stop(&mut self) -> Result<(), RefreshLoopError> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => Ok(handle.await?),
            None => Ok(()),
        }
    }
}
