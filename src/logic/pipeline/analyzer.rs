use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::types::{AnalysisResult, AnalysisSummary, AnalyzeError, StatusSnapshot};
use crate::logic::advice::recommend;
use crate::logic::config::Config;
use crate::logic::journal::EventJournal;
use crate::logic::model::Classifier;
use crate::logic::risk::evaluate;
use crate::logic::telemetry::{
    load_sample_reading, CacheError, FeedConfig, FetchError, Reading, TelemetryCache,
    TelemetrySource, ThingSpeakClient,
};

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub cache_ttl: Duration,
    pub channel_id: String,
    /// `None` disables the offline fallback
    pub sample_feed_path: Option<PathBuf>,
}

impl From<&Config> for AnalyzerSettings {
    fn from(config: &Config) -> Self {
        Self {
            cache_ttl: config.cache_ttl,
            channel_id: config.channel_id.clone(),
            sample_feed_path: Some(config.sample_feed_path.clone()),
        }
    }
}

// ============================================================================
// ANALYZER
// ============================================================================

/// Owns the cache, the classifier and the journal for the process lifetime
pub struct Analyzer<S> {
    cache: TelemetryCache<S>,
    classifier: Classifier,
    journal: Arc<EventJournal>,
    settings: AnalyzerSettings,
}

impl Analyzer<ThingSpeakClient> {
    /// Production wiring from configuration
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = ThingSpeakClient::new(FeedConfig::from(config))?;
        Ok(Self::new(
            client,
            Classifier::load(config),
            EventJournal::new(config.journal_dir.clone()),
            AnalyzerSettings::from(config),
        ))
    }
}

impl<S: TelemetrySource> Analyzer<S> {
    pub fn new(
        source: S,
        classifier: Classifier,
        journal: EventJournal,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            cache: TelemetryCache::new(source),
            classifier,
            journal: Arc::new(journal),
            settings,
        }
    }

    pub fn cache(&self) -> &TelemetryCache<S> {
        &self.cache
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub fn cache_ttl(&self) -> Duration {
        self.settings.cache_ttl
    }

    /// Analyze the latest reading: cache, then sample feed, else `NoData`
    pub async fn analyze(&self, now: DateTime<Utc>) -> Result<AnalysisResult, AnalyzeError> {
        let reading = match self.cache.get_or_refresh(now, self.settings.cache_ttl).await {
            Ok(reading) => reading,
            Err(CacheError::NoData) => self.sample_reading().await.ok_or(AnalyzeError::NoData)?,
        };

        Ok(self.analyze_given(reading).await)
    }

    /// Analyze a supplied reading, bypassing cache and fetcher
    pub async fn analyze_given(&self, reading: Reading) -> AnalysisResult {
        let result = self.assess(reading, Utc::now());
        self.record(&result).await;
        result
    }

    /// Pure part of the pipeline: classify, evaluate, recommend
    pub fn assess(&self, reading: Reading, logged_at: DateTime<Utc>) -> AnalysisResult {
        let classification = self.classifier.classify(reading.amplitude, reading.pattern_id);
        let risk_level = evaluate(
            classification.sound_class,
            reading.flame_detected,
            reading.motion_detected,
        );
        let recommendations = recommend(
            classification.sound_class,
            risk_level,
            reading.flame_detected,
            reading.motion_detected,
        );

        log::debug!(
            "Analysis: {} ({:.2}) -> {} risk",
            classification.sound_class,
            classification.confidence,
            risk_level
        );

        AnalysisResult {
            reading,
            classification,
            risk_level,
            recommendations,
            logged_at,
        }
    }

    /// Journal write; failures are logged, never returned
    async fn record(&self, result: &AnalysisResult) {
        let journal = Arc::clone(&self.journal);
        let entry = result.clone();

        match tokio::task::spawn_blocking(move || journal.append(&entry)).await {
            Ok(Ok(path)) => log::debug!("Event logged to {:?}", path),
            Ok(Err(e)) => log::error!("Failed to log event: {}", e),
            Err(e) => log::error!("Journal task failed: {}", e),
        }
    }

    async fn sample_reading(&self) -> Option<Reading> {
        let path = self.settings.sample_feed_path.clone()?;

        let loaded = tokio::task::spawn_blocking(move || load_sample_reading(&path)).await;
        match loaded {
            Ok(Ok(reading)) => Some(reading),
            Ok(Err(e)) => {
                log::warn!("Sample feed unavailable: {}", e);
                None
            }
            Err(e) => {
                log::error!("Sample feed task failed: {}", e);
                None
            }
        }
    }

    /// Status snapshot through the cache; no recommendations, no journal write
    pub async fn status(&self, now: DateTime<Utc>) -> StatusSnapshot {
        let reading = self.cache.get_or_refresh(now, self.settings.cache_ttl).await.ok();

        let last_analysis = reading.as_ref().map(|r| {
            let classification = self.classifier.classify(r.amplitude, r.pattern_id);
            AnalysisSummary {
                sound_class: classification.sound_class,
                risk_level: evaluate(classification.sound_class, r.flame_detected, r.motion_detected),
                confidence: classification.confidence,
            }
        });

        StatusSnapshot {
            server_status: "online",
            timestamp: now,
            model_loaded: self.classifier.model_loaded(),
            channel_id: self.settings.channel_id.clone(),
            last_data_fetch: self.cache.snapshot().map(|e| format_timestamp(e.fetched_at)),
            last_data: reading,
            last_analysis,
            engine: self.classifier.status(),
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
