//! Pipeline Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::model::{ClassificationResult, EngineStatus, SoundClass};
use crate::logic::risk::RiskLevel;
use crate::logic::telemetry::Reading;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// No live, cached or sample reading
    #[error("no sensor data available")]
    NoData,
}

/// One analysis, as journaled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub reading: Reading,
    pub classification: ClassificationResult,
    pub risk_level: RiskLevel,
    /// Emission order; first entry is the headline
    pub recommendations: Vec<String>,
    pub logged_at: DateTime<Utc>,
}

/// Classification + risk without recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub sound_class: SoundClass,
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub server_status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub model_loaded: bool,
    pub channel_id: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub last_data_fetch: Option<String>,
    pub last_data: Option<Reading>,
    pub last_analysis: Option<AnalysisSummary>,
    pub engine: EngineStatus,
}
