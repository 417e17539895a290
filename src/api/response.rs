use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::model::SoundClass;
use crate::logic::pipeline::AnalysisResult;
use crate::logic::risk::RiskLevel;
use crate::logic::telemetry::Reading;

// ============================================================================
// ANALYSIS RESPONSE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub timestamp: String,
    pub sensor_data: SensorData,
    pub analysis: AnalysisBody,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorData {
    pub amplitude: f64,
    pub pattern_id: u32,
    pub flame_detected: bool,
    pub motion_detected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisBody {
    pub sound_type: SoundClass,
    pub description: String,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub class_scores: BTreeMap<SoundClass, f64>,
    pub recommendations: Vec<String>,
}

impl From<&Reading> for SensorData {
    fn from(r: &Reading) -> Self {
        Self {
            amplitude: r.amplitude,
            pattern_id: r.pattern_id,
            flame_detected: r.flame_detected,
            motion_detected: r.motion_detected,
        }
    }
}

impl From<&AnalysisResult> for AnalysisResponse {
    fn from(result: &AnalysisResult) -> Self {
        let class = result.classification.sound_class;
        Self {
            timestamp: result.reading.timestamp.clone(),
            sensor_data: SensorData::from(&result.reading),
            analysis: AnalysisBody {
                sound_type: class,
                description: class.description().to_string(),
                risk_level: result.risk_level,
                confidence: result.classification.confidence,
                class_scores: result.classification.class_scores.clone(),
                recommendations: result.recommendations.clone(),
            },
            logged_at: result.logged_at,
        }
    }
}

// ============================================================================
// ERROR RESPONSE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}
