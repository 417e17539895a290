//! Simulate request parsing

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::logic::telemetry::reading::{flag_field, numeric_field, pattern_field};
use crate::logic::telemetry::Reading;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid request body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("No sensor data provided")]
    MissingSensorData,
}

/// `{"sensor_data": {...}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub sensor_data: Option<SensorDataInput>,
}

/// Values may be numbers, numeric strings or booleans; unusable ones default
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorDataInput {
    pub amplitude: Option<Value>,
    pub pattern_id: Option<Value>,
    pub flame_detected: Option<Value>,
    pub motion_detected: Option<Value>,
}

impl SensorDataInput {
    fn is_empty(&self) -> bool {
        self.amplitude.is_none()
            && self.pattern_id.is_none()
            && self.flame_detected.is_none()
            && self.motion_detected.is_none()
    }
}

impl SimulateRequest {
    pub fn from_json(body: &[u8]) -> Result<Self, RequestError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Synthetic reading stamped with the current time. Missing fields default to 0/false.
    pub fn into_reading(self) -> Result<Reading, RequestError> {
        let input = self
            .sensor_data
            .filter(|s| !s.is_empty())
            .ok_or(RequestError::MissingSensorData)?;

        Ok(Reading::new(
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            numeric_field(input.amplitude.as_ref()),
            pattern_field(input.pattern_id.as_ref()),
            flag_field(input.flame_detected.as_ref()),
            flag_field(input.motion_detected.as_ref()),
        ))
    }
}
