//! Classifier Adapter
//!
//! Single entry point for sound classification. Uses the trained model when
//! one loaded, otherwise the amplitude rules. Never fails: an inference error
//! is logged and surfaced as `unknown`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

use super::fallback::classify_by_rules;
use super::inference::{ModelOutput, OnnxSoundModel, SoundModel, FEATURE_COUNT};
use super::types::{ClassificationResult, SoundClass};
use crate::logic::config::Config;

/// Classification method reported in status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Model,
    RuleBased,
}

/// Engine status
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub method: Method,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

enum Backend {
    Model(Box<dyn SoundModel>),
    RuleBased,
}

pub struct Classifier {
    backend: Backend,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl Classifier {
    pub fn with_model(model: Box<dyn SoundModel>) -> Self {
        Self::from_backend(Backend::Model(model))
    }

    pub fn rule_based() -> Self {
        Self::from_backend(Backend::RuleBased)
    }

    fn from_backend(backend: Backend) -> Self {
        Self {
            backend,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Load the configured artifact, falling back to rules on any load error
    pub fn load(config: &Config) -> Self {
        match OnnxSoundModel::load(&config.model_path, config.model_sha256.as_deref()) {
            Ok(model) => Self::with_model(Box::new(model)),
            Err(e) => {
                log::warn!("Model unavailable ({}), using rule-based classification", e);
                Self::rule_based()
            }
        }
    }

    pub fn model_loaded(&self) -> bool {
        matches!(self.backend, Backend::Model(_))
    }

    /// Classify a reading's amplitude and pattern id
    pub fn classify(&self, amplitude: f64, pattern_id: u32) -> ClassificationResult {
        let model = match &self.backend {
            Backend::Model(model) => model,
            Backend::RuleBased => return classify_by_rules(amplitude, pattern_id),
        };

        let features: [f32; FEATURE_COUNT] = [amplitude as f32, pattern_id as f32];
        let start = Instant::now();
        let output = model.infer(features);
        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        match output {
            Ok(ModelOutput::Probabilities(probs)) => {
                ClassificationResult::from_probabilities(&probs, model.classes()).unwrap_or_else(|| {
                    log::error!("Model returned no usable probabilities");
                    ClassificationResult::unknown()
                })
            }
            Ok(ModelOutput::Label(label)) => {
                let class = usize::try_from(label)
                    .map(|i| SoundClass::from_index(model.classes(), i))
                    .unwrap_or(SoundClass::Unknown);
                ClassificationResult::single(class, 1.0)
            }
            Err(e) => {
                log::error!("Error during classification: {}", e);
                ClassificationResult::unknown()
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        let (method, model_name) = match &self.backend {
            Backend::Model(model) => (Method::Model, model.name().to_string()),
            Backend::RuleBased => (Method::RuleBased, "rule-based".to_string()),
        };

        EngineStatus {
            model_loaded: self.model_loaded(),
            model_name,
            method,
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}
