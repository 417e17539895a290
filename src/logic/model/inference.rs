//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the trained sound classifier and runs it on `[amplitude, pattern_id]`.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::{SoundClass, DEFAULT_CLASS_ORDER};

/// Features per inference: amplitude, pattern id
pub const FEATURE_COUNT: usize = 2;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Failure during a single inference call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

/// Failure while loading the artifact; the caller falls back to rules
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("model checksum mismatch (expected {expected}, got {actual})")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to create ONNX session: {0}")]
    Session(String),

    #[error("invalid model metadata: {0}")]
    Metadata(String),
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Raw model output before mapping to a sound class
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Per-class probabilities, indexed like `classes()`
    Probabilities(Vec<f32>),
    /// Hard prediction only
    Label(i64),
}

/// Trait for inference backends (ONNX, test doubles, ...)
pub trait SoundModel: Send + Sync {
    fn infer(&self, features: [f32; FEATURE_COUNT]) -> Result<ModelOutput, InferenceError>;

    /// Index -> class mapping of the outputs
    fn classes(&self) -> &[SoundClass] {
        &DEFAULT_CLASS_ORDER
    }

    fn name(&self) -> &str;
}

// ============================================================================
// METADATA
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub classes: Vec<SoundClass>,
    pub probabilistic: bool,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Optional sidecar `<model>.json`
#[derive(Debug, Deserialize)]
struct SidecarMetadata {
    #[serde(default)]
    classes: Option<Vec<String>>,
}

/// Read the class order from the sidecar, if present
fn load_sidecar_classes(model_path: &Path) -> Result<Option<Vec<SoundClass>>, ModelLoadError> {
    let sidecar_path = PathBuf::from(format!("{}.json", model_path.display()));
    if !sidecar_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&sidecar_path)?;
    let sidecar: SidecarMetadata = serde_json::from_str(&content)
        .map_err(|e| ModelLoadError::Metadata(format!("{:?}: {}", sidecar_path, e)))?;

    match sidecar.classes {
        None => Ok(None),
        Some(names) => {
            let classes = names
                .iter()
                .map(|n| n.parse::<SoundClass>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(ModelLoadError::Metadata)?;
            log::info!("Model metadata loaded from: {:?}", sidecar_path);
            Ok(Some(classes))
        }
    }
}

/// Hex SHA-256 of the artifact bytes
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX-backed sound classifier
pub struct OnnxSoundModel {
    /// `Session::run` needs `&mut`, so calls are serialized here
    session: Mutex<Session>,
    label_output: String,
    probability_output: Option<String>,
    metadata: ModelMetadata,
}

impl OnnxSoundModel {
    /// Load ONNX model from file, verifying the checksum when one is pinned
    pub fn load(model_path: &Path, expected_sha256: Option<&str>) -> Result<Self, ModelLoadError> {
        log::info!("Loading ONNX model from: {:?}", model_path);

        if !model_path.exists() {
            return Err(ModelLoadError::NotFound(model_path.to_path_buf()));
        }

        let bytes = std::fs::read(model_path)?;
        let sha256 = compute_checksum(&bytes);
        if let Some(expected) = expected_sha256 {
            if !expected.eq_ignore_ascii_case(&sha256) {
                return Err(ModelLoadError::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual: sha256,
                });
            }
            log::info!("Model checksum verified");
        }

        let session = Session::builder()
            .map_err(|e| ModelLoadError::Session(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelLoadError::Session(format!("optimization: {}", e)))?
            .commit_from_memory(&bytes)
            .map_err(|e| ModelLoadError::Session(format!("load: {}", e)))?;

        let label_output = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelLoadError::Session("no output defined".to_string()))?;
        let probability_output = session.outputs.get(1).map(|o| o.name.clone());

        let classes = load_sidecar_classes(model_path)?.unwrap_or_else(|| DEFAULT_CLASS_ORDER.to_vec());

        let metadata = ModelMetadata {
            model_path: model_path.display().to_string(),
            classes,
            probabilistic: probability_output.is_some(),
            sha256,
            loaded_at: chrono::Utc::now(),
        };

        log::info!(
            "ONNX model loaded successfully ({} classes, probabilistic: {})",
            metadata.classes.len(),
            metadata.probabilistic
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            probability_output,
            metadata,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl SoundModel for OnnxSoundModel {
    fn infer(&self, features: [f32; FEATURE_COUNT]) -> Result<ModelOutput, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.to_vec())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        // Probability tensors only; a ZipMap output falls through to the label
        if let Some(name) = &self.probability_output {
            if let Some(output) = outputs.get(name) {
                if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                    return Ok(ModelOutput::Probabilities(data.to_vec()));
                }
            }
        }

        let output = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        data.first()
            .copied()
            .map(ModelOutput::Label)
            .ok_or_else(|| InferenceError("Empty label output".to_string()))
    }

    fn classes(&self) -> &[SoundClass] {
        &self.metadata.classes
    }

    fn name(&self) -> &str {
        &self.metadata.model_path
    }
}
