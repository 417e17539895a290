//! Model Module - Sound Classification
//!
//! Inference is kept apart from telemetry collection so the model can be
//! swapped or dropped without touching the rest of the pipeline.
//!
//! ## Structure
//! - `types.rs` - `SoundClass`, `ClassificationResult`
//! - `inference.rs` - `SoundModel` trait + ONNX backend
//! - `fallback.rs` - amplitude/pattern rules
//! - `classifier.rs` - adapter choosing between the two

pub mod types;
pub mod inference;
pub mod fallback;
pub mod classifier;

pub use types::{ClassificationResult, SoundClass, DEFAULT_CLASS_ORDER};
pub use inference::{InferenceError, ModelLoadError, ModelOutput, OnnxSoundModel, SoundModel};
pub use fallback::classify_by_rules;
pub use classifier::{Classifier, EngineStatus, Method};
