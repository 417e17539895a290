//! Sound Classification Types
//!
//! Core types for acoustic classification.
//! No logic here beyond conversions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// SOUND CLASS
// ============================================================================

/// Acoustic category assigned to a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundClass {
    Normal,
    GlassBreak,
    FireCrackle,
    HumanScream,
    DogBark,
    Unknown,
}

/// Class order of the trained artifact (index -> class)
pub const DEFAULT_CLASS_ORDER: [SoundClass; 5] = [
    SoundClass::Normal,
    SoundClass::GlassBreak,
    SoundClass::FireCrackle,
    SoundClass::HumanScream,
    SoundClass::DogBark,
];

impl SoundClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundClass::Normal => "normal",
            SoundClass::GlassBreak => "glass_break",
            SoundClass::FireCrackle => "fire_crackle",
            SoundClass::HumanScream => "human_scream",
            SoundClass::DogBark => "dog_bark",
            SoundClass::Unknown => "unknown",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            SoundClass::Normal => "Normal background noise",
            SoundClass::GlassBreak => "Sound of glass breaking",
            SoundClass::FireCrackle => "Sound of fire crackling",
            SoundClass::HumanScream => "Human scream or shout",
            SoundClass::DogBark => "Dog barking",
            SoundClass::Unknown => "Unknown sound type",
        }
    }

    /// Map a model class index; out-of-range indices are `Unknown`
    pub fn from_index(classes: &[SoundClass], index: usize) -> SoundClass {
        classes.get(index).copied().unwrap_or(SoundClass::Unknown)
    }
}

impl fmt::Display for SoundClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(SoundClass::Normal),
            "glass_break" => Ok(SoundClass::GlassBreak),
            "fire_crackle" => Ok(SoundClass::FireCrackle),
            "human_scream" => Ok(SoundClass::HumanScream),
            "dog_bark" => Ok(SoundClass::DogBark),
            "unknown" => Ok(SoundClass::Unknown),
            other => Err(format!("unknown sound class '{}'", other)),
        }
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// Output of the classifier adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub sound_class: SoundClass,
    /// 0.0 - 1.0
    pub confidence: f64,
    /// Full distribution when model-backed, single entry otherwise
    pub class_scores: BTreeMap<SoundClass, f64>,
}

impl ClassificationResult {
    /// Single-entry result (rule-based or hard prediction)
    pub fn single(sound_class: SoundClass, confidence: f64) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            sound_class,
            confidence,
            class_scores: BTreeMap::from([(sound_class, confidence)]),
        }
    }

    /// Result surfaced when inference fails
    pub fn unknown() -> Self {
        Self::single(SoundClass::Unknown, 0.0)
    }

    /// Arg-max over a probability vector. Ties keep the lowest index.
    pub fn from_probabilities(probabilities: &[f32], classes: &[SoundClass]) -> Option<Self> {
        let (best_index, best_p) = probabilities
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .fold(None, |best: Option<(usize, f32)>, (i, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })?;

        let mut class_scores = BTreeMap::new();
        for (i, &p) in probabilities.iter().enumerate() {
            let p = if p.is_finite() { p.clamp(0.0, 1.0) as f64 } else { 0.0 };
            *class_scores.entry(SoundClass::from_index(classes, i)).or_insert(0.0) += p;
        }

        Some(Self {
            sound_class: SoundClass::from_index(classes, best_index),
            confidence: (best_p as f64).clamp(0.0, 1.0),
            class_scores,
        })
    }
}
