//! Rule-based fallback classifier
//!
//! Used when no trained artifact loads. Thresholds are on amplitude only;
//! pattern id breaks ties in the two upper bands. Breakpoints and outputs are
//! fixed for compatibility with deployments that ran without a model.

use super::types::{ClassificationResult, SoundClass};

// ============================================================================
// BANDS
// ============================================================================

/// Below this amplitude = quiet normal
pub const QUIET_MAX: f64 = 500.0;

/// Below this amplitude = loud-but-normal
pub const NORMAL_MAX: f64 = 600.0;

/// At or above this amplitude = impact band
pub const IMPACT_MIN: f64 = 800.0;

/// Pattern id at or above which the mid band reads as a dog bark
pub const DOG_BARK_PATTERN_MIN: u32 = 9;

/// Pattern id at or above which the impact band reads as a scream
pub const SCREAM_PATTERN_MIN: u32 = 7;

pub const QUIET_CONFIDENCE: f64 = 0.8;
pub const LOUD_NORMAL_CONFIDENCE: f64 = 0.5;
pub const MID_BAND_CONFIDENCE: f64 = 0.6;
pub const IMPACT_CONFIDENCE: f64 = 0.7;

/// Classify from amplitude and pattern id alone
pub fn classify_by_rules(amplitude: f64, pattern_id: u32) -> ClassificationResult {
    let (class, confidence) = if amplitude < QUIET_MAX {
        (SoundClass::Normal, QUIET_CONFIDENCE)
    } else if amplitude >= IMPACT_MIN {
        if pattern_id >= SCREAM_PATTERN_MIN {
            (SoundClass::HumanScream, IMPACT_CONFIDENCE)
        } else {
            (SoundClass::GlassBreak, IMPACT_CONFIDENCE)
        }
    } else if amplitude >= NORMAL_MAX {
        if pattern_id >= DOG_BARK_PATTERN_MIN {
            (SoundClass::DogBark, MID_BAND_CONFIDENCE)
        } else {
            (SoundClass::FireCrackle, MID_BAND_CONFIDENCE)
        }
    } else {
        (SoundClass::Normal, LOUD_NORMAL_CONFIDENCE)
    };

    ClassificationResult::single(class, confidence)
}
