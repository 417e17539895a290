//! Risk Evaluator
//!
//! Precedence:
//! 1. Flame sensor -> High, always
//! 2. Sound class table
//! 3. Low + motion -> Medium

use super::types::RiskLevel;
use crate::logic::model::SoundClass;

/// Risk from the sound class alone
pub fn base_risk(sound_class: SoundClass) -> RiskLevel {
    match sound_class {
        SoundClass::GlassBreak | SoundClass::HumanScream | SoundClass::FireCrackle => RiskLevel::High,
        SoundClass::DogBark => RiskLevel::Medium,
        SoundClass::Normal | SoundClass::Unknown => RiskLevel::Low,
    }
}

/// Total over every (class, flame, motion) triple
pub fn evaluate(sound_class: SoundClass, flame_detected: bool, motion_detected: bool) -> RiskLevel {
    if flame_detected {
        return RiskLevel::High;
    }

    match base_risk(sound_class) {
        RiskLevel::Low if motion_detected => RiskLevel::Medium,
        level => level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CLASSES: [SoundClass; 6] = [
        SoundClass::Normal,
        SoundClass::GlassBreak,
        SoundClass::FireCrackle,
        SoundClass::HumanScream,
        SoundClass::DogBark,
        SoundClass::Unknown,
    ];

    #[test]
    fn flame_always_high() {
        for class in ALL_CLASSES {
            for motion in [false, true] {
                assert_eq!(evaluate(class, true, motion), RiskLevel::High, "{} motion={}", class, motion);
            }
        }
    }

    #[test]
    fn motion_upgrades_low_only() {
        assert_eq!(evaluate(SoundClass::Normal, false, true), RiskLevel::Medium);
        assert_eq!(evaluate(SoundClass::Normal, false, false), RiskLevel::Low);
        assert_eq!(evaluate(SoundClass::Unknown, false, true), RiskLevel::Medium);
        assert_eq!(evaluate(SoundClass::DogBark, false, true), RiskLevel::Medium);
        assert_eq!(evaluate(SoundClass::GlassBreak, false, true), RiskLevel::High);
    }

    #[test]
    fn table_without_sensors() {
        let expected = [
            (SoundClass::Normal, RiskLevel::Low),
            (SoundClass::GlassBreak, RiskLevel::High),
            (SoundClass::FireCrackle, RiskLevel::High),
            (SoundClass::HumanScream, RiskLevel::High),
            (SoundClass::DogBark, RiskLevel::Medium),
            (SoundClass::Unknown, RiskLevel::Low),
        ];
        for (class, level) in expected {
            assert_eq!(evaluate(class, false, false), level);
        }
    }

    #[test]
    fn sensors_never_downgrade() {
        for class in ALL_CLASSES {
            for flame in [false, true] {
                for motion in [false, true] {
                    assert!(evaluate(class, flame, motion) >= base_risk(class));
                }
            }
        }
    }

    #[test]
    fn levels_are_ordered_and_snake_case() {
        assert!(RiskLevel::Low < RiskLevel::Medium && RiskLevel::Medium < RiskLevel::High);
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        assert!(!RiskLevel::Low.is_elevated());
        assert!(RiskLevel::Medium.is_elevated());
    }
}
