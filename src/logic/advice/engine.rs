use crate::logic::model::SoundClass;
use crate::logic::risk::RiskLevel;

pub const HIGH_RISK_HEADLINE: &str = "HIGH RISK situation detected! Immediate attention required.";
pub const MEDIUM_RISK_HEADLINE: &str = "Medium risk situation detected. Attention recommended.";
pub const LOW_RISK_HEADLINE: &str = "Low risk situation. Normal conditions detected.";
pub const CONTINUE_MONITORING: &str = "Continue normal monitoring.";

pub const FLAME_ALERT: &str = "ALERT: Flame detected! Check for fire immediately.";
pub const FLAME_SYSTEM_CHECK: &str = "Verify if fire detection system is functioning properly.";
pub const BENIGN_MOTION: &str = "Motion detected. Normal activity detected.";

/// Ordered recommendations: headline, class guidance, then sensor cross-checks.
/// Emission order is display order.
pub fn recommend(
    sound_class: SoundClass,
    risk_level: RiskLevel,
    flame_detected: bool,
    motion_detected: bool,
) -> Vec<String> {
    let mut out: Vec<&'static str> = Vec::with_capacity(6);

    match risk_level {
        RiskLevel::High => out.push(HIGH_RISK_HEADLINE),
        RiskLevel::Medium => out.push(MEDIUM_RISK_HEADLINE),
        RiskLevel::Low => {
            out.push(LOW_RISK_HEADLINE);
            out.push(CONTINUE_MONITORING);
        }
    }

    out.extend(class_guidance(sound_class, flame_detected, motion_detected));

    if flame_detected && sound_class != SoundClass::FireCrackle {
        out.push(FLAME_ALERT);
        out.push(FLAME_SYSTEM_CHECK);
    }

    if motion_detected && !risk_level.is_elevated() {
        out.push(BENIGN_MOTION);
    }

    out.into_iter().map(String::from).collect()
}

fn class_guidance(sound_class: SoundClass, flame: bool, motion: bool) -> Vec<&'static str> {
    let mut lines = Vec::new();
    match sound_class {
        SoundClass::GlassBreak => {
            lines.push("Possible break-in detected. Check windows and doors immediately.");
            lines.push("Consider contacting security or authorities.");
            if motion {
                lines.push("Motion detected with glass break sound - potential intruder in the house!");
            }
        }
        SoundClass::FireCrackle => {
            lines.push("Possible fire detected. Check for signs of fire immediately.");
            lines.push("Prepare for evacuation if necessary.");
            if flame {
                lines.push("CRITICAL: Both flame sensor and fire sounds detected - fire confirmed!");
            }
        }
        SoundClass::HumanScream => {
            lines.push("Distress call detected. Check for people in need of help.");
            lines.push("Consider contacting emergency services.");
            if motion {
                lines.push("Motion detected with screams - someone may be in danger!");
            }
        }
        SoundClass::DogBark => {
            lines.push("Unusual dog barking detected. Check for disturbances.");
            if motion {
                lines.push("Motion detected with dog barking - someone may be near your property.");
            }
        }
        SoundClass::Normal | SoundClass::Unknown => {}
    }
    lines
}
