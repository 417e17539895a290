//! Risk Module
//!
//! Maps (sound class, flame, motion) to one of three ordered risk levels.
//!
//! ## Usage
//! ```ignore
//! use crate::logic::risk::{evaluate, RiskLevel};
//!
//! assert_eq!(evaluate(SoundClass::Normal, false, true), RiskLevel::Medium);
//! ```

pub mod types;
pub mod evaluator;

pub use types::RiskLevel;
pub use evaluator::{base_risk, evaluate};
