//! SoundGuard Core - Sensor Analysis Pipeline
//!
//! Turns one smart-home sensor reading (sound amplitude, pattern id, flame,
//! motion) into a classified, risk-rated, journaled assessment.

pub mod api;
pub mod constants;
pub mod logic;
