//! Advice Module
//!
//! Turns an assessed reading into ordered, human-readable recommendations.
//! The first entry is always the headline.

pub mod engine;

pub use engine::recommend;
