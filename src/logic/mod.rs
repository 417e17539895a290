//! Logic Module - Pipeline stages
//!
//! ## Structure
//! - `config` - startup configuration
//! - `telemetry/` - reading, fetcher, cache, sample feed
//! - `model/` - sound classification (ONNX or rules)
//! - `risk/` - risk evaluation
//! - `advice/` - recommendations
//! - `journal/` - date-partitioned event log
//! - `pipeline/` - `Analyzer` tying the stages together
//! - `refresh_loop` - background cache refresh

pub mod config;
pub mod telemetry;
pub mod model;
pub mod risk;
pub mod advice;
pub mod journal;
pub mod pipeline;
pub mod refresh_loop;
