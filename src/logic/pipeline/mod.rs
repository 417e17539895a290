//! Pipeline Module
//!
//! fetch -> cache -> classify -> risk -> recommend -> journal, owned by one
//! `Analyzer` constructed at startup and shared by the on-demand path and
//! the refresh loop.
//!
//! ## Usage
//! ```ignore
//! let analyzer = Arc::new(Analyzer::from_config(&config)?);
//! match analyzer.analyze(Utc::now()).await {
//!     Ok(result) => println!("{} risk", result.risk_level),
//!     Err(AnalyzeError::NoData) => println!("no data yet"),
//! }
//! ```

pub mod types;
pub mod analyzer;


pub use types::{AnalysisResult, AnalysisSummary, AnalyzeError, StatusSnapshot};
pub use analyzer::{format_timestamp, Analyzer, AnalyzerSettings};
