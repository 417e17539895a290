//! API Module
//!
//! Wire shapes for collaborators (dashboard, HTTP layer, CLI output).
//! No routing here.
//!
//! Structure:
//! - request.rs: simulate request parsing
//! - response.rs: analysis and error responses
//!
//! The status snapshot (`logic::pipeline::StatusSnapshot`) is serialized as is.

pub mod request;
pub mod response;

pub use request::{RequestError, SensorDataInput, SimulateRequest};
pub use response::{AnalysisBody, AnalysisResponse, ErrorResponse, SensorData};
