//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! analyze use case on top of the load-once model gateway.

mod analysis;
mod gateway;

pub use analysis::AnalysisService;
pub use gateway::{ModelGateway, ModelHandle, ModelInfo};
