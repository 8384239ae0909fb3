//! Adapters layer: Concrete implementations of ports.
//!
//! - `logistic`: JSON-exported logistic regression classifier
//! - `sanitize`: clinical data filtering for logs

pub mod logistic;
pub mod sanitize;

pub use logistic::{JsonModelLoader, LogisticModel};
