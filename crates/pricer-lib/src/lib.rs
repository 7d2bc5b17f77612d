//! Core library for laptop price prediction
//!
//! This crate provides the core functionality for:
//! - Feature normalization of raw tabular records
//! - Fit-once/apply-many column transformation (scaling + one-hot)
//! - Training orchestration and held-out evaluation
//! - Single-record prediction for the serving endpoint
//! - Artifact registry and remote model store

pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod frame;
pub mod model;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod predict;
pub mod registry;
pub mod schema;
pub mod store;
pub mod training;

pub use error::{PriceError, Result};
pub use models::*;
pub use observability::PricerMetrics;
