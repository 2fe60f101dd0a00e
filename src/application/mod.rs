//! Application layer: Use cases and services.
//!
//! Orchestrates domain encoding with the model ports.

mod inference;

pub use inference::{Prediction, PredictionService};
