//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the prediction pipeline and the fitted model artifacts.

mod model;

pub use model::{Classifier, FeatureSchema, ModelError, Scaler};
