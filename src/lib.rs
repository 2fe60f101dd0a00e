//! # heartcheck
//!
//! Heart disease risk prediction for a single patient.
//!
//! One patient record is encoded into a fixed 11-feature vector, scaled and
//! scored by a pre-fitted Random Forest exported from scikit-learn. The result
//! is a binary label with the probability of heart disease.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Patient record, category codes, feature vector, prediction result
//! - `ports`: Scaler and classifier traits
//! - `adapters`: Artifact loading, Random Forest, scalers, log sanitizing
//! - `application`: The encode → scale → classify use case
//! - `config`: Environment configuration
//! - `tui`: Terminal form

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{PatientRecord, PredictionResult};

/// Result type for heartcheck operations
pub type Result<T> = std::result::Result<T, HeartcheckError>;

/// Main error type for heartcheck
#[derive(Debug, thiserror::Error)]
pub enum HeartcheckError {
    #[error("Model artifacts unavailable: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Prediction failed: {0}")]
    Model(#[from] ports::ModelError),
}
