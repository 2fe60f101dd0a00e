//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: loads and verifies the model directory
//! - `forest`: Random Forest classifier over exported tree arrays
//! - `scaler`: standard / min-max scaler
//! - `encoder`: category code table shipped with the model
//! - `sanitize`: clinical-value filtering for logs

pub mod artifacts;
pub mod encoder;
pub mod forest;
pub mod sanitize;
pub mod scaler;

pub use artifacts::{ArtifactError, LoadOptions, ModelArtifacts};
