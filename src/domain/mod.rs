//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. The encoding from a patient record to the
//! classifier's feature vector lives here.

mod patient;
mod prediction;

pub use patient::{
    bounds, Category, ChestPainType, EncodedFeatureVector, ExerciseAngina, PatientRecord,
    RestingEcg, Sex, StSlope, UnknownCategory, FEATURE_COUNT, FEATURE_NAMES,
};
pub use prediction::{Outcome, PredictionResult};
