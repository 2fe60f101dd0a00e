//! Model ports: traits for the fitted scaler and classifier.
//!
//! These abstract the exported artifacts from the prediction pipeline.
//! Implementations hold fitted parameters only and are never mutated after
//! load, so `&self` methods are safe to call from any thread.

/// Failure while scaling or classifying one feature row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{stage} expected {expected} features, got {got}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid classifier output: {0}")]
    InvalidOutput(String),
}

/// Column layout a fitted artifact was trained on.
pub trait FeatureSchema {
    /// Number of features seen at fit time.
    fn n_features(&self) -> usize;

    /// Feature names recorded at fit time, if the artifact carries them.
    fn feature_names(&self) -> Option<&[String]>;
}

/// A fitted feature scaler.
pub trait Scaler: FeatureSchema + Send + Sync {
    /// Scale one feature row.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if the row length differs from
    /// `n_features()`.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// A fitted binary classifier.
pub trait Classifier: FeatureSchema + Send + Sync {
    /// Class labels in probability-column order.
    fn classes(&self) -> &[u8];

    /// Predicted class label for one (scaled) row.
    ///
    /// # Errors
    /// Returns `ModelError` on shape mismatch or malformed model output.
    fn predict(&self, features: &[f64]) -> Result<u8, ModelError>;

    /// Class probabilities for one (scaled) row, in `classes()` order.
    ///
    /// # Errors
    /// Returns `ModelError` on shape mismatch or malformed model output.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}
