//! Prediction result types.
//!
//! Represents the classifier output for one patient and how it is shown.

use serde::{Deserialize, Serialize};

/// Binary outcome of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Label 0: no heart disease indicated
    Negative,
    /// Label 1: heart disease indicated
    Positive,
}

impl Outcome {
    /// Outcome for a classifier label. Anything other than 1 is negative.
    #[must_use]
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Short description for headers.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Negative => "No heart disease indicated",
            Self::Positive => "Heart disease indicated",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub const fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Negative => (16, 185, 129), // Emerald (#10B981)
            Self::Positive => (244, 63, 94),  // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "NEGATIVE"),
            Self::Positive => write!(f, "POSITIVE"),
        }
    }
}

/// Result of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary prediction (0 = no disease, 1 = disease present)
    pub label: u8,

    /// Probability of label 1 (0.0 to 1.0)
    pub probability: f64,
}

impl PredictionResult {
    #[must_use]
    pub fn new(label: u8, probability: f64) -> Self {
        Self { label, probability }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::from_label(self.label)
    }

    /// Probability of the predicted label.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.outcome() {
            Outcome::Positive => self.probability,
            Outcome::Negative => 1.0 - self.probability,
        }
    }

    /// The user-facing message. The probability is always P(label = 1).
    #[must_use]
    pub fn message(&self) -> String {
        match self.outcome() {
            Outcome::Positive => format!(
                "Pasien kemungkinan memiliki penyakit jantung. Probabilitas: {:.2}",
                self.probability
            ),
            Outcome::Negative => format!(
                "Pasien kemungkinan *tidak* memiliki penyakit jantung. Probabilitas: {:.2}",
                self.probability
            ),
        }
    }
}
