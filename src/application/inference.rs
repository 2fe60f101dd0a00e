//! Prediction service: encode → scale → classify for one patient.
//!
//! The service holds shared, read-only handles to the fitted artifacts and
//! keeps no per-request state, so successive predictions are independent.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::forest::RandomForest;
use crate::adapters::scaler::FittedScaler;
use crate::adapters::{LoadOptions, ModelArtifacts};
use crate::domain::{EncodedFeatureVector, PatientRecord, PredictionResult};
use crate::ports::{Classifier, ModelError, Scaler};
use crate::HeartcheckError;

/// Class whose probability is reported.
const POSITIVE_CLASS: u8 = 1;

/// Every intermediate of one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Features before scaling
    pub encoded: EncodedFeatureVector,
    /// Features after scaling
    pub scaled: Vec<f64>,
    /// Classifier output
    pub result: PredictionResult,
}

/// Service for single-patient risk prediction.
pub struct PredictionService<S, C>
where
    S: Scaler,
    C: Classifier,
{
    scaler: Arc<S>,
    classifier: Arc<C>,
}

impl<S, C> Clone for PredictionService<S, C>
where
    S: Scaler,
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            scaler: Arc::clone(&self.scaler),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl PredictionService<FittedScaler, RandomForest> {
    /// Build a service over loaded artifacts.
    #[must_use]
    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self::new(Arc::new(artifacts.scaler), Arc::new(artifacts.classifier))
    }

    /// Load the artifacts in `dir` and build a service over them.
    ///
    /// # Errors
    /// Returns `HeartcheckError::Artifact` if any artifact is missing or
    /// unusable. No service exists until every artifact has loaded.
    pub fn load(dir: &Path, options: LoadOptions) -> Result<Self, HeartcheckError> {
        Ok(Self::from_artifacts(ModelArtifacts::load(dir, options)?))
    }
}

impl<S, C> PredictionService<S, C>
where
    S: Scaler,
    C: Classifier,
{
    /// Create a new prediction service.
    pub fn new(scaler: Arc<S>, classifier: Arc<C>) -> Self {
        Self { scaler, classifier }
    }

    /// Run the full pipeline for one record.
    ///
    /// The record is not re-validated here; the input layer enforces bounds.
    ///
    /// # Errors
    /// Returns `HeartcheckError::Model` if scaling or classification fails
    /// or the classifier output is malformed.
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction, HeartcheckError> {
        tracing::debug!("Step 1: Encoding patient record...");
        let encoded = record.encode();

        tracing::debug!("Step 2: Scaling {} features...", encoded.len());
        let scaled = self.scaler.transform(encoded.as_slice())?;

        tracing::debug!("Step 3: Classifying...");
        let label = self.classifier.predict(&scaled)?;
        let proba = self.classifier.predict_proba(&scaled)?;
        let probability = self.positive_probability(&proba)?;

        if label > 1 {
            return Err(ModelError::InvalidOutput(format!("label {label} is not binary")).into());
        }

        let result = PredictionResult::new(label, probability);
        tracing::info!(
            "Prediction complete: label={}, probability={:.2}, outcome={}",
            result.label,
            result.probability,
            result.outcome()
        );

        Ok(Prediction {
            encoded,
            scaled,
            result,
        })
    }

    /// P(label = 1) from a probability row.
    fn positive_probability(&self, proba: &[f64]) -> Result<f64, ModelError> {
        let classes = self.classifier.classes();
        if proba.len() != classes.len() {
            return Err(ModelError::InvalidOutput(format!(
                "{} probabilities for {} classes",
                proba.len(),
                classes.len()
            )));
        }

        let column = classes
            .iter()
            .position(|c| *c == POSITIVE_CLASS)
            .ok_or_else(|| ModelError::InvalidOutput("classifier has no positive class".into()))?;

        let p = proba[column];
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidOutput(format!(
                "probability {p} outside [0, 1]"
            )));
        }
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ChestPainType, ExerciseAngina, Outcome, RestingEcg, Sex, StSlope};
    use crate::ports::FeatureSchema;
    use crate::testing::{scenario_a, write_fixture_dir, FixtureOptions};
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn create_test_service() -> PredictionService<FittedScaler, RandomForest> {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(temp.path(), &FixtureOptions::default());
        let artifacts =
            ModelArtifacts::load(temp.path(), LoadOptions::default()).expect("load fixture");
        PredictionService::from_artifacts(artifacts)
    }

    /// Classifier stub returning a fixed output.
    struct FixedClassifier {
        label: u8,
        proba: Vec<f64>,
    }

    impl FeatureSchema for FixedClassifier {
        fn n_features(&self) -> usize {
            11
        }

        fn feature_names(&self) -> Option<&[String]> {
            None
        }
    }

    impl Classifier for FixedClassifier {
        fn classes(&self) -> &[u8] {
            &[0, 1]
        }

        fn predict(&self, _features: &[f64]) -> Result<u8, ModelError> {
            Ok(self.label)
        }

        fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>, ModelError> {
            Ok(self.proba.clone())
        }
    }

    fn identity_scaler(n: usize) -> FittedScaler {
        serde_json::from_value(serde_json::json!({
            "kind": "standard",
            "n_features": n,
        }))
        .expect("scaler")
    }

    #[test]
    fn test_scenario_a_pipeline() {
        let service = create_test_service();
        let prediction = service.predict(&scenario_a()).expect("predict");

        assert_eq!(
            prediction.encoded.as_slice(),
            &[63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 1.0]
        );
        assert_eq!(prediction.scaled.len(), 11);
        assert_eq!(prediction.result.label, 1);
        assert!((prediction.result.probability - 2.15 / 3.0).abs() < 1e-9);
        assert_eq!(prediction.result.outcome(), Outcome::Positive);
        assert_eq!(
            prediction.result.message(),
            "Pasien kemungkinan memiliki penyakit jantung. Probabilitas: 0.72"
        );
    }

    #[test]
    fn test_default_form_values_are_negative() {
        let service = create_test_service();
        let prediction = service.predict(&PatientRecord::default()).expect("predict");
        assert_eq!(prediction.result.label, 0);
        assert!((prediction.result.probability - 0.25).abs() < 1e-9);
        assert_eq!(
            prediction.result.message(),
            "Pasien kemungkinan *tidak* memiliki penyakit jantung. Probabilitas: 0.25"
        );
    }

    #[test]
    fn test_sequential_predictions_are_independent() {
        let service = create_test_service();

        let alone = service.predict(&PatientRecord::default()).expect("predict");
        let _first = service.predict(&scenario_a()).expect("predict");
        let second = service.predict(&PatientRecord::default()).expect("predict");

        assert_eq!(alone, second);
    }

    #[test]
    fn test_missing_scaler_prevents_service() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(temp.path(), &FixtureOptions::default());
        std::fs::remove_file(temp.path().join("scaler.json")).expect("remove scaler");

        let result = PredictionService::load(temp.path(), LoadOptions::default());
        assert!(matches!(
            result,
            Err(HeartcheckError::Artifact(crate::adapters::ArtifactError::Missing { .. }))
        ));
    }

    #[test]
    fn test_shape_mismatch_propagates() {
        let service = PredictionService::new(
            Arc::new(identity_scaler(9)),
            Arc::new(FixedClassifier {
                label: 0,
                proba: vec![1.0, 0.0],
            }),
        );
        let err = service.predict(&scenario_a()).unwrap_err();
        assert!(matches!(
            err,
            HeartcheckError::Model(ModelError::ShapeMismatch { stage: "scaler", .. })
        ));
    }

    #[test]
    fn test_malformed_probability_row_rejected() {
        let service = PredictionService::new(
            Arc::new(identity_scaler(11)),
            Arc::new(FixedClassifier {
                label: 1,
                proba: vec![1.0],
            }),
        );
        assert!(matches!(
            service.predict(&scenario_a()),
            Err(HeartcheckError::Model(ModelError::InvalidOutput(_)))
        ));
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let service = PredictionService::new(
            Arc::new(identity_scaler(11)),
            Arc::new(FixedClassifier {
                label: 2,
                proba: vec![0.5, 0.5],
            }),
        );
        assert!(service.predict(&scenario_a()).is_err());
    }

    fn pick<C: Category + std::fmt::Debug>() -> impl Strategy<Value = C> {
        (0..C::OPTIONS.len()).prop_map(|i| C::OPTIONS[i])
    }

    prop_compose! {
        fn valid_record()(
            age in 20u32..=100,
            sex in pick::<Sex>(),
            chest_pain_type in pick::<ChestPainType>(),
            resting_bp in 80u32..=200,
            cholesterol in 100u32..=600,
            fasting_bs in any::<bool>(),
            resting_ecg in pick::<RestingEcg>(),
            max_hr in 60u32..=202,
            exercise_angina in pick::<ExerciseAngina>(),
            oldpeak_tenths in 0u32..=100,
            st_slope in pick::<StSlope>(),
        ) -> PatientRecord {
            PatientRecord {
                age,
                sex,
                chest_pain_type,
                resting_bp,
                cholesterol,
                fasting_bs,
                resting_ecg,
                max_hr,
                exercise_angina,
                oldpeak: f64::from(oldpeak_tenths) / 10.0,
                st_slope,
            }
        }
    }

    proptest! {
        /// Same record, same everything.
        #[test]
        fn prop_prediction_deterministic(record in valid_record()) {
            let service = create_test_service();
            let a = service.predict(&record).expect("predict");
            let b = service.predict(&record).expect("predict");
            prop_assert_eq!(a, b);
        }

        /// Output is always a binary label and a probability, consistent
        /// with each other.
        #[test]
        fn prop_output_ranges(record in valid_record()) {
            prop_assert!(record.validate().is_ok());

            let service = create_test_service();
            let prediction = service.predict(&record).expect("predict");
            let result = prediction.result;

            prop_assert_eq!(prediction.encoded.len(), 11);
            prop_assert!(result.label <= 1);
            prop_assert!((0.0..=1.0).contains(&result.probability));
            prop_assert_eq!(result.label == 1, result.probability > 0.5);
        }
    }
}
