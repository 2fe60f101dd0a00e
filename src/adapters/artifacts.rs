//! Artifact store: loads the fitted model files from the model directory.
//!
//! Three files are required: the classifier, the scaler and the category
//! encoder. All three are checked for presence before any is parsed, so a
//! broken deployment reports every missing file at once. Loading is fatal on
//! any failure; nothing is retried.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use super::encoder::CategoryEncoder;
use super::forest::RandomForest;
use super::scaler::FittedScaler;
use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::FeatureSchema;

/// Classifier file name.
pub const MODEL_FILE: &str = "random_forest.json";
/// Scaler file name.
pub const SCALER_FILE: &str = "scaler.json";
/// Encoder file name.
pub const ENCODER_FILE: &str = "encoder.json";

/// Every file that must exist in the model directory.
pub const REQUIRED_FILES: [&str; 3] = [MODEL_FILE, SCALER_FILE, ENCODER_FILE];

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model file(s) not found in {dir:?}: {}", .files.join(", "))]
    Missing {
        dir: PathBuf,
        files: Vec<&'static str>,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {artifact}: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },

    #[error("Schema mismatch in {artifact}: {reason}")]
    SchemaMismatch {
        artifact: &'static str,
        reason: String,
    },
}

/// SHA-256 digests of the loaded files (lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFingerprints {
    pub model: String,
    pub scaler: String,
    pub encoder: String,
}

impl ArtifactFingerprints {
    /// First 12 hex digits of the model digest, for display.
    #[must_use]
    pub fn short_model(&self) -> &str {
        &self.model[..self.model.len().min(12)]
    }
}

impl fmt::Display for ArtifactFingerprints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model={} scaler={} encoder={}",
            &self.model[..self.model.len().min(12)],
            &self.scaler[..self.scaler.len().min(12)],
            &self.encoder[..self.encoder.len().min(12)],
        )
    }
}

/// Load-time options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Treat encoder disagreements as fatal instead of logging them.
    pub strict_schema: bool,
}

/// The three fitted artifacts, immutable after load.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub classifier: RandomForest,
    pub scaler: FittedScaler,
    pub fingerprints: ArtifactFingerprints,
    /// Encoder disagreements tolerated in non-strict mode.
    pub encoder_warnings: Vec<String>,
}

impl ModelArtifacts {
    /// Load and verify all artifacts from `dir`.
    ///
    /// # Errors
    /// - `ArtifactError::Missing` if any required file is absent
    /// - `ArtifactError::Read` / `Parse` / `Invalid` if a file cannot be used
    /// - `ArtifactError::SchemaMismatch` if the scaler or classifier was fitted
    ///   on a different column layout (or, in strict mode, if the encoder
    ///   codes differ from the built-in table)
    pub fn load(dir: &Path, options: LoadOptions) -> Result<Self, ArtifactError> {
        check_required_files(dir)?;

        // Column layout is checked before internal structure: a model fitted
        // on other columns is reported as such, not as a malformed file.
        let (scaler, scaler_digest): (FittedScaler, _) = read_json(&dir.join(SCALER_FILE))?;
        check_feature_schema(SCALER_FILE, &scaler)?;
        scaler.validate().map_err(|reason| ArtifactError::Invalid {
            artifact: SCALER_FILE,
            reason,
        })?;

        let (classifier, model_digest): (RandomForest, _) = read_json(&dir.join(MODEL_FILE))?;
        check_feature_schema(MODEL_FILE, &classifier)?;
        classifier
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                artifact: MODEL_FILE,
                reason,
            })?;

        let (encoder, encoder_digest): (CategoryEncoder, _) =
            read_json(&dir.join(ENCODER_FILE))?;

        let encoder_warnings = encoder.discrepancies();
        if !encoder_warnings.is_empty() {
            if options.strict_schema {
                return Err(ArtifactError::SchemaMismatch {
                    artifact: ENCODER_FILE,
                    reason: encoder_warnings.join("; "),
                });
            }
            for issue in &encoder_warnings {
                tracing::warn!("Encoder artifact disagrees with built-in codes: {}", issue);
            }
        }

        let fingerprints = ArtifactFingerprints {
            model: model_digest,
            scaler: scaler_digest,
            encoder: encoder_digest,
        };

        tracing::info!(
            "Loaded model artifacts from {:?} (trees={}, scaler={}, {})",
            dir,
            classifier.n_estimators(),
            scaler.kind(),
            fingerprints
        );

        Ok(Self {
            classifier,
            scaler,
            fingerprints,
            encoder_warnings,
        })
    }
}

/// Fail with every missing required file.
///
/// # Errors
/// Returns `ArtifactError::Missing` listing the absent files.
pub fn check_required_files(dir: &Path) -> Result<(), ArtifactError> {
    let missing: Vec<&'static str> = REQUIRED_FILES
        .iter()
        .copied()
        .filter(|name| !dir.join(name).is_file())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::error!("Missing model files in {:?}: {:?}", dir, missing);
        Err(ArtifactError::Missing {
            dir: dir.to_path_buf(),
            files: missing,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<(T, String), ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((value, sha256_hex_bytes(&bytes)))
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Assert an artifact was fitted on the same columns, in the same order, as
/// the feature vector is assembled.
fn check_feature_schema<A: FeatureSchema>(
    artifact: &'static str,
    fitted: &A,
) -> Result<(), ArtifactError> {
    let n_features = fitted.n_features();
    if n_features != FEATURE_COUNT {
        return Err(ArtifactError::SchemaMismatch {
            artifact,
            reason: format!("fitted on {n_features} features, expected {FEATURE_COUNT}"),
        });
    }

    match fitted.feature_names() {
        Some(names) => {
            if let Some((i, (got, want))) = names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .enumerate()
                .find(|(_, (got, want))| got.as_str() != **want)
            {
                return Err(ArtifactError::SchemaMismatch {
                    artifact,
                    reason: format!("column {i} is {got:?}, expected {want:?}"),
                });
            }
        }
        None => {
            tracing::warn!(
                "{} carries no feature names; relying on positional column order",
                artifact
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_fixture_dir, FixtureOptions};
    use tempfile::tempdir;

    #[test]
    fn test_load_fixture() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(temp.path(), &FixtureOptions::default());

        let artifacts =
            ModelArtifacts::load(temp.path(), LoadOptions::default()).expect("load artifacts");
        assert!(artifacts.classifier.n_estimators() > 0);
        assert_eq!(artifacts.fingerprints.model.len(), 64);
        assert_eq!(artifacts.fingerprints.short_model().len(), 12);
        assert!(artifacts.encoder_warnings.is_empty());
    }

    #[test]
    fn test_missing_scaler_is_reported() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(temp.path(), &FixtureOptions::default());
        std::fs::remove_file(temp.path().join(SCALER_FILE)).expect("remove scaler");

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).unwrap_err();
        match err {
            ArtifactError::Missing { files, .. } => assert_eq!(files, vec![SCALER_FILE]),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_all_missing_files_listed() {
        let temp = tempdir().expect("tempdir");
        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).unwrap_err();
        let message = err.to_string();
        for name in REQUIRED_FILES {
            assert!(message.contains(name), "{message}");
        }
    }

    #[test]
    fn test_corrupt_model_is_parse_error() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(temp.path(), &FixtureOptions::default());
        std::fs::write(temp.path().join(MODEL_FILE), b"\x80\x04\x95 not json").expect("write");

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn test_ragged_tree_is_invalid() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(temp.path(), &FixtureOptions::default());
        let ragged = serde_json::json!({
            "classes": [0, 1],
            "n_features": FEATURE_COUNT,
            "feature_names": FEATURE_NAMES,
            "trees": [{
                "children_left": [1, -1, -1],
                "children_right": [2, -1],
                "feature": [10, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [[5, 5], [4, 1], [1, 4]]
            }]
        });
        std::fs::write(temp.path().join(MODEL_FILE), ragged.to_string()).expect("write");

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).unwrap_err();
        assert!(
            matches!(
                err,
                ArtifactError::Invalid {
                    artifact: MODEL_FILE,
                    ..
                }
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_reordered_columns_rejected() {
        let temp = tempdir().expect("tempdir");
        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        names.swap(0, 3);
        write_fixture_dir(
            temp.path(),
            &FixtureOptions {
                feature_names: Some(names),
                ..FixtureOptions::default()
            },
        );

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).unwrap_err();
        match err {
            ArtifactError::SchemaMismatch { reason, .. } => {
                assert!(reason.contains("column 0"), "{reason}")
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(
            temp.path(),
            &FixtureOptions {
                n_features: 9,
                feature_names: None,
                ..FixtureOptions::default()
            },
        );

        let err = ModelArtifacts::load(temp.path(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ArtifactError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_encoder_mismatch_warns_unless_strict() {
        let temp = tempdir().expect("tempdir");
        write_fixture_dir(
            temp.path(),
            &FixtureOptions {
                swap_sex_codes: true,
                ..FixtureOptions::default()
            },
        );

        let lenient =
            ModelArtifacts::load(temp.path(), LoadOptions::default()).expect("lenient load");
        assert_eq!(lenient.encoder_warnings.len(), 2);

        let strict = ModelArtifacts::load(temp.path(), LoadOptions { strict_schema: true });
        assert!(matches!(
            strict,
            Err(ArtifactError::SchemaMismatch {
                artifact: ENCODER_FILE,
                ..
            })
        ));
    }
}
