//! Scaler adapter: applies an exported scikit-learn scaler.
//!
//! Supports `StandardScaler` (`(x - mean_) / scale_`) and `MinMaxScaler`
//! (`x * scale_ + min_`), matching scikit-learn's `transform`.

use serde::{Deserialize, Serialize};

use crate::ports::{FeatureSchema, ModelError, Scaler};

/// Fitted parameters, tagged by scaler kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    /// `StandardScaler`. `mean` is absent when fitted with `with_mean=False`,
    /// `scale` when fitted with `with_std=False`.
    Standard {
        #[serde(default)]
        mean: Option<Vec<f64>>,
        #[serde(default)]
        scale: Option<Vec<f64>>,
    },
    /// `MinMaxScaler`.
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// Fitted scaler, loaded from `scaler.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedScaler {
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub params: ScalerParams,
}

impl FittedScaler {
    /// Short name of the scaler kind, for logs and the UI.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.params {
            ScalerParams::Standard { .. } => "standard",
            ScalerParams::MinMax { .. } => "min_max",
        }
    }

    /// Sanity-check parameter shapes.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.n_features;
        if n == 0 {
            return Err("n_features must be positive".into());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != n {
                return Err(format!(
                    "feature_names has {} entries but n_features is {n}",
                    names.len()
                ));
            }
        }

        let check = |name: &str, v: &[f64]| -> Result<(), String> {
            if v.len() != n {
                return Err(format!("{name} has {} entries, expected {n}", v.len()));
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(format!("{name} contains non-finite values"));
            }
            Ok(())
        };

        match &self.params {
            ScalerParams::Standard { mean, scale } => {
                if let Some(mean) = mean {
                    check("mean", mean)?;
                }
                if let Some(scale) = scale {
                    check("scale", scale)?;
                    if scale.iter().any(|s| *s == 0.0) {
                        return Err("scale contains zeros".into());
                    }
                }
            }
            ScalerParams::MinMax { min, scale } => {
                check("min", min)?;
                check("scale", scale)?;
            }
        }
        Ok(())
    }
}

impl FeatureSchema for FittedScaler {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

impl Scaler for FittedScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                stage: "scaler",
                expected: self.n_features,
                got: features.len(),
            });
        }

        let scaled = match &self.params {
            ScalerParams::Standard { mean, scale } => features
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    let centered = mean.as_ref().map_or(*x, |m| x - m[i]);
                    scale.as_ref().map_or(centered, |s| centered / s[i])
                })
                .collect(),
            ScalerParams::MinMax { min, scale } => features
                .iter()
                .zip(scale.iter().zip(min.iter()))
                .map(|(x, (s, m))| x * s + m)
                .collect(),
        };

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_transform() {
        let scaler: FittedScaler = serde_json::from_str(
            r#"{"kind": "standard", "n_features": 2, "mean": [10.0, 0.0], "scale": [2.0, 0.5]}"#,
        )
        .expect("parse");
        scaler.validate().expect("valid");
        assert_eq!(scaler.kind(), "standard");

        let out = scaler.transform(&[14.0, 1.0]).expect("transform");
        assert_eq!(out, vec![2.0, 2.0]);
    }

    #[test]
    fn test_standard_without_mean() {
        let scaler: FittedScaler =
            serde_json::from_str(r#"{"kind": "standard", "n_features": 1, "scale": [4.0]}"#)
                .expect("parse");
        scaler.validate().expect("valid");
        assert_eq!(scaler.transform(&[2.0]).expect("transform"), vec![0.5]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler: FittedScaler = serde_json::from_str(
            r#"{"kind": "min_max", "n_features": 2, "min": [-0.25, 0.0], "scale": [0.0125, 1.0]}"#,
        )
        .expect("parse");
        scaler.validate().expect("valid");

        let out = scaler.transform(&[60.0, 1.0]).expect("transform");
        assert!((out[0] - 0.5).abs() < 1e-12);
        assert!((out[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler: FittedScaler = serde_json::from_str(
            r#"{"kind": "min_max", "n_features": 2, "min": [0.0, 0.0], "scale": [1.0, 1.0]}"#,
        )
        .expect("parse");
        let err = scaler.transform(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ShapeMismatch {
                stage: "scaler",
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let short: FittedScaler = serde_json::from_str(
            r#"{"kind": "standard", "n_features": 3, "mean": [0.0], "scale": [1.0, 1.0, 1.0]}"#,
        )
        .expect("parse");
        assert!(short.validate().is_err());

        let zero_scale: FittedScaler = serde_json::from_str(
            r#"{"kind": "standard", "n_features": 1, "mean": [0.0], "scale": [0.0]}"#,
        )
        .expect("parse");
        assert!(zero_scale.validate().is_err());
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let parsed = serde_json::from_str::<FittedScaler>(
            r#"{"kind": "robust", "n_features": 1, "center": [0.0]}"#,
        );
        assert!(parsed.is_err());
    }
}
