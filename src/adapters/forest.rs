//! Random Forest adapter: evaluates an exported scikit-learn forest.
//!
//! The artifact mirrors scikit-learn's flat tree arrays (`tree_.children_left`,
//! `children_right`, `feature`, `threshold`, `value`), so an exported forest
//! scores bit-for-bit like the fitted Python object.

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, FeatureSchema, ModelError};

/// Marker for "no child" in scikit-learn tree arrays.
const TREE_LEAF: i64 = -1;

/// Class labels the pipeline accepts, in probability-column order.
const BINARY_CLASSES: [u8; 2] = [0, 1];

/// One fitted decision tree in flat array form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (or fractions), one entry per class.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    /// Check structural invariants so `leaf_for` always terminates in bounds.
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!(
                "tree arrays differ in length (children_left={}, children_right={}, feature={}, threshold={}, value={})",
                n,
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                self.value.len()
            ));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];

            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("node {node} has only a right child"));
                }
                let row = &self.value[node];
                if row.len() != n_classes {
                    return Err(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        row.len()
                    ));
                }
                if row.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {node} has a negative or non-finite weight"));
                }
                if row.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {node} has zero total weight"));
                }
                continue;
            }

            // Children always follow their parent in scikit-learn's node order;
            // requiring it here rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} has out-of-range child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {node} has a NaN threshold"));
            }
        }

        Ok(())
    }

    /// Index of the leaf a row falls into.
    ///
    /// scikit-learn evaluates trees on `float32` inputs, so features are
    /// narrowed before comparison against the `float64` thresholds.
    fn leaf_for(&self, features: &[f64]) -> usize {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let x = features[self.feature[node] as usize] as f32;
            node = if f64::from(x) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Class probabilities from this tree alone.
    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let row = &self.value[self.leaf_for(features)];
        let total: f64 = row.iter().sum();
        row.iter().map(|w| w / total).collect()
    }
}

/// Fitted Random Forest classifier, loaded from `random_forest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<u8>,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Number of trees in the ensemble.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Sanity-check the exported structure.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes != BINARY_CLASSES {
            return Err(format!(
                "expected binary classes {:?}, got {:?}",
                BINARY_CLASSES, self.classes
            ));
        }
        if self.n_features == 0 {
            return Err("n_features must be positive".into());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(format!(
                    "feature_names has {} entries but n_features is {}",
                    names.len(),
                    self.n_features
                ));
            }
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    fn check_shape(&self, features: &[f64]) -> Result<(), ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                stage: "classifier",
                expected: self.n_features,
                got: features.len(),
            });
        }
        Ok(())
    }
}

impl FeatureSchema for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

impl Classifier for RandomForest {
    fn classes(&self) -> &[u8] {
        &self.classes
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        let proba = self.predict_proba(features)?;

        // First maximal column wins, as with numpy's argmax.
        let mut best = 0usize;
        for (i, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = i;
            }
        }

        self.classes
            .get(best)
            .copied()
            .ok_or_else(|| ModelError::InvalidOutput(format!("no class at column {best}")))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.check_shape(features)?;

        let mut sum = vec![0.0f64; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(sum.into_iter().map(|s| s / n_trees).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depth-1 stump on feature 0: x <= 0.5 goes left.
    fn stump(left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest(trees: Vec<DecisionTree>) -> RandomForest {
        RandomForest {
            classes: vec![0, 1],
            n_features: 2,
            feature_names: None,
            trees,
        }
    }

    #[test]
    fn test_single_tree_routes_by_threshold() {
        let rf = forest(vec![stump([8.0, 2.0], [1.0, 3.0])]);
        rf.validate().expect("valid forest");

        let left = rf.predict_proba(&[0.5, 0.0]).expect("proba");
        assert!((left[1] - 0.2).abs() < 1e-12);
        assert_eq!(rf.predict(&[0.5, 0.0]).expect("predict"), 0);

        let right = rf.predict_proba(&[0.6, 0.0]).expect("proba");
        assert!((right[1] - 0.75).abs() < 1e-12);
        assert_eq!(rf.predict(&[0.6, 0.0]).expect("predict"), 1);
    }

    #[test]
    fn test_forest_averages_tree_probabilities() {
        let rf = forest(vec![
            stump([1.0, 0.0], [0.0, 1.0]),
            stump([0.5, 0.5], [0.5, 0.5]),
        ]);
        let proba = rf.predict_proba(&[1.0, 0.0]).expect("proba");
        assert!((proba[0] - 0.25).abs() < 1e-12);
        assert!((proba[1] - 0.75).abs() < 1e-12);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let rf = forest(vec![stump([0.5, 0.5], [0.5, 0.5])]);
        assert_eq!(rf.predict(&[0.0, 0.0]).expect("predict"), 0);
    }

    #[test]
    fn test_comparison_uses_float32_features() {
        // 0.1 as f32 is slightly above 0.1 as f64, so it must go right of a
        // threshold equal to the f64 value.
        let mut tree = stump([1.0, 0.0], [0.0, 1.0]);
        tree.threshold[0] = 0.1;
        let rf = forest(vec![tree]);
        assert_eq!(rf.predict(&[0.1, 0.0]).expect("predict"), 1);
    }

    #[test]
    fn test_shape_mismatch() {
        let rf = forest(vec![stump([1.0, 0.0], [0.0, 1.0])]);
        let err = rf.predict_proba(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                stage: "classifier",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_validate_rejects_cycles_and_bad_features() {
        let mut cyclic = stump([1.0, 0.0], [0.0, 1.0]);
        cyclic.children_left[0] = 0;
        assert!(forest(vec![cyclic]).validate().is_err());

        let mut bad_feature = stump([1.0, 0.0], [0.0, 1.0]);
        bad_feature.feature[0] = 7;
        assert!(forest(vec![bad_feature]).validate().is_err());

        let mut ragged = stump([1.0, 0.0], [0.0, 1.0]);
        ragged.threshold.pop();
        assert!(forest(vec![ragged]).validate().is_err());

        assert!(forest(vec![]).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_binary_classes() {
        let mut rf = forest(vec![stump([1.0, 0.0], [0.0, 1.0])]);
        rf.classes = vec![1, 2];
        assert!(rf.validate().is_err());
    }

    #[test]
    fn test_deserializes_exported_json() {
        let json = r#"{
            "classes": [0, 1],
            "n_features": 1,
            "trees": [{
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [0, -2, -2],
                "threshold": [10.0, -2.0, -2.0],
                "value": [[5, 5], [4, 1], [1, 4]]
            }]
        }"#;
        let rf: RandomForest = serde_json::from_str(json).expect("parse");
        rf.validate().expect("valid");
        assert_eq!(rf.n_estimators(), 1);
        assert!(rf.feature_names().is_none());
        assert_eq!(rf.predict(&[11.0]).expect("predict"), 1);
    }
}
