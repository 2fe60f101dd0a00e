//! Test fixtures: a small hand-built model directory.
//!
//! The forest has three trees over standardized features:
//! - `ST_Slope` above its mean (Flat/Down) leans positive
//! - `ChestPainType` ASY leans positive
//! - high `Oldpeak`, then exercise angina, leans positive
//!
//! The sample patient in [`scenario_a`] scores ~0.72 (label 1) and the form
//! defaults score 0.25 (label 0).

use std::path::Path;

use serde_json::json;

use crate::adapters::artifacts::{ENCODER_FILE, MODEL_FILE, SCALER_FILE};
use crate::domain::{
    ChestPainType, ExerciseAngina, PatientRecord, RestingEcg, Sex, StSlope, FEATURE_NAMES,
};

pub const SCALER_MEAN: [f64; 11] = [
    53.5, 0.79, 2.25, 132.4, 198.8, 0.23, 0.6, 136.8, 0.4, 0.89, 0.64,
];
pub const SCALER_SCALE: [f64; 11] = [
    9.4, 0.41, 1.0, 18.5, 109.3, 0.42, 0.81, 25.4, 0.49, 1.07, 0.6,
];

pub struct FixtureOptions {
    pub n_features: usize,
    pub feature_names: Option<Vec<String>>,
    pub swap_sex_codes: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            n_features: FEATURE_NAMES.len(),
            feature_names: Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect()),
            swap_sex_codes: false,
        }
    }
}

/// Write `random_forest.json`, `scaler.json` and `encoder.json` into `dir`.
pub fn write_fixture_dir(dir: &Path, options: &FixtureOptions) {
    let n = options.n_features;

    let mut scaler = json!({
        "kind": "standard",
        "n_features": n,
        "mean": &SCALER_MEAN[..n.min(11)],
        "scale": &SCALER_SCALE[..n.min(11)],
    });
    let mut forest = json!({
        "classes": [0, 1],
        "n_features": n,
        "trees": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [10, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [[105.0, 95.0], [80.0, 20.0], [25.0, 75.0]]
            },
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [2, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [[0.45, 0.55], [0.7, 0.3], [0.2, 0.8]]
            },
            {
                "children_left": [1, -1, 3, -1, -1],
                "children_right": [2, -1, 4, -1, -1],
                "feature": [9, -2, 8, -2, -2],
                "threshold": [0.0, -2.0, 0.0, -2.0, -2.0],
                "value": [[125.0, 175.0], [75.0, 25.0], [50.0, 150.0], [40.0, 60.0], [10.0, 90.0]]
            }
        ]
    });
    if let Some(names) = &options.feature_names {
        scaler["feature_names"] = json!(names);
        forest["feature_names"] = json!(names);
    }

    let sex = if options.swap_sex_codes {
        json!({"Female": 1, "Male": 0})
    } else {
        json!({"Perempuan": 0, "Laki-laki": 1})
    };
    let encoder = json!({
        "mappings": {
            "Sex": sex,
            "ChestPainType": {"NAP": 0, "ATA": 1, "TA": 2, "ASY": 3},
            "RestingECG": {"Normal": 0, "ST": 1, "LVH": 2},
            "ExerciseAngina": {"N": 0, "Y": 1},
            "ST_Slope": {"Up": 0, "Flat": 1, "Down": 2}
        }
    });

    for (name, value) in [
        (MODEL_FILE, forest),
        (SCALER_FILE, scaler),
        (ENCODER_FILE, encoder),
    ] {
        let body = serde_json::to_vec_pretty(&value).expect("serialize fixture");
        std::fs::write(dir.join(name), body).expect("write fixture");
    }
}

/// The worked example: 63-year-old male, asymptomatic chest pain, flat slope.
pub fn scenario_a() -> PatientRecord {
    PatientRecord {
        age: 63,
        sex: Sex::Male,
        chest_pain_type: ChestPainType::Asy,
        resting_bp: 145,
        cholesterol: 233,
        fasting_bs: true,
        resting_ecg: RestingEcg::Normal,
        max_hr: 150,
        exercise_angina: ExerciseAngina::No,
        oldpeak: 2.3,
        st_slope: StSlope::Flat,
    }
}
