//! Patient record types for heart disease risk prediction.
//!
//! Field set and category codes follow the heart failure prediction dataset
//! the classifier was fitted on. The category codes are fixed: there is no
//! inverse-encoder metadata at runtime, so they must match the codes used
//! when the model was trained.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 11;

/// Column names in assembly order. Must match the order the scaler and
/// classifier were fitted on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Sex",
    "ChestPainType",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "RestingECG",
    "MaxHR",
    "ExerciseAngina",
    "Oldpeak",
    "ST_Slope",
];

/// Accepted ranges for the numeric fields, as enforced by the input form.
pub mod bounds {
    use std::ops::RangeInclusive;

    pub const AGE: RangeInclusive<u32> = 20..=100;
    pub const RESTING_BP: RangeInclusive<u32> = 80..=200;
    pub const CHOLESTEROL: RangeInclusive<u32> = 100..=600;
    pub const MAX_HR: RangeInclusive<u32> = 60..=202;
    pub const OLDPEAK: RangeInclusive<f64> = 0.0..=10.0;
    /// Oldpeak is entered in tenths.
    pub const OLDPEAK_STEP: f64 = 0.1;
}

/// A closed set of category labels with a fixed integer code per label.
pub trait Category: Copy + PartialEq + Sized + 'static {
    /// Column name in the feature vector.
    const COLUMN: &'static str;

    /// All options, in the order the input form presents them.
    const OPTIONS: &'static [Self];

    /// Integer code fed to the classifier.
    fn code(self) -> u8;

    /// Display label (also the canonical text form).
    fn label(self) -> &'static str;

    /// Parse a label, case-insensitively.
    fn parse_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::OPTIONS
            .iter()
            .copied()
            .find(|opt| opt.label().eq_ignore_ascii_case(s))
    }

    /// Next option in form order, wrapping around.
    fn next(self) -> Self {
        let idx = Self::OPTIONS.iter().position(|o| *o == self).unwrap_or(0);
        Self::OPTIONS[(idx + 1) % Self::OPTIONS.len()]
    }

    /// Previous option in form order, wrapping around.
    fn prev(self) -> Self {
        let idx = Self::OPTIONS.iter().position(|o| *o == self).unwrap_or(0);
        Self::OPTIONS[(idx + Self::OPTIONS.len() - 1) % Self::OPTIONS.len()]
    }
}

/// Error returned when a category label is not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {column} category {value:?}")]
pub struct UnknownCategory {
    pub column: &'static str,
    pub value: String,
}

fn parse_category<C: Category>(s: &str) -> Result<C, UnknownCategory> {
    C::parse_label(s).ok_or_else(|| UnknownCategory {
        column: C::COLUMN,
        value: s.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(alias = "Laki-laki")]
    Male,
    #[serde(alias = "Perempuan")]
    Female,
}

impl Category for Sex {
    const COLUMN: &'static str = "Sex";
    const OPTIONS: &'static [Self] = &[Self::Male, Self::Female];

    fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    fn parse_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::OPTIONS
            .iter()
            .copied()
            .find(|opt| opt.form_label() == s || opt.label().eq_ignore_ascii_case(s))
    }
}

impl Sex {
    /// Indonesian label shown on the input form.
    #[must_use]
    pub fn form_label(self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }
}

/// Chest pain type: non-anginal pain, atypical angina, typical angina, asymptomatic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChestPainType {
    Nap,
    Ata,
    Ta,
    Asy,
}

impl Category for ChestPainType {
    const COLUMN: &'static str = "ChestPainType";
    const OPTIONS: &'static [Self] = &[Self::Nap, Self::Ata, Self::Ta, Self::Asy];

    fn code(self) -> u8 {
        match self {
            Self::Nap => 0,
            Self::Ata => 1,
            Self::Ta => 2,
            Self::Asy => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Nap => "NAP",
            Self::Ata => "ATA",
            Self::Ta => "TA",
            Self::Asy => "ASY",
        }
    }
}

/// Resting electrocardiogram result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestingEcg {
    Normal,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "LVH")]
    Lvh,
}

impl Category for RestingEcg {
    const COLUMN: &'static str = "RestingECG";
    const OPTIONS: &'static [Self] = &[Self::Normal, Self::St, Self::Lvh];

    fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::St => 1,
            Self::Lvh => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::St => "ST",
            Self::Lvh => "LVH",
        }
    }
}

/// Exercise-induced angina.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseAngina {
    #[serde(rename = "N")]
    No,
    #[serde(rename = "Y")]
    Yes,
}

impl Category for ExerciseAngina {
    const COLUMN: &'static str = "ExerciseAngina";
    const OPTIONS: &'static [Self] = &[Self::No, Self::Yes];

    fn code(self) -> u8 {
        match self {
            Self::No => 0,
            Self::Yes => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::No => "N",
            Self::Yes => "Y",
        }
    }
}

/// Slope of the peak exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

impl Category for StSlope {
    const COLUMN: &'static str = "ST_Slope";
    const OPTIONS: &'static [Self] = &[Self::Up, Self::Flat, Self::Down];

    fn code(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Flat => 1,
            Self::Down => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Flat => "Flat",
            Self::Down => "Down",
        }
    }
}

macro_rules! impl_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = UnknownCategory;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_category(s)
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

impl_from_str!(Sex, ChestPainType, RestingEcg, ExerciseAngina, StSlope);

/// One patient's clinical measurements, as entered in the form.
///
/// Serialized field names match the dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "ChestPainType")]
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure in mm Hg
    #[serde(rename = "RestingBP")]
    pub resting_bp: u32,
    /// Serum cholesterol in mg/dl
    #[serde(rename = "Cholesterol")]
    pub cholesterol: u32,
    /// Fasting blood sugar > 120 mg/dl
    #[serde(rename = "FastingBS", with = "bool_as_int")]
    pub fasting_bs: bool,
    #[serde(rename = "RestingECG")]
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved
    #[serde(rename = "MaxHR")]
    pub max_hr: u32,
    #[serde(rename = "ExerciseAngina")]
    pub exercise_angina: ExerciseAngina,
    /// ST depression induced by exercise relative to rest
    #[serde(rename = "Oldpeak")]
    pub oldpeak: f64,
    #[serde(rename = "ST_Slope")]
    pub st_slope: StSlope,
}

mod bool_as_int {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match u8::deserialize(d)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "FastingBS must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl Default for PatientRecord {
    /// The form's initial values.
    fn default() -> Self {
        Self {
            age: 40,
            sex: Sex::Male,
            chest_pain_type: ChestPainType::Nap,
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: false,
            resting_ecg: RestingEcg::Normal,
            max_hr: 150,
            exercise_angina: ExerciseAngina::No,
            oldpeak: 0.0,
            st_slope: StSlope::Up,
        }
    }
}

impl PatientRecord {
    /// Encode the record into the classifier's feature order.
    ///
    /// Pure and total: every record has exactly one encoding.
    #[must_use]
    pub fn encode(&self) -> EncodedFeatureVector {
        EncodedFeatureVector([
            f64::from(self.age),
            f64::from(self.sex.code()),
            f64::from(self.chest_pain_type.code()),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(u8::from(self.fasting_bs)),
            f64::from(self.resting_ecg.code()),
            f64::from(self.max_hr),
            f64::from(self.exercise_angina.code()),
            self.oldpeak,
            f64::from(self.st_slope.code()),
        ])
    }

    /// Check every numeric field against the form bounds.
    ///
    /// The inference core does not call this; the input layer does.
    ///
    /// # Errors
    /// Returns one message per violated bound.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "Age", self.age, &bounds::AGE);
        check_range(&mut errors, "RestingBP", self.resting_bp, &bounds::RESTING_BP);
        check_range(&mut errors, "Cholesterol", self.cholesterol, &bounds::CHOLESTEROL);
        check_range(&mut errors, "MaxHR", self.max_hr, &bounds::MAX_HR);

        if !self.oldpeak.is_finite() || !bounds::OLDPEAK.contains(&self.oldpeak) {
            errors.push(format!(
                "Oldpeak {} out of range [{}, {}]",
                self.oldpeak,
                bounds::OLDPEAK.start(),
                bounds::OLDPEAK.end()
            ));
        } else if !is_step_multiple(self.oldpeak, bounds::OLDPEAK_STEP) {
            errors.push(format!(
                "Oldpeak {} must be a multiple of {}",
                self.oldpeak,
                bounds::OLDPEAK_STEP
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_range(errors: &mut Vec<String>, name: &str, value: u32, range: &RangeInclusive<u32>) {
    if !range.contains(&value) {
        errors.push(format!(
            "{name} {value} out of range [{}, {}]",
            range.start(),
            range.end()
        ));
    }
}

fn is_step_multiple(value: f64, step: f64) -> bool {
    let steps = value / step;
    (steps - steps.round()).abs() < 1e-6
}

/// Ordered numeric features for one patient, before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedFeatureVector([f64; FEATURE_COUNT]);

impl EncodedFeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        FEATURE_COUNT
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
