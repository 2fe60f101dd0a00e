//! Category encoder artifact.
//!
//! The encoder exported next to the model records the category codes used at
//! training time. Encoding itself never consults it (codes are compiled into
//! the domain types); it is only compared against the built-in table so a
//! retrained model with different codes is noticed at startup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Category, ChestPainType, ExerciseAngina, RestingEcg, Sex, StSlope};

/// Category code tables, keyed by column then category label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    pub mappings: BTreeMap<String, BTreeMap<String, i64>>,
}

impl CategoryEncoder {
    /// Every way this table disagrees with the built-in codes.
    ///
    /// Labels are matched the way the form parses them, so the original
    /// Indonesian labels for `Sex` are accepted.
    #[must_use]
    pub fn discrepancies(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.check_column::<Sex>(&mut out);
        self.check_column::<ChestPainType>(&mut out);
        self.check_column::<RestingEcg>(&mut out);
        self.check_column::<ExerciseAngina>(&mut out);
        self.check_column::<StSlope>(&mut out);
        out
    }

    fn check_column<C: Category>(&self, out: &mut Vec<String>) {
        let Some(table) = self.mappings.get(C::COLUMN) else {
            out.push(format!("{}: column missing", C::COLUMN));
            return;
        };

        let mut seen: Vec<C> = Vec::with_capacity(C::OPTIONS.len());
        for (label, code) in table {
            match C::parse_label(label) {
                Some(category) => {
                    let expected = i64::from(category.code());
                    if *code != expected {
                        out.push(format!(
                            "{}: {label} encoded as {code}, expected {expected}",
                            C::COLUMN
                        ));
                    }
                    seen.push(category);
                }
                None => out.push(format!("{}: unknown category {label:?}", C::COLUMN)),
            }
        }

        for option in C::OPTIONS {
            if !seen.contains(option) {
                out.push(format!("{}: no code for {}", C::COLUMN, option.label()));
            }
        }
    }
}
