//! Weight units and the fixed conversion table between them.
//!
//! Conversion is a pure, total function: it never fails and never validates
//! its input. Rejecting negative weights is the job of the gear model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GreerError;

/// Unit a weight is stored or displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Ounces,
    Pounds,
    Grams,
    Kilograms,
}

impl WeightUnit {
    pub const ALL: [WeightUnit; 4] = [
        WeightUnit::Ounces,
        WeightUnit::Pounds,
        WeightUnit::Grams,
        WeightUnit::Kilograms,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Ounces => "oz",
            WeightUnit::Pounds => "lb",
            WeightUnit::Grams => "g",
            WeightUnit::Kilograms => "kg",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeightUnit::Ounces => "ounces",
            WeightUnit::Pounds => "pounds",
            WeightUnit::Grams => "grams",
            WeightUnit::Kilograms => "kilograms",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeightUnit {
    type Err = GreerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        WeightUnit::ALL
            .into_iter()
            .find(|unit| unit.name() == needle || unit.abbreviation() == needle)
            .ok_or_else(|| GreerError::UnknownUnit {
                value: s.to_string(),
            })
    }
}

/// Multiplicative factor taking a weight in `from` to a weight in `to`.
pub fn conversion_factor(from: WeightUnit, to: WeightUnit) -> f64 {
    use WeightUnit::*;

    match (from, to) {
        (Ounces, Ounces) | (Pounds, Pounds) | (Grams, Grams) | (Kilograms, Kilograms) => 1.0,
        (Ounces, Pounds) => 1.0 / 16.0,
        (Ounces, Grams) => 28.3495,
        (Ounces, Kilograms) => 0.0283495,
        (Pounds, Ounces) => 16.0,
        (Pounds, Grams) => 453.592,
        (Pounds, Kilograms) => 0.453592,
        (Grams, Ounces) => 1.0 / 28.3495,
        (Grams, Pounds) => 1.0 / 453.592,
        (Grams, Kilograms) => 0.001,
        (Kilograms, Ounces) => 1.0 / 0.0283495,
        (Kilograms, Pounds) => 2.20462,
        (Kilograms, Grams) => 1000.0,
    }
}

/// Convert `value` from one unit to another.
///
/// Same-unit conversion returns `value` untouched, so it is exact.
pub fn convert(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    if from == to {
        return value;
    }
    value * conversion_factor(from, to)
}
