//! User preferences consumed when new gear and packs are created.
//!
//! Settings are plain values handed to constructors; nothing in the core
//! reads them from global state or writes them back. Changing a default never
//! converts gear or packs that already exist.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GreerError;
use crate::units::WeightUnit;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub default_gear_weight_unit: WeightUnit,
    pub default_pack_weight_unit: WeightUnit,
    pub icloud_sync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_gear_weight_unit: WeightUnit::Ounces,
            default_pack_weight_unit: WeightUnit::Pounds,
            icloud_sync: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, GreerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GreerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from `path`, falling back to defaults if the file is absent.
    pub fn load(path: &Path) -> Result<Self, GreerError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|e| GreerError::Storage {
            message: format!("reading {}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<(), GreerError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| GreerError::Storage {
            message: format!("writing {}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_gear_weight_unit, WeightUnit::Ounces);
        assert_eq!(settings.default_pack_weight_unit, WeightUnit::Pounds);
        assert!(settings.icloud_sync);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"defaultPackWeightUnit":"kilograms"}"#).unwrap();
        assert_eq!(settings.default_pack_weight_unit, WeightUnit::Kilograms);
        assert_eq!(settings.default_gear_weight_unit, WeightUnit::Ounces);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Settings::from_json(r#"{"defaultGearWeightUnit":"stone"}"#),
            Err(GreerError::Serialization { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("greer-settings-{}.json", uuid::Uuid::new_v4()));
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        let settings = Settings {
            default_gear_weight_unit: WeightUnit::Grams,
            default_pack_weight_unit: WeightUnit::Kilograms,
            icloud_sync: false,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        fs::remove_file(&path).unwrap();
    }
}
