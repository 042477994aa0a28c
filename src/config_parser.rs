// src/config_parser.rs - Typed canopy configuration and inputs from JSON text

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{self, Value};

use crate::error::Result;
use crate::inputs::{BeerInputs, IrradianceInputs, LeafLayers};
use crate::params::{LumpedModelConfig, SunlitShadedConfig};

/// Complete description of a canopy model, tagged by leaves category.
///
/// ```json
/// {"leaves_category": "lumped", "model": "beer", "extinction_coefficient": 0.5}
/// {"leaves_category": "sunlit-shaded", "leaf_reflectance": 0.08, "leaf_transmittance": 0.07,
///  "canopy_reflectance_to_diffuse_irradiance": "par"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "leaves_category", rename_all = "kebab-case")]
pub enum CanopyConfig {
    Lumped(LumpedModelConfig),
    SunlitShaded(SunlitShadedConfig),
}

/// JSON parser utility for canopy configurations and per-step inputs
pub struct ConfigParser;

impl ConfigParser {
    /// Parse JSON text into an untyped value
    pub fn parse_value(json_str: &str) -> Result<Value> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Deserialize the section found under the nested keys of `path`
    pub fn section<T: DeserializeOwned>(json: &Value, path: &[&str]) -> Result<T> {
        let section = path
            .iter()
            .try_fold(json, |current, key| current.get(*key))
            .ok_or_else(|| serde_json::Error::custom(format!("missing section \"{}\"", path.join("."))))?;
        Ok(T::deserialize(section)?)
    }

    pub fn canopy_config(json_str: &str) -> Result<CanopyConfig> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn lumped_model_config(json_str: &str) -> Result<LumpedModelConfig> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Leaf layers keyed by layer index, e.g. `{"7": 3.22, "6": 1.92}`
    pub fn leaf_layers(json_str: &str) -> Result<LeafLayers> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn irradiance_inputs(json_str: &str) -> Result<IrradianceInputs> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn beer_inputs(json_str: &str) -> Result<BeerInputs> {
        Ok(serde_json::from_str(json_str)?)
    }
}
