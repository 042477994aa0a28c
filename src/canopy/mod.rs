//! Canopy aggregation: leaf layers ordered from the top of the canopy downwards, each
//! carrying the irradiance it absorbs under one absorption model.

pub mod leaf_layer;
pub mod model;

pub use leaf_layer::{LayerAbsorption, LeafLayer};
pub use model::{AbsorptionModel, BeerModel, DePuryModel, SunlitShadedModel};

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config_parser::CanopyConfig;
use crate::error::{Error, Result};
use crate::inputs::{BeerInputs, IrradianceInputs, LeafLayers};
use crate::params::{
    BeerLumpedConfig, CoefficientBundle, DePuryLumpedParams, LumpedModelConfig, SunlitShadedParams,
};

/// How leaves of a layer are pooled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeavesCategory {
    /// One generic leaf pool per layer
    Lumped,
    /// Sunlit and shaded leaf pools per layer
    SunlitShaded,
}

impl LeavesCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeavesCategory::Lumped => "lumped",
            LeavesCategory::SunlitShaded => "sunlit-shaded",
        }
    }

    /// Absorption categories a layer of this kind reports
    pub fn absorption_categories(&self) -> &'static [AbsorptionCategory] {
        match self {
            LeavesCategory::Lumped => &[AbsorptionCategory::Lumped],
            LeavesCategory::SunlitShaded => &[AbsorptionCategory::Sunlit, AbsorptionCategory::Shaded],
        }
    }
}

impl FromStr for LeavesCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lumped" => Ok(LeavesCategory::Lumped),
            "sunlit-shaded" => Ok(LeavesCategory::SunlitShaded),
            other => Err(Error::UnknownLeavesCategory(other.to_string())),
        }
    }
}

impl fmt::Display for LeavesCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf pool whose absorbed irradiance is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsorptionCategory {
    Lumped,
    Sunlit,
    Shaded,
}

impl AbsorptionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsorptionCategory::Lumped => "lumped",
            AbsorptionCategory::Sunlit => "sunlit",
            AbsorptionCategory::Shaded => "shaded",
        }
    }
}

/// Leaf layers of one simulation step, top of the canopy first.
///
/// Only built from leaf layers, never parsed: lookups rely on the descending index order
/// and the cumulative leaf area index of each layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canopy {
    leaves_category: LeavesCategory,
    layers: Vec<LeafLayer>,
}

impl Canopy {
    /// Walks `leaf_layers` from the highest index (canopy top) downwards, accumulating leaf
    /// area index, and applies `model` to every layer.
    pub fn build(leaf_layers: &LeafLayers, model: &dyn AbsorptionModel) -> Self {
        let layers: Vec<LeafLayer> = leaf_layers
            .top_to_bottom()
            .map(|(index, span)| {
                let absorbed_irradiance = model.layer_absorption(span);
                trace!(
                    "layer {} [{:.3}, {:.3}]: absorbed {:.4}",
                    index,
                    span.upper_cumulative_leaf_area_index,
                    span.lower_cumulative_leaf_area_index(),
                    absorbed_irradiance.total()
                );
                LeafLayer {
                    index,
                    upper_cumulative_leaf_area_index: span.upper_cumulative_leaf_area_index,
                    thickness: span.thickness,
                    absorbed_irradiance,
                }
            })
            .collect();

        debug!(
            "built {} canopy with model {}: {} layers, LAI {:.3}",
            model.leaves_category(),
            model.name(),
            layers.len(),
            leaf_layers.total_leaf_area_index()
        );

        Canopy {
            leaves_category: model.leaves_category(),
            layers,
        }
    }

    /// Lumped leaves under the Beer model
    pub fn lumped_beer(inputs: &BeerInputs, config: &BeerLumpedConfig) -> Self {
        let model = BeerModel {
            incident_irradiance: inputs.incident_irradiance,
            extinction_coefficient: config.extinction_coefficient,
        };
        Self::build(&inputs.leaf_layers, &model)
    }

    /// Lumped leaves under the de Pury model.
    ///
    /// # Errors
    /// [`Error::CoefficientsNotDerived`] or [`Error::StaleCoefficients`] unless `params` was
    /// updated with these inputs.
    pub fn lumped_de_pury(inputs: &IrradianceInputs, params: &DePuryLumpedParams) -> Result<Self> {
        let coefficients = params.coefficients_for(inputs)?;
        Self::with_coefficients(inputs, LeavesCategory::Lumped, coefficients)
    }

    /// Sunlit and shaded leaves.
    ///
    /// # Errors
    /// [`Error::CoefficientsNotDerived`] or [`Error::StaleCoefficients`] unless `params` was
    /// updated with these inputs.
    pub fn sunlit_shaded(inputs: &IrradianceInputs, params: &SunlitShadedParams) -> Result<Self> {
        let coefficients = params.coefficients_for(inputs)?;
        Self::with_coefficients(inputs, LeavesCategory::SunlitShaded, coefficients)
    }

    /// Builds from an explicitly derived coefficient bundle, under the optics it records.
    ///
    /// # Errors
    /// [`Error::StaleCoefficients`] when `coefficients` was derived for other inputs
    pub fn with_coefficients(
        inputs: &IrradianceInputs,
        leaves_category: LeavesCategory,
        coefficients: &CoefficientBundle,
    ) -> Result<Self> {
        coefficients.ensure_current(inputs)?;
        let canopy = match leaves_category {
            LeavesCategory::Lumped => Self::build(
                &inputs.leaf_layers,
                &DePuryModel {
                    incident_direct_irradiance: inputs.incident_direct_irradiance,
                    incident_diffuse_irradiance: inputs.incident_diffuse_irradiance,
                    coefficients,
                },
            ),
            LeavesCategory::SunlitShaded => Self::build(
                &inputs.leaf_layers,
                &SunlitShadedModel {
                    incident_direct_irradiance: inputs.incident_direct_irradiance,
                    incident_diffuse_irradiance: inputs.incident_diffuse_irradiance,
                    coefficients,
                },
            ),
        };
        Ok(canopy)
    }

    /// Builds the canopy a parsed configuration describes. Coefficients are derived afresh;
    /// the Beer model receives direct and diffuse irradiance combined.
    pub fn from_config(config: &CanopyConfig, inputs: &IrradianceInputs) -> Result<Self> {
        match config {
            CanopyConfig::Lumped(LumpedModelConfig::Beer(beer)) => {
                let model = BeerModel {
                    incident_irradiance: inputs.incident_irradiance(),
                    extinction_coefficient: beer.extinction_coefficient,
                };
                Ok(Self::build(&inputs.leaf_layers, &model))
            }
            CanopyConfig::Lumped(LumpedModelConfig::DePury(de_pury)) => {
                let coefficients = CoefficientBundle::derive(&de_pury.optics, inputs)?;
                Self::with_coefficients(inputs, LeavesCategory::Lumped, &coefficients)
            }
            CanopyConfig::SunlitShaded(sunlit_shaded) => {
                let coefficients = CoefficientBundle::derive(&sunlit_shaded.optics, inputs)?;
                Self::with_coefficients(inputs, LeavesCategory::SunlitShaded, &coefficients)
            }
        }
    }

    pub fn leaves_category(&self) -> LeavesCategory {
        self.leaves_category
    }

    /// Layers from the top of the canopy downwards
    pub fn layers(&self) -> &[LeafLayer] {
        &self.layers
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LeafLayer> {
        self.layers.iter()
    }

    /// Layers from the bottom of the canopy upwards (ascending index)
    pub fn iter_bottom_up(&self) -> impl Iterator<Item = &LeafLayer> {
        self.layers.iter().rev()
    }

    /// Layer indices, top first
    pub fn indices(&self) -> impl Iterator<Item = i32> + '_ {
        self.layers.iter().map(|layer| layer.index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// # Errors
    /// [`Error::UnknownLeafLayer`] if no layer has this index
    pub fn get(&self, index: i32) -> Result<&LeafLayer> {
        // layers are sorted by descending index
        self.layers
            .binary_search_by(|layer| index.cmp(&layer.index))
            .map(|position| &self.layers[position])
            .map_err(|_| Error::UnknownLeafLayer(index))
    }

    /// [m2leaf m-2ground]
    pub fn total_leaf_area_index(&self) -> f64 {
        self.layers.iter().map(|layer| layer.thickness).sum()
    }

    /// Irradiance absorbed by the whole canopy, all leaf pools combined
    pub fn total_absorbed_irradiance(&self) -> f64 {
        self.layers.iter().map(|layer| layer.absorbed_irradiance.total()).sum()
    }

    /// Irradiance absorbed by one leaf pool over the whole canopy (0 if the canopy does not
    /// report that category)
    pub fn total_absorbed_by(&self, category: AbsorptionCategory) -> f64 {
        self.layers
            .iter()
            .filter_map(|layer| layer.absorbed_by(category))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Canopy {
    type Item = &'a LeafLayer;
    type IntoIter = std::slice::Iter<'a, LeafLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
