// src/inputs.rs - Per-step environmental inputs: leaf layers and incident irradiance

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::formalisms::LayerSpan;

/// Leaf area index of each canopy layer, keyed by layer index.
///
/// The highest index is the top of the canopy. Thicknesses are validated on construction:
/// every layer must carry a finite, strictly positive leaf area index and at least one
/// layer must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<i32, f64>", into = "BTreeMap<i32, f64>")]
pub struct LeafLayers(BTreeMap<i32, f64>);

impl LeafLayers {
    pub fn new(layers: BTreeMap<i32, f64>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyCanopy);
        }
        if let Some((&index, &thickness)) = layers
            .iter()
            .find(|(_, thickness)| !thickness.is_finite() || **thickness <= 0.0)
        {
            return Err(Error::InvalidLeafLayer { index, thickness });
        }
        Ok(LeafLayers(layers))
    }

    /// A single layer holding the whole canopy (big-leaf representation)
    pub fn big_leaf(leaf_area_index: f64) -> Result<Self> {
        Self::new(BTreeMap::from([(0, leaf_area_index)]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Leaf area index of the layer `index`
    pub fn get(&self, index: i32) -> Option<f64> {
        self.0.get(&index).copied()
    }

    /// [m2leaf m-2ground] leaf area index of the whole canopy
    pub fn total_leaf_area_index(&self) -> f64 {
        self.0.values().sum()
    }

    /// Walks the layers from the top of the canopy downwards, pairing each index with the
    /// cumulative leaf area index above it and its own thickness.
    pub fn top_to_bottom(&self) -> impl Iterator<Item = (i32, LayerSpan)> + '_ {
        self.0.iter().rev().scan(0.0, |upper_cumulative_leaf_area_index, (&index, &thickness)| {
            let span = LayerSpan::new(*upper_cumulative_leaf_area_index, thickness);
            *upper_cumulative_leaf_area_index += thickness;
            Some((index, span))
        })
    }
}

impl TryFrom<BTreeMap<i32, f64>> for LeafLayers {
    type Error = Error;

    fn try_from(layers: BTreeMap<i32, f64>) -> Result<Self> {
        Self::new(layers)
    }
}

impl From<LeafLayers> for BTreeMap<i32, f64> {
    fn from(layers: LeafLayers) -> Self {
        layers.0
    }
}

/// Inputs of the Beer model: a single incident irradiance, direct and diffuse combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeerInputs {
    pub leaf_layers: LeafLayers,
    /// [W m-2ground]
    pub incident_irradiance: f64,
}

/// Inputs of the de Pury and sunlit/shaded models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradianceInputs {
    pub leaf_layers: LeafLayers,
    /// [W m-2ground]
    pub incident_direct_irradiance: f64,
    /// [W m-2ground]
    pub incident_diffuse_irradiance: f64,
    /// [rad] solar elevation above the horizon
    pub solar_inclination: f64,
}

impl IrradianceInputs {
    pub fn total_leaf_area_index(&self) -> f64 {
        self.leaf_layers.total_leaf_area_index()
    }

    /// Direct and diffuse irradiance combined
    pub fn incident_irradiance(&self) -> f64 {
        self.incident_direct_irradiance + self.incident_diffuse_irradiance
    }
}
