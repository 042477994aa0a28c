//! Closed-form radiative-transfer formalisms for uniform crop canopies.
//!
//! - [`extinction`]: leaf scattering, extinction coefficients and canopy reflectance
//! - [`sky`]: sky sector discretization for diffuse irradiance
//! - [`lumped_leaves`]: one generic leaf pool per layer (Beer and de Pury models)
//! - [`sunlit_shaded_leaves`]: sunlit and shaded leaf pools per layer (Goudriaan)

pub mod extinction;
pub mod lumped_leaves;
pub mod sky;
pub mod sunlit_shaded_leaves;

use serde::{Deserialize, Serialize};

/// Vertical extent of a leaf layer expressed in cumulative leaf area index, counted
/// downwards from the top of the canopy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpan {
    /// [m2leaf m-2ground] leaf area index of all layers above this one
    pub upper_cumulative_leaf_area_index: f64,
    /// [m2leaf m-2ground] leaf area index of the layer itself
    pub thickness: f64,
}

impl LayerSpan {
    pub fn new(upper_cumulative_leaf_area_index: f64, thickness: f64) -> Self {
        Self {
            upper_cumulative_leaf_area_index,
            thickness,
        }
    }

    /// Cumulative leaf area index at the bottom of the layer
    pub fn lower_cumulative_leaf_area_index(&self) -> f64 {
        self.upper_cumulative_leaf_area_index + self.thickness
    }
}

/// Coefficients a layer absorption formalism needs for one sun position and one canopy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsorptionCoefficients {
    /// [-]
    pub leaf_scattering_coefficient: f64,
    /// [m2ground m-2leaf]
    pub direct_black_extinction_coefficient: f64,
    /// [m2ground m-2leaf]
    pub direct_extinction_coefficient: f64,
    /// [m2ground m-2leaf]
    pub diffuse_extinction_coefficient: f64,
    /// [-]
    pub canopy_reflectance_to_direct_irradiance: f64,
    /// [-]
    pub canopy_reflectance_to_diffuse_irradiance: f64,
}
