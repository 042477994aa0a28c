//! Absorption models applied layer by layer
//!
//! A canopy is built with exactly one model, selected once; every layer is then passed
//! through the same model's `layer_absorption`.

use crate::canopy::leaf_layer::LayerAbsorption;
use crate::canopy::LeavesCategory;
use crate::formalisms::LayerSpan;
use crate::formalisms::lumped_leaves::{beer_absorption, de_pury_absorption};
use crate::formalisms::sunlit_shaded_leaves::sunlit_shaded_absorption;
use crate::params::CoefficientBundle;

pub trait AbsorptionModel {
    /// The name of this model (for identification and logging)
    fn name(&self) -> &str;

    fn leaves_category(&self) -> LeavesCategory;

    /// Irradiance absorbed by one leaf layer
    fn layer_absorption(&self, layer: LayerSpan) -> LayerAbsorption;
}

/// Lumped leaves, single extinction coefficient, combined incident irradiance
#[derive(Debug, Clone, Copy)]
pub struct BeerModel {
    pub incident_irradiance: f64,
    pub extinction_coefficient: f64,
}

impl AbsorptionModel for BeerModel {
    fn name(&self) -> &str {
        "beer"
    }

    fn leaves_category(&self) -> LeavesCategory {
        LeavesCategory::Lumped
    }

    fn layer_absorption(&self, layer: LayerSpan) -> LayerAbsorption {
        LayerAbsorption::Lumped(beer_absorption(
            self.incident_irradiance,
            self.extinction_coefficient,
            layer.upper_cumulative_leaf_area_index,
            layer.thickness,
        ))
    }
}

/// Lumped leaves, separate direct and diffuse extinction
#[derive(Debug, Clone, Copy)]
pub struct DePuryModel<'a> {
    pub incident_direct_irradiance: f64,
    pub incident_diffuse_irradiance: f64,
    pub coefficients: &'a CoefficientBundle,
}

impl AbsorptionModel for DePuryModel<'_> {
    fn name(&self) -> &str {
        "de_pury"
    }

    fn leaves_category(&self) -> LeavesCategory {
        LeavesCategory::Lumped
    }

    fn layer_absorption(&self, layer: LayerSpan) -> LayerAbsorption {
        LayerAbsorption::Lumped(de_pury_absorption(
            self.incident_direct_irradiance,
            self.incident_diffuse_irradiance,
            layer,
            self.coefficients.direct_extinction_coefficient,
            self.coefficients.diffuse_extinction_coefficient,
            self.coefficients.canopy_reflectance_to_direct_irradiance,
            self.coefficients.canopy_reflectance_to_diffuse_irradiance,
        ))
    }
}

/// Sunlit and shaded leaves
#[derive(Debug, Clone, Copy)]
pub struct SunlitShadedModel<'a> {
    pub incident_direct_irradiance: f64,
    pub incident_diffuse_irradiance: f64,
    pub coefficients: &'a CoefficientBundle,
}

impl AbsorptionModel for SunlitShadedModel<'_> {
    fn name(&self) -> &str {
        "sunlit_shaded"
    }

    fn leaves_category(&self) -> LeavesCategory {
        LeavesCategory::SunlitShaded
    }

    fn layer_absorption(&self, layer: LayerSpan) -> LayerAbsorption {
        LayerAbsorption::SunlitShaded(sunlit_shaded_absorption(
            self.incident_direct_irradiance,
            self.incident_diffuse_irradiance,
            layer,
            &self.coefficients.absorption_coefficients(),
        ))
    }
}
