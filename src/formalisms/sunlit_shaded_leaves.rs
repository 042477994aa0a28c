//! Irradiance absorption by sunlit and shaded leaves.
//!
//! A leaf layer spans the cumulative leaf area index interval `[U, U + T]`, counted from the
//! top of the canopy. Sunlit leaves intercept the direct beam plus part of the diffuse and
//! scattered irradiance, shaded leaves only receive diffuse and scattered irradiance.
//! Summed over both pools, the five layer components close the budget of the lumped
//! de Pury model for the same layer.
//!
//! # References
//! Goudriaan J. (1977). Crop Micrometeorology: A Simulation Study.
//!     Simulation monographs, Pudoc, Wageningen, 257 pp.
//! Goudriaan J. (1988). The bare bones of leaf-angle distribution in radiation models for
//!     canopy photosynthesis and energy exchange. Agricultural and Forest Meteorology 43, 155-169.
//! de Pury D. G. G., Farquhar G. D. (1997). Simple scaling of photosynthesis from leaves to
//!     canopies without the errors of big-leaf models. Plant, Cell and Environment 20, 537-557.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::PRECISION;
use crate::formalisms::{AbsorptionCoefficients, LayerSpan};
use crate::math_utils::beer_scaling_factor;

/// [-] fraction of sunlit leaves at a cumulative leaf area index `x` below the canopy top
pub fn sunlit_fraction(cumulative_leaf_area_index: f64, direct_black_extinction_coefficient: f64) -> f64 {
    (-direct_black_extinction_coefficient * cumulative_leaf_area_index).exp()
}

/// [-] fraction of shaded leaves at a cumulative leaf area index `x` below the canopy top
pub fn shaded_fraction(cumulative_leaf_area_index: f64, direct_black_extinction_coefficient: f64) -> f64 {
    1.0 - sunlit_fraction(cumulative_leaf_area_index, direct_black_extinction_coefficient)
}

/// [-] average fraction of sunlit leaves over a whole leaf layer.
///
/// Layers whose optical thickness (`k_b · T`) does not exceed [`PRECISION`] take the point
/// value at their top.
///
/// # Examples
/// ```
/// use crop_irradiance::formalisms::sunlit_shaded_leaves::sunlit_fraction_per_leaf_layer;
///
/// let fraction = sunlit_fraction_per_leaf_layer(0.0, 3.22, 0.5784874244141549);
/// assert!((fraction - 0.4535).abs() < 1e-4);
/// ```
pub fn sunlit_fraction_per_leaf_layer(
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    direct_black_extinction_coefficient: f64,
) -> f64 {
    let optical_thickness = direct_black_extinction_coefficient * leaf_layer_thickness;
    if optical_thickness <= PRECISION {
        return sunlit_fraction(upper_cumulative_leaf_area_index, direct_black_extinction_coefficient);
    }

    beer_scaling_factor(
        direct_black_extinction_coefficient,
        upper_cumulative_leaf_area_index,
        leaf_layer_thickness,
    ) / optical_thickness
}

/// Direct irradiance absorbed per unit sunlit leaf area, independent of depth.
pub fn absorbed_direct_irradiance_per_leaf_area(
    incident_direct_irradiance: f64,
    leaf_scattering_coefficient: f64,
    direct_black_extinction_coefficient: f64,
) -> f64 {
    incident_direct_irradiance * (1.0 - leaf_scattering_coefficient) * direct_black_extinction_coefficient
}

/// Diffuse irradiance absorbed per unit leaf area at cumulative leaf area index `x`.
pub fn absorbed_diffuse_irradiance_at_given_depth(
    incident_diffuse_irradiance: f64,
    cumulative_leaf_area_index: f64,
    canopy_reflectance_to_diffuse_irradiance: f64,
    diffuse_extinction_coefficient: f64,
) -> f64 {
    incident_diffuse_irradiance
        * (1.0 - canopy_reflectance_to_diffuse_irradiance)
        * diffuse_extinction_coefficient
        * (-diffuse_extinction_coefficient * cumulative_leaf_area_index).exp()
}

/// Scattered component of the direct beam absorbed per unit leaf area at cumulative leaf
/// area index `x`: total direct absorption minus what black leaves would have intercepted.
pub fn absorbed_scattered_irradiance_at_given_depth(
    incident_direct_irradiance: f64,
    cumulative_leaf_area_index: f64,
    direct_extinction_coefficient: f64,
    direct_black_extinction_coefficient: f64,
    canopy_reflectance_to_direct_irradiance: f64,
    leaf_scattering_coefficient: f64,
) -> f64 {
    incident_direct_irradiance
        * ((1.0 - canopy_reflectance_to_direct_irradiance)
            * direct_extinction_coefficient
            * (-direct_extinction_coefficient * cumulative_leaf_area_index).exp()
            - (1.0 - leaf_scattering_coefficient)
                * direct_black_extinction_coefficient
                * (-direct_black_extinction_coefficient * cumulative_leaf_area_index).exp())
}

/// `k / (k + k_b) · (e^{-(k+k_b)U} - e^{-(k+k_b)(U+T)})`: the share of a layer's
/// `k`-extinguished irradiance intercepted by its sunlit leaves.
fn sunlit_share(
    extinction_coefficient: f64,
    direct_black_extinction_coefficient: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
) -> f64 {
    let combined_coefficient = extinction_coefficient + direct_black_extinction_coefficient;
    extinction_coefficient / combined_coefficient.max(PRECISION)
        * beer_scaling_factor(combined_coefficient, upper_cumulative_leaf_area_index, leaf_layer_thickness)
}

/// Direct (beam) irradiance absorbed by the sunlit leaves of a layer
pub fn absorbed_direct_irradiance_by_sunlit_leaves(
    incident_direct_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    leaf_scattering_coefficient: f64,
    direct_black_extinction_coefficient: f64,
) -> f64 {
    incident_direct_irradiance
        * (1.0 - leaf_scattering_coefficient)
        * beer_scaling_factor(
            direct_black_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        )
}

/// Diffuse irradiance absorbed by the sunlit leaves of a layer
pub fn absorbed_diffuse_irradiance_by_sunlit_leaves(
    incident_diffuse_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    diffuse_extinction_coefficient: f64,
    direct_black_extinction_coefficient: f64,
    canopy_reflectance_to_diffuse_irradiance: f64,
) -> f64 {
    incident_diffuse_irradiance
        * (1.0 - canopy_reflectance_to_diffuse_irradiance)
        * sunlit_share(
            diffuse_extinction_coefficient,
            direct_black_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        )
}

/// Scattered irradiance absorbed by the sunlit leaves of a layer.
///
/// The black-leaf term integrates `f_sl(x) · k_b e^{-k_b x}`, hence the doubled exponent.
/// A negative value signals a non-physical parameter set and is returned unchanged.
pub fn absorbed_scattered_irradiance_by_sunlit_leaves(
    incident_direct_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    direct_extinction_coefficient: f64,
    direct_black_extinction_coefficient: f64,
    canopy_reflectance_to_direct_irradiance: f64,
    leaf_scattering_coefficient: f64,
) -> f64 {
    let total_direct = (1.0 - canopy_reflectance_to_direct_irradiance)
        * sunlit_share(
            direct_extinction_coefficient,
            direct_black_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        );
    let black_direct = (1.0 - leaf_scattering_coefficient)
        * 0.5
        * beer_scaling_factor(
            2.0 * direct_black_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        );

    incident_direct_irradiance * (total_direct - black_direct)
}

/// Diffuse irradiance absorbed by the shaded leaves of a layer
pub fn absorbed_diffuse_irradiance_by_shaded_leaves(
    incident_diffuse_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    diffuse_extinction_coefficient: f64,
    direct_black_extinction_coefficient: f64,
    canopy_reflectance_to_diffuse_irradiance: f64,
) -> f64 {
    let layer_diffuse = beer_scaling_factor(
        diffuse_extinction_coefficient,
        upper_cumulative_leaf_area_index,
        leaf_layer_thickness,
    );
    let sunlit_diffuse = sunlit_share(
        diffuse_extinction_coefficient,
        direct_black_extinction_coefficient,
        upper_cumulative_leaf_area_index,
        leaf_layer_thickness,
    );

    incident_diffuse_irradiance * (1.0 - canopy_reflectance_to_diffuse_irradiance) * (layer_diffuse - sunlit_diffuse)
}

/// Scattered irradiance absorbed by the shaded leaves of a layer.
///
/// A negative value signals a non-physical parameter set and is returned unchanged.
pub fn absorbed_scattered_irradiance_by_shaded_leaves(
    incident_direct_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    direct_extinction_coefficient: f64,
    direct_black_extinction_coefficient: f64,
    canopy_reflectance_to_direct_irradiance: f64,
    leaf_scattering_coefficient: f64,
) -> f64 {
    let total_direct = (1.0 - canopy_reflectance_to_direct_irradiance)
        * (beer_scaling_factor(
            direct_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        ) - sunlit_share(
            direct_extinction_coefficient,
            direct_black_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        ));
    let black_direct = (1.0 - leaf_scattering_coefficient)
        * (beer_scaling_factor(
            direct_black_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        ) - 0.5
            * beer_scaling_factor(
                2.0 * direct_black_extinction_coefficient,
                upper_cumulative_leaf_area_index,
                leaf_layer_thickness,
            ));

    incident_direct_irradiance * (total_direct - black_direct)
}

/// Absorbed irradiance of one leaf layer split between sunlit and shaded leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunlitShadedAbsorption {
    pub sunlit_fraction: f64,
    pub shaded_fraction: f64,
    pub direct_by_sunlit: f64,
    pub diffuse_by_sunlit: f64,
    pub scattered_by_sunlit: f64,
    pub diffuse_by_shaded: f64,
    pub scattered_by_shaded: f64,
}

impl SunlitShadedAbsorption {
    /// Irradiance absorbed by the sunlit leaves of the layer
    pub fn sunlit_total(&self) -> f64 {
        self.direct_by_sunlit + self.diffuse_by_sunlit + self.scattered_by_sunlit
    }

    /// Irradiance absorbed by the shaded leaves of the layer
    pub fn shaded_total(&self) -> f64 {
        self.diffuse_by_shaded + self.scattered_by_shaded
    }

    pub fn total(&self) -> f64 {
        self.sunlit_total() + self.shaded_total()
    }
}

/// Computes the sunlit/shaded fractions and the five absorbed components of a layer.
pub fn sunlit_shaded_absorption(
    incident_direct_irradiance: f64,
    incident_diffuse_irradiance: f64,
    layer: LayerSpan,
    coefficients: &AbsorptionCoefficients,
) -> SunlitShadedAbsorption {
    let LayerSpan {
        upper_cumulative_leaf_area_index: upper,
        thickness,
    } = layer;
    let kb = coefficients.direct_black_extinction_coefficient;

    let sunlit_fraction = sunlit_fraction_per_leaf_layer(upper, thickness, kb);
    let absorption = SunlitShadedAbsorption {
        sunlit_fraction,
        shaded_fraction: 1.0 - sunlit_fraction,
        direct_by_sunlit: absorbed_direct_irradiance_by_sunlit_leaves(
            incident_direct_irradiance,
            upper,
            thickness,
            coefficients.leaf_scattering_coefficient,
            kb,
        ),
        diffuse_by_sunlit: absorbed_diffuse_irradiance_by_sunlit_leaves(
            incident_diffuse_irradiance,
            upper,
            thickness,
            coefficients.diffuse_extinction_coefficient,
            kb,
            coefficients.canopy_reflectance_to_diffuse_irradiance,
        ),
        scattered_by_sunlit: absorbed_scattered_irradiance_by_sunlit_leaves(
            incident_direct_irradiance,
            upper,
            thickness,
            coefficients.direct_extinction_coefficient,
            kb,
            coefficients.canopy_reflectance_to_direct_irradiance,
            coefficients.leaf_scattering_coefficient,
        ),
        diffuse_by_shaded: absorbed_diffuse_irradiance_by_shaded_leaves(
            incident_diffuse_irradiance,
            upper,
            thickness,
            coefficients.diffuse_extinction_coefficient,
            kb,
            coefficients.canopy_reflectance_to_diffuse_irradiance,
        ),
        scattered_by_shaded: absorbed_scattered_irradiance_by_shaded_leaves(
            incident_direct_irradiance,
            upper,
            thickness,
            coefficients.direct_extinction_coefficient,
            kb,
            coefficients.canopy_reflectance_to_direct_irradiance,
            coefficients.leaf_scattering_coefficient,
        ),
    };

    if absorption.scattered_by_sunlit < 0.0 || absorption.scattered_by_shaded < 0.0 {
        warn!(
            "negative scattered irradiance at cumulative LAI {:.3} (+{:.3}): sunlit {:.4}, shaded {:.4}",
            upper, thickness, absorption.scattered_by_sunlit, absorption.scattered_by_shaded
        );
    }

    absorption
}
