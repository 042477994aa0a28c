//! Irradiance absorption by a single lumped leaf pool per layer.
//!
//! Absorbed values are per unit ground area and share the unit of the incident irradiance
//! (e.g. W m-2ground, or J cm-2ground if the caller works in those units).

use crate::formalisms::LayerSpan;
use crate::math_utils::beer_scaling_factor;

/// Irradiance absorbed by a uniform leaf layer following Beer-Lambert's law.
///
/// # Arguments
/// * `incident_irradiance` - [W m-2ground] irradiance at the top of the canopy
/// * `extinction_coefficient` - [m2ground m-2leaf] extinction coefficient through the canopy
/// * `upper_cumulative_leaf_area_index` - [m2leaf m-2ground] leaf area above the layer
/// * `leaf_layer_thickness` - [m2leaf m-2ground] leaf area index of the layer
///
/// # Examples
/// ```
/// use crop_irradiance::formalisms::lumped_leaves::beer_absorption;
///
/// let absorbed = beer_absorption(500.0, 0.5, 0.0, 3.0);
/// assert!((absorbed - 388.435).abs() < 1e-3);
/// ```
pub fn beer_absorption(
    incident_irradiance: f64,
    extinction_coefficient: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
) -> f64 {
    incident_irradiance
        * beer_scaling_factor(extinction_coefficient, upper_cumulative_leaf_area_index, leaf_layer_thickness)
}

/// Direct (beam) irradiance absorbed by a leaf layer, net of canopy reflection.
pub fn absorbed_direct_irradiance(
    incident_direct_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    direct_extinction_coefficient: f64,
    canopy_reflectance_to_direct_irradiance: f64,
) -> f64 {
    (1.0 - canopy_reflectance_to_direct_irradiance)
        * beer_absorption(
            incident_direct_irradiance,
            direct_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        )
}

/// Diffuse irradiance absorbed by a leaf layer, net of canopy reflection.
pub fn absorbed_diffuse_irradiance(
    incident_diffuse_irradiance: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
    diffuse_extinction_coefficient: f64,
    canopy_reflectance_to_diffuse_irradiance: f64,
) -> f64 {
    (1.0 - canopy_reflectance_to_diffuse_irradiance)
        * beer_absorption(
            incident_diffuse_irradiance,
            diffuse_extinction_coefficient,
            upper_cumulative_leaf_area_index,
            leaf_layer_thickness,
        )
}

/// Total (direct + diffuse) irradiance absorbed by a leaf layer (de Pury and Farquhar, 1997).
pub fn de_pury_absorption(
    incident_direct_irradiance: f64,
    incident_diffuse_irradiance: f64,
    layer: LayerSpan,
    direct_extinction_coefficient: f64,
    diffuse_extinction_coefficient: f64,
    canopy_reflectance_to_direct_irradiance: f64,
    canopy_reflectance_to_diffuse_irradiance: f64,
) -> f64 {
    let absorbed_direct = absorbed_direct_irradiance(
        incident_direct_irradiance,
        layer.upper_cumulative_leaf_area_index,
        layer.thickness,
        direct_extinction_coefficient,
        canopy_reflectance_to_direct_irradiance,
    );
    let absorbed_diffuse = absorbed_diffuse_irradiance(
        incident_diffuse_irradiance,
        layer.upper_cumulative_leaf_area_index,
        layer.thickness,
        diffuse_extinction_coefficient,
        canopy_reflectance_to_diffuse_irradiance,
    );

    absorbed_direct + absorbed_diffuse
}
