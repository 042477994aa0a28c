//! Leaf scattering, extinction coefficients and canopy reflectance.
//!
//! All functions are pure. Angles are solar inclinations above the horizon [rad], extinction
//! coefficients are in [m2ground m-2leaf].
//!
//! # References
//! Goudriaan J. (1977). Crop Micrometeorology: A Simulation Study.
//!     Simulation monographs, Pudoc, Wageningen, 257 pp.
//! Goudriaan J. (1988). The bare bones of leaf-angle distribution in radiation models for
//!     canopy photosynthesis and energy exchange. Agricultural and Forest Meteorology 43, 155-169.
//! Weiss M., Baret F., Smith G. J., Jonckheere I., Coppin P. (2004). Review of methods for in
//!     situ leaf area index (LAI) determination. Agricultural and Forest Meteorology 121, 37-53.

use serde::{Deserialize, Serialize};

use crate::constants::{
    PRECISION, PROJECTION_DENOMINATOR_EXPONENT, PROJECTION_DENOMINATOR_FACTOR,
    PROJECTION_DENOMINATOR_OFFSET, PROJECTION_RATIO_EXPONENT, PROJECTION_RATIO_OFFSET,
    PROJECTION_RATIO_SCALE,
};
use crate::error::Result;
use crate::formalisms::sky::{SkyType, sky_sectors_angle, sky_sectors_weight};

/// [-] leaf scattering coefficient for a given irradiance band.
///
/// No bounds checking: values outside [0, 1] propagate as given.
pub fn leaf_scattering_coefficient(leaf_reflectance: f64, leaf_transmittance: f64) -> f64 {
    leaf_reflectance + leaf_transmittance
}

/// Extinction coefficient of direct (beam) irradiance through a canopy of black leaves.
///
/// # Arguments
/// * `solar_inclination` - [rad] floored to [`PRECISION`] before use
/// * `leaf_angle_distribution_factor` - [-] rad(56°) for a spherical distribution
/// * `clumping_factor` - [-] 1 for randomly dispersed leaves
pub fn direct_black_extinction_coefficient(
    solar_inclination: f64,
    leaf_angle_distribution_factor: f64,
    clumping_factor: f64,
) -> f64 {
    let solar_inclination = solar_inclination.max(PRECISION);
    let projection_ratio = (leaf_angle_distribution_factor / PROJECTION_RATIO_SCALE)
        .powf(PROJECTION_RATIO_EXPONENT)
        - PROJECTION_RATIO_OFFSET;
    let numerator = (projection_ratio.powi(2) + solar_inclination.tan().powi(-2)).sqrt();
    let denominator = projection_ratio
        + PROJECTION_DENOMINATOR_FACTOR
            * (projection_ratio + PROJECTION_DENOMINATOR_OFFSET).powf(PROJECTION_DENOMINATOR_EXPONENT);

    clumping_factor * numerator / denominator.max(PRECISION)
}

/// Extinction coefficient of direct (beam) irradiance through a canopy of scattering leaves.
///
/// Exactly 0 when `leaf_scattering_coefficient` is 1.
pub fn direct_extinction_coefficient(
    solar_inclination: f64,
    leaf_scattering_coefficient: f64,
    leaf_angle_distribution_factor: f64,
    clumping_factor: f64,
) -> f64 {
    direct_black_extinction_coefficient(solar_inclination, leaf_angle_distribution_factor, clumping_factor)
        * (1.0 - leaf_scattering_coefficient).sqrt()
}

/// Equivalent extinction coefficients of diffuse irradiance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffuseExtinctionCoefficients {
    /// [m2ground m-2leaf] canopy of scattering leaves
    pub diffuse_extinction_coefficient: f64,
    /// [m2ground m-2leaf] canopy of black leaves; never lower than the scattering one
    pub diffuse_black_extinction_coefficient: f64,
}

/// Integrates beam extinction over the sky rings and inverts the weighted canopy
/// transmittance into equivalent diffuse extinction coefficients.
///
/// The transmittance of each ring is evaluated at its mid-angle for a canopy of total
/// `leaf_area_index` (floored to [`PRECISION`]).
///
/// # Errors
/// Propagates the sky discretization errors of [`sky_sectors_weight`].
pub fn diffuse_extinction_coefficient(
    leaf_area_index: f64,
    leaf_angle_distribution_factor: f64,
    clumping_factor: f64,
    leaf_scattering_coefficient: f64,
    sky_sectors_number: usize,
    sky_type: SkyType,
) -> Result<DiffuseExtinctionCoefficients> {
    let leaf_area_index = leaf_area_index.max(PRECISION);
    let sky_weights = sky_sectors_weight(sky_sectors_number, sky_type)?;
    let scattering_factor = (1.0 - leaf_scattering_coefficient).sqrt();

    let mut transmittance = 0.0;
    let mut black_transmittance = 0.0;
    for (weight, sector_angle) in sky_weights.iter().zip(sky_sectors_angle(sky_sectors_number)) {
        let black_coefficient = direct_black_extinction_coefficient(
            sector_angle,
            leaf_angle_distribution_factor,
            clumping_factor,
        );
        transmittance += weight * (-black_coefficient * scattering_factor * leaf_area_index).exp();
        black_transmittance += weight * (-black_coefficient * leaf_area_index).exp();
    }

    Ok(DiffuseExtinctionCoefficients {
        diffuse_extinction_coefficient: -transmittance.ln() / leaf_area_index,
        diffuse_black_extinction_coefficient: -black_transmittance.ln() / leaf_area_index,
    })
}

/// [-] reflectance of the whole canopy to direct (beam) irradiance.
///
/// Exactly 0 when `leaf_scattering_coefficient` is 0.
pub fn canopy_reflectance_to_direct_irradiance(
    direct_black_extinction_coefficient: f64,
    leaf_scattering_coefficient: f64,
) -> f64 {
    let scattering_factor = (1.0 - leaf_scattering_coefficient).sqrt();
    let reflectance_of_horizontal_leaves = (1.0 - scattering_factor) / (1.0 + scattering_factor);

    1.0 - (-(2.0 * reflectance_of_horizontal_leaves * direct_black_extinction_coefficient)
        / (1.0 + direct_black_extinction_coefficient))
        .exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SPHERICAL_ANGLES_FACTOR;
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_ge, assert_gt, assert_lt};
    use rand::Rng;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    fn assert_strictly_decreasing(values: &[f64]) {
        for pair in values.windows(2) {
            assert_gt!(pair[0], pair[1]);
        }
    }

    fn assert_strictly_increasing(values: &[f64]) {
        for pair in values.windows(2) {
            assert_lt!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_leaf_scattering_coefficient_is_the_sum_of_reflectance_and_transmittance() {
        assert_abs_diff_eq!(leaf_scattering_coefficient(0.08, 0.07), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_direct_black_extinction_is_maximum_at_sunrise_and_sunset() {
        let at_sunrise = direct_black_extinction_coefficient(0.0, 0.9774, 1.0);
        let at_midday = direct_black_extinction_coefficient(FRAC_PI_2, 0.9774, 1.0);
        let at_sunset = direct_black_extinction_coefficient(PI, 0.9774, 1.0);

        assert_gt!(at_sunrise, at_midday);
        assert_gt!(at_sunset, at_midday);
        assert!(at_sunrise.is_finite());
    }

    #[test]
    fn test_direct_black_extinction_at_horizon_equals_floored_inclination() {
        let at_horizon = direct_black_extinction_coefficient(0.0, SPHERICAL_ANGLES_FACTOR, 1.0);
        let at_floor = direct_black_extinction_coefficient(PRECISION, SPHERICAL_ANGLES_FACTOR, 1.0);
        let below_horizon = direct_black_extinction_coefficient(-0.3, SPHERICAL_ANGLES_FACTOR, 1.0);

        assert_eq!(at_horizon, at_floor);
        assert_eq!(below_horizon, at_floor);
    }

    #[test]
    fn test_direct_black_extinction_of_spherical_canopy_is_close_to_half_over_sine() {
        for inclination in [FRAC_PI_2, FRAC_PI_3, PI / 6.0] {
            let expected = 0.5 / f64::sin(inclination);
            let actual = direct_black_extinction_coefficient(inclination, SPHERICAL_ANGLES_FACTOR, 1.0);
            assert_abs_diff_eq!(actual, expected, epsilon = 0.01);
        }
    }

    #[test]
    fn test_direct_black_extinction_decreases_with_clumping() {
        let coefficients: Vec<f64> = [1.0, 0.9, 0.7, 0.5]
            .iter()
            .map(|clumping| direct_black_extinction_coefficient(FRAC_PI_3, SPHERICAL_ANGLES_FACTOR, *clumping))
            .collect();
        assert_strictly_decreasing(&coefficients);
    }

    #[test]
    fn test_direct_extinction_is_zero_when_leaf_scattering_is_unity() {
        for inclination in [0.0, 0.2, FRAC_PI_3, FRAC_PI_2] {
            assert_eq!(
                direct_extinction_coefficient(inclination, 1.0, SPHERICAL_ANGLES_FACTOR, 1.0),
                0.0
            );
        }
    }

    #[test]
    fn test_direct_extinction_returns_expected_value() {
        let actual = direct_extinction_coefficient(FRAC_PI_2, 0.15, SPHERICAL_ANGLES_FACTOR, 1.0);
        assert_abs_diff_eq!(actual, 0.46260740831950214, epsilon = 1e-6);
    }

    #[test]
    fn test_diffuse_extinction_returns_expected_values() {
        let soc = diffuse_extinction_coefficient(3.0, SPHERICAL_ANGLES_FACTOR, 1.0, 0.15, 3, SkyType::Soc).unwrap();
        assert_abs_diff_eq!(soc.diffuse_extinction_coefficient, 0.639942202843051, epsilon = 1e-6);
        assert_abs_diff_eq!(soc.diffuse_black_extinction_coefficient, 0.6882262946738082, epsilon = 1e-6);

        let uoc = diffuse_extinction_coefficient(3.0, SPHERICAL_ANGLES_FACTOR, 1.0, 0.15, 3, SkyType::Uoc).unwrap();
        assert_abs_diff_eq!(uoc.diffuse_extinction_coefficient, 0.6766507509858581, epsilon = 1e-6);
        assert_abs_diff_eq!(uoc.diffuse_black_extinction_coefficient, 0.7258805805416189, epsilon = 1e-6);
    }

    #[test]
    fn test_diffuse_extinction_decreases_as_leaf_area_index_increases() {
        let coefficients: Vec<f64> = (0..=50)
            .map(|i| {
                diffuse_extinction_coefficient(i as f64 * 0.1, SPHERICAL_ANGLES_FACTOR, 1.0, 0.15, 3, SkyType::Soc)
                    .unwrap()
                    .diffuse_extinction_coefficient
            })
            .collect();
        assert_strictly_decreasing(&coefficients);
    }

    #[test]
    fn test_diffuse_extinction_is_finite_for_zero_leaf_area_index() {
        let coefficients =
            diffuse_extinction_coefficient(0.0, SPHERICAL_ANGLES_FACTOR, 1.0, 0.15, 3, SkyType::Soc).unwrap();
        assert!(coefficients.diffuse_extinction_coefficient.is_finite());
        assert!(coefficients.diffuse_black_extinction_coefficient.is_finite());
    }

    #[test]
    fn test_black_leaves_extinguish_diffuse_irradiance_at_least_as_much() {
        let sky_settings = [(SkyType::Soc, 1), (SkyType::Soc, 3), (SkyType::Soc, 6), (SkyType::Uoc, 3)];
        for leaf_area_index in [0.0, 0.1, 0.5, 1.0, 3.0, 6.0, 12.0] {
            for scattering in [0.0, 0.05, 0.15, 0.5, 0.9, 0.99] {
                for (sky_type, sky_sectors_number) in sky_settings {
                    let coefficients = diffuse_extinction_coefficient(
                        leaf_area_index,
                        SPHERICAL_ANGLES_FACTOR,
                        1.0,
                        scattering,
                        sky_sectors_number,
                        sky_type,
                    )
                    .unwrap();
                    assert_ge!(
                        coefficients.diffuse_black_extinction_coefficient,
                        coefficients.diffuse_extinction_coefficient
                    );
                }
            }
        }
    }

    #[test]
    fn test_diffuse_extinction_propagates_sky_errors() {
        assert!(diffuse_extinction_coefficient(3.0, SPHERICAL_ANGLES_FACTOR, 1.0, 0.15, 4, SkyType::Uoc).is_err());
    }

    #[test]
    fn test_canopy_reflectance_is_zero_when_leaf_scattering_is_zero() {
        let mut rng = rand::rng();
        for _ in 0..10 {
            let black_coefficient: f64 = rng.random();
            assert_eq!(canopy_reflectance_to_direct_irradiance(black_coefficient, 0.0), 0.0);
        }
    }

    #[test]
    fn test_canopy_reflectance_increases_as_leaf_scattering_increases() {
        let reflectances: Vec<f64> = (0..=10)
            .map(|i| canopy_reflectance_to_direct_irradiance(0.5, i as f64 * 0.1))
            .collect();
        assert_strictly_increasing(&reflectances);
    }

    #[test]
    fn test_canopy_reflectance_increases_as_direct_black_extinction_increases() {
        let reflectances: Vec<f64> = (0..=10)
            .map(|i| canopy_reflectance_to_direct_irradiance(i as f64 * 0.1, 0.15))
            .collect();
        assert_strictly_increasing(&reflectances);
    }
}
