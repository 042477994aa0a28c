//! Sky discretization used to integrate diffuse irradiance over the sky hemisphere.
//!
//! The hemisphere is split into `sky_sectors_number` rings of equal declination width
//! spanning 0 to π/2. Each ring carries a weight (its share of the incident diffuse
//! irradiance) and is represented by its mid-angle.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use crate::constants::{SOC_NORMALIZATION, UOC_SKY_SECTORS_NUMBER, UOC_SKY_SECTORS_WEIGHT};
use crate::error::{Error, Result};

/// Reference sky radiance distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyType {
    /// Standard overcast sky: radiance increases from horizon to zenith
    #[default]
    Soc,
    /// Uniform overcast sky: isotropic radiance
    Uoc,
}

impl SkyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkyType::Soc => "soc",
            SkyType::Uoc => "uoc",
        }
    }
}

impl FromStr for SkyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "soc" => Ok(SkyType::Soc),
            "uoc" => Ok(SkyType::Uoc),
            other => Err(Error::UnknownSkyType(other.to_string())),
        }
    }
}

impl fmt::Display for SkyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half of the declination width of one sky ring [rad]
fn half_angle_increment(sky_sectors_number: usize) -> f64 {
    FRAC_PI_2 / sky_sectors_number as f64 / 2.0
}

/// Cumulative standard overcast radiance weight from the horizon up to `angle` (unnormalized)
fn soc_cumulative_weight(angle: f64) -> f64 {
    angle.sin().powi(2) * (0.5 + 2.0 / 3.0 * angle.sin())
}

/// Mid-angles [rad] of each sky ring, from the horizon upwards
pub fn sky_sectors_angle(sky_sectors_number: usize) -> impl Iterator<Item = f64> {
    let half_increment = half_angle_increment(sky_sectors_number.max(1));
    (0..sky_sectors_number).map(move |i| half_increment * (1.0 + 2.0 * i as f64))
}

/// Calculates the share of diffuse irradiance coming from each sky ring.
///
/// Weights are ordered from the horizon upwards and sum to 1.
///
/// # Errors
/// * [`Error::NoSkySectors`] when `sky_sectors_number` is 0
/// * [`Error::UnsupportedSkySectors`] for a uniform overcast sky not split in 3 sectors
///
/// # References
/// Goudriaan J. (1988). The bare bones of leaf-angle distribution in radiation models for
/// canopy photosynthesis and energy exchange. Agricultural and Forest Meteorology 43, 155-169.
pub fn sky_sectors_weight(sky_sectors_number: usize, sky_type: SkyType) -> Result<Vec<f64>> {
    if sky_sectors_number == 0 {
        return Err(Error::NoSkySectors);
    }

    match sky_type {
        SkyType::Uoc => {
            if sky_sectors_number != UOC_SKY_SECTORS_NUMBER {
                return Err(Error::UnsupportedSkySectors {
                    sky_type,
                    sky_sectors_number,
                    expected: UOC_SKY_SECTORS_NUMBER,
                });
            }
            Ok(UOC_SKY_SECTORS_WEIGHT.to_vec())
        }
        SkyType::Soc => {
            let angle_increment = 2.0 * half_angle_increment(sky_sectors_number);
            Ok((0..sky_sectors_number)
                .map(|i| {
                    let lower_angle = i as f64 * angle_increment;
                    let upper_angle = (i + 1) as f64 * angle_increment;
                    (soc_cumulative_weight(upper_angle) - soc_cumulative_weight(lower_angle))
                        / SOC_NORMALIZATION
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_uoc_weights() {
        assert_eq!(sky_sectors_weight(3, SkyType::Uoc).unwrap(), vec![0.25, 0.5, 0.25]);
    }

    #[test]
    fn test_soc_weights_match_reference_values() {
        let weights = sky_sectors_weight(3, SkyType::Soc).unwrap();
        let expected = [0.1785714285714285, 0.5140108873361879, 0.3074176840923834];
        for (actual, expected) in weights.iter().zip(expected) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_soc_weights_sum_to_one_for_any_sector_count() {
        for sky_sectors_number in [1, 3, 6, 9, 30] {
            let total: f64 = sky_sectors_weight(sky_sectors_number, SkyType::Soc).unwrap().iter().sum();
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_uoc_rejects_other_sector_counts() {
        let err = sky_sectors_weight(6, SkyType::Uoc).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSkySectors { sky_type: SkyType::Uoc, sky_sectors_number: 6, expected: 3 }
        ));
    }

    #[test]
    fn test_zero_sectors_is_an_error() {
        assert!(matches!(sky_sectors_weight(0, SkyType::Soc), Err(Error::NoSkySectors)));
    }

    #[test]
    fn test_unknown_sky_type_is_an_error() {
        assert!(matches!(
            "some unknown sky type".parse::<SkyType>(),
            Err(Error::UnknownSkyType(_))
        ));
        assert_eq!("uoc".parse::<SkyType>().unwrap(), SkyType::Uoc);
    }

    #[test]
    fn test_sector_angles_are_ring_centers() {
        let angles: Vec<f64> = sky_sectors_angle(3).collect();
        let pi = std::f64::consts::PI;
        assert_eq!(angles.len(), 3);
        assert_abs_diff_eq!(angles[0], pi / 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[1], pi / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[2], 5.0 * pi / 12.0, epsilon = 1e-12);
    }
}
