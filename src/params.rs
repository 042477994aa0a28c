// src/params.rs - Canopy optical parameters, model configurations and derived coefficients

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SKY_SECTORS_NUMBER, NO_CLUMPING, PRECISION, SPHERICAL_ANGLES_FACTOR};
use crate::error::{Error, Result};
use crate::formalisms::extinction::{
    canopy_reflectance_to_direct_irradiance, diffuse_extinction_coefficient,
    direct_black_extinction_coefficient, direct_extinction_coefficient, leaf_scattering_coefficient,
};
use crate::formalisms::AbsorptionCoefficients;
use crate::formalisms::sky::SkyType;
use crate::inputs::IrradianceInputs;
use crate::irradiance_band::IrradianceBand;

/// Canopy reflectance to diffuse irradiance, either given or taken from an irradiance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffuseReflectance {
    Value(f64),
    Band(IrradianceBand),
}

impl DiffuseReflectance {
    /// [-]
    pub fn value(&self) -> f64 {
        match self {
            DiffuseReflectance::Value(value) => *value,
            DiffuseReflectance::Band(band) => band.canopy_reflectance_to_diffuse_irradiance(),
        }
    }
}

fn default_sky_sectors_number() -> usize {
    DEFAULT_SKY_SECTORS_NUMBER
}

fn default_leaf_angle_distribution_factor() -> f64 {
    SPHERICAL_ANGLES_FACTOR
}

fn default_clumping_factor() -> f64 {
    NO_CLUMPING
}

/// Leaf optics and sky discretization; configuration that outlives simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanopyOpticalParameters {
    /// [-]
    pub leaf_reflectance: f64,
    /// [-]
    pub leaf_transmittance: f64,
    #[serde(default = "default_sky_sectors_number")]
    pub sky_sectors_number: usize,
    #[serde(default)]
    pub sky_type: SkyType,
    pub canopy_reflectance_to_diffuse_irradiance: DiffuseReflectance,
    /// [rad]
    #[serde(default = "default_leaf_angle_distribution_factor")]
    pub leaf_angle_distribution_factor: f64,
    /// [-]
    #[serde(default = "default_clumping_factor")]
    pub clumping_factor: f64,
}

impl CanopyOpticalParameters {
    /// Spherical, randomly dispersed leaves under a 3-sector standard overcast sky.
    pub fn new(
        leaf_reflectance: f64,
        leaf_transmittance: f64,
        canopy_reflectance_to_diffuse_irradiance: DiffuseReflectance,
    ) -> Self {
        Self {
            leaf_reflectance,
            leaf_transmittance,
            sky_sectors_number: DEFAULT_SKY_SECTORS_NUMBER,
            sky_type: SkyType::default(),
            canopy_reflectance_to_diffuse_irradiance,
            leaf_angle_distribution_factor: SPHERICAL_ANGLES_FACTOR,
            clumping_factor: NO_CLUMPING,
        }
    }

    pub fn with_sky(mut self, sky_sectors_number: usize, sky_type: SkyType) -> Self {
        self.sky_sectors_number = sky_sectors_number;
        self.sky_type = sky_type;
        self
    }

    pub fn with_leaf_geometry(mut self, leaf_angle_distribution_factor: f64, clumping_factor: f64) -> Self {
        self.leaf_angle_distribution_factor = leaf_angle_distribution_factor;
        self.clumping_factor = clumping_factor;
        self
    }

    pub fn leaf_scattering_coefficient(&self) -> f64 {
        leaf_scattering_coefficient(self.leaf_reflectance, self.leaf_transmittance)
    }
}

/// Beer model: one extinction coefficient given directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeerLumpedConfig {
    /// [m2ground m-2leaf]
    pub extinction_coefficient: f64,
}

/// de Pury model: coefficients derived from leaf optics and solar inclination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DePuryLumpedConfig {
    #[serde(flatten)]
    pub optics: CanopyOpticalParameters,
}

/// Sunlit/shaded model: coefficients derived from leaf optics and solar inclination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunlitShadedConfig {
    #[serde(flatten)]
    pub optics: CanopyOpticalParameters,
}

/// Model used by a canopy of lumped leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LumpedModelConfig {
    Beer(BeerLumpedConfig),
    DePury(DePuryLumpedConfig),
}

/// Configurations whose coefficients derive from canopy optics
pub trait OpticalConfig {
    fn optics(&self) -> &CanopyOpticalParameters;
}

impl OpticalConfig for DePuryLumpedConfig {
    fn optics(&self) -> &CanopyOpticalParameters {
        &self.optics
    }
}

impl OpticalConfig for SunlitShadedConfig {
    fn optics(&self) -> &CanopyOpticalParameters {
        &self.optics
    }
}

/// Extinction and reflectance coefficients derived for one solar inclination, one
/// canopy leaf area index and one set of canopy optics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientBundle {
    /// optics the bundle was derived from
    pub optics: CanopyOpticalParameters,
    /// [rad] solar inclination the bundle was derived for
    pub solar_inclination: f64,
    /// [m2leaf m-2ground] total leaf area index the bundle was derived for
    pub leaf_area_index: f64,
    pub leaf_scattering_coefficient: f64,
    pub direct_black_extinction_coefficient: f64,
    pub direct_extinction_coefficient: f64,
    pub diffuse_extinction_coefficient: f64,
    pub diffuse_black_extinction_coefficient: f64,
    pub canopy_reflectance_to_direct_irradiance: f64,
    pub canopy_reflectance_to_diffuse_irradiance: f64,
}

impl CoefficientBundle {
    /// Derives a fresh bundle from canopy optics and the current environmental inputs.
    ///
    /// # Errors
    /// Sky discretization errors (see [`crate::formalisms::sky::sky_sectors_weight`]).
    pub fn derive(optics: &CanopyOpticalParameters, inputs: &IrradianceInputs) -> Result<Self> {
        let leaf_area_index = inputs.total_leaf_area_index();
        let scattering = optics.leaf_scattering_coefficient();

        let direct_black = direct_black_extinction_coefficient(
            inputs.solar_inclination,
            optics.leaf_angle_distribution_factor,
            optics.clumping_factor,
        );
        let diffuse = diffuse_extinction_coefficient(
            leaf_area_index,
            optics.leaf_angle_distribution_factor,
            optics.clumping_factor,
            scattering,
            optics.sky_sectors_number,
            optics.sky_type,
        )?;

        let bundle = CoefficientBundle {
            optics: *optics,
            solar_inclination: inputs.solar_inclination,
            leaf_area_index,
            leaf_scattering_coefficient: scattering,
            direct_black_extinction_coefficient: direct_black,
            direct_extinction_coefficient: direct_extinction_coefficient(
                inputs.solar_inclination,
                scattering,
                optics.leaf_angle_distribution_factor,
                optics.clumping_factor,
            ),
            diffuse_extinction_coefficient: diffuse.diffuse_extinction_coefficient,
            diffuse_black_extinction_coefficient: diffuse.diffuse_black_extinction_coefficient,
            canopy_reflectance_to_direct_irradiance: canopy_reflectance_to_direct_irradiance(direct_black, scattering),
            canopy_reflectance_to_diffuse_irradiance: optics.canopy_reflectance_to_diffuse_irradiance.value(),
        };

        debug!(
            "derived coefficients for inclination {:.4} rad, LAI {:.3}: kb={:.4} kd={:.4} kf={:.4} rho_dir={:.4}",
            bundle.solar_inclination,
            bundle.leaf_area_index,
            bundle.direct_black_extinction_coefficient,
            bundle.direct_extinction_coefficient,
            bundle.diffuse_extinction_coefficient,
            bundle.canopy_reflectance_to_direct_irradiance
        );

        Ok(bundle)
    }

    /// Whether the bundle was derived for these inputs' solar inclination and leaf area index
    pub fn is_current(&self, inputs: &IrradianceInputs) -> bool {
        (self.solar_inclination - inputs.solar_inclination).abs() <= PRECISION
            && (self.leaf_area_index - inputs.total_leaf_area_index()).abs() <= PRECISION
    }

    /// # Errors
    /// [`Error::StaleCoefficients`] when the bundle belongs to other inputs
    pub fn ensure_current(&self, inputs: &IrradianceInputs) -> Result<()> {
        if self.is_current(inputs) {
            Ok(())
        } else {
            Err(Error::StaleCoefficients {
                reason: format!(
                    "derived for solar inclination {} rad and leaf area index {}, \
                     current inputs have {} rad and {}",
                    self.solar_inclination,
                    self.leaf_area_index,
                    inputs.solar_inclination,
                    inputs.total_leaf_area_index()
                ),
            })
        }
    }

    /// # Errors
    /// [`Error::StaleCoefficients`] when the bundle was derived from other optics
    pub fn ensure_derived_from(&self, optics: &CanopyOpticalParameters) -> Result<()> {
        if self.optics == *optics {
            Ok(())
        } else {
            Err(Error::StaleCoefficients {
                reason: format!("derived from {:?}, configuration now has {:?}", self.optics, optics),
            })
        }
    }

    /// The coefficients the layer formalisms consume
    pub fn absorption_coefficients(&self) -> AbsorptionCoefficients {
        AbsorptionCoefficients {
            leaf_scattering_coefficient: self.leaf_scattering_coefficient,
            direct_black_extinction_coefficient: self.direct_black_extinction_coefficient,
            direct_extinction_coefficient: self.direct_extinction_coefficient,
            diffuse_extinction_coefficient: self.diffuse_extinction_coefficient,
            canopy_reflectance_to_direct_irradiance: self.canopy_reflectance_to_direct_irradiance,
            canopy_reflectance_to_diffuse_irradiance: self.canopy_reflectance_to_diffuse_irradiance,
        }
    }
}

/// A model configuration plus the coefficients last derived from it.
///
/// Coefficients are refreshed only by an explicit [`Params::update`]; reading them before
/// any update, for inputs they were not derived for, or after the configuration changed,
/// is an error.
#[derive(Debug, Clone)]
pub struct Params<C> {
    config: C,
    coefficients: Option<CoefficientBundle>,
}

pub type DePuryLumpedParams = Params<DePuryLumpedConfig>;
pub type SunlitShadedParams = Params<SunlitShadedConfig>;

impl<C: OpticalConfig> Params<C> {
    pub fn new(config: C) -> Self {
        Params {
            config,
            coefficients: None,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Replaces the configuration; coefficients derived from the old one become stale.
    pub fn set_config(&mut self, config: C) {
        self.config = config;
    }

    /// Re-derives the coefficients for the current inputs
    pub fn update(&mut self, inputs: &IrradianceInputs) -> Result<&CoefficientBundle> {
        let bundle = CoefficientBundle::derive(self.config.optics(), inputs)?;
        Ok(&*self.coefficients.insert(bundle))
    }

    /// # Errors
    /// [`Error::CoefficientsNotDerived`] before the first [`Params::update`]
    pub fn coefficients(&self) -> Result<&CoefficientBundle> {
        self.coefficients.as_ref().ok_or(Error::CoefficientsNotDerived)
    }

    /// Coefficients checked against the inputs they are about to be used with.
    ///
    /// # Errors
    /// [`Error::CoefficientsNotDerived`] or [`Error::StaleCoefficients`]
    pub fn coefficients_for(&self, inputs: &IrradianceInputs) -> Result<&CoefficientBundle> {
        let bundle = self.coefficients()?;
        bundle.ensure_derived_from(self.config.optics())?;
        bundle.ensure_current(inputs)?;
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::LeafLayers;
    use approx::assert_abs_diff_eq;
    use std::collections::BTreeMap;
    use std::f64::consts::FRAC_PI_3;

    fn inputs(solar_inclination: f64) -> IrradianceInputs {
        IrradianceInputs {
            leaf_layers: LeafLayers::new(BTreeMap::from([(4, 0.09), (5, 1.11), (6, 1.92), (7, 3.22)])).unwrap(),
            incident_direct_irradiance: 360.0,
            incident_diffuse_irradiance: 80.0,
            solar_inclination,
        }
    }

    fn optics() -> CanopyOpticalParameters {
        CanopyOpticalParameters::new(0.08, 0.07, DiffuseReflectance::Band(IrradianceBand::Par))
    }

    #[test]
    fn test_optical_parameters_defaults() {
        let optics = optics();
        assert_eq!(optics.sky_sectors_number, 3);
        assert_eq!(optics.sky_type, SkyType::Soc);
        assert_eq!(optics.leaf_angle_distribution_factor, SPHERICAL_ANGLES_FACTOR);
        assert_eq!(optics.clumping_factor, 1.0);
        assert_eq!(optics.canopy_reflectance_to_diffuse_irradiance.value(), 0.057);
        assert_abs_diff_eq!(optics.leaf_scattering_coefficient(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_derived_coefficients_match_reference_values() {
        let bundle = CoefficientBundle::derive(&optics(), &inputs(FRAC_PI_3)).unwrap();

        assert_abs_diff_eq!(bundle.direct_black_extinction_coefficient, 0.5784874244141549, epsilon = 1e-9);
        assert_abs_diff_eq!(bundle.direct_extinction_coefficient, 0.533339052737116, epsilon = 1e-9);
        assert_abs_diff_eq!(bundle.diffuse_extinction_coefficient, 0.5949499541643701, epsilon = 1e-9);
        assert_abs_diff_eq!(bundle.diffuse_black_extinction_coefficient, 0.6405784546509188, epsilon = 1e-9);
        assert_abs_diff_eq!(bundle.canopy_reflectance_to_direct_irradiance, 0.02932518645915927, epsilon = 1e-9);
        assert_eq!(bundle.canopy_reflectance_to_diffuse_irradiance, 0.057);
    }

    #[test]
    fn test_diffuse_reflectance_band_or_value() {
        assert_eq!(DiffuseReflectance::Band(IrradianceBand::Nir).value(), 0.389);
        assert_eq!(DiffuseReflectance::Value(0.1).value(), 0.1);

        let band: DiffuseReflectance = serde_json::from_str(r#""nir""#).unwrap();
        assert_eq!(band, DiffuseReflectance::Band(IrradianceBand::Nir));
        let value: DiffuseReflectance = serde_json::from_str("0.04").unwrap();
        assert_eq!(value, DiffuseReflectance::Value(0.04));
    }

    #[test]
    fn test_coefficients_before_update_are_an_error() {
        let params = SunlitShadedParams::new(SunlitShadedConfig { optics: optics() });
        assert!(matches!(params.coefficients(), Err(Error::CoefficientsNotDerived)));
        assert!(matches!(params.coefficients_for(&inputs(FRAC_PI_3)), Err(Error::CoefficientsNotDerived)));
    }

    #[test]
    fn test_coefficients_become_stale_when_inputs_change() {
        let mut params = DePuryLumpedParams::new(DePuryLumpedConfig { optics: optics() });
        params.update(&inputs(FRAC_PI_3)).unwrap();
        assert!(params.coefficients_for(&inputs(FRAC_PI_3)).is_ok());

        let later = inputs(0.8);
        assert!(matches!(params.coefficients_for(&later), Err(Error::StaleCoefficients { .. })));

        params.update(&later).unwrap();
        assert_eq!(params.coefficients_for(&later).unwrap().solar_inclination, 0.8);
    }

    #[test]
    fn test_coefficients_become_stale_when_optics_change() {
        let current = inputs(FRAC_PI_3);
        let mut params = SunlitShadedParams::new(SunlitShadedConfig { optics: optics() });
        params.update(&current).unwrap();

        let brighter_leaves = CanopyOpticalParameters {
            leaf_reflectance: 0.4,
            leaf_transmittance: 0.4,
            ..optics()
        };
        params.set_config(SunlitShadedConfig { optics: brighter_leaves });
        assert!(matches!(params.coefficients_for(&current), Err(Error::StaleCoefficients { .. })));

        let refreshed = params.update(&current).unwrap();
        assert_eq!(refreshed.optics, brighter_leaves);
        assert_abs_diff_eq!(refreshed.leaf_scattering_coefficient, 0.8, epsilon = 1e-12);
        assert!(params.coefficients_for(&current).is_ok());
    }

    #[test]
    fn test_bundle_rejects_other_optics() {
        let bundle = CoefficientBundle::derive(&optics(), &inputs(FRAC_PI_3)).unwrap();
        assert!(bundle.ensure_derived_from(&optics()).is_ok());

        let nir = CanopyOpticalParameters::new(0.08, 0.07, DiffuseReflectance::Band(IrradianceBand::Nir));
        assert!(matches!(bundle.ensure_derived_from(&nir), Err(Error::StaleCoefficients { .. })));
    }

    #[test]
    fn test_update_propagates_sky_errors() {
        let optics = optics().with_sky(6, SkyType::Uoc);
        let mut params = SunlitShadedParams::new(SunlitShadedConfig { optics });
        assert!(matches!(
            params.update(&inputs(FRAC_PI_3)),
            Err(Error::UnsupportedSkySectors { .. })
        ));
        assert!(params.coefficients().is_err());
    }

    #[test]
    fn test_lumped_model_config_from_json() {
        let beer: LumpedModelConfig =
            serde_json::from_str(r#"{"model": "beer", "extinction_coefficient": 0.5}"#).unwrap();
        assert_eq!(beer, LumpedModelConfig::Beer(BeerLumpedConfig { extinction_coefficient: 0.5 }));

        let de_pury: LumpedModelConfig = serde_json::from_str(
            r#"{
                "model": "de_pury",
                "leaf_reflectance": 0.08,
                "leaf_transmittance": 0.07,
                "sky_type": "uoc",
                "canopy_reflectance_to_diffuse_irradiance": "nir"
            }"#,
        )
        .unwrap();
        match de_pury {
            LumpedModelConfig::DePury(config) => {
                assert_eq!(config.optics.sky_type, SkyType::Uoc);
                assert_eq!(config.optics.sky_sectors_number, 3);
                assert_eq!(config.optics.canopy_reflectance_to_diffuse_irradiance.value(), 0.389);
            }
            other => panic!("unexpected model {:?}", other),
        }

        assert!(serde_json::from_str::<LumpedModelConfig>(r#"{"model": "big_leaf"}"#).is_err());
    }

    #[test]
    fn test_diffuse_canopy_reflectance_is_required() {
        let missing = serde_json::from_str::<CanopyOpticalParameters>(
            r#"{"leaf_reflectance": 0.08, "leaf_transmittance": 0.07}"#,
        );
        let message = missing.unwrap_err().to_string();
        assert!(message.contains("canopy_reflectance_to_diffuse_irradiance"), "{}", message);

        assert!(serde_json::from_str::<LumpedModelConfig>(
            r#"{"model": "de_pury", "leaf_reflectance": 0.08, "leaf_transmittance": 0.07}"#
        )
        .is_err());
    }
}
