pub mod canopy;
pub mod config_parser;
pub mod constants;
pub mod error;
pub mod formalisms;
pub mod inputs;
pub mod irradiance_band;
pub mod math_utils;
pub mod params;

// Re-export the main types for easier access
pub use canopy::{AbsorptionCategory, AbsorptionModel, Canopy, LayerAbsorption, LeafLayer, LeavesCategory};
pub use config_parser::{CanopyConfig, ConfigParser};
pub use error::{Error, Result};
pub use formalisms::{AbsorptionCoefficients, LayerSpan};
pub use formalisms::sky::SkyType;
pub use formalisms::sunlit_shaded_leaves::SunlitShadedAbsorption;
pub use inputs::{BeerInputs, IrradianceInputs, LeafLayers};
pub use irradiance_band::IrradianceBand;
pub use params::{
    BeerLumpedConfig, CanopyOpticalParameters, CoefficientBundle, DePuryLumpedConfig, DePuryLumpedParams,
    DiffuseReflectance, LumpedModelConfig, Params, SunlitShadedConfig, SunlitShadedParams,
};
