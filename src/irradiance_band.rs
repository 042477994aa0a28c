// src/irradiance_band.rs - Irradiance bands and their canopy reflectance to diffuse irradiance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    NIR_CANOPY_REFLECTANCE_TO_DIFFUSE_IRRADIANCE, PAR_CANOPY_REFLECTANCE_TO_DIFFUSE_IRRADIANCE,
};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrradianceBand {
    /// Photosynthetically active radiation (400-700 nm)
    Par,
    /// Near infrared radiation (700-2500 nm)
    Nir,
}

impl IrradianceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrradianceBand::Par => "par",
            IrradianceBand::Nir => "nir",
        }
    }

    /// [-] canopy reflectance to diffuse irradiance for this band
    pub fn canopy_reflectance_to_diffuse_irradiance(&self) -> f64 {
        match self {
            IrradianceBand::Par => PAR_CANOPY_REFLECTANCE_TO_DIFFUSE_IRRADIANCE,
            IrradianceBand::Nir => NIR_CANOPY_REFLECTANCE_TO_DIFFUSE_IRRADIANCE,
        }
    }
}

impl FromStr for IrradianceBand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "par" => Ok(IrradianceBand::Par),
            "nir" => Ok(IrradianceBand::Nir),
            other => Err(Error::UnknownIrradianceBand(other.to_string())),
        }
    }
}

impl fmt::Display for IrradianceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canopy_reflectance_per_band() {
        assert_eq!(IrradianceBand::Par.canopy_reflectance_to_diffuse_irradiance(), 0.057);
        assert_eq!(IrradianceBand::Nir.canopy_reflectance_to_diffuse_irradiance(), 0.389);
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!("par".parse::<IrradianceBand>().unwrap(), IrradianceBand::Par);
        assert_eq!("nir".parse::<IrradianceBand>().unwrap(), IrradianceBand::Nir);
        assert!(matches!(
            "uv".parse::<IrradianceBand>(),
            Err(Error::UnknownIrradianceBand(band)) if band == "uv"
        ));
    }

    #[test]
    fn test_band_names_parse_back() {
        for band in [IrradianceBand::Par, IrradianceBand::Nir] {
            assert_eq!(band.to_string().parse::<IrradianceBand>().unwrap(), band);
            assert_eq!(serde_json::to_value(band).unwrap(), band.as_str());
        }
    }
}
