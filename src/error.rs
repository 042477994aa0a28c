//! Error types for crop irradiance computations

use thiserror::Error;

use crate::formalisms::sky::SkyType;

/// Main error type for canopy irradiance operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown sky type \"{0}\" (expected one of \"soc\", \"uoc\")")]
    UnknownSkyType(String),

    #[error("sky type \"{sky_type}\" requires {expected} sky sectors, got {sky_sectors_number}")]
    UnsupportedSkySectors {
        sky_type: SkyType,
        sky_sectors_number: usize,
        expected: usize,
    },

    #[error("at least one sky sector is required")]
    NoSkySectors,

    #[error("unknown irradiance band \"{0}\" (expected one of \"par\", \"nir\")")]
    UnknownIrradianceBand(String),

    #[error("unknown leaves category \"{0}\" (expected one of \"lumped\", \"sunlit-shaded\")")]
    UnknownLeavesCategory(String),

    #[error("invalid leaf layer {index}: thickness must be a positive finite leaf area index, got {thickness}")]
    InvalidLeafLayer { index: i32, thickness: f64 },

    #[error("canopy has no leaf layers")]
    EmptyCanopy,

    #[error("no leaf layer with index {0}")]
    UnknownLeafLayer(i32),

    #[error("extinction coefficients have not been derived yet, call `update` with the current inputs first")]
    CoefficientsNotDerived,

    #[error("extinction coefficients are stale: {reason}")]
    StaleCoefficients { reason: String },

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for canopy irradiance operations
pub type Result<T> = std::result::Result<T, Error>;
