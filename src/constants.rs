// Numerical floor applied to angles [rad], denominators and leaf area indices before
// trigonometric or logarithmic operations. Part of the public contract: a solar inclination
// of 0.0 behaves exactly like an inclination of PRECISION.
pub const PRECISION: f64 = 1.0e-6;

// Leaf angle distribution factor of a spherical canopy: rad(56°)
pub const SPHERICAL_ANGLES_FACTOR: f64 = 0.9773843811168246;
pub const NO_CLUMPING: f64 = 1.0;

// Ellipsoidal projection ratio from the leaf angle distribution factor (Campbell 1990)
pub const PROJECTION_RATIO_SCALE: f64 = 9.65;
pub const PROJECTION_RATIO_EXPONENT: f64 = -0.6061;
pub const PROJECTION_RATIO_OFFSET: f64 = 3.0;
pub const PROJECTION_DENOMINATOR_FACTOR: f64 = 1.774;
pub const PROJECTION_DENOMINATOR_OFFSET: f64 = 1.182;
pub const PROJECTION_DENOMINATOR_EXPONENT: f64 = -0.733;

// === Sky discretization ===

pub const DEFAULT_SKY_SECTORS_NUMBER: usize = 3;
pub const UOC_SKY_SECTORS_NUMBER: usize = 3;
pub const UOC_SKY_SECTORS_WEIGHT: [f64; UOC_SKY_SECTORS_NUMBER] = [0.25, 0.5, 0.25];

// Integral of the standard overcast radiance weight over the whole hemisphere
pub const SOC_NORMALIZATION: f64 = 7.0 / 6.0;

// === Canopy reflectance to diffuse irradiance, per irradiance band ===

pub const PAR_CANOPY_REFLECTANCE_TO_DIFFUSE_IRRADIANCE: f64 = 0.057;
pub const NIR_CANOPY_REFLECTANCE_TO_DIFFUSE_IRRADIANCE: f64 = 0.389;
