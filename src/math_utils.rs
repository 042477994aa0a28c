//! Mathematical utility functions shared by the irradiance formalisms
//!
//! The layer formalisms all integrate an exponential attenuation profile between the
//! upper and lower boundaries of a leaf layer; `beer_scaling_factor` is that integral.

/// Assert that the percentage deviation between two values is less than a threshold
///
/// Calculates the percentage deviation of `actual` from `expected` with
/// [`deviation`], then asserts that it is less than `max_deviation` (in %).
///
/// # Examples
/// See the test cases below for usage examples.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.4}% >= {:.4}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.4}% >= {:.4}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Fraction of an exponentially attenuated flux intercepted between two depths
///
/// # Arguments
/// * `extinction_coefficient` - [m2ground m-2leaf] attenuation rate per unit leaf area index
/// * `upper_cumulative_leaf_area_index` - [m2leaf m-2ground] leaf area above the layer
/// * `leaf_layer_thickness` - [m2leaf m-2ground] leaf area index of the layer itself
///
/// # Returns
/// `exp(-k·U) - exp(-k·(U + T))`
///
/// # Examples
/// ```
/// use crop_irradiance::math_utils::beer_scaling_factor;
///
/// // a layer of zero thickness intercepts nothing
/// assert_eq!(beer_scaling_factor(0.5, 1.0, 0.0), 0.0);
///
/// // an infinitely thick layer at the top of the canopy intercepts everything
/// assert_eq!(beer_scaling_factor(0.5, 0.0, f64::INFINITY), 1.0);
/// ```
pub fn beer_scaling_factor(
    extinction_coefficient: f64,
    upper_cumulative_leaf_area_index: f64,
    leaf_layer_thickness: f64,
) -> f64 {
    (-extinction_coefficient * upper_cumulative_leaf_area_index).exp()
        - (-extinction_coefficient * (upper_cumulative_leaf_area_index + leaf_layer_thickness)).exp()
}

/// Calculate the percentage deviation between two values
///
/// Uses the expected value as the reference (base) for the percentage calculation.
///
/// # Returns
/// The percentage deviation as a positive f64 (absolute difference)
///
/// # Examples
/// ```
/// use crop_irradiance::math_utils::deviation;
///
/// // 105 is 5% higher than 100
/// assert_eq!(deviation(105.0, 100.0), 5.0);
///
/// // 95 is 5% lower than 100
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_beer_scaling_factor() {
        assert_abs_diff_eq!(beer_scaling_factor(0.5, 0.0, 3.0), 1.0 - (-1.5f64).exp(), epsilon = 1e-12);
        assert_eq!(beer_scaling_factor(0.0, 2.0, 3.0), 0.0);

        // splitting a layer in two does not change what it intercepts
        let whole = beer_scaling_factor(0.7, 1.0, 2.0);
        let split = beer_scaling_factor(0.7, 1.0, 0.5) + beer_scaling_factor(0.7, 1.5, 1.5);
        assert_abs_diff_eq!(whole, split, epsilon = 1e-12);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(deviation(105.0, 100.0), 5.0);
        assert_eq!(deviation(95.0, 100.0), 5.0);
        assert_eq!(deviation(100.0, 100.0), 0.0);

        // Edge cases
        assert_eq!(deviation(0.0, 0.0), 0.0);
        assert_eq!(deviation(10.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_assert_deviation_macro() {
        assert_deviation!(105.0, 100.0, 10.0);
        assert_deviation!(100.0, 100.0, 1.0);
        assert_deviation!(2.0 * 52.5, 100.0, 10.0);
        assert_deviation!(425.0, 424.9, 0.1, "absorbed irradiance should be within 0.1%");
    }

    #[test]
    #[should_panic(expected = "assertion failed: deviation")]
    fn test_assert_deviation_macro_fails() {
        assert_deviation!(120.0, 100.0, 10.0);
    }
}
