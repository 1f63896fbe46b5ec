/*

    Rounding applied to the derived box values.

    @date: Nov, 2025
    @author: bartu
*/

use crate::numeric::Float;

pub trait Rounding: Sync {
    fn round(&self, value: Float, precision: u32) -> Float;
}

/// Round to `precision` decimal digits, halves away from zero.
/// Precision 0 rounds to the nearest integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalRounding;

impl Rounding for DecimalRounding {
    fn round(&self, value: Float, precision: u32) -> Float {
        if !value.is_finite() {
            return value;
        }
        // Saturate, a wrapped exponent would turn the factor into 0
        let exponent = i32::try_from(precision).unwrap_or(i32::MAX);
        let factor = (10.0 as Float).powi(exponent);
        let scaled = value * factor;
        if !scaled.is_finite() {
            // More digits requested than the value carries, nothing to round
            return value;
        }
        scaled.round() / factor
    }
}

/// Leaves values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrounded;

impl Rounding for Unrounded {
    fn round(&self, value: Float, _precision: u32) -> Float {
        value
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_zero_rounds_to_integer() {
        assert_eq!(DecimalRounding.round(2.4, 0), 2.0);
        assert_eq!(DecimalRounding.round(2.5, 0), 3.0);
        assert_eq!(DecimalRounding.round(-2.5, 0), -3.0);
    }

    #[test]
    fn rounds_to_requested_decimals() {
        assert_eq!(DecimalRounding.round(1.23456, 2), 1.23);
        assert_eq!(DecimalRounding.round(1.23556, 3), 1.236);
        assert_eq!(DecimalRounding.round(-0.0049, 2), -0.0);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert_eq!(DecimalRounding.round(Float::INFINITY, 3), Float::INFINITY);
        assert!(DecimalRounding.round(Float::NAN, 3).is_nan());
        assert_eq!(DecimalRounding.round(1e300, 20), 1e300);
    }

    #[test]
    fn huge_precision_keeps_value() {
        assert_eq!(DecimalRounding.round(123.456, u32::MAX), 123.456);
        assert_eq!(DecimalRounding.round(123.456, 1 << 31), 123.456);
        assert_eq!(DecimalRounding.round(-7.25, 400), -7.25);
        assert_eq!(DecimalRounding.round(0.0, u32::MAX), 0.0);
    }

    #[test]
    fn unrounded_is_identity() {
        assert_eq!(Unrounded.round(1.23456789, 0), 1.23456789);
    }
}
