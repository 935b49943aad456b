//! Checked numeric conversions between landmark, pointer and X11 types

use crate::{Error, Result};

/// Safely convert f64 to i32 with bounds checking
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Clamp an i32 into `[min, max]` and narrow it to i16
#[must_use]
pub fn i32_to_i16_clamp(value: i32, min: i16, max: i16) -> i16 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let clamped = value.clamp(i32::from(min), i32::from(max));
    i16::try_from(clamped).unwrap_or(min)
}

/// Safely convert usize to u8 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds u8::MAX
pub fn usize_to_u8(value: usize) -> Result<u8> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in u8")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_f64_to_i32() {
        assert_eq!(f64_to_i32(42.0).unwrap(), 42);
        assert_eq!(f64_to_i32(-42.9).unwrap(), -42);
        assert_eq!(f64_to_i32(0.0).unwrap(), 0);

        assert!(f64_to_i32(f64::INFINITY).is_err());
        assert!(f64_to_i32(f64::NAN).is_err());
        assert!(f64_to_i32(2147483648.0).is_err());
    }

    #[test]
    fn test_i32_to_i16_clamp() {
        assert_eq!(i32_to_i16_clamp(50, 0, 100), 50);
        assert_eq!(i32_to_i16_clamp(-10, 0, 100), 0);
        assert_eq!(i32_to_i16_clamp(70_000, 0, 1919), 1919);
        assert_eq!(i32_to_i16_clamp(5, 100, 0), 5);
    }

    #[test]
    fn test_usize_to_u8() {
        assert_eq!(usize_to_u8(255).unwrap(), 255);
        assert!(usize_to_u8(256).is_err());
    }

    proptest! {
        #[test]
        fn prop_i32_to_i16_clamp_within_bounds(
            value in any::<i32>(),
            min in any::<i16>(),
            max in any::<i16>()
        ) {
            let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
            let result = i32_to_i16_clamp(value, min, max);
            prop_assert!(result >= lo);
            prop_assert!(result <= hi);
        }

        #[test]
        fn prop_f64_to_i32_roundtrips_integers(value in any::<i32>()) {
            prop_assert_eq!(f64_to_i32(f64::from(value)).unwrap(), value);
        }
    }
}
