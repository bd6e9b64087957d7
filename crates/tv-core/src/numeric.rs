use crate::{TvError, TvResult};

/// Centivolts, the fixed-point unit the actuator register is written in.
pub type Centivolts = i32;

/// Whole degrees Celsius.
pub type Celsius = i32;

/// Clock speed in MHz.
pub type Megahertz = i32;

/// `value * num / den` evaluated in `i64`, truncating toward zero.
///
/// Returns `None` when `den` is zero or the quotient does not fit in `i32`.
pub fn mul_div_trunc(value: i32, num: i32, den: i32) -> Option<i32> {
    if den == 0 {
        return None;
    }
    let q = (value as i64 * num as i64) / den as i64;
    i32::try_from(q).ok()
}

/// Truncate a decimal reading toward zero, the way sensor logs are consumed.
pub fn truncate_reading(v: f64, what: &'static str) -> TvResult<i32> {
    if !v.is_finite() {
        return Err(TvError::InvalidArg { what });
    }
    let t = v.trunc();
    if t < i32::MIN as f64 || t > i32::MAX as f64 {
        return Err(TvError::OutOfRange {
            what,
            value: t as i64,
            min: i32::MIN as i64,
            max: i32::MAX as i64,
        });
    }
    Ok(t as i32)
}

/// Convert a commanded voltage into the 16-bit register value.
pub fn to_register(v: Centivolts) -> TvResult<u16> {
    u16::try_from(v).map_err(|_| TvError::OutOfRange {
        what: "register voltage",
        value: v as i64,
        min: 0,
        max: u16::MAX as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_truncates() {
        assert_eq!(mul_div_trunc(10, 700, 25), Some(280));
        assert_eq!(mul_div_trunc(7, 10, 3), Some(23));
        assert_eq!(mul_div_trunc(1, 1, 0), None);
    }

    #[test]
    fn mul_div_does_not_overflow_intermediate() {
        assert_eq!(mul_div_trunc(i32::MAX, 2, 4), Some(i32::MAX / 2));
        assert_eq!(mul_div_trunc(i32::MAX, 2, 1), None);
    }

    #[test]
    fn truncate_reading_rounds_toward_zero() {
        assert_eq!(truncate_reading(85.9, "t").unwrap(), 85);
        assert_eq!(truncate_reading(3889.99, "c").unwrap(), 3889);
        assert_eq!(truncate_reading(-0.5, "t").unwrap(), 0);
    }

    #[test]
    fn truncate_reading_rejects_nan() {
        let err = truncate_reading(f64::NAN, "temperature").unwrap_err();
        assert!(format!("{err}").contains("temperature"));
    }

    #[test]
    fn register_conversion_bounds() {
        assert_eq!(to_register(1200).unwrap(), 1200);
        assert!(to_register(-1).is_err());
        assert!(to_register(70_000).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn matches_plain_division_for_small_operands(
            v in 0i32..10_000,
            n in 0i32..10_000,
            d in 1i32..10_000,
        ) {
            prop_assert_eq!(mul_div_trunc(v, n, d), Some(v * n / d));
        }
    }
}
