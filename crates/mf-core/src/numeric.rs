use crate::MfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, MfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(MfError::NonFinite { what, value: v })
    }
}

/// Require `v` to be finite and within `[0, 1]`.
pub fn ensure_fraction(v: Real, what: &'static str) -> Result<Real, MfError> {
    let v = ensure_finite(v, what)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(MfError::OutOfRange {
            what,
            value: v,
            min: 0.0,
            max: 1.0,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fractions_in_unit_interval_pass(v in 0.0_f64..=1.0_f64) {
            prop_assert_eq!(ensure_fraction(v, "p"), Ok(v));
        }

        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
