//! The scalar abstraction shared by the two tableau instantiations.

use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric values a tableau can pivot over.
///
/// Implemented by `f64` (approximate, epsilon-tested) and
/// [`BigRational`] (exact). Input data always arrives as rationals;
/// `from_rational` performs the per-type conversion.
pub trait Scalar:
    Clone
    + Debug
    + PartialEq
    + PartialOrd
    + Zero
    + One
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Convert exact input data into this scalar type.
    fn from_rational(value: &BigRational) -> Self;

    /// Whether the value should be treated as zero when normalizing
    /// output profiles.
    fn is_negligible(&self) -> bool;
}

impl Scalar for f64 {
    fn from_rational(value: &BigRational) -> Self {
        value.to_f64().unwrap_or(f64::NAN)
    }

    fn is_negligible(&self) -> bool {
        self.abs() < 1.0e-9
    }
}

impl Scalar for BigRational {
    fn from_rational(value: &BigRational) -> Self {
        value.clone()
    }

    fn is_negligible(&self) -> bool {
        self.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_from_rational_f64() {
        assert_eq!(f64::from_rational(&rat(1, 2)), 0.5);
        assert_eq!(f64::from_rational(&rat(-3, 4)), -0.75);
    }

    #[test]
    fn test_from_rational_exact() {
        let q = rat(7, 3);
        assert_eq!(BigRational::from_rational(&q), q);
    }

    #[test]
    fn test_negligible() {
        assert!(0.0f64.is_negligible());
        assert!(1.0e-12f64.is_negligible());
        assert!(!1.0e-3f64.is_negligible());
        assert!(BigRational::zero().is_negligible());
        assert!(!rat(1, 1_000_000_000).is_negligible());
    }
}
