//! Exact Gaussian-rational coefficients.

use num::{BigInt, BigRational, Complex, Zero};

/// Coefficient field ℚ(i).
pub type Coeff = Complex<BigRational>;

pub fn integer(n: i64) -> Coeff {
    real(BigRational::from_integer(BigInt::from(n)))
}

/// `n/d` as a real coefficient. `d` must be non-zero.
pub fn ratio(n: i64, d: i64) -> Coeff {
    real(BigRational::new(BigInt::from(n), BigInt::from(d)))
}

pub fn real(value: BigRational) -> Coeff {
    Complex::new(value, BigRational::zero())
}

/// `n·i`.
pub fn imaginary(n: i64) -> Coeff {
    Complex::new(BigRational::zero(), BigRational::from_integer(BigInt::from(n)))
}

pub fn is_real(value: &Coeff) -> bool {
    value.im.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::One;

    #[test]
    fn imaginary_unit_squares_to_minus_one() {
        let i = imaginary(1);
        assert_eq!(&i * &i, integer(-1));
    }

    #[test]
    fn ratio_is_reduced() {
        assert_eq!(ratio(2, 4), ratio(1, 2));
        assert!(is_real(&ratio(3, 7)));
        assert!((ratio(1, 2) + ratio(1, 2)).is_one());
    }
}
