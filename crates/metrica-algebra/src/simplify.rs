//! The simplification seam.
//!
//! Every pipeline stage passes its entries through a [`Simplify`]. The
//! choice affects only the size of intermediate values, never their
//! meaning: all implementations return a value `equivalent` to the input.

use crate::rational::RationalFunction;

pub trait Simplify {
    fn simplify(&self, value: RationalFunction) -> RationalFunction;
}

/// Full gcd cancellation: the canonical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonical;

impl Simplify for Canonical {
    fn simplify(&self, value: RationalFunction) -> RationalFunction {
        value.cancel()
    }
}

/// Keeps unit normalization only and leaves common factors in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deferred;

impl Simplify for Deferred {
    fn simplify(&self, value: RationalFunction) -> RationalFunction {
        value
    }
}

impl<S: Simplify + ?Sized> Simplify for &S {
    fn simplify(&self, value: RationalFunction) -> RationalFunction {
        (**self).simplify(value)
    }
}
