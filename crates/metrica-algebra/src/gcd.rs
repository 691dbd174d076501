//! Multivariate polynomial gcd.
//!
//! Recursive: the gcd of two polynomials in a main atom `x` is the gcd of
//! their contents (coefficients in `x`, one variable fewer) times the gcd
//! of their primitive parts, computed by a primitive pseudo-remainder
//! sequence. Inputs must have non-negative exponents; the result is monic.

use crate::monomial::{Atom, Monomial};
use crate::poly::Poly;

pub fn gcd(a: &Poly, b: &Poly) -> Poly {
    if a.is_zero() {
        return b.monic();
    }
    if b.is_zero() {
        return a.monic();
    }
    let (ma, mb) = (a.content_monomial(), b.content_monomial());
    let common = ma.meet(&mb);
    let a = a.mul_monomial(&ma.inverse());
    let b = b.mul_monomial(&mb.inverse());
    stripped_gcd(&a, &b).mul_monomial(&common)
}

/// Gcd of two polynomials with no monomial content.
fn stripped_gcd(a: &Poly, b: &Poly) -> Poly {
    if a.is_constant() || b.is_constant() {
        return Poly::one();
    }
    let mut atoms = a.atoms();
    atoms.extend(b.atoms());
    let Some(main) = atoms.last().cloned() else {
        return Poly::one();
    };
    match (degree(a, &main) > 0, degree(b, &main) > 0) {
        (true, true) => {
            let (ca, cb) = (content(a, &main), content(b, &main));
            let pa = exact_quotient(a, &ca);
            let pb = exact_quotient(b, &cb);
            let shared = gcd(&ca, &cb);
            (&shared * &primitive_prs(pa, pb, &main)).monic()
        }
        (true, false) => gcd(&content(a, &main), b),
        (false, true) => gcd(a, &content(b, &main)),
        (false, false) => Poly::one(),
    }
}

fn degree(p: &Poly, atom: &Atom) -> i32 {
    p.degree_in(atom).unwrap_or(-1)
}

/// Gcd of the coefficients of `p` viewed as a polynomial in `atom`.
fn content(p: &Poly, atom: &Atom) -> Poly {
    let mut acc = Poly::zero();
    for coefficient in p.coefficients_in(atom).into_values() {
        acc = gcd(&acc, &coefficient);
        if acc.is_constant() {
            return Poly::one();
        }
    }
    acc
}

fn exact_quotient(p: &Poly, divisor: &Poly) -> Poly {
    if divisor.is_constant() {
        return p.monic();
    }
    p.div_rem(divisor).0
}

fn primitive_part(p: &Poly, atom: &Atom) -> Poly {
    exact_quotient(p, &content(p, atom)).monic()
}

fn leading_in(p: &Poly, atom: &Atom) -> Poly {
    p.coefficients_in(atom)
        .pop_last()
        .map(|(_, c)| c)
        .unwrap_or_default()
}

fn pseudo_remainder(a: &Poly, b: &Poly, atom: &Atom) -> Poly {
    let n = degree(b, atom);
    let lb = leading_in(b, atom);
    let mut r = a.clone();
    while !r.is_zero() {
        let dr = degree(&r, atom);
        if dr < n {
            break;
        }
        let lr = leading_in(&r, atom);
        let shifted = b.mul_monomial(&Monomial::atom(atom.clone(), dr - n));
        r = &(&r * &lb) - &(&lr * &shifted);
    }
    r
}

fn primitive_prs(mut a: Poly, mut b: Poly, atom: &Atom) -> Poly {
    if degree(&a, atom) < degree(&b, atom) {
        std::mem::swap(&mut a, &mut b);
    }
    loop {
        let r = pseudo_remainder(&a, &b, atom);
        if r.is_zero() {
            return b.monic();
        }
        if degree(&r, atom) == 0 {
            return Poly::one();
        }
        a = b;
        b = primitive_part(&r, atom);
    }
}
