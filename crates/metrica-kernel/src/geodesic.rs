//! Geodesic equations `ddq_k + Σ_i Σ_j dq_i dq_j Γ^k_ij = 0`.

use crate::christoffel::Christoffel;
use crate::coordinates::CoordinateSet;
use metrica_algebra::{RationalFunction, Simplify, Symbol};
use std::fmt;

/// One geodesic equation: `acceleration + correction = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeodesicEquation {
    coordinate: Symbol,
    acceleration: Symbol,
    correction: RationalFunction,
}

impl GeodesicEquation {
    pub fn coordinate(&self) -> &Symbol {
        &self.coordinate
    }

    pub fn acceleration(&self) -> &Symbol {
        &self.acceleration
    }

    /// `Σ_i Σ_j dq_i dq_j Γ^k_ij`.
    pub fn correction(&self) -> &RationalFunction {
        &self.correction
    }

    /// The left-hand side `ddq_k + correction` as one value.
    pub fn expression(&self) -> RationalFunction {
        &RationalFunction::var(&self.acceleration) + &self.correction
    }

    /// The acceleration solved for: `ddq_k = -correction`.
    pub fn solved(&self) -> RationalFunction {
        -&self.correction
    }
}

impl fmt::Display for GeodesicEquation {
    /// The left-hand side, e.g. `ddr - dt^2*r`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.correction.is_zero() {
            return write!(f, "{}", self.acceleration);
        }
        let correction = self.correction.to_string();
        match correction.strip_prefix('-') {
            Some(rest) => write!(f, "{} - {rest}", self.acceleration),
            None => write!(f, "{} + {correction}", self.acceleration),
        }
    }
}

pub fn geodesic_equations<S: Simplify + ?Sized>(
    christoffel: &Christoffel,
    coordinates: &CoordinateSet,
    simplifier: &S,
) -> Vec<GeodesicEquation> {
    let n = coordinates.len();
    let velocities: Vec<RationalFunction> = coordinates
        .velocities()
        .iter()
        .map(RationalFunction::var)
        .collect();
    (0..n)
        .map(|k| {
            let mut correction = RationalFunction::zero();
            for i in 0..n {
                for j in 0..n {
                    let gamma = christoffel.get(k, i, j);
                    if gamma.is_zero() {
                        continue;
                    }
                    let term = &(&velocities[i] * &velocities[j]) * gamma;
                    correction = &correction + &term;
                }
            }
            GeodesicEquation {
                coordinate: coordinates.coordinates()[k].clone(),
                acceleration: coordinates.accelerations()[k].clone(),
                correction: simplifier.simplify(correction),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Cancellation;
    use crate::christoffel::christoffel_symbols;
    use crate::coordinates::register;
    use crate::embedding::{Embedding, jacobian};
    use crate::metric::metric_with_inverse;
    use metrica_algebra::Canonical;

    fn equations(names: &[&str], embedding: &[&str]) -> Vec<GeodesicEquation> {
        let coords = register(names).expect("valid names");
        let embedding = Embedding::parse(embedding).expect("parses");
        let j = jacobian(&embedding, &coords).expect("evaluates");
        let (g, inv) = metric_with_inverse(&j, &Canonical).expect("invertible");
        let gamma = christoffel_symbols(&g, &inv, &coords, &Canonical, &Cancellation::none())
            .expect("not cancelled");
        geodesic_equations(&gamma, &coords, &Canonical)
    }

    #[test]
    fn polar_equations() {
        let eqs = equations(&["r", "t"], &["r*cos(t)", "r*sin(t)"]);
        let lines: Vec<String> = eqs.iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["ddr - dt^2*r", "ddt + 2*dr*dt/r"]);
        assert_eq!(eqs[0].solved().to_string(), "dt^2*r");
        assert_eq!(eqs[1].solved().to_string(), "-2*dr*dt/r");
    }

    #[test]
    fn flat_equations_are_bare_accelerations() {
        let eqs = equations(&["u", "v"], &["u", "v"]);
        for (eq, name) in eqs.iter().zip(["ddu", "ddv"]) {
            assert!(eq.correction().is_zero());
            assert_eq!(eq.expression(), RationalFunction::var(&Symbol::new(name)));
            assert_eq!(eq.to_string(), name);
        }
    }
}
