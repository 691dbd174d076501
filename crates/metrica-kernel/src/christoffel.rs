//! Christoffel symbols of the second kind.
//!
//! ```text
//! Γ[k][i][j] = ½ Σ_l g⁻¹[k][l] · (∂_i g[j][l] + ∂_j g[l][i] − ∂_l g[i][j])
//! ```

use crate::cancel::Cancellation;
use crate::coordinates::CoordinateSet;
use crate::error::{ErrorStage, MetricaError};
use crate::matrix::Matrix;
use metrica_algebra::{RationalFunction, Simplify, coeff};

/// The N×N×N tensor `Γ^k_ij`, stored flat in `k, i, j` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Christoffel {
    dimension: usize,
    entries: Vec<RationalFunction>,
}

impl Christoffel {
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// `Γ^upper_{i j}`.
    pub fn get(&self, upper: usize, i: usize, j: usize) -> &RationalFunction {
        let n = self.dimension;
        &self.entries[upper * n * n + i * n + j]
    }

    /// Non-zero entries as `((k, i, j), Γ^k_ij)` in index order.
    pub fn nonzero(&self) -> impl Iterator<Item = ((usize, usize, usize), &RationalFunction)> {
        let n = self.dimension;
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .map(move |(idx, value)| ((idx / (n * n), (idx / n) % n, idx % n), value))
    }

    /// Symmetry in the lower indices.
    pub fn is_symmetric(&self) -> bool {
        let n = self.dimension;
        (0..n).all(|k| {
            (0..n).all(|i| (0..i).all(|j| self.get(k, i, j).equivalent(self.get(k, j, i))))
        })
    }
}

/// Computes every `Γ^k_ij`, simplifying each entry and checking
/// `cancellation` before each one.
pub fn christoffel_symbols<S: Simplify + ?Sized>(
    metric: &Matrix,
    inverse: &Matrix,
    coordinates: &CoordinateSet,
    simplifier: &S,
    cancellation: &Cancellation,
) -> Result<Christoffel, MetricaError> {
    let n = coordinates.len();
    // partials[l] = ∂_l g
    let partials: Vec<Matrix> = coordinates
        .coordinates()
        .iter()
        .map(|q| metric.map(|g| simplifier.simplify(g.derivative(q))))
        .collect();
    let half = RationalFunction::constant(coeff::ratio(1, 2));

    let total = n * n * n;
    let mut entries = Vec::with_capacity(total);
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                cancellation.check(ErrorStage::Christoffel, entries.len(), total)?;
                let sum = (0..n).fold(RationalFunction::zero(), |acc, l| {
                    let bracket = &(partials[i].get(j, l) + partials[j].get(l, i))
                        - partials[l].get(i, j);
                    if bracket.is_zero() || inverse.get(k, l).is_zero() {
                        return acc;
                    }
                    &acc + &(inverse.get(k, l) * &bracket)
                });
                entries.push(simplifier.simplify(&half * &sum));
            }
        }
    }
    Ok(Christoffel {
        dimension: n,
        entries,
    })
}
