//! The induced metric `g = JᵀJ` and its inverse.

use crate::error::MetricaError;
use crate::matrix::Matrix;
use metrica_algebra::{RationalFunction, Simplify};

/// `g[i][j] = Σ_k J[k][i]·J[k][j]`, each entry simplified.
///
/// Products commute exactly, so `g[i][j]` and `g[j][i]` are computed to
/// the same value.
pub fn induced_metric<S: Simplify + ?Sized>(jacobian: &Matrix, simplifier: &S) -> Matrix {
    let n = jacobian.cols();
    Matrix::from_fn(n, n, |i, j| {
        let sum = (0..jacobian.rows()).fold(RationalFunction::zero(), |acc, k| {
            &acc + &(jacobian.get(k, i) * jacobian.get(k, j))
        });
        simplifier.simplify(sum)
    })
}

/// The metric and its inverse. Fails with `SingularMetric` when the metric
/// has no inverse, e.g. for a degenerate embedding.
pub fn metric_with_inverse<S: Simplify + ?Sized>(
    jacobian: &Matrix,
    simplifier: &S,
) -> Result<(Matrix, Matrix), MetricaError> {
    let metric = induced_metric(jacobian, simplifier);
    let inverse = metric
        .inverse(simplifier)
        .ok_or(MetricaError::SingularMetric {
            dimension: metric.rows(),
        })?;
    Ok((metric, inverse))
}
