//! Embeddings and their Jacobians.

use crate::coordinates::CoordinateSet;
use crate::error::MetricaError;
use crate::matrix::Matrix;
use metrica_algebra::{Expr, lower, parse};

/// The map from coordinates into flat Euclidean space, one expression per
/// ambient axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    components: Vec<Expr>,
}

impl Embedding {
    pub fn new(components: Vec<Expr>) -> Self {
        Self { components }
    }

    /// Parses one expression per ambient axis. A parse failure reports the
    /// index of the offending component.
    pub fn parse<I, S>(sources: I) -> Result<Self, MetricaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let components = sources
            .into_iter()
            .enumerate()
            .map(|(component, source)| {
                parse(source.as_ref())
                    .map_err(|source| MetricaError::SymbolicEvaluation { component, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[Expr] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Name of ambient axis `index`: `x`, `y`, `z`, then `w4`, `w5`, ….
pub fn axis_name(index: usize) -> String {
    match index {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "z".to_string(),
        n => format!("w{}", n + 1),
    }
}

/// `J[k][i] = ∂X_k/∂q_i`, an M×N matrix of exact partial derivatives.
pub fn jacobian(embedding: &Embedding, coordinates: &CoordinateSet) -> Result<Matrix, MetricaError> {
    if embedding.len() < coordinates.len() {
        return Err(MetricaError::EmbeddingDimension {
            ambient: embedding.len(),
            coordinates: coordinates.len(),
        });
    }
    let scope = coordinates.scope();
    let mut rows = Vec::with_capacity(embedding.len());
    for (component, expr) in embedding.components().iter().enumerate() {
        let value = lower(expr, &scope)
            .map_err(|source| MetricaError::SymbolicEvaluation { component, source })?;
        rows.push(
            coordinates
                .coordinates()
                .iter()
                .map(|q| value.derivative(q))
                .collect(),
        );
    }
    Ok(Matrix::from_rows(rows))
}
