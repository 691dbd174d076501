//! The five-stage derivation pipeline.
//!
//! ```text
//! names ─register─▶ CoordinateSet
//!                      │
//! Embedding ─jacobian─▶ J (M×N)
//!                      │
//!              metric_with_inverse ─▶ g, g⁻¹ (N×N)
//!                      │
//!             christoffel_symbols ─▶ Γ (N×N×N)   ← checks Cancellation
//!                      │
//!              geodesic_equations ─▶ N equations
//! ```
//!
//! Every stage is a pure function of its inputs; the pipeline only wires
//! them together and carries the simplifier and cancellation signal.

use crate::cancel::Cancellation;
use crate::christoffel::{Christoffel, christoffel_symbols};
use crate::coordinates::{CoordinateSet, register};
use crate::embedding::{Embedding, axis_name, jacobian};
use crate::error::MetricaError;
use crate::fingerprint::ContentHash;
use crate::geodesic::{GeodesicEquation, geodesic_equations};
use crate::matrix::Matrix;
use crate::metric::metric_with_inverse;
use crate::report::DerivationReport;
use metrica_algebra::{Canonical, Expr, RationalFunction, Simplify};
use std::time::Instant;
use tracing::{debug, info_span};

/// Derivation options: the simplifier applied to every entry and the
/// cancellation signal checked by the Christoffel stage.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<S = Canonical> {
    simplifier: S,
    cancellation: Cancellation,
}

impl Pipeline<Canonical> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Simplify> Pipeline<S> {
    pub fn with_simplifier<T: Simplify>(self, simplifier: T) -> Pipeline<T> {
        Pipeline {
            simplifier,
            cancellation: self.cancellation,
        }
    }

    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn run(
        &self,
        coordinates: CoordinateSet,
        embedding: Embedding,
    ) -> Result<Derivation, MetricaError> {
        let span = info_span!(
            "derive",
            coordinates = %coordinates,
            ambient = embedding.len()
        );
        let _guard = span.enter();
        let started = Instant::now();

        let jacobian = jacobian(&embedding, &coordinates)?;
        debug!(rows = jacobian.rows(), cols = jacobian.cols(), "jacobian computed");

        let (metric, inverse_metric) = metric_with_inverse(&jacobian, &self.simplifier)?;
        debug!(dimension = metric.rows(), "metric inverted");

        let christoffel = christoffel_symbols(
            &metric,
            &inverse_metric,
            &coordinates,
            &self.simplifier,
            &self.cancellation,
        )?;
        debug!(
            nonzero = christoffel.nonzero().count(),
            "christoffel symbols computed"
        );

        let geodesics = geodesic_equations(&christoffel, &coordinates, &self.simplifier);
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "derivation complete"
        );

        Ok(Derivation {
            coordinates,
            embedding,
            jacobian,
            metric,
            inverse_metric,
            christoffel,
            geodesics,
        })
    }
}

/// Registers `names` and derives with default options.
pub fn derive<I, N>(names: I, embedding: Vec<Expr>) -> Result<Derivation, MetricaError>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let coordinates = register(names)?;
    Pipeline::new().run(coordinates, Embedding::new(embedding))
}

/// Every intermediate value of one derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    coordinates: CoordinateSet,
    embedding: Embedding,
    jacobian: Matrix,
    metric: Matrix,
    inverse_metric: Matrix,
    christoffel: Christoffel,
    geodesics: Vec<GeodesicEquation>,
}

impl Derivation {
    pub fn coordinates(&self) -> &CoordinateSet {
        &self.coordinates
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    pub fn jacobian(&self) -> &Matrix {
        &self.jacobian
    }

    pub fn metric(&self) -> &Matrix {
        &self.metric
    }

    pub fn inverse_metric(&self) -> &Matrix {
        &self.inverse_metric
    }

    pub fn christoffel(&self) -> &Christoffel {
        &self.christoffel
    }

    pub fn geodesics(&self) -> &[GeodesicEquation] {
        &self.geodesics
    }

    pub fn determinant(&self) -> RationalFunction {
        self.metric.determinant(&Canonical)
    }

    /// `ds^2 = Σ g_ij dq_i dq_j`.
    pub fn line_element(&self) -> String {
        let velocities: Vec<RationalFunction> = self
            .coordinates
            .velocities()
            .iter()
            .map(RationalFunction::var)
            .collect();
        let n = self.coordinates.len();
        let mut sum = RationalFunction::zero();
        for i in 0..n {
            for j in 0..n {
                let g = self.metric.get(i, j);
                if !g.is_zero() {
                    sum = &sum + &(&(&velocities[i] * &velocities[j]) * g);
                }
            }
        }
        format!("ds^2 = {}", Canonical.simplify(sum))
    }

    /// One `axis = expression` line per ambient component.
    pub fn transformation(&self) -> Vec<String> {
        self.embedding
            .components()
            .iter()
            .enumerate()
            .map(|(idx, expr)| format!("{} = {expr}", axis_name(idx)))
            .collect()
    }

    /// Hash over the canonical renderings of every result.
    pub fn fingerprint(&self) -> ContentHash {
        let coordinates: Vec<&str> = self
            .coordinates
            .coordinates()
            .iter()
            .map(|s| s.as_str())
            .collect();
        let metric: Vec<String> = self.metric.rendered().into_iter().flatten().collect();
        let inverse: Vec<String> = self
            .inverse_metric
            .rendered()
            .into_iter()
            .flatten()
            .collect();
        let n = self.christoffel.dimension();
        let mut christoffel = Vec::with_capacity(n * n * n);
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    christoffel.push(self.christoffel.get(k, i, j).to_string());
                }
            }
        }
        let geodesics: Vec<String> = self.geodesics.iter().map(ToString::to_string).collect();
        ContentHash::builder()
            .fields("coordinate", coordinates)
            .fields("metric", metric.iter().map(String::as_str))
            .fields("inverse_metric", inverse.iter().map(String::as_str))
            .fields("christoffel", christoffel.iter().map(String::as_str))
            .fields("geodesic", geodesics.iter().map(String::as_str))
            .finish()
    }

    pub fn report(&self) -> DerivationReport {
        DerivationReport::from_derivation(self)
    }
}
