//! Error types for Metrica kernel operations.

use metrica_algebra::AlgebraError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors arising while deriving the geometry of a coordinate system.
#[derive(Debug, thiserror::Error)]
pub enum MetricaError {
    /// A coordinate name is empty, reserved, duplicated or collides with a
    /// generated velocity/acceleration symbol.
    #[error("invalid coordinate name `{name}`: {reason}")]
    InvalidCoordinateName { name: String, reason: String },

    /// An embedding component cannot be parsed or evaluated.
    #[error("embedding component {component}: {source}")]
    SymbolicEvaluation {
        component: usize,
        #[source]
        source: AlgebraError,
    },

    /// Fewer ambient components than coordinates.
    #[error("embedding has {ambient} components for {coordinates} coordinates")]
    EmbeddingDimension { ambient: usize, coordinates: usize },

    /// The metric has no inverse.
    #[error("singular metric: the {dimension}x{dimension} metric is not invertible")]
    SingularMetric { dimension: usize },

    /// The cancellation signal tripped mid-computation.
    #[error("cancelled during {stage} after {completed} of {total} entries")]
    Cancelled {
        stage: ErrorStage,
        completed: usize,
        total: usize,
    },

    /// A system-definition file is malformed.
    #[error("invalid system definition: {0}")]
    Definition(String),

    /// No catalog or file entry has the requested name.
    #[error("unknown coordinate system `{0}`")]
    UnknownSystem(String),
}

impl MetricaError {
    pub fn stage(&self) -> ErrorStage {
        match self {
            MetricaError::InvalidCoordinateName { .. } => ErrorStage::Registry,
            MetricaError::SymbolicEvaluation { .. } | MetricaError::EmbeddingDimension { .. } => {
                ErrorStage::Embedding
            }
            MetricaError::SingularMetric { .. } => ErrorStage::Metric,
            MetricaError::Cancelled { stage, .. } => *stage,
            MetricaError::Definition(_) | MetricaError::UnknownSystem(_) => {
                ErrorStage::Configuration
            }
        }
    }
}

/// Which pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStage {
    Registry,
    Embedding,
    Metric,
    Christoffel,
    Configuration,
}

impl ErrorStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorStage::Registry => "registry",
            ErrorStage::Embedding => "embedding",
            ErrorStage::Metric => "metric",
            ErrorStage::Christoffel => "christoffel",
            ErrorStage::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_follow_variants() {
        let err = MetricaError::SymbolicEvaluation {
            component: 1,
            source: AlgebraError::UnknownSymbol("w".to_string()),
        };
        assert_eq!(err.stage(), ErrorStage::Embedding);
        assert_eq!(err.to_string(), "embedding component 1: unknown symbol `w`");

        let err = MetricaError::Cancelled {
            stage: ErrorStage::Christoffel,
            completed: 3,
            total: 8,
        };
        assert_eq!(err.stage(), ErrorStage::Christoffel);
        assert_eq!(err.to_string(), "cancelled during christoffel after 3 of 8 entries");
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorStage::Configuration).expect("serializes");
        assert_eq!(json, "\"configuration\"");
    }
}
