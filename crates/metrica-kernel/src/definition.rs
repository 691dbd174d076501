//! TOML system-definition files.
//!
//! ```toml
//! [[system]]
//! name = "elliptic"
//! coordinates = ["m", "n"]
//! embedding = ["cosh(m)*cos(n)", "sinh(m)*sin(n)"]
//! ```

use crate::coordinates::{CoordinateSet, register};
use crate::embedding::Embedding;
use crate::error::MetricaError;
use crate::pipeline::{Derivation, Pipeline};
use metrica_algebra::Simplify;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A user-supplied coordinate system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemDefinition {
    pub name: String,
    pub coordinates: Vec<String>,
    pub embedding: Vec<String>,
}

impl SystemDefinition {
    pub fn build(&self) -> Result<(CoordinateSet, Embedding), MetricaError> {
        let coordinates = register(&self.coordinates)?;
        let embedding = Embedding::parse(&self.embedding)?;
        Ok((coordinates, embedding))
    }

    pub fn derive_with<S: Simplify>(&self, pipeline: &Pipeline<S>) -> Result<Derivation, MetricaError> {
        let (coordinates, embedding) = self.build()?;
        pipeline.run(coordinates, embedding)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemFile {
    #[serde(default, rename = "system")]
    pub systems: Vec<SystemDefinition>,
}

impl SystemFile {
    pub fn from_toml_str(source: &str) -> Result<Self, MetricaError> {
        let file: SystemFile =
            toml::from_str(source).map_err(|e| MetricaError::Definition(e.to_string()))?;
        if file.systems.is_empty() {
            return Err(MetricaError::Definition(
                "no [[system]] tables found".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for system in &file.systems {
            if system.name.trim().is_empty() {
                return Err(MetricaError::Definition(
                    "system name must not be empty".to_string(),
                ));
            }
            if !seen.insert(system.name.as_str()) {
                return Err(MetricaError::Definition(format!(
                    "duplicate system name `{}`",
                    system.name
                )));
            }
        }
        Ok(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MetricaError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            MetricaError::Definition(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn get(&self, name: &str) -> Result<&SystemDefinition, MetricaError> {
        self.systems
            .iter()
            .find(|system| system.name == name)
            .ok_or_else(|| MetricaError::UnknownSystem(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELLIPTIC: &str = r#"
[[system]]
name = "elliptic"
coordinates = ["m", "n"]
embedding = ["cosh(m)*cos(n)", "sinh(m)*sin(n)"]

[[system]]
name = "polar"
coordinates = ["r", "t"]
embedding = ["r*cos(t)", "r*sin(t)"]
"#;

    #[test]
    fn parses_every_system_table() {
        let file = SystemFile::from_toml_str(ELLIPTIC).expect("valid file");
        assert_eq!(file.systems.len(), 2);
        let polar = file.get("polar").expect("present");
        assert_eq!(polar.coordinates, vec!["r", "t"]);
        let (coords, embedding) = polar.build().expect("builds");
        assert_eq!(coords.to_string(), "(r, t)");
        assert_eq!(embedding.len(), 2);
    }

    #[test]
    fn derives_a_file_system() {
        let file = SystemFile::from_toml_str(ELLIPTIC).expect("valid file");
        let d = file
            .get("polar")
            .expect("present")
            .derive_with(&Pipeline::new())
            .expect("derives");
        assert_eq!(d.metric().rendered()[1][1], "r^2");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let source = r#"
[[system]]
name = "a"
coordinates = ["u"]
embedding = ["u"]

[[system]]
name = "a"
coordinates = ["v"]
embedding = ["v"]
"#;
        let err = SystemFile::from_toml_str(source).expect_err("duplicate");
        assert!(matches!(err, MetricaError::Definition(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn malformed_toml_is_a_definition_error() {
        let err = SystemFile::from_toml_str("[[system]]\nname = 3").expect_err("bad type");
        assert!(matches!(err, MetricaError::Definition(_)));
        let err = SystemFile::from_toml_str("").expect_err("empty");
        assert!(matches!(err, MetricaError::Definition(_)));
    }

    #[test]
    fn unknown_names_are_reported() {
        let file = SystemFile::from_toml_str(ELLIPTIC).expect("valid file");
        assert!(matches!(
            file.get("bipolar"),
            Err(MetricaError::UnknownSystem(name)) if name == "bipolar"
        ));
    }

    #[test]
    fn build_surfaces_coordinate_errors() {
        let definition = SystemDefinition {
            name: "bad".to_string(),
            coordinates: vec!["x".to_string()],
            embedding: vec!["x".to_string()],
        };
        assert!(matches!(
            definition.build(),
            Err(MetricaError::InvalidCoordinateName { .. })
        ));
    }
}
