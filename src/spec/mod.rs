//! The unresolved configuration layer.
//!
//! A [`Spec`] is a purely syntactic bundle: definition collections plus the
//! project stanza, parsed from a structured document. Specs merge
//! right-biased ("later layer wins") and perform no referential checks;
//! validation happens when a spec is resolved against a library.
//!
//! Example document:
//! ```toml
//! [project]
//! name = "my-experiment"
//! metrics = ["active_hours"]
//!
//! [metrics.active_hours]
//! select_expression = "SUM(active_hours_sum)"
//! data_source = "main"
//!
//! [metrics.active_hours.statistics.sum]
//!
//! [data_sources.main]
//! from_expression = "telemetry.main"
//! ```

pub mod collection;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::{DataSourceDefinition, DimensionDefinition, MetricDefinition};

pub use collection::DefinitionCollection;

/// Errors raised while reading or parsing configuration documents.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The project stanza: which metrics and dimensions a project wants,
/// in request order. Duplicates are permitted and deduplicated at
/// resolution time, not here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectSpec {
    pub name: Option<String>,
    pub metrics: Vec<String>,
    pub dimensions: Vec<String>,
}

impl ProjectSpec {
    /// Layer `other` on top of this stanza. The override's name wins when
    /// set; its request lists are authoritative when non-empty.
    pub fn merge(self, other: ProjectSpec) -> ProjectSpec {
        ProjectSpec {
            name: other.name.or(self.name),
            metrics: if other.metrics.is_empty() {
                self.metrics
            } else {
                other.metrics
            },
            dimensions: if other.dimensions.is_empty() {
                self.dimensions
            } else {
                other.dimensions
            },
        }
    }
}

/// An unresolved, mergeable bundle of definitions plus project metadata.
///
/// Every stanza is optional; the trivial document parses to an empty spec
/// that resolves to zero metrics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Spec {
    pub project: ProjectSpec,
    pub metrics: DefinitionCollection<MetricDefinition>,
    pub data_sources: DefinitionCollection<DataSourceDefinition>,
    pub dimensions: DefinitionCollection<DimensionDefinition>,
}

impl Spec {
    /// Parse a spec from a TOML document.
    pub fn from_toml(document: &str) -> Result<Spec, SpecError> {
        Ok(toml::from_str(document)?)
    }

    /// Parse a spec from a TOML file on disk.
    pub fn from_file(path: &Path) -> Result<Spec, SpecError> {
        if !path.exists() {
            return Err(SpecError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Spec::from_toml(&content)
    }

    /// Layer `other` on top of this spec and return the merged result.
    ///
    /// Applied twice this gives the usual stacking: library defaults,
    /// then platform defaults, then the project's own overrides.
    pub fn merge(self, other: Spec) -> Spec {
        Spec {
            project: self.project.merge(other.project),
            metrics: self.metrics.merge(other.metrics),
            data_sources: self.data_sources.merge(other.data_sources),
            dimensions: self.dimensions.merge(other.dimensions),
        }
    }
}
