//! The reference config collection: a read-only catalog of built-in
//! definitions, keyed by platform, consulted as fallback whenever a name
//! is not locally overridden.
//!
//! A library directory holds one definition file per platform plus an
//! optional `functions.toml` of template helpers:
//!
//! ```text
//! definitions/
//!   firefox_desktop.toml
//!   fenix.toml
//!   functions.toml
//! ```

use std::fs;
use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use serde::Deserialize;

use crate::error::ResolveError;
use crate::model::{DataSourceDefinition, DimensionDefinition, MetricDefinition, Named};
use crate::spec::{DefinitionCollection, Spec, SpecError};
use crate::sql::{self, GroupBy};

const FUNCTIONS_FILE: &str = "functions.toml";

/// One platform's built-in definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionConfig {
    pub platform: String,
    pub spec: Spec,
}

/// A SQL template helper. `definition` is a fragment with a
/// `{select_expr}` placeholder that the helper's argument is spliced into.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionDefinition {
    #[serde(skip)]
    pub name: String,
    pub definition: String,
}

impl Named for FunctionDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Helper functions made available to select-expression templates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FunctionsSpec {
    pub functions: DefinitionCollection<FunctionDefinition>,
}

impl FunctionsSpec {
    pub fn from_toml(document: &str) -> Result<FunctionsSpec, SpecError> {
        Ok(toml::from_str(document)?)
    }
}

/// Library of built-in metric, data source and dimension definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigCollection {
    pub definitions: Vec<DefinitionConfig>,
    pub functions: Option<FunctionsSpec>,
}

impl ConfigCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a library from a directory of `<platform>.toml` definition
    /// files and an optional `functions.toml`.
    pub fn from_dir(path: &Path) -> Result<ConfigCollection, SpecError> {
        if !path.is_dir() {
            return Err(SpecError::FileNotFound(path.to_path_buf()));
        }

        let mut files: Vec<_> = fs::read_dir(path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("toml"))
            .collect();
        files.sort();

        let mut collection = ConfigCollection::new();
        for file in files {
            if file.file_name().and_then(|n| n.to_str()) == Some(FUNCTIONS_FILE) {
                let content = fs::read_to_string(&file)?;
                collection.functions = Some(FunctionsSpec::from_toml(&content)?);
                continue;
            }

            let platform = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            collection.definitions.push(DefinitionConfig {
                platform,
                spec: Spec::from_file(&file)?,
            });
        }

        Ok(collection)
    }

    /// Look up a built-in metric definition for a platform.
    pub fn get_metric_definition(
        &self,
        slug: &str,
        platform: &str,
    ) -> Option<&MetricDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.platform == platform)
            .find_map(|d| d.spec.metrics.get(slug))
    }

    /// Look up a built-in data source definition for a platform.
    pub fn get_data_source_definition(
        &self,
        slug: &str,
        platform: &str,
    ) -> Option<&DataSourceDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.platform == platform)
            .find_map(|d| d.spec.data_sources.get(slug))
    }

    /// Look up a built-in dimension definition for a platform.
    pub fn get_dimension_definition(
        &self,
        slug: &str,
        platform: &str,
    ) -> Option<&DimensionDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.platform == platform)
            .find_map(|d| d.spec.dimensions.get(slug))
    }

    /// Template environment with the library's helper functions
    /// registered. Undefined variables are hard errors, so a typo in a
    /// select expression fails rendering instead of emitting broken SQL.
    pub fn env(&self) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        if let Some(functions) = &self.functions {
            for (name, function) in functions.functions.iter() {
                let fragment = function.definition.clone();
                env.add_function(name.clone(), move |select_expr: String| {
                    fragment.replace("{select_expr}", &select_expr)
                });
            }
        }

        env
    }

    /// Generate the metrics query for the given slugs on a platform.
    /// Convenience entry point over [`sql::generate_metrics_sql`].
    pub fn get_metrics_sql(
        &self,
        metrics: &[&str],
        platform: &str,
        group_by: &GroupBy,
        where_clause: Option<&str>,
    ) -> Result<String, ResolveError> {
        sql::generate_metrics_sql(self, metrics, platform, group_by, where_clause)
    }
}
