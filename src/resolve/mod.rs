//! Resolution: turning a [`Spec`] plus a reference library into a fully
//! linked, validated configuration.
//!
//! Lookup order is always local-first: a definition in the spec itself
//! shadows the library's built-in definition of the same name. Library
//! fallback is namespaced by the experiment's platform; without an
//! experiment, lookups are local-only.

use std::collections::HashSet;

use crate::error::ResolveError;
use crate::library::ConfigCollection;
use crate::model::{
    DataSourceDefinition, DataSourceRef, Dimension, DimensionDefinition, Metric, MetricDefinition,
    Statistic,
};
use crate::spec::Spec;

/// Context for the experiment a spec is resolved for. Carried through to
/// the resolved project metadata; its platform selects the library
/// namespace for fallback lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub slug: String,
    pub platform: String,
}

impl Experiment {
    pub fn new(slug: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            platform: platform.into(),
        }
    }
}

/// Resolved project metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: Option<String>,
    pub experiment: Option<Experiment>,
}

/// A resolved metric together with the statistics to compute for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetric {
    pub metric: Metric,
    pub statistics: Vec<Statistic>,
}

/// A resolved dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDimension {
    pub dimension: Dimension,
}

/// The immutable result of resolution: every requested metric and
/// dimension linked to its definitions, deduplicated by name in
/// first-occurrence order. Constructed once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    pub project: Project,
    pub metrics: Vec<ResolvedMetric>,
    pub dimensions: Vec<ResolvedDimension>,
}

impl Spec {
    /// Resolve this spec against a reference library.
    ///
    /// Walks `project.metrics` and `project.dimensions` in request order,
    /// resolving each name local-first with library fallback. Any name
    /// that resolves nowhere is a hard error; duplicates resolve once.
    pub fn resolve(
        &self,
        experiment: Option<&Experiment>,
        configs: &ConfigCollection,
    ) -> Result<ResolvedConfiguration, ResolveError> {
        let platform = experiment.map(|e| e.platform.as_str());

        let mut metrics = Vec::new();
        let mut seen = HashSet::new();
        for name in &self.project.metrics {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let definition = self
                .metrics
                .get(name)
                .or_else(|| platform.and_then(|p| configs.get_metric_definition(name, p)))
                .ok_or_else(|| ResolveError::UnknownMetric(name.clone()))?;
            metrics.push(self.resolve_metric(definition, configs, platform)?);
        }

        let mut dimensions = Vec::new();
        let mut seen = HashSet::new();
        for name in &self.project.dimensions {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let definition = self
                .dimensions
                .get(name)
                .or_else(|| platform.and_then(|p| configs.get_dimension_definition(name, p)))
                .ok_or_else(|| ResolveError::UnknownDimension(name.clone()))?;
            dimensions.push(self.resolve_dimension(definition, configs, platform)?);
        }

        Ok(ResolvedConfiguration {
            project: Project {
                name: self.project.name.clone(),
                experiment: experiment.cloned(),
            },
            metrics,
            dimensions,
        })
    }

    fn resolve_metric(
        &self,
        definition: &MetricDefinition,
        configs: &ConfigCollection,
        platform: Option<&str>,
    ) -> Result<ResolvedMetric, ResolveError> {
        let select_expression = definition
            .select_expression
            .clone()
            .ok_or_else(|| ResolveError::MissingSelectExpression(definition.name.clone()))?;
        let reference = definition
            .data_source
            .as_ref()
            .ok_or_else(|| ResolveError::MissingDataSource(definition.name.clone()))?;
        let data_source = self.resolve_data_source(reference, configs, platform)?;

        let statistics = definition
            .statistics
            .iter()
            .map(|(name, params)| Statistic::new(name.clone(), params.clone()))
            .collect();

        Ok(ResolvedMetric {
            metric: Metric {
                name: definition.name.clone(),
                select_expression,
                data_source,
            },
            statistics,
        })
    }

    fn resolve_dimension(
        &self,
        definition: &DimensionDefinition,
        configs: &ConfigCollection,
        platform: Option<&str>,
    ) -> Result<ResolvedDimension, ResolveError> {
        let select_expression = definition
            .select_expression
            .clone()
            .ok_or_else(|| ResolveError::MissingSelectExpression(definition.name.clone()))?;
        let reference = definition
            .data_source
            .as_ref()
            .ok_or_else(|| ResolveError::MissingDataSource(definition.name.clone()))?;
        let data_source = self.resolve_data_source(reference, configs, platform)?;

        Ok(ResolvedDimension {
            dimension: Dimension {
                name: definition.name.clone(),
                select_expression,
                data_source,
            },
        })
    }

    /// The one-way `Unresolved -> Resolved` transition for a data source
    /// reference, local-first with library fallback.
    fn resolve_data_source(
        &self,
        reference: &DataSourceRef,
        configs: &ConfigCollection,
        platform: Option<&str>,
    ) -> Result<DataSourceDefinition, ResolveError> {
        match reference {
            DataSourceRef::Resolved(definition) => Ok(definition.clone()),
            DataSourceRef::Unresolved(name) => self
                .data_sources
                .get(name)
                .or_else(|| platform.and_then(|p| configs.get_data_source_definition(name, p)))
                .cloned()
                .ok_or_else(|| ResolveError::UnknownDataSource(name.clone())),
        }
    }
}
