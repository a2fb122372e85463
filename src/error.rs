//! Errors raised while resolving configurations into queries.

use thiserror::Error;

/// A referential-integrity or rendering failure.
///
/// Resolution is all-or-nothing: every variant is raised at the point of
/// detection and there is no partial result. Requesting the same metric
/// twice is not an error; requesting an undefined one always is.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Requested metric has no definition in the spec or the library.
    #[error("No definition for metric {0}.")]
    UnknownMetric(String),

    /// Requested metric has no definition for the given platform.
    #[error("No definition for metric {slug} on platform {platform} found.")]
    UnknownMetricOnPlatform { slug: String, platform: String },

    /// A declared data source name has no definition anywhere.
    #[error("No definition for data source {0}.")]
    UnknownDataSource(String),

    /// Requested dimension has no definition in the spec or the library.
    #[error("No definition for dimension {0}.")]
    UnknownDimension(String),

    /// Metric or dimension definition lacks a select expression.
    #[error("Metric {0} has no select expression.")]
    MissingSelectExpression(String),

    /// Metric or dimension definition lacks a data source reference.
    #[error("Metric {0} has no data source.")]
    MissingDataSource(String),

    /// The template engine rejected a select expression or the outer
    /// query template.
    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}
