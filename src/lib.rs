//! # Metra
//!
//! A layered metric configuration engine that resolves declarative metric
//! definitions into SQL.
//!
//! ## Architecture
//!
//! Configuration documents stack into a spec, resolve against a library,
//! and render to SQL:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Configuration documents (TOML stanzas)            │
//! │   (project, metrics, data_sources, dimensions)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [spec: parse + merge, later wins]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Spec (unresolved layer)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolve: local-first lookup,
//!                             library fallback, dedup]
//! ┌─────────────────────────────────────────────────────────┐
//! │       ResolvedConfiguration (immutable, fully linked)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql: group by data source,
//!                             render templates]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SQL Query                             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`library::ConfigCollection`] is the external catalog of built-in
//! definitions, keyed by platform; specs consult it whenever a referenced
//! name is not locally overridden. Resolution is all-or-nothing: an
//! unresolvable reference is a hard error, never a partial result.

pub mod error;
pub mod library;
pub mod model;
pub mod resolve;
pub mod spec;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::ResolveError;
    pub use crate::library::{ConfigCollection, DefinitionConfig, FunctionsSpec};
    pub use crate::model::{
        DataSourceDefinition, DataSourceRef, Dimension, DimensionDefinition, Metric,
        MetricDefinition, Statistic, StatisticParams,
    };
    pub use crate::resolve::{
        Experiment, Project, ResolvedConfiguration, ResolvedDimension, ResolvedMetric,
    };
    pub use crate::spec::{DefinitionCollection, ProjectSpec, Spec, SpecError};
    pub use crate::sql::{generate_metrics_sql, GroupBy};
}

// Also export the main entry points at the crate root
pub use error::ResolveError;
pub use library::ConfigCollection;
pub use resolve::{Experiment, ResolvedConfiguration};
pub use spec::{Spec, SpecError};
pub use sql::{generate_metrics_sql, GroupBy};
