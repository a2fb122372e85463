//! Definition value objects for metrics, data sources and dimensions.

pub mod data_source;
pub mod dimension;
pub mod metric;
pub mod statistic;

pub use data_source::{DataSourceDefinition, DataSourceRef};
pub use dimension::{Dimension, DimensionDefinition};
pub use metric::{Metric, MetricDefinition};
pub use statistic::{Statistic, StatisticParams};

/// Definitions carry their identifying name inside the value, but
/// configuration documents key them by name instead of repeating it.
/// Collections use this seam to stamp the key into each parsed definition.
pub trait Named {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: &str);
}
