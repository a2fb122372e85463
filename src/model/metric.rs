use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::data_source::{DataSourceDefinition, DataSourceRef};
use crate::model::statistic::StatisticParams;
use crate::model::Named;

/// A metric as declared in configuration.
///
/// The `select_expression` may use template syntax to call the aggregation
/// helpers registered on the library environment, like
/// `{{ agg_sum("active_hours_sum") }}`. Expressions are opaque until the
/// query generator renders them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricDefinition {
    /// Name of the metric, stamped from the collection key.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub select_expression: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSourceRef>,
    /// Statistics to compute for this metric, keyed by statistic name.
    /// An empty parameter table means "use the statistic's defaults".
    #[serde(default)]
    pub statistics: BTreeMap<String, StatisticParams>,
}

impl Named for MetricDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// A fully resolved metric: every reference replaced by its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub select_expression: String,
    pub data_source: DataSourceDefinition,
}
