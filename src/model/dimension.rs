use serde::Deserialize;

use crate::model::data_source::{DataSourceDefinition, DataSourceRef};
use crate::model::Named;

/// A dimension as declared in configuration.
///
/// Structurally a metric without statistics: a select expression over a
/// data source, used to segment query results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DimensionDefinition {
    /// Name of the dimension, stamped from the collection key.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub select_expression: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSourceRef>,
}

impl Named for DimensionDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// A fully resolved dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub select_expression: String,
    pub data_source: DataSourceDefinition,
}
