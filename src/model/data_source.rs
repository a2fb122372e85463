use serde::Deserialize;

use crate::model::Named;

/// A named provider of a SQL source table or subquery.
///
/// `from_expression` is an opaque SQL fragment; this crate never parses it.
/// The client id and submission date columns are optional in configuration
/// and fall back to `"client_id"` / `"submission_date"` on read, so a
/// definition is never mutated to apply defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataSourceDefinition {
    /// Name of the data source, stamped from the collection key.
    #[serde(skip)]
    pub name: String,
    /// Source table or subquery fragment.
    pub from_expression: String,
    #[serde(default)]
    pub client_id_column: Option<String>,
    #[serde(default)]
    pub submission_date_column: Option<String>,
}

impl DataSourceDefinition {
    /// Column identifying the client, defaulting to `client_id`.
    pub fn client_id_column(&self) -> &str {
        self.client_id_column.as_deref().unwrap_or("client_id")
    }

    /// Column holding the submission date, defaulting to `submission_date`.
    pub fn submission_date_column(&self) -> &str {
        self.submission_date_column.as_deref().unwrap_or("submission_date")
    }
}

impl Named for DataSourceDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Reference from a metric or dimension to its data source.
///
/// Configuration documents hold a bare name; the resolver performs the
/// one-way transition to a `Resolved` definition. Specs built in code may
/// embed an already resolved definition directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum DataSourceRef {
    Unresolved(String),
    Resolved(DataSourceDefinition),
}

impl DataSourceRef {
    /// The referenced data source name.
    pub fn name(&self) -> &str {
        match self {
            DataSourceRef::Unresolved(name) => name,
            DataSourceRef::Resolved(definition) => &definition.name,
        }
    }
}

impl From<String> for DataSourceRef {
    fn from(name: String) -> Self {
        DataSourceRef::Unresolved(name)
    }
}
