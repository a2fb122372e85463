//! SQL generation for resolved metrics.
//!
//! This is a template-substitution step, not a SQL engine: select and from
//! expressions pass through opaque. Metrics are grouped per data source in
//! first-use order, column defaults are materialized exactly once per data
//! source, and the outer query template is rendered with
//! `{metrics_per_data_source, where, group_by}`.

use serde::Serialize;

use crate::error::ResolveError;
use crate::library::ConfigCollection;
use crate::model::DataSourceRef;

/// The outer query template. Its exact text is an implementation asset;
/// the variable names and shapes fed to it are the stable contract.
const METRICS_QUERY: &str = include_str!("templates/metrics_query.sql");

/// Grouping specification for a metrics query.
///
/// Either a list of top-level fields (each aliased to itself) or explicit
/// alias/field pairs for nested fields. Both normalize to the same ordered
/// pair list, so equivalent inputs render byte-identical SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupBy {
    Fields(Vec<String>),
    Aliased(Vec<(String, String)>),
}

impl GroupBy {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupBy::Fields(fields.into_iter().map(Into::into).collect())
    }

    pub fn aliased<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        GroupBy::Aliased(
            pairs
                .into_iter()
                .map(|(alias, field)| (alias.into(), field.into()))
                .collect(),
        )
    }

    fn entries(&self) -> Vec<GroupByEntry> {
        match self {
            GroupBy::Fields(fields) => fields
                .iter()
                .map(|field| GroupByEntry {
                    alias: field.clone(),
                    field: field.clone(),
                })
                .collect(),
            GroupBy::Aliased(pairs) => pairs
                .iter()
                .map(|(alias, field)| GroupByEntry {
                    alias: alias.clone(),
                    field: field.clone(),
                })
                .collect(),
        }
    }
}

impl Default for GroupBy {
    fn default() -> Self {
        GroupBy::Fields(Vec::new())
    }
}

impl From<std::collections::BTreeMap<String, String>> for GroupBy {
    fn from(map: std::collections::BTreeMap<String, String>) -> Self {
        GroupBy::Aliased(map.into_iter().collect())
    }
}

#[derive(Debug, Serialize)]
struct GroupByEntry {
    alias: String,
    field: String,
}

#[derive(Debug, Serialize)]
struct MetricContext {
    name: String,
    select_expression: String,
}

#[derive(Debug, Serialize)]
struct DataSourceContext {
    name: String,
    from_expression: String,
    client_id_column: String,
    submission_date_column: String,
}

#[derive(Debug, Serialize)]
struct DataSourceGroup {
    data_source: DataSourceContext,
    metrics: Vec<MetricContext>,
}

#[derive(Debug, Serialize)]
struct QueryContext<'a> {
    metrics_per_data_source: Vec<DataSourceGroup>,
    #[serde(rename = "where")]
    where_clause: Option<&'a str>,
    group_by: Vec<GroupByEntry>,
}

/// Generate a SQL query computing the given metrics on a platform.
///
/// Every slug must have a library definition for `platform`, with a select
/// expression and a resolvable data source; any miss is a hard error.
pub fn generate_metrics_sql(
    configs: &ConfigCollection,
    metrics: &[&str],
    platform: &str,
    group_by: &GroupBy,
    where_clause: Option<&str>,
) -> Result<String, ResolveError> {
    let env = configs.env();

    let mut groups: Vec<DataSourceGroup> = Vec::new();
    for slug in metrics {
        let definition = configs.get_metric_definition(slug, platform).ok_or_else(|| {
            ResolveError::UnknownMetricOnPlatform {
                slug: slug.to_string(),
                platform: platform.to_string(),
            }
        })?;

        let select_expression = definition
            .select_expression
            .as_deref()
            .ok_or_else(|| ResolveError::MissingSelectExpression(definition.name.clone()))?;
        let select_expression = env.render_str(select_expression, minijinja::context! {})?;

        let reference = definition
            .data_source
            .as_ref()
            .ok_or_else(|| ResolveError::MissingDataSource(definition.name.clone()))?;

        let metric = MetricContext {
            name: definition.name.clone(),
            select_expression,
        };

        match groups
            .iter_mut()
            .find(|g| g.data_source.name == reference.name())
        {
            Some(group) => group.metrics.push(metric),
            None => {
                let data_source = match reference {
                    DataSourceRef::Resolved(definition) => definition.clone(),
                    DataSourceRef::Unresolved(name) => configs
                        .get_data_source_definition(name, platform)
                        .cloned()
                        .ok_or_else(|| ResolveError::UnknownDataSource(name.clone()))?,
                };
                groups.push(DataSourceGroup {
                    data_source: DataSourceContext {
                        name: data_source.name.clone(),
                        from_expression: data_source.from_expression.clone(),
                        client_id_column: data_source.client_id_column().to_string(),
                        submission_date_column: data_source.submission_date_column().to_string(),
                    },
                    metrics: vec![metric],
                });
            }
        }
    }

    let context = QueryContext {
        metrics_per_data_source: groups,
        where_clause,
        group_by: group_by.entries(),
    };
    Ok(env.render_str(METRICS_QUERY, context)?)
}
