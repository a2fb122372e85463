use std::collections::BTreeMap;

use metra::error::ResolveError;
use metra::library::{ConfigCollection, DefinitionConfig, FunctionsSpec};
use metra::spec::Spec;
use metra::sql::GroupBy;

fn config_collection() -> ConfigCollection {
    ConfigCollection {
        definitions: vec![DefinitionConfig {
            platform: "firefox_desktop".to_string(),
            spec: Spec::from_toml(
                r#"
                [metrics.active_hours]
                data_source = "main"
                select_expression = "SUM(active_hours_sum)"

                [metrics.days_of_use]
                data_source = "main"
                select_expression = "COUNT(DISTINCT submission_date)"

                [metrics.click_count]
                data_source = "events"
                select_expression = "SUM(click_count)"

                [metrics.broken]
                data_source = "main"

                [data_sources.main]
                from_expression = "mozdata.telemetry.main"

                [data_sources.events]
                from_expression = "mozdata.telemetry.events"
                client_id_column = "client_info.client_id"
                "#,
            )
            .unwrap(),
        }],
        functions: None,
    }
}

#[test]
fn test_generate_query_single_metric() {
    let sql = config_collection()
        .get_metrics_sql(&["active_hours"], "firefox_desktop", &GroupBy::default(), None)
        .unwrap();

    assert_eq!(
        sql,
        r#"WITH
main AS (
    SELECT
        client_id AS client_id,
        submission_date AS submission_date,
        SUM(active_hours_sum) AS active_hours
    FROM
        mozdata.telemetry.main
    GROUP BY
        client_id,
        submission_date
)
SELECT
    main.active_hours,
    client_id,
    submission_date
FROM
    main"#
    );
}

#[test]
fn test_generate_query_multiple_metrics() {
    let sql = config_collection()
        .get_metrics_sql(
            &["active_hours", "days_of_use"],
            "firefox_desktop",
            &GroupBy::default(),
            None,
        )
        .unwrap();

    assert_eq!(
        sql,
        r#"WITH
main AS (
    SELECT
        client_id AS client_id,
        submission_date AS submission_date,
        SUM(active_hours_sum) AS active_hours,
        COUNT(DISTINCT submission_date) AS days_of_use
    FROM
        mozdata.telemetry.main
    GROUP BY
        client_id,
        submission_date
)
SELECT
    main.active_hours,
    main.days_of_use,
    client_id,
    submission_date
FROM
    main"#
    );
}

#[test]
fn test_generate_query_with_multiple_data_sources() {
    let sql = config_collection()
        .get_metrics_sql(
            &["active_hours", "days_of_use", "click_count"],
            "firefox_desktop",
            &GroupBy::fields(["build_id", "sample_id"]),
            Some("submission_date = '2023-01-01'"),
        )
        .unwrap();

    assert_eq!(
        sql,
        r#"WITH
main AS (
    SELECT
        client_id AS client_id,
        submission_date AS submission_date,
        build_id AS build_id,
        sample_id AS sample_id,
        SUM(active_hours_sum) AS active_hours,
        COUNT(DISTINCT submission_date) AS days_of_use
    FROM
        mozdata.telemetry.main
    WHERE
        submission_date = '2023-01-01'
    GROUP BY
        client_id,
        submission_date,
        build_id,
        sample_id
),
events AS (
    SELECT
        client_info.client_id AS client_id,
        submission_date AS submission_date,
        build_id AS build_id,
        sample_id AS sample_id,
        SUM(click_count) AS click_count
    FROM
        mozdata.telemetry.events
    WHERE
        submission_date = '2023-01-01'
    GROUP BY
        client_id,
        submission_date,
        build_id,
        sample_id
)
SELECT
    main.active_hours,
    main.days_of_use,
    events.click_count,
    client_id,
    submission_date,
    build_id,
    sample_id
FROM
    main
    FULL OUTER JOIN events
        USING (client_id, submission_date, build_id, sample_id)"#
    );
}

#[test]
fn test_group_by_list_and_mapping_are_equivalent() {
    let configs = config_collection();
    let as_list = configs
        .get_metrics_sql(
            &["active_hours", "days_of_use"],
            "firefox_desktop",
            &GroupBy::fields(["build_id", "sample_id"]),
            Some("submission_date = '2023-01-01'"),
        )
        .unwrap();
    let as_mapping = configs
        .get_metrics_sql(
            &["active_hours", "days_of_use"],
            "firefox_desktop",
            &GroupBy::from(BTreeMap::from([
                ("build_id".to_string(), "build_id".to_string()),
                ("sample_id".to_string(), "sample_id".to_string()),
            ])),
            Some("submission_date = '2023-01-01'"),
        )
        .unwrap();

    assert_eq!(as_list, as_mapping);
}

#[test]
fn test_generated_sql_is_deterministic() {
    let configs = config_collection();
    let first = configs
        .get_metrics_sql(
            &["active_hours", "click_count"],
            "firefox_desktop",
            &GroupBy::fields(["build_id"]),
            None,
        )
        .unwrap();
    let second = configs
        .get_metrics_sql(
            &["active_hours", "click_count"],
            "firefox_desktop",
            &GroupBy::fields(["build_id"]),
            None,
        )
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_no_metric_definition_found() {
    let error = config_collection()
        .get_metrics_sql(&["doesnt_exist"], "firefox_desktop", &GroupBy::default(), None)
        .unwrap_err();

    assert!(matches!(error, ResolveError::UnknownMetricOnPlatform { .. }));
    assert_eq!(
        error.to_string(),
        "No definition for metric doesnt_exist on platform firefox_desktop found."
    );
}

#[test]
fn test_wrong_platform_is_a_lookup_error() {
    let error = config_collection()
        .get_metrics_sql(&["active_hours"], "fenix", &GroupBy::default(), None)
        .unwrap_err();

    assert!(matches!(error, ResolveError::UnknownMetricOnPlatform { .. }));
}

#[test]
fn test_metric_without_select_expression_fails() {
    let error = config_collection()
        .get_metrics_sql(&["broken"], "firefox_desktop", &GroupBy::default(), None)
        .unwrap_err();

    assert!(matches!(error, ResolveError::MissingSelectExpression(_)));
}

#[test]
fn test_select_expressions_render_helper_functions() {
    let configs = ConfigCollection {
        definitions: vec![DefinitionConfig {
            platform: "firefox_desktop".to_string(),
            spec: Spec::from_toml(
                r#"
                [metrics.active_hours]
                data_source = "main"
                select_expression = "{{ agg_sum('active_hours_sum') }}"

                [data_sources.main]
                from_expression = "mozdata.telemetry.main"
                "#,
            )
            .unwrap(),
        }],
        functions: Some(
            FunctionsSpec::from_toml(
                r#"
                [functions.agg_sum]
                definition = "COALESCE(SUM({select_expr}), 0)"
                "#,
            )
            .unwrap(),
        ),
    };

    let sql = configs
        .get_metrics_sql(&["active_hours"], "firefox_desktop", &GroupBy::default(), None)
        .unwrap();

    assert!(sql.contains("COALESCE(SUM(active_hours_sum), 0) AS active_hours"));
}
