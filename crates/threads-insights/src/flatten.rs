//! Flattening of thread and insight payloads into [`Table`]s.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::table::Table;
use crate::types::{InsightItem, InsightKind, InsightsResponse, Paging, Thread};

/// Timestamp format of the `since`/`until` columns.
pub const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static SINCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"since=(\d+)").expect("valid since regex"));
static UNTIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"until=(\d+)").expect("valid until regex"));

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

/// One row of the threads table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadRow {
    pub id: String,
    pub media_product_type: Option<String>,
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    pub permalink: Option<String>,
    pub owner_id: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<String>,
    pub shortcode: Option<String>,
    pub is_quote_post: Option<bool>,
    pub has_replies: Option<bool>,
    pub children_ids: Option<Vec<String>>,
}

impl From<&Thread> for ThreadRow {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id.clone(),
            media_product_type: thread.media_product_type.clone(),
            media_type: thread.media_type.clone(),
            media_url: thread.media_url.clone(),
            permalink: thread.permalink.clone(),
            owner_id: thread.owner.as_ref().map(|o| o.id.clone()),
            username: thread.username.clone(),
            text: thread.text.clone(),
            timestamp: thread.timestamp.clone(),
            shortcode: thread.shortcode.clone(),
            is_quote_post: thread.is_quote_post,
            has_replies: thread.has_replies,
            children_ids: thread.children_ids(),
        }
    }
}

/// Flattens threads into one row each.
#[must_use]
pub fn threads_to_table(threads: &[Thread]) -> Table {
    let rows: Vec<ThreadRow> = threads.iter().map(ThreadRow::from).collect();
    tracing::info!(threads = rows.len(), "converted threads to table");
    Table::from_rows(&rows)
}

// ---------------------------------------------------------------------------
// Account insights
// ---------------------------------------------------------------------------

/// One row of the account insights table.
///
/// The first seven fields are shared by every row produced from an item; the
/// rest are filled according to the item's [`InsightKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsightRow {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub total_value: Option<i64>,
    pub id: Option<String>,
    pub dimension_key: Option<String>,
    pub dimension_value: Option<String>,
    pub value: Option<i64>,
    pub end_time: Option<String>,
}

/// Reads the `since`/`until` window from `paging.previous`, rendered as UTC
/// [`WINDOW_FORMAT`] strings.
#[must_use]
pub fn insight_window(paging: Option<&Paging>) -> (Option<String>, Option<String>) {
    let Some(previous) = paging.and_then(|p| p.previous.as_deref()) else {
        return (None, None);
    };
    (
        window_bound(&SINCE_RE, previous),
        window_bound(&UNTIL_RE, previous),
    )
}

fn window_bound(re: &Regex, url: &str) -> Option<String> {
    let secs = re.captures(url)?.get(1)?.as_str().parse::<i64>().ok()?;
    let at = DateTime::<Utc>::from_timestamp(secs, 0)?;
    Some(at.format(WINDOW_FORMAT).to_string())
}

/// Flattens one insight item into its rows.
fn item_rows(
    item: &InsightItem,
    since: Option<&String>,
    until: Option<&String>,
) -> Vec<InsightRow> {
    let base = InsightRow {
        name: item.name.clone(),
        title: item.title.clone(),
        description: item.description.clone(),
        since: since.cloned(),
        until: until.cloned(),
        total_value: item.kind.total(),
        id: item.id.clone(),
        ..InsightRow::default()
    };

    match &item.kind {
        InsightKind::Breakdowns { breakdowns, .. } => breakdowns
            .iter()
            .flat_map(|breakdown| {
                let dimension_key = breakdown.dimension_keys.join(",");
                let base = &base;
                breakdown.results.iter().map(move |result| InsightRow {
                    dimension_key: Some(dimension_key.clone()),
                    dimension_value: result.dimension_values.first().cloned(),
                    value: result.value,
                    ..base.clone()
                })
            })
            .collect(),
        InsightKind::TimeSeries { points, .. } if item.name == "views" => {
            let total = points
                .iter()
                .map(|p| p.value.unwrap_or(0))
                .fold(0i64, i64::saturating_add);
            vec![InsightRow {
                total_value: Some(total),
                ..base
            }]
        }
        InsightKind::TimeSeries { points, .. } => points
            .iter()
            .map(|point| InsightRow {
                value: point.value,
                end_time: point.end_time.clone(),
                ..base.clone()
            })
            .collect(),
        InsightKind::Total(_) => vec![base],
    }
}

/// Flattens an account insights response into rows.
///
/// Returns `None` when the response has no `data` key.
#[must_use]
pub fn account_insight_rows(response: &InsightsResponse) -> Option<Vec<InsightRow>> {
    let data = response.data.as_ref()?;
    let (since, until) = insight_window(response.paging.as_ref());
    Some(
        data.iter()
            .flat_map(|item| item_rows(item, since.as_ref(), until.as_ref()))
            .collect(),
    )
}

/// Flattens an account insights response into a table; empty when the
/// response has no `data` key.
#[must_use]
pub fn account_insights_to_table(response: &InsightsResponse) -> Table {
    match account_insight_rows(response) {
        Some(rows) => Table::from_rows(&rows),
        None => Table::new(),
    }
}

// ---------------------------------------------------------------------------
// Media insights
// ---------------------------------------------------------------------------

/// Insights fetched for one post.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInsights {
    pub media_id: String,
    pub insights: InsightsResponse,
}

/// Builds one row per post with a column per metric.
///
/// Each metric column holds the first point of the metric's `values`; later
/// points are dropped. Metrics without `values` get no column from that post.
#[must_use]
pub fn insights_to_table(items: &[MediaInsights]) -> Table {
    let records: Vec<Map<String, Value>> = items
        .iter()
        .filter_map(|item| {
            let data = item.insights.data.as_ref()?;
            let mut record = Map::new();
            record.insert("media_id".to_owned(), Value::String(item.media_id.clone()));
            for insight in data {
                if let InsightKind::TimeSeries { points, .. } = &insight.kind {
                    if let Some(first) = points.first() {
                        let cell = first.value.map_or(Value::Null, Value::from);
                        record.insert(insight.name.clone(), cell);
                    }
                }
            }
            Some(record)
        })
        .collect();

    tracing::info!(media = records.len(), "converted media insights to table");
    Table::from_records(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: Value) -> InsightsResponse {
        serde_json::from_value(value).expect("insights response should decode")
    }

    #[test]
    fn missing_data_yields_empty_table() {
        let table = account_insights_to_table(&response(json!({"paging": {}})));
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn views_values_are_summed_into_one_row() {
        let rows = account_insight_rows(&response(json!({
            "data": [{
                "name": "views",
                "period": "day",
                "title": "Views",
                "values": [{"value": 3}, {"value": 5}, {"end_time": "2025-01-03T08:00:00+0000"}]
            }]
        })))
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_value, Some(8));
        assert_eq!(rows[0].value, None);
        assert_eq!(rows[0].end_time, None);
    }

    #[test]
    fn views_sum_saturates_instead_of_overflowing() {
        let rows = account_insight_rows(&response(json!({
            "data": [{
                "name": "views",
                "values": [{"value": i64::MAX}, {"value": 1}, {"value": 7}]
            }]
        })))
        .unwrap();
        assert_eq!(rows[0].total_value, Some(i64::MAX));
    }

    #[test]
    fn demographics_yield_one_row_per_result() {
        let rows = account_insight_rows(&response(json!({
            "data": [{
                "name": "follower_demographics",
                "period": "lifetime",
                "total_value": {
                    "breakdowns": [{
                        "dimension_keys": ["country"],
                        "results": [
                            {"dimension_values": ["US"], "value": 120},
                            {"dimension_values": ["BR"], "value": 45}
                        ]
                    }]
                },
                "id": "1/insights/follower_demographics/lifetime"
            }]
        })))
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dimension_key.as_deref(), Some("country"));
        assert_eq!(rows[0].dimension_value.as_deref(), Some("US"));
        assert_eq!(rows[0].value, Some(120));
        assert_eq!(rows[1].dimension_value.as_deref(), Some("BR"));
        assert_eq!(rows[1].value, Some(45));
        assert!(rows.iter().all(|r| r.total_value.is_none()));
    }

    #[test]
    fn demographic_result_without_values_has_null_dimension_value() {
        let rows = account_insight_rows(&response(json!({
            "data": [{
                "name": "follower_demographics",
                "total_value": {
                    "breakdowns": [{
                        "dimension_keys": ["age", "gender"],
                        "results": [{"dimension_values": [], "value": 1}]
                    }]
                }
            }]
        })))
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dimension_key.as_deref(), Some("age,gender"));
        assert_eq!(rows[0].dimension_value, None);
    }

    #[test]
    fn time_series_yield_one_row_per_point() {
        let rows = account_insight_rows(&response(json!({
            "data": [{
                "name": "likes",
                "values": [
                    {"value": 2, "end_time": "2025-01-01T08:00:00+0000"},
                    {"value": 7, "end_time": "2025-01-02T08:00:00+0000"}
                ]
            }]
        })))
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].value, Some(7));
        assert_eq!(rows[1].end_time.as_deref(), Some("2025-01-02T08:00:00+0000"));
    }

    #[test]
    fn scalar_item_yields_base_row_with_window() {
        let rows = account_insight_rows(&response(json!({
            "data": [{
                "name": "followers_count",
                "title": "Followers",
                "total_value": {"value": 900}
            }],
            "paging": {
                "previous": "https://graph.threads.net/v1.0/me/threads_insights?metric=followers_count&since=1704067200&until=1704672000"
            }
        })))
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_value, Some(900));
        assert_eq!(rows[0].since.as_deref(), Some("2024-01-01 00:00:00"));
        assert_eq!(rows[0].until.as_deref(), Some("2024-01-08 00:00:00"));
        assert_eq!(rows[0].dimension_key, None);
    }

    #[test]
    fn window_absent_without_previous_url() {
        let paging = Paging {
            next: Some("https://example.com?since=1".to_owned()),
            ..Paging::default()
        };
        assert_eq!(insight_window(Some(&paging)), (None, None));
        assert_eq!(insight_window(None), (None, None));
    }

    #[test]
    fn threads_table_projects_owner_and_children() {
        let threads: Vec<Thread> = serde_json::from_value(json!([
            {
                "id": "10",
                "media_type": "CAROUSEL_ALBUM",
                "owner": {"id": "77"},
                "text": "carousel",
                "is_quote_post": false,
                "children": {"data": [{"id": "11"}, {"id": "12"}]}
            },
            {"id": "20", "media_type": "TEXT_POST", "has_replies": true}
        ]))
        .unwrap();

        let table = threads_to_table(&threads);
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns()[0], "id");
        assert_eq!(table.get(0, "owner_id"), Some(&json!("77")));
        assert_eq!(table.get(0, "children_ids"), Some(&json!(["11", "12"])));
        assert_eq!(table.get(1, "children_ids"), Some(&Value::Null));
        assert_eq!(table.get(1, "has_replies"), Some(&json!(true)));
    }

    #[test]
    fn media_table_keeps_only_first_value() {
        let items = vec![
            MediaInsights {
                media_id: "10".to_owned(),
                insights: response(json!({
                    "data": [
                        {"name": "views", "values": [{"value": 40}, {"value": 99}]},
                        {"name": "likes", "values": [{"value": 4}]},
                        {"name": "shares", "total_value": {"value": 1}}
                    ]
                })),
            },
            MediaInsights {
                media_id: "20".to_owned(),
                insights: response(json!({"error_like": true})),
            },
        ];

        let table = insights_to_table(&items);
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), ["media_id", "views", "likes"]);
        assert_eq!(table.get(0, "views"), Some(&json!(40)));
    }
}
