//! Threads + per-post insights pipeline.

use chrono::Utc;
use serde_json::Value;

use crate::client::ThreadsClient;
use crate::flatten::{insights_to_table, threads_to_table, MediaInsights};
use crate::table::Table;

impl ThreadsClient {
    /// Fetches media insights for every value of `table`'s `id` column.
    ///
    /// Posts whose fetch fails are logged and skipped, so the result may be
    /// shorter than the table. Ids are fetched one after another.
    pub async fn media_insights_for_table<S: AsRef<str>>(
        &self,
        access_token: &str,
        table: &Table,
        metrics: &[S],
    ) -> Vec<MediaInsights> {
        let ids: Vec<String> = table
            .column("id")
            .filter_map(|cell| match cell {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect();

        let mut collected = Vec::with_capacity(ids.len());
        for media_id in ids {
            match self.get_media_insights(access_token, &media_id, metrics).await {
                Ok(insights) => collected.push(MediaInsights { media_id, insights }),
                Err(err) => {
                    tracing::warn!(
                        media_id = %media_id,
                        code = %err.code(),
                        error = %err,
                        "media insights fetch failed; skipping post"
                    );
                }
            }
        }

        tracing::info!(media = collected.len(), "fetched media insights");
        collected
    }

    /// Pages through every thread in the window, fetches each post's
    /// insights, and returns one combined table.
    ///
    /// The combined table is the threads table left-joined with one metric
    /// column per requested metric, prefixed with `client` (the label given
    /// here) and `captured_at` (RFC 3339 capture time). Threads without
    /// insights keep `null` metric cells.
    ///
    /// Never fails. If a stage comes back empty the best table so far is
    /// returned: an empty table when no threads were found, otherwise the
    /// bare threads table when no insights could be merged.
    pub async fn fetch_and_merge_threads_with_insights<S: AsRef<str>, M: AsRef<str>>(
        &self,
        access_token: &str,
        fields: &[S],
        metrics: &[M],
        client_name: &str,
        since: Option<i64>,
        until: Option<i64>,
    ) -> Table {
        tracing::info!(client = client_name, "fetching threads");
        let pages = self
            .fetch_all_threads(access_token, fields, since, until, None)
            .await;
        if !pages.is_complete() {
            tracing::warn!(
                stop = ?pages.stop,
                fetched = pages.threads.len(),
                "thread listing incomplete; continuing with fetched threads"
            );
        }
        if pages.threads.is_empty() {
            tracing::info!(client = client_name, "no threads found in the given time frame");
            return Table::new();
        }

        let threads = threads_to_table(&pages.threads);
        if threads.is_empty() {
            tracing::info!("no valid threads to process");
            return threads;
        }

        tracing::info!(threads = threads.len(), "fetching insights for threads");
        let media = self
            .media_insights_for_table(access_token, &threads, metrics)
            .await;
        if media.is_empty() {
            tracing::info!("no insights fetched for threads");
            return threads;
        }

        let insights = insights_to_table(&media);
        if insights.is_empty() {
            tracing::info!("no valid insights to merge");
            return threads;
        }

        let mut combined = threads.left_join(&insights, "id", "media_id");
        combined.drop_column("media_id");

        let captured_at = Utc::now().to_rfc3339();
        combined.insert_constant_column(0, "client", &Value::String(client_name.to_owned()));
        combined.insert_constant_column(1, "captured_at", &Value::String(captured_at));

        tracing::info!(
            client = client_name,
            rows = combined.len(),
            "merged threads with insights"
        );
        combined
    }
}
