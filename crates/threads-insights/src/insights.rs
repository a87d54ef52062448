//! Account-level and media-level insights endpoints.

use reqwest::StatusCode;

use crate::client::ThreadsClient;
use crate::error::ThreadsError;
use crate::types::InsightsResponse;
use crate::validate::{validate_names, Breakdown, ACCOUNT_METRICS, MEDIA_METRICS};

/// Parameters for [`ThreadsClient::get_user_insights`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInsightsQuery {
    pub metrics: Vec<String>,
    /// Window start, Unix seconds.
    pub since: Option<i64>,
    /// Window end, Unix seconds.
    pub until: Option<i64>,
    pub breakdown: Option<Breakdown>,
}

impl AccountInsightsQuery {
    #[must_use]
    pub fn new<S: AsRef<str>>(metrics: &[S]) -> Self {
        Self {
            metrics: metrics.iter().map(|m| m.as_ref().to_owned()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    #[must_use]
    pub fn until(mut self, until: i64) -> Self {
        self.until = Some(until);
        self
    }

    #[must_use]
    pub fn breakdown(mut self, breakdown: Breakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    /// Query pairs in the order the endpoint documents them.
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("metric", self.metrics.join(","))];
        if let Some(since) = self.since {
            params.push(("since", since.to_string()));
        }
        if let Some(until) = self.until {
            params.push(("until", until.to_string()));
        }
        if let Some(breakdown) = self.breakdown {
            params.push(("breakdown", breakdown.as_str().to_owned()));
        }
        params
    }
}

impl ThreadsClient {
    /// Fetches account-level insights from `me/threads_insights`.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::InvalidInput`] if any metric is not an account metric.
    /// - [`ThreadsError::InsightsFetchFailed`] on any non-200 response.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the 200 body has an unexpected shape.
    pub async fn get_user_insights(
        &self,
        access_token: &str,
        query: &AccountInsightsQuery,
    ) -> Result<InsightsResponse, ThreadsError> {
        validate_names(&query.metrics, ACCOUNT_METRICS, "metric")?;

        let params = query.params();
        let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = self.build_url(&["me", "threads_insights"], &pairs)?;

        let (status, body) = self.get_with_token(url, access_token).await?;
        if status != StatusCode::OK {
            return Err(ThreadsError::InsightsFetchFailed {
                status: status.as_u16(),
                body,
            });
        }
        Self::decode(&body, "me/threads_insights")
    }

    /// Fetches insights for one post from `v1.0/{media_id}/insights`.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::InvalidInput`] if any metric is not a media metric.
    /// - [`ThreadsError::MediaInsightsFailed`] on any non-200 response.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the 200 body has an unexpected shape.
    pub async fn get_media_insights<S: AsRef<str>>(
        &self,
        access_token: &str,
        media_id: &str,
        metrics: &[S],
    ) -> Result<InsightsResponse, ThreadsError> {
        validate_names(metrics, MEDIA_METRICS, "metric")?;

        let metric = metrics
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.build_url(&["v1.0", media_id, "insights"], &[("metric", &metric)])?;

        let (status, body) = self.get_with_token(url, access_token).await?;
        if status != StatusCode::OK {
            return Err(ThreadsError::MediaInsightsFailed {
                media_id: media_id.to_owned(),
                status: status.as_u16(),
                body,
            });
        }
        Self::decode(&body, &format!("{media_id}/insights"))
    }
}
