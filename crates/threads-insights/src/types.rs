//! Threads Graph API response types.
//!
//! Every payload is decoded once, at the HTTP boundary, into these types.
//! Insight items in particular are resolved into an [`InsightKind`] variant
//! so downstream flattening matches on the kind instead of probing for keys.

use std::fmt;

use serde::Deserialize;

/// Name of the account metric whose `total_value` carries demographic breakdowns.
pub const FOLLOWER_DEMOGRAPHICS: &str = "follower_demographics";

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Short-lived bearer token returned by the authorization-code exchange.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ShortLivedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Nominal lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Long-lived bearer token obtained by exchanging a [`ShortLivedToken`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LongLivedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl ShortLivedToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.access_token
    }
}

impl LongLivedToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for ShortLivedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortLivedToken")
            .field("access_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl fmt::Debug for LongLivedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongLivedToken")
            .field("access_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// The `paging` object shared by list and insights responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    /// For insights responses this URL encodes the `since`/`until` window.
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

// ---------------------------------------------------------------------------
// me/threads
// ---------------------------------------------------------------------------

/// One page of the `me/threads` listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThreadsPage {
    #[serde(default)]
    pub data: Vec<Thread>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl ThreadsPage {
    /// The `paging.cursors.after` cursor, if present and non-empty.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.cursors.as_ref())
            .and_then(|c| c.after.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// A reference to another Graph object, e.g. `{"id": "123"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectRef {
    pub id: String,
}

/// Nested `children` edge on carousel posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Children {
    #[serde(default)]
    pub data: Vec<ObjectRef>,
}

/// A single post from the `me/threads` listing.
///
/// Only `id` is always present; every other field appears when requested
/// through the `fields` parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub media_product_type: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub owner: Option<ObjectRef>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub shortcode: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub children: Option<Children>,
    #[serde(default)]
    pub is_quote_post: Option<bool>,
    #[serde(default)]
    pub quoted_post: Option<ObjectRef>,
    #[serde(default)]
    pub reposted_post: Option<ObjectRef>,
    #[serde(default)]
    pub has_replies: Option<bool>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub link_attachment_url: Option<String>,
}

impl Thread {
    /// Child post ids, or `None` when the post has no children.
    #[must_use]
    pub fn children_ids(&self) -> Option<Vec<String>> {
        let children = self.children.as_ref()?;
        if children.data.is_empty() {
            return None;
        }
        Some(children.data.iter().map(|c| c.id.clone()).collect())
    }
}

// ---------------------------------------------------------------------------
// Insights (me/threads_insights and {media_id}/insights)
// ---------------------------------------------------------------------------

/// Response of both insights endpoints.
///
/// `data` stays optional so callers can tell a body without a `data` key
/// apart from an empty metric list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub data: Option<Vec<InsightItem>>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// One named metric with its decoded payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawInsightItem")]
pub struct InsightItem {
    pub name: String,
    pub period: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub id: Option<String>,
    pub kind: InsightKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsightKind {
    /// Demographic metric split along one or more dimensions.
    Breakdowns {
        total: Option<i64>,
        breakdowns: Vec<DemographicBreakdown>,
    },
    /// Time-series metric, one point per period.
    TimeSeries {
        total: Option<i64>,
        points: Vec<MetricValue>,
    },
    /// Scalar metric reported only as `total_value.value`.
    Total(Option<i64>),
}

impl InsightKind {
    /// The scalar `total_value.value`, whichever kind carries it.
    #[must_use]
    pub fn total(&self) -> Option<i64> {
        match self {
            Self::Breakdowns { total, .. } | Self::TimeSeries { total, .. } | Self::Total(total) => {
                *total
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricValue {
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DemographicBreakdown {
    #[serde(default)]
    pub dimension_keys: Vec<String>,
    #[serde(default)]
    pub results: Vec<BreakdownResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BreakdownResult {
    #[serde(default)]
    pub dimension_values: Vec<String>,
    #[serde(default)]
    pub value: Option<i64>,
}

/// Wire shape of an insight item before it is resolved into an [`InsightKind`].
#[derive(Deserialize)]
struct RawInsightItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    total_value: Option<RawTotalValue>,
    #[serde(default)]
    values: Option<Vec<MetricValue>>,
}

#[derive(Deserialize)]
struct RawTotalValue {
    #[serde(default)]
    value: Option<i64>,
    #[serde(default)]
    breakdowns: Vec<DemographicBreakdown>,
}

impl From<RawInsightItem> for InsightItem {
    fn from(raw: RawInsightItem) -> Self {
        let total = raw.total_value.as_ref().and_then(|t| t.value);
        let kind = match (raw.total_value, raw.values) {
            (Some(total_value), _) if raw.name == FOLLOWER_DEMOGRAPHICS => InsightKind::Breakdowns {
                total,
                breakdowns: total_value.breakdowns,
            },
            (_, Some(points)) => InsightKind::TimeSeries { total, points },
            _ => InsightKind::Total(total),
        };

        Self {
            name: raw.name,
            period: raw.period,
            title: raw.title,
            description: raw.description,
            id: raw.id,
            kind,
        }
    }
}
