//! Client for the Threads Graph API: token exchange, account and post
//! insights, paginated thread listing, and flattening of the responses into
//! tables.

pub mod client;
pub mod error;
pub mod flatten;
pub mod insights;
pub mod merge;
pub mod table;
pub mod threads;
pub mod timeframe;
pub mod token;
pub mod types;
pub mod validate;

pub use client::ThreadsClient;
pub use error::{ErrorCode, ThreadsError};
pub use flatten::{
    account_insight_rows, account_insights_to_table, insights_to_table, threads_to_table,
    InsightRow, MediaInsights, ThreadRow,
};
pub use insights::AccountInsightsQuery;
pub use table::Table;
pub use threads::{PageStop, ThreadPages, ThreadsQuery};
pub use threads_core::{load_config, ThreadsConfig};
pub use timeframe::{time_frames, time_frames_at, TimeFrames, TimeWindow};
pub use token::extract_auth_code;
pub use types::{InsightItem, InsightKind, InsightsResponse, LongLivedToken, ShortLivedToken, Thread};
pub use validate::Breakdown;
