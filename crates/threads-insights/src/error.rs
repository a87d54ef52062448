use std::fmt;

use serde_json::json;
use thiserror::Error;

/// Stable machine-readable code attached to every [`ThreadsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingCode,
    MissingEnv,
    MissingToken,
    TokenExchangeFailed,
    LongTokenExchangeFailed,
    InsightsFetchFailed,
    MediaInsightsFailed,
    ThreadsFetchFailed,
    InvalidInput,
    RequestFailed,
    PaginationLimit,
    StuckCursor,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCode => "MISSING_CODE",
            Self::MissingEnv => "MISSING_ENV",
            Self::MissingToken => "MISSING_TOKEN",
            Self::TokenExchangeFailed => "TOKEN_EXCHANGE_FAILED",
            Self::LongTokenExchangeFailed => "LONG_TOKEN_EXCHANGE_FAILED",
            Self::InsightsFetchFailed => "INSIGHTS_FETCH_FAILED",
            Self::MediaInsightsFailed => "MEDIA_INSIGHTS_FAILED",
            Self::ThreadsFetchFailed => "THREADS_FETCH_FAILED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::RequestFailed => "REQUEST_FAILED",
            Self::PaginationLimit => "PAGINATION_LIMIT",
            Self::StuckCursor => "STUCK_CURSOR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the Threads API client.
#[derive(Debug, Error)]
pub enum ThreadsError {
    /// The redirect URL carried no `code` query parameter.
    #[error("authorization code not found in the redirect URL")]
    MissingCode,

    /// A client credential required by the token endpoints is not configured.
    #[error("missing credential: {0} is not set")]
    MissingEnv(&'static str),

    #[error("no short-lived token provided")]
    MissingToken,

    #[error("token exchange failed (HTTP {status}): {body}")]
    TokenExchangeFailed { status: u16, body: String },

    #[error("long-lived token exchange failed (HTTP {status}): {body}")]
    LongTokenExchangeFailed { status: u16, body: String },

    #[error("account insights fetch failed (HTTP {status}): {body}")]
    InsightsFetchFailed { status: u16, body: String },

    #[error("media insights fetch failed for {media_id} (HTTP {status}): {body}")]
    MediaInsightsFailed {
        media_id: String,
        status: u16,
        body: String,
    },

    #[error("threads fetch failed (HTTP {status}): {body}")]
    ThreadsFetchFailed { status: u16, body: String },

    /// Requested names or parameters outside the endpoint's allow-list.
    #[error("{0}")]
    InvalidInput(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A 200 response whose body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] threads_core::ConfigError),

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    /// The server handed back a cursor that had already been followed.
    #[error("pagination cursor did not advance: {cursor}")]
    StuckCursor { cursor: String },
}

impl ThreadsError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCode => ErrorCode::MissingCode,
            Self::MissingEnv(_) => ErrorCode::MissingEnv,
            Self::MissingToken => ErrorCode::MissingToken,
            Self::TokenExchangeFailed { .. } => ErrorCode::TokenExchangeFailed,
            Self::LongTokenExchangeFailed { .. } => ErrorCode::LongTokenExchangeFailed,
            Self::InsightsFetchFailed { .. } => ErrorCode::InsightsFetchFailed,
            Self::MediaInsightsFailed { .. } => ErrorCode::MediaInsightsFailed,
            Self::ThreadsFetchFailed { .. } => ErrorCode::ThreadsFetchFailed,
            Self::InvalidInput(_) | Self::InvalidUrl { .. } | Self::Config(_) => {
                ErrorCode::InvalidInput
            }
            Self::Http(_) | Self::Deserialize { .. } => ErrorCode::RequestFailed,
            Self::PaginationLimit { .. } => ErrorCode::PaginationLimit,
            Self::StuckCursor { .. } => ErrorCode::StuckCursor,
        }
    }

    /// Renders the error in the `{"error": {"message", "code"}}` wire shape.
    #[must_use]
    pub fn to_envelope(&self) -> serde_json::Value {
        json!({
            "error": {
                "message": self.to_string(),
                "code": self.code().as_str(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_wire_names() {
        assert_eq!(ThreadsError::MissingCode.code().as_str(), "MISSING_CODE");
        assert_eq!(
            ThreadsError::MissingEnv("CLIENT_ID").code().as_str(),
            "MISSING_ENV"
        );
        assert_eq!(
            ThreadsError::MediaInsightsFailed {
                media_id: "1".to_owned(),
                status: 400,
                body: String::new(),
            }
            .code()
            .to_string(),
            "MEDIA_INSIGHTS_FAILED"
        );
    }

    #[test]
    fn deserialize_error_reports_request_failed() {
        let source = serde_json::from_str::<()>("nope").unwrap_err();
        let err = ThreadsError::Deserialize {
            context: "me/threads".to_owned(),
            source,
        };
        assert_eq!(err.code(), ErrorCode::RequestFailed);
    }

    #[test]
    fn envelope_carries_message_and_code() {
        let err = ThreadsError::InvalidInput("Invalid metric(s): foo".to_owned());
        let envelope = err.to_envelope();
        assert_eq!(envelope["error"]["code"], "INVALID_INPUT");
        assert_eq!(envelope["error"]["message"], "Invalid metric(s): foo");
    }
}
