//! Allow-lists for the metric and field names each endpoint accepts.

use std::fmt;
use std::str::FromStr;

use crate::error::ThreadsError;

/// Metrics accepted by `me/threads_insights`.
pub const ACCOUNT_METRICS: &[&str] = &[
    "likes",
    "replies",
    "followers_count",
    "follower_demographics",
    "reposts",
    "views",
    "quotes",
];

/// Metrics accepted by `{media_id}/insights`.
pub const MEDIA_METRICS: &[&str] = &["views", "likes", "replies", "reposts", "quotes", "shares"];

/// Fields accepted by `me/threads`.
pub const THREAD_FIELDS: &[&str] = &[
    "id",
    "media_product_type",
    "media_type",
    "media_url",
    "permalink",
    "owner",
    "username",
    "text",
    "timestamp",
    "shortcode",
    "thumbnail_url",
    "children",
    "is_quote_post",
    "quoted_post",
    "reposted_post",
    "has_replies",
    "alt_text",
    "link_attachment_url",
];

/// Checks every requested name against `allowed`.
///
/// `noun` names the kind of value (`"metric"`, `"field"`) in the message.
///
/// # Errors
///
/// Returns [`ThreadsError::InvalidInput`] listing every rejected name, in
/// request order, followed by the allow-list.
pub fn validate_names<S: AsRef<str>>(
    requested: &[S],
    allowed: &[&str],
    noun: &str,
) -> Result<(), ThreadsError> {
    let invalid: Vec<&str> = requested
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|name| !allowed.contains(name))
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }

    Err(ThreadsError::InvalidInput(format!(
        "Invalid {noun}(s): {}. Valid {noun}s: {}",
        invalid.join(", "),
        allowed.join(", ")
    )))
}

/// Demographic dimension used to split an account insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakdown {
    Country,
    City,
    Age,
    Gender,
}

impl Breakdown {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Age => "age",
            Self::Gender => "gender",
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakdown {
    type Err = ThreadsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(Self::Country),
            "city" => Ok(Self::City),
            "age" => Ok(Self::Age),
            "gender" => Ok(Self::Gender),
            _ => Err(ThreadsError::InvalidInput(format!(
                "Invalid breakdown value '{s}'. Must be 'country', 'city', 'age', or 'gender'."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn accepts_allowed_names() {
        assert!(validate_names(&["likes", "views"], ACCOUNT_METRICS, "metric").is_ok());
        assert!(validate_names(&["id", "text", "children"], THREAD_FIELDS, "field").is_ok());
    }

    #[test]
    fn accepts_empty_request() {
        let none: [&str; 0] = [];
        assert!(validate_names(&none, MEDIA_METRICS, "metric").is_ok());
    }

    #[test]
    fn lists_every_invalid_name() {
        let err = validate_names(
            &["likes", "clicks", "views", "saves", "impressions"],
            ACCOUNT_METRICS,
            "metric",
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        let msg = err.to_string();
        assert!(
            msg.starts_with("Invalid metric(s): clicks, saves, impressions."),
            "unexpected message: {msg}"
        );
        assert!(msg.contains("Valid metrics: likes, replies"));
    }

    #[test]
    fn media_list_differs_from_account_list() {
        assert!(validate_names(&["shares"], MEDIA_METRICS, "metric").is_ok());
        assert!(validate_names(&["shares"], ACCOUNT_METRICS, "metric").is_err());
        assert!(validate_names(&["followers_count"], MEDIA_METRICS, "metric").is_err());
    }

    #[test]
    fn accepts_owned_strings() {
        let requested = vec!["owner".to_string(), "bogus".to_string()];
        let err = validate_names(&requested, THREAD_FIELDS, "field").unwrap_err();
        assert!(err.to_string().starts_with("Invalid field(s): bogus."));
    }

    #[test]
    fn breakdown_round_trips_known_values() {
        for name in ["country", "city", "age", "gender"] {
            let parsed: Breakdown = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn breakdown_rejects_unknown_value() {
        let err = "region".parse::<Breakdown>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(err.to_string().contains("'region'"));
    }
}
