/// Production Threads Graph API host.
pub const DEFAULT_BASE_URL: &str = "https://graph.threads.net/";

/// Redirect URI registered for the browser-callback OAuth flow.
pub const DEFAULT_REDIRECT_URI: &str = "https://oauth.pstmn.io/v1/browser-callback";

pub const DEFAULT_USER_AGENT: &str = "threads-insights/0.1";

/// Settings for one Threads API client.
///
/// Credentials are optional here: the token endpoints report a missing
/// client id or secret at call time, so read-only callers that already hold
/// a bearer token can build a client without them.
#[derive(Clone, PartialEq, Eq)]
pub struct ThreadsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub base_url: String,
    /// `None` leaves requests without a timeout.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    /// Upper bound on pages followed by a single pagination run.
    pub max_pages: usize,
    /// Page size requested while paging through a user's threads.
    pub page_limit: u32,
}

impl Default for ThreadsConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: 200,
            page_limit: 50,
        }
    }
}

impl ThreadsConfig {
    /// Returns a copy with the given credentials set.
    #[must_use]
    pub fn with_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.client_id = Some(client_id.to_owned());
        self.client_secret = Some(client_secret.to_owned());
        self
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: &str) -> Self {
        redirect_uri.clone_into(&mut self.redirect_uri);
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self
    }
}

impl std::fmt::Debug for ThreadsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadsConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_pages", &self.max_pages)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}
