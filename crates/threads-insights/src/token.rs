//! OAuth token exchange: authorization code → short-lived → long-lived.

use reqwest::{StatusCode, Url};

use crate::client::ThreadsClient;
use crate::error::ThreadsError;
use crate::types::{LongLivedToken, ShortLivedToken};

/// Stand-in base for redirect URLs pasted without a scheme or host.
const RELATIVE_BASE: &str = "http://localhost/";

/// Pulls the non-empty `code` query parameter out of an OAuth redirect URL.
///
/// Scheme-less input such as `host/path?code=X` or a bare `?code=X` is
/// resolved against a placeholder base so its query string is still read.
/// Returns `None` when the URL carries no usable code.
#[must_use]
pub fn extract_auth_code(redirect_url: &str) -> Option<String> {
    let url = Url::parse(redirect_url)
        .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(redirect_url)))
        .ok()?;
    url.query_pairs()
        .find(|(k, v)| k == "code" && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

impl ThreadsClient {
    /// Exchanges the authorization code in `redirect_url` for a short-lived token.
    ///
    /// Nothing is sent when the URL has no `code` or the client credentials
    /// are missing.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::MissingCode`] if the URL has no `code` parameter.
    /// - [`ThreadsError::MissingEnv`] if the client id or secret is unset.
    /// - [`ThreadsError::TokenExchangeFailed`] on any non-200 response.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the 200 body is not a token.
    pub async fn exchange_code_for_token(
        &self,
        redirect_url: &str,
    ) -> Result<ShortLivedToken, ThreadsError> {
        let code = extract_auth_code(redirect_url).ok_or(ThreadsError::MissingCode)?;
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ThreadsError::MissingEnv("CLIENT_ID"))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or(ThreadsError::MissingEnv("CLIENT_SECRET"))?;

        let url = self.build_url(&["oauth", "access_token"], &[])?;
        let form = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let (status, body) = self.send(self.client.post(url).form(&form)).await?;

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "authorization code exchange rejected");
            return Err(ThreadsError::TokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let token: ShortLivedToken = Self::decode(&body, "oauth/access_token")?;
        tracing::info!(expires_in = ?token.expires_in, "obtained short-lived token");
        Ok(token)
    }

    /// Exchanges a short-lived token for a long-lived one.
    ///
    /// # Errors
    ///
    /// - [`ThreadsError::MissingToken`] if `short_lived_token` is blank.
    /// - [`ThreadsError::MissingEnv`] if the client secret is unset.
    /// - [`ThreadsError::LongTokenExchangeFailed`] on any non-200 response.
    /// - [`ThreadsError::Http`] on network failure.
    /// - [`ThreadsError::Deserialize`] if the 200 body is not a token.
    pub async fn get_long_lived_token(
        &self,
        short_lived_token: &str,
    ) -> Result<LongLivedToken, ThreadsError> {
        if short_lived_token.trim().is_empty() {
            return Err(ThreadsError::MissingToken);
        }
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or(ThreadsError::MissingEnv("CLIENT_SECRET"))?;

        let url = self.build_url(
            &["access_token"],
            &[
                ("grant_type", "th_exchange_token"),
                ("client_secret", client_secret),
                ("access_token", short_lived_token),
            ],
        )?;
        let (status, body) = self.send(self.client.get(url)).await?;

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "long-lived token exchange rejected");
            return Err(ThreadsError::LongTokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let token: LongLivedToken = Self::decode(&body, "access_token")?;
        tracing::info!(expires_in = ?token.expires_in, "obtained long-lived token");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_code_from_redirect() {
        let url = "https://oauth.pstmn.io/v1/browser-callback?code=AQBx123#_";
        assert_eq!(extract_auth_code(url).as_deref(), Some("AQBx123"));
    }

    #[test]
    fn extracts_code_among_other_params() {
        let url = "https://example.com/cb?state=xyz&code=abc%3D%3D";
        assert_eq!(extract_auth_code(url).as_deref(), Some("abc=="));
    }

    #[test]
    fn missing_or_blank_code_is_none() {
        assert!(extract_auth_code("https://example.com/cb?state=xyz").is_none());
        assert!(extract_auth_code("https://example.com/cb?code=").is_none());
        assert!(extract_auth_code("not a url").is_none());
    }

    #[test]
    fn extracts_code_without_scheme() {
        let url = "oauth.pstmn.io/v1/browser-callback?code=AQB123";
        assert_eq!(extract_auth_code(url).as_deref(), Some("AQB123"));
    }

    #[test]
    fn extracts_code_from_bare_query() {
        assert_eq!(extract_auth_code("?code=XYZ#_").as_deref(), Some("XYZ"));
        assert!(extract_auth_code("browser-callback?state=1").is_none());
    }
}
