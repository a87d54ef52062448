use crate::app_config::{ThreadsConfig, DEFAULT_BASE_URL, DEFAULT_REDIRECT_URI, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load client configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed.
pub fn load_config() -> Result<ThreadsConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load client configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed.
pub fn load_config_from_env() -> Result<ThreadsConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<ThreadsConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset, matching how `.env` templates are usually left.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, e: std::num::ParseIntError| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e))
    };

    let request_timeout_secs = optional("THREADS_REQUEST_TIMEOUT_SECS")
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| invalid("THREADS_REQUEST_TIMEOUT_SECS", e))
        })
        .transpose()?;

    let max_pages = parse_usize("THREADS_MAX_PAGES", "200")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "THREADS_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let page_limit = parse_u32("THREADS_PAGE_LIMIT", "50")?;
    if page_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "THREADS_PAGE_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(ThreadsConfig {
        client_id: optional("CLIENT_ID"),
        client_secret: optional("CLIENT_SECRET"),
        redirect_uri: or_default("THREADS_REDIRECT_URI", DEFAULT_REDIRECT_URI),
        base_url: or_default("THREADS_BASE_URL", DEFAULT_BASE_URL),
        request_timeout_secs,
        user_agent: or_default("THREADS_USER_AGENT", DEFAULT_USER_AGENT),
        max_pages,
        page_limit,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
