//! Shared configuration for the Threads insights client.

pub mod app_config;
pub mod config;

use thiserror::Error;

pub use app_config::{ThreadsConfig, DEFAULT_BASE_URL, DEFAULT_REDIRECT_URI};
pub use config::{load_config, load_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
