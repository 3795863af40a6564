//! Shared foundation for the Viral Engine client workspace: application
//! configuration and locale handling.

mod app_config;
mod config;
mod language;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use language::{topic_suggestions, Language};

use thiserror::Error;

/// Errors raised while loading [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An env var was present but could not be parsed into its target type.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
