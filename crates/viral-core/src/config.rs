use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// No variable is required: the backend origin falls back to the local default
/// and everything else has a sensible value for development.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("VIRAL_ENV", "development"));
    let api_base_url = or_default("VIRAL_API_BASE_URL", "http://localhost:8000");
    let log_level = or_default("VIRAL_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("VIRAL_REQUEST_TIMEOUT_SECS", "300")?;
    let poll_interval_ms = parse_u64("VIRAL_POLL_INTERVAL_MS", "2000")?;
    let ws_reconnect_delay_ms = parse_u64("VIRAL_WS_RECONNECT_DELAY_MS", "3000")?;
    let log_buffer_capacity = parse_usize("VIRAL_LOG_BUFFER_CAPACITY", "100")?;
    let user_agent = or_default("VIRAL_USER_AGENT", "viral/0.1 (campaign-console)");

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        poll_interval_ms,
        ws_reconnect_delay_ms,
        log_buffer_capacity,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
