use thiserror::Error;

/// Errors returned by the backend gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status. `message` is the
    /// backend's `detail` field when the error body is parseable, else a
    /// generic fallback.
    #[error("backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL (or a path joined onto it) is not a valid URL.
    #[error("invalid URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
