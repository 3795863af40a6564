//! HTTP client for the Viral Engine REST API.
//!
//! Wraps `reqwest` with backend-specific error normalization and typed
//! response deserialization. Non-2xx responses surface the FastAPI
//! `{"detail": ...}` message when present, else a generic fallback, as
//! [`GatewayError::Api`].

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use viral_core::AppConfig;

use crate::error::GatewayError;
use crate::logs::ws_logs_url;
use crate::types::{
    BrainstormReply, CreateReply, HealthReply, HistoryEntry, PublishReply, ResultBundle,
    SceneRow, SocialConnection, StatusSnapshot, SubmitReply,
};

const DEFAULT_USER_AGENT: &str = "viral/0.1 (campaign-console)";

/// Client for the Viral Engine backend.
///
/// Manages the HTTP client and base URL. Use [`EngineClient::new`] with the
/// application config, or [`EngineClient::with_base_url`] to point at a mock
/// server in tests.
pub struct EngineClient {
    client: Client,
    base_url: Url,
}

/// FastAPI error body: `{"detail": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(serde::Deserialize)]
struct GenerationsEnvelope {
    generations: Vec<HistoryEntry>,
}

#[derive(serde::Deserialize)]
struct ResultsEnvelope {
    results: Vec<ResultBundle>,
}

impl EngineClient {
    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`EngineClient::new`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, GatewayError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT)
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends endpoint paths rather than replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| GatewayError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Starts phase 1 (trend hunting + script drafting) for `topic`.
    ///
    /// Poll [`EngineClient::generation_status`] with the returned id until the
    /// job reaches `script_ready`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure.
    /// - [`GatewayError::Api`] on a non-2xx response (e.g. blank topic).
    /// - [`GatewayError::Deserialize`] if the body does not match [`CreateReply`].
    pub async fn create_generation(&self, topic: &str) -> Result<CreateReply, GatewayError> {
        self.post_json(
            "generate",
            &serde_json::json!({ "topic": topic }),
            "create_generation",
        )
        .await
    }

    /// Fetches the current status snapshot for a job.
    ///
    /// With `id = None` the single-tenant `/status` fallback is used, which
    /// reports whatever job the backend considers current.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure.
    /// - [`GatewayError::Api`] on a non-2xx response (e.g. unknown id).
    /// - [`GatewayError::Deserialize`] if the body does not match
    ///   [`StatusSnapshot`].
    pub async fn generation_status(
        &self,
        id: Option<&str>,
    ) -> Result<StatusSnapshot, GatewayError> {
        match id {
            Some(id) => {
                self.get_json(&format!("status/{id}"), "generation_status")
                    .await
            }
            None => self.get_json("status", "generation_status").await,
        }
    }

    /// Submits the user-edited script and starts phase 2.
    ///
    /// Scenes are serialized verbatim, in order — the backend receives
    /// exactly what the editor holds.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure.
    /// - [`GatewayError::Api`] when the job is unknown or not at the
    ///   `script_ready` checkpoint.
    /// - [`GatewayError::Deserialize`] if the body does not match [`SubmitReply`].
    pub async fn submit_script(
        &self,
        id: &str,
        scenes: &[SceneRow],
    ) -> Result<SubmitReply, GatewayError> {
        self.post_json(
            &format!("proceed/{id}"),
            &serde_json::json!({ "script_columns": scenes }),
            "submit_script",
        )
        .await
    }

    /// One-shot chat with a pipeline agent; independent of any job lifecycle.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`], [`GatewayError::Api`] (unknown agent), or
    /// [`GatewayError::Deserialize`].
    pub async fn brainstorm(
        &self,
        agent: &str,
        prompt: &str,
    ) -> Result<BrainstormReply, GatewayError> {
        self.post_json(
            "brainstorm",
            &serde_json::json!({ "agent": agent, "prompt": prompt }),
            "brainstorm",
        )
        .await
    }

    /// Lists past generations, in the order the backend returns them
    /// (most-recent-first).
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`], [`GatewayError::Api`], or
    /// [`GatewayError::Deserialize`].
    pub async fn list_generations(&self) -> Result<Vec<HistoryEntry>, GatewayError> {
        let envelope: GenerationsEnvelope =
            self.get_json("generations", "list_generations").await?;
        Ok(envelope.generations)
    }

    /// Deletes one entry from the backend's history store.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`] or [`GatewayError::Api`] (unknown id).
    pub async fn delete_generation(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("generations/{id}"))?;
        let response = self.client.delete(url).send().await?;
        Self::checked_body(response).await?;
        Ok(())
    }

    /// Returns the most recent completed result bundles (at most five).
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`], [`GatewayError::Api`], or
    /// [`GatewayError::Deserialize`].
    pub async fn recent_results(&self) -> Result<Vec<ResultBundle>, GatewayError> {
        let envelope: ResultsEnvelope = self.get_json("results", "recent_results").await?;
        Ok(envelope.results)
    }

    /// Backend liveness probe.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`], [`GatewayError::Api`], or
    /// [`GatewayError::Deserialize`].
    pub async fn health(&self) -> Result<HealthReply, GatewayError> {
        self.get_json("health", "health").await
    }

    /// Fetches per-platform social connection state.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`], [`GatewayError::Api`], or
    /// [`GatewayError::Deserialize`].
    pub async fn social_status(
        &self,
    ) -> Result<HashMap<String, SocialConnection>, GatewayError> {
        self.get_json("social/status", "social_status").await
    }

    /// Unlinks a connected social platform.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`] or [`GatewayError::Api`].
    pub async fn disconnect_social(&self, platform: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("social/disconnect/{platform}"))?;
        let response = self.client.post(url).send().await?;
        Self::checked_body(response).await?;
        Ok(())
    }

    /// Publishes a completed campaign's video to a connected platform.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Http`], [`GatewayError::Api`] (not connected, no
    /// video), or [`GatewayError::Deserialize`].
    pub async fn publish_to_social(
        &self,
        platform: &str,
        id: &str,
    ) -> Result<PublishReply, GatewayError> {
        let url = self.endpoint(&format!("social/publish/{platform}/{id}"))?;
        let response = self.client.post(url).send().await?;
        let body = Self::checked_body(response).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
            context: "publish_to_social".to_string(),
            source: e,
        })
    }

    /// Absolute URL for the OAuth connect page, to be opened in a popup.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] if the path does not join.
    pub fn connect_url(&self, platform: &str) -> Result<Url, GatewayError> {
        self.endpoint(&format!("social/connect/{platform}"))
    }

    /// Resolves a backend-relative video path (e.g. `/videos/final.mp4`)
    /// against the configured origin. Already-absolute URLs pass through.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] if the path does not join.
    pub fn video_url(&self, relative: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(relative)
            .map_err(|e| GatewayError::InvalidBaseUrl {
                url: relative.to_owned(),
                reason: e.to_string(),
            })
    }

    /// WebSocket URL for the backend log stream.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] if the origin cannot carry a
    /// `ws`/`wss` scheme.
    pub fn logs_url(&self) -> Result<String, GatewayError> {
        ws_logs_url(self.base_url.as_str())
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::InvalidBaseUrl {
                url: path.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        let body = Self::checked_body(response).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url).json(body).send().await?;
        let body = Self::checked_body(response).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Reads the body and maps non-success statuses to [`GatewayError::Api`],
    /// extracting the backend's `detail` message when the error body parses.
    async fn checked_body(response: Response) -> Result<String, GatewayError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| format!("backend returned HTTP {}", status.as_u16()));
        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
