//! Wire types for the Viral Engine REST API.
//!
//! These model the JSON the FastAPI backend actually emits. Timestamps are
//! naive local ISO-8601 strings (`datetime.now().isoformat()`); a tolerant
//! helper parses them into `Option<NaiveDateTime>` and maps malformed values
//! to `None` rather than failing the whole response.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a generation job.
///
/// This five-value set is the contract: an unknown status string is a
/// deserialization error, unlike `phase`, which is an open-ended display
/// hint the client never branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Running,
    ScriptReady,
    Completed,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Idle => write!(f, "idle"),
            JobState::Running => write!(f, "running"),
            JobState::ScriptReady => write!(f, "script_ready"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// One editable row of the script: a timecode span, a visual cue, and the
/// narration text. Identity is array position; there is no stable scene id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRow {
    #[serde(default)]
    pub timecode: String,
    #[serde(default)]
    pub visual_cue: String,
    #[serde(default)]
    pub audio: String,
}

/// Draft script delivered at the `script_ready` checkpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptData {
    #[serde(default)]
    pub script_columns: Vec<SceneRow>,
    #[serde(default)]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub script_source: Option<String>,
}

/// Affiliate product suggested by the monetization agent.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPick {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub commission: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub affiliate_network: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EarningsProjection {
    pub conservative: String,
    pub viral: String,
}

/// Finished artifact bundle present once a job completes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultBundle {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub captions: Vec<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub monetization_brief: String,
    #[serde(default)]
    pub products: Vec<ProductPick>,
    #[serde(default)]
    pub earnings_projection: Option<EarningsProjection>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Full status snapshot returned by `GET /status/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub status: JobState,
    #[serde(default, deserialize_with = "de_progress")]
    pub progress: u8,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<ResultBundle>,
    #[serde(default)]
    pub script_data: Option<ScriptData>,
}

/// Reply to `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReply {
    pub generation_id: String,
    pub status: JobState,
    #[serde(default)]
    pub language: Option<String>,
}

/// Reply to `POST /proceed/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReply {
    pub generation_id: String,
    pub status: JobState,
}

/// Reply to `POST /brainstorm`. Stateless; independent of any job.
#[derive(Debug, Clone, Deserialize)]
pub struct BrainstormReply {
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// One past job from `GET /generations`. Backend order is preserved
/// (most-recent-first).
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub language: Option<String>,
    pub status: JobState,
    #[serde(default, deserialize_with = "de_progress")]
    pub progress: u8,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "de_naive_datetime")]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub result: Option<ResultBundle>,
}

/// Per-platform connection record from `GET /social/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialConnection {
    pub connected: bool,
    #[serde(default, deserialize_with = "de_naive_datetime")]
    pub connected_at: Option<NaiveDateTime>,
}

/// Reply to `POST /social/publish/{platform}/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "de_naive_datetime")]
    pub timestamp: Option<NaiveDateTime>,
    pub share_url: String,
}

/// Reply to `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReply {
    pub status: String,
    pub timestamp: String,
}

/// Clamp backend-controlled progress to 0–100 on ingest.
fn de_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u8::try_from(raw.clamp(0, 100)).unwrap_or(100))
}

/// Parse a naive backend timestamp, tolerating absent or malformed values.
fn de_naive_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse::<NaiveDateTime>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_state_round_trips_snake_case() {
        let state: JobState = serde_json::from_str("\"script_ready\"").unwrap();
        assert_eq!(state, JobState::ScriptReady);
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"script_ready\"");
    }

    #[test]
    fn job_state_unknown_value_fails_closed() {
        let result = serde_json::from_str::<JobState>("\"paused\"");
        assert!(result.is_err(), "unexpected: {result:?}");
    }

    #[test]
    fn snapshot_progress_is_clamped() {
        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"status": "running", "progress": 250}"#).unwrap();
        assert_eq!(snapshot.progress, 100);

        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"status": "running", "progress": -4}"#).unwrap();
        assert_eq!(snapshot.progress, 0);
    }

    #[test]
    fn snapshot_progress_defaults_to_zero_when_absent() {
        let snapshot: StatusSnapshot = serde_json::from_str(r#"{"status": "idle"}"#).unwrap();
        assert_eq!(snapshot.progress, 0);
    }

    #[test]
    fn history_timestamp_parses_python_isoformat() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"id": "g1", "topic": "t", "status": "completed",
                "started_at": "2026-08-29T10:15:30.123456"}"#,
        )
        .unwrap();
        let ts = entry.started_at.unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-08-29 10:15:30");
    }

    #[test]
    fn history_timestamp_malformed_becomes_none() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"id": "g1", "topic": "t", "status": "failed", "started_at": "yesterday"}"#,
        )
        .unwrap();
        assert!(entry.started_at.is_none());
    }

    #[test]
    fn scene_row_serializes_with_wire_field_names() {
        let row = SceneRow {
            timecode: "0-3s".into(),
            visual_cue: "opening shot".into(),
            audio: "hook line".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "timecode": "0-3s",
                "visual_cue": "opening shot",
                "audio": "hook line"
            })
        );
    }
}
