//! Typed client surface for the Viral Engine backend.
//!
//! [`EngineClient`] wraps the REST API; [`LogStream`] consumes the
//! out-of-band `/ws/logs` push channel; [`verify_callback`] is the trust
//! boundary for OAuth popup messages. None of these hold business state —
//! they translate intents into backend calls and normalize the responses.

mod client;
mod error;
mod logs;
mod oauth;
mod types;

pub use client::EngineClient;
pub use error::GatewayError;
pub use logs::{ws_logs_url, LogBuffer, LogFrame, LogStream, LogStreamHandle};
pub use oauth::{verify_callback, OauthCallback};
pub use types::{
    BrainstormReply, CreateReply, EarningsProjection, HealthReply, HistoryEntry, JobState,
    ProductPick, PublishReply, ResultBundle, SceneRow, ScriptData, SocialConnection,
    StatusSnapshot, SubmitReply,
};
