//! Trust boundary for OAuth popup callbacks.
//!
//! The connect popup posts a message back to the opener when the flow
//! finishes. The origin check below is the entire security boundary: a
//! message from any other origin, or one that does not decode, is ignored
//! outright — there is no partial acceptance.

use serde::Deserialize;

/// Message posted by the OAuth popup on completion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OauthCallback {
    OauthSuccess {
        platform: String,
    },
    OauthError {
        platform: String,
        #[serde(default)]
        error: Option<String>,
    },
}

/// Accepts a popup message only when `origin` matches the configured backend
/// origin exactly (one trailing slash on either side is tolerated) and the
/// payload decodes as an [`OauthCallback`]. Everything else yields `None`.
#[must_use]
pub fn verify_callback(
    origin: &str,
    expected_origin: &str,
    payload: &str,
) -> Option<OauthCallback> {
    if trim_origin(origin) != trim_origin(expected_origin) {
        return None;
    }
    serde_json::from_str(payload).ok()
}

fn trim_origin(origin: &str) -> &str {
    origin.strip_suffix('/').unwrap_or(origin)
}
