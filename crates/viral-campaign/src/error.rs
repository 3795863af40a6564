use thiserror::Error;

use viral_gateway::GatewayError;

use crate::status::CampaignStatus;

/// Errors returned by the campaign controller.
///
/// The validation variants are rejected before any network call; `Gateway`
/// wraps create/submit failures, after which the controller has already
/// reverted to its last stable status.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("script submission must contain at least one scene")]
    EmptyScript,

    #[error("no active generation job")]
    NoActiveJob,

    /// A campaign is already running or awaiting review; the caller must
    /// finish or reset it before starting another.
    #[error("a campaign is already active (status: {status})")]
    CampaignActive { status: CampaignStatus },

    #[error("campaign is {status}, not awaiting script review")]
    NotAwaitingReview { status: CampaignStatus },

    #[error("scene index {index} out of range (draft has {len} scenes)")]
    SceneIndex { index: usize, len: usize },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
