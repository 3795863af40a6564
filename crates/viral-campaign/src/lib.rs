//! Campaign lifecycle controller for the Viral Engine backend.
//!
//! Drives the two-phase, server-orchestrated workflow: submit a topic, poll
//! until the script draft is ready, let the caller edit it, submit the edited
//! script, poll again until the video and monetization brief land. The
//! controller owns the phase transitions, the polling cadence, and the
//! cancellation discipline; the gateway it wraps owns no business state.

mod controller;
mod error;
mod event;
mod scenes;
mod status;

pub use controller::{CampaignController, CampaignView};
pub use error::CampaignError;
pub use event::{CampaignEvent, Notice, NoticeLevel};
pub use scenes::SceneField;
pub use status::CampaignStatus;
