use crate::status::CampaignStatus;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient user-visible notification: a title plus an optional detail
/// line. Every notification the controller emits goes through exactly one
/// of these; they never block further interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    #[must_use]
    pub fn info(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            detail,
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            detail,
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            detail,
        }
    }
}

/// State-change notifications broadcast by the controller.
///
/// `phase` is an opaque, backend-controlled display hint from an open
/// string set; only status drives transitions.
#[derive(Debug, Clone)]
pub enum CampaignEvent {
    StatusChanged(CampaignStatus),
    Progress { phase: String, percent: u8 },
    Notice(Notice),
}
