/// Lifecycle state of the controller's current campaign.
///
/// `ScriptReady` is the checkpoint between the two backend phases and is
/// reachable only once per job; the controller tracks that separately since
/// the enum alone cannot encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CampaignStatus {
    #[default]
    Idle,
    Running,
    ScriptReady,
    Completed,
    Failed,
}

impl CampaignStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: CampaignStatus) -> bool {
        use CampaignStatus::{Completed, Failed, Idle, Running, ScriptReady};
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, ScriptReady | Completed | Failed)
                | (ScriptReady, Running)
                | (Completed | Failed, Idle)
        )
    }

    /// Terminal states admit no further transitions or polling.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    /// A campaign is active while it owns the job id: running or parked at
    /// the script-review checkpoint.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, CampaignStatus::Running | CampaignStatus::ScriptReady)
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Idle => write!(f, "idle"),
            CampaignStatus::Running => write!(f, "running"),
            CampaignStatus::ScriptReady => write!(f, "script_ready"),
            CampaignStatus::Completed => write!(f, "completed"),
            CampaignStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CampaignStatus::{Completed, Failed, Idle, Running, ScriptReady};

    #[test]
    fn idle_only_starts_running() {
        assert!(Idle.can_transition_to(Running));
        assert!(!Idle.can_transition_to(ScriptReady));
        assert!(!Idle.can_transition_to(Completed));
        assert!(!Idle.can_transition_to(Failed));
    }

    #[test]
    fn running_reaches_checkpoint_or_terminal() {
        assert!(Running.can_transition_to(ScriptReady));
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));
        assert!(!Running.can_transition_to(Idle));
    }

    #[test]
    fn script_ready_only_resumes_running() {
        assert!(ScriptReady.can_transition_to(Running));
        assert!(!ScriptReady.can_transition_to(Completed));
        assert!(!ScriptReady.can_transition_to(Failed));
        assert!(!ScriptReady.can_transition_to(Idle));
    }

    #[test]
    fn terminal_states_only_reset_to_idle() {
        for terminal in [Completed, Failed] {
            assert!(terminal.is_terminal());
            assert!(terminal.can_transition_to(Idle));
            assert!(!terminal.can_transition_to(Running));
            assert!(!terminal.can_transition_to(ScriptReady));
        }
    }

    #[test]
    fn active_covers_running_and_checkpoint() {
        assert!(Running.is_active());
        assert!(ScriptReady.is_active());
        assert!(!Idle.is_active());
        assert!(!Completed.is_active());
        assert!(!Failed.is_active());
    }
}
