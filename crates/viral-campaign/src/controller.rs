//! The campaign controller and its polling task.
//!
//! One controller instance owns at most one job id at a time. The poll task
//! is the only cancellable resource; it is always stopped before a new one
//! is spawned, so stale jobs are never polled concurrently with fresh ones.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use viral_core::Language;
use viral_gateway::{EngineClient, JobState, ResultBundle, SceneRow, StatusSnapshot};

use crate::error::CampaignError;
use crate::event::{CampaignEvent, Notice};
use crate::status::CampaignStatus;

/// Mutable campaign state shared between the controller and its poll task.
#[derive(Debug, Clone, Default)]
pub(crate) struct CampaignState {
    pub status: CampaignStatus,
    pub job_id: Option<String>,
    pub topic: String,
    pub language: Language,
    pub phase: String,
    pub progress: u8,
    pub draft: Option<Vec<SceneRow>>,
    pub script_source: Option<String>,
    pub result: Option<ResultBundle>,
    pub error: Option<String>,
    /// `script_ready` is a one-shot checkpoint: once taken, later poll
    /// responses echoing it are ignored.
    pub script_ready_seen: bool,
}

/// Read-only snapshot of the campaign for display.
#[derive(Debug, Clone)]
pub struct CampaignView {
    pub status: CampaignStatus,
    pub job_id: Option<String>,
    pub topic: String,
    pub language: Language,
    pub phase: String,
    pub progress: u8,
    pub draft: Option<Vec<SceneRow>>,
    pub script_source: Option<String>,
    pub result: Option<ResultBundle>,
    pub error: Option<String>,
}

/// Drives the two-phase generation lifecycle against the backend.
pub struct CampaignController {
    gateway: Arc<EngineClient>,
    poll_interval: Duration,
    state: Arc<Mutex<CampaignState>>,
    events: broadcast::Sender<CampaignEvent>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl CampaignController {
    #[must_use]
    pub fn new(gateway: Arc<EngineClient>, poll_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            gateway,
            poll_interval,
            state: Arc::new(Mutex::new(CampaignState::default())),
            events,
            poller: Mutex::new(None),
        }
    }

    /// Subscribe to status, progress, and notice events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CampaignEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> CampaignStatus {
        self.state_lock().status
    }

    /// The local editable script, present only at the review checkpoint.
    #[must_use]
    pub fn draft(&self) -> Option<Vec<SceneRow>> {
        self.state_lock().draft.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> CampaignView {
        let state = self.state_lock();
        CampaignView {
            status: state.status,
            job_id: state.job_id.clone(),
            topic: state.topic.clone(),
            language: state.language,
            phase: state.phase.clone(),
            progress: state.progress,
            draft: state.draft.clone(),
            script_source: state.script_source.clone(),
            result: state.result.clone(),
            error: state.error.clone(),
        }
    }

    /// Starts phase 1 for `topic` and begins polling.
    ///
    /// Returns the backend-assigned job id. On a create failure the
    /// controller stays `Idle` with no job id and emits one error notice;
    /// there is no retry at this step.
    ///
    /// # Errors
    ///
    /// - [`CampaignError::EmptyTopic`] for blank input (no network call).
    /// - [`CampaignError::CampaignActive`] while a campaign is running or
    ///   awaiting review.
    /// - [`CampaignError::Gateway`] when the create call fails.
    pub async fn start_campaign(&self, topic: &str) -> Result<String, CampaignError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CampaignError::EmptyTopic);
        }
        {
            let mut state = self.state_lock();
            if state.status.is_active() {
                return Err(CampaignError::CampaignActive {
                    status: state.status,
                });
            }
            // Fresh run: wipe whatever the previous campaign left behind.
            *state = CampaignState {
                topic: topic.to_string(),
                language: Language::detect(topic),
                phase: "initializing".to_string(),
                ..CampaignState::default()
            };
        }
        self.stop();
        self.emit(CampaignEvent::Progress {
            phase: "initializing".to_string(),
            percent: 0,
        });
        self.emit_notice(Notice::info(
            "Phase 1 started",
            Some(format!("Hunting trends & writing script for \"{topic}\"...")),
        ));

        match self.gateway.create_generation(topic).await {
            Ok(reply) => {
                {
                    let mut state = self.state_lock();
                    state.job_id = Some(reply.generation_id.clone());
                    if let Some(tag) = reply.language.as_deref() {
                        state.language = Language::from_tag(tag);
                    }
                    state.status = CampaignStatus::Running;
                }
                self.emit(CampaignEvent::StatusChanged(CampaignStatus::Running));
                self.spawn_poller(reply.generation_id.clone());
                Ok(reply.generation_id)
            }
            Err(err) => {
                {
                    let mut state = self.state_lock();
                    state.job_id = None;
                    state.status = CampaignStatus::Idle;
                }
                self.emit_notice(Notice::error("Failed to start", Some(err.to_string())));
                Err(CampaignError::Gateway(err))
            }
        }
    }

    /// Submits the edited scenes verbatim and resumes polling for phase 2.
    ///
    /// On a submit failure the status stays `ScriptReady`, so the caller may
    /// retry from the checkpoint.
    ///
    /// # Errors
    ///
    /// - [`CampaignError::NoActiveJob`] when no job id is held.
    /// - [`CampaignError::EmptyScript`] for an empty sequence (no network call).
    /// - [`CampaignError::NotAwaitingReview`] outside the checkpoint.
    /// - [`CampaignError::Gateway`] when the submit call fails.
    pub async fn proceed_with_script(
        &self,
        edits: Vec<SceneRow>,
    ) -> Result<(), CampaignError> {
        let job_id = {
            let state = self.state_lock();
            let Some(job_id) = state.job_id.clone() else {
                return Err(CampaignError::NoActiveJob);
            };
            if edits.is_empty() {
                return Err(CampaignError::EmptyScript);
            }
            if state.status != CampaignStatus::ScriptReady {
                return Err(CampaignError::NotAwaitingReview {
                    status: state.status,
                });
            }
            job_id
        };

        self.emit_notice(Notice::info(
            "Phase 2 started",
            Some("Downloading footage, generating narration & monetization...".to_string()),
        ));
        {
            let mut state = self.state_lock();
            state.phase = "media_generation".to_string();
            state.progress = 55;
            state.draft = Some(edits.clone());
        }
        self.emit(CampaignEvent::Progress {
            phase: "media_generation".to_string(),
            percent: 55,
        });

        match self.gateway.submit_script(&job_id, &edits).await {
            Ok(_) => {
                self.state_lock().status = CampaignStatus::Running;
                self.emit(CampaignEvent::StatusChanged(CampaignStatus::Running));
                self.spawn_poller(job_id);
                Ok(())
            }
            Err(err) => {
                self.emit_notice(Notice::error("Failed to proceed", Some(err.to_string())));
                Err(CampaignError::Gateway(err))
            }
        }
    }

    /// Cancels the active poll task. Synchronous, idempotent, and safe to
    /// call when no task is running.
    pub fn stop(&self) {
        if let Some(task) = lock_unpoisoned(&self.poller).take() {
            task.abort();
        }
    }

    /// Stops polling and returns to a fresh `Idle` state (the "new
    /// campaign" edge from a terminal status, and the only way to abandon a
    /// stuck run).
    pub fn reset(&self) {
        self.stop();
        *self.state_lock() = CampaignState::default();
        self.emit(CampaignEvent::StatusChanged(CampaignStatus::Idle));
    }

    fn spawn_poller(&self, job_id: String) {
        // Never two pollers: tear down the previous task first.
        self.stop();
        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let interval = self.poll_interval;
        let task = tokio::spawn(poll_loop(gateway, state, events, job_id, interval));
        *lock_unpoisoned(&self.poller) = Some(task);
    }

    pub(crate) fn state_lock(&self) -> MutexGuard<'_, CampaignState> {
        lock_unpoisoned(&self.state)
    }

    pub(crate) fn emit(&self, event: CampaignEvent) {
        // Err just means nobody is subscribed right now.
        let _ = self.events.send(event);
    }

    fn emit_notice(&self, notice: Notice) {
        self.emit(CampaignEvent::Notice(notice));
    }
}

impl Drop for CampaignController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Continue,
    Stop,
}

/// Fixed-cadence status polling. Ticks are skipped while a fetch is
/// outstanding, so at most one poll request is logically in flight and
/// responses are applied in send order. Transient fetch failures are
/// swallowed; the next tick retries naturally.
async fn poll_loop(
    gateway: Arc<EngineClient>,
    state: Arc<Mutex<CampaignState>>,
    events: broadcast::Sender<CampaignEvent>,
    job_id: String,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; swallow it so the first fetch
    // lands one interval after the job starts.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let snapshot = match gateway.generation_status(Some(&job_id)).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::debug!(job_id = %job_id, error = %err, "status poll failed");
                continue;
            }
        };
        if apply_snapshot(&state, &events, snapshot) == PollOutcome::Stop {
            // Cancel from inside the response handler: no redundant tick.
            break;
        }
    }
}

/// Applies one poll response under the state lock and reports whether
/// polling should stop. Events are sent after the lock is released.
fn apply_snapshot(
    state: &Mutex<CampaignState>,
    events: &broadcast::Sender<CampaignEvent>,
    snapshot: StatusSnapshot,
) -> PollOutcome {
    let mut pending: Vec<CampaignEvent> = Vec::new();
    let outcome = {
        let mut st = lock_unpoisoned(state);
        if st.status.is_terminal() {
            PollOutcome::Stop
        } else {
            if let Some(tag) = snapshot.language.as_deref() {
                st.language = Language::from_tag(tag);
            }
            let phase = snapshot.phase.clone().unwrap_or_default();
            if phase != st.phase || snapshot.progress != st.progress {
                st.phase.clone_from(&phase);
                st.progress = snapshot.progress;
                pending.push(CampaignEvent::Progress {
                    phase,
                    percent: snapshot.progress,
                });
            }
            match snapshot.status {
                JobState::ScriptReady => {
                    if st.status == CampaignStatus::Running && !st.script_ready_seen {
                        if let Some(script) = snapshot.script_data {
                            st.draft = Some(script.script_columns);
                            st.script_source = script.script_source;
                            st.status = CampaignStatus::ScriptReady;
                            st.script_ready_seen = true;
                            pending.push(CampaignEvent::StatusChanged(
                                CampaignStatus::ScriptReady,
                            ));
                            pending.push(CampaignEvent::Notice(Notice::info(
                                "Script generated",
                                Some(
                                    "Review and edit the script, then proceed to rendering."
                                        .to_string(),
                                ),
                            )));
                            PollOutcome::Stop
                        } else {
                            // Checkpoint announced without a draft: not
                            // actionable yet, keep polling.
                            PollOutcome::Continue
                        }
                    } else {
                        // Stale echo after the checkpoint was already taken.
                        PollOutcome::Continue
                    }
                }
                JobState::Completed => {
                    if let Some(result) = snapshot.result {
                        st.result = Some(result);
                        st.status = CampaignStatus::Completed;
                        pending.push(CampaignEvent::StatusChanged(CampaignStatus::Completed));
                        pending.push(CampaignEvent::Notice(Notice::success(
                            "Campaign ready",
                            Some(
                                "Video with narration, script, and monetization brief generated."
                                    .to_string(),
                            ),
                        )));
                        PollOutcome::Stop
                    } else {
                        PollOutcome::Continue
                    }
                }
                JobState::Failed => {
                    let message = snapshot
                        .error
                        .unwrap_or_else(|| "unknown error".to_string());
                    st.error = Some(message.clone());
                    st.status = CampaignStatus::Failed;
                    pending.push(CampaignEvent::StatusChanged(CampaignStatus::Failed));
                    pending.push(CampaignEvent::Notice(Notice::error(
                        "Generation failed",
                        Some(message),
                    )));
                    PollOutcome::Stop
                }
                JobState::Running | JobState::Idle => PollOutcome::Continue,
            }
        }
    };
    for event in pending {
        let _ = events.send(event);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use viral_gateway::ScriptData;

    fn controller() -> CampaignController {
        let gateway =
            Arc::new(EngineClient::with_base_url("http://127.0.0.1:9", 1).expect("client"));
        CampaignController::new(gateway, Duration::from_millis(10))
    }

    fn snapshot(status: JobState) -> StatusSnapshot {
        StatusSnapshot {
            generation_id: Some("g1".to_string()),
            topic: None,
            language: None,
            status,
            progress: 0,
            phase: None,
            error: None,
            result: None,
            script_data: None,
        }
    }

    #[tokio::test]
    async fn start_campaign_rejects_blank_topic_without_network() {
        let controller = controller();
        let result = controller.start_campaign("   ").await;
        assert!(matches!(result, Err(CampaignError::EmptyTopic)));
        assert_eq!(controller.status(), CampaignStatus::Idle);
    }

    #[tokio::test]
    async fn proceed_rejects_when_no_job_is_held() {
        let controller = controller();
        let result = controller
            .proceed_with_script(vec![SceneRow {
                timecode: "0-3s".to_string(),
                visual_cue: String::new(),
                audio: String::new(),
            }])
            .await;
        assert!(matches!(result, Err(CampaignError::NoActiveJob)));
    }

    #[tokio::test]
    async fn stop_is_idempotent_without_a_poller() {
        let controller = controller();
        controller.stop();
        controller.stop();
    }

    #[test]
    fn apply_snapshot_ignores_script_ready_without_script_data() {
        let state = Mutex::new(CampaignState {
            status: CampaignStatus::Running,
            ..CampaignState::default()
        });
        let (events, _) = broadcast::channel(8);
        let outcome = apply_snapshot(&state, &events, snapshot(JobState::ScriptReady));
        assert_eq!(outcome, PollOutcome::Continue);
        assert_eq!(lock_unpoisoned(&state).status, CampaignStatus::Running);
    }

    #[test]
    fn apply_snapshot_takes_checkpoint_only_once() {
        let state = Mutex::new(CampaignState {
            status: CampaignStatus::Running,
            ..CampaignState::default()
        });
        let (events, _) = broadcast::channel(8);

        let mut ready = snapshot(JobState::ScriptReady);
        ready.script_data = Some(ScriptData {
            script_columns: vec![SceneRow {
                timecode: "0-3s".to_string(),
                visual_cue: "v".to_string(),
                audio: "a".to_string(),
            }],
            ..ScriptData::default()
        });
        assert_eq!(
            apply_snapshot(&state, &events, ready.clone()),
            PollOutcome::Stop
        );
        assert_eq!(lock_unpoisoned(&state).status, CampaignStatus::ScriptReady);

        // Simulate phase 2 resuming, then a stale script_ready echo.
        lock_unpoisoned(&state).status = CampaignStatus::Running;
        assert_eq!(apply_snapshot(&state, &events, ready), PollOutcome::Continue);
        assert_eq!(lock_unpoisoned(&state).status, CampaignStatus::Running);
    }

    #[test]
    fn apply_snapshot_failed_uses_generic_fallback_message() {
        let state = Mutex::new(CampaignState {
            status: CampaignStatus::Running,
            ..CampaignState::default()
        });
        let (events, _) = broadcast::channel(8);
        assert_eq!(
            apply_snapshot(&state, &events, snapshot(JobState::Failed)),
            PollOutcome::Stop
        );
        let st = lock_unpoisoned(&state);
        assert_eq!(st.status, CampaignStatus::Failed);
        assert_eq!(st.error.as_deref(), Some("unknown error"));
    }

    #[test]
    fn apply_snapshot_is_inert_after_terminal() {
        let state = Mutex::new(CampaignState {
            status: CampaignStatus::Completed,
            ..CampaignState::default()
        });
        let (events, _) = broadcast::channel(8);
        assert_eq!(
            apply_snapshot(&state, &events, snapshot(JobState::Running)),
            PollOutcome::Stop
        );
        assert_eq!(lock_unpoisoned(&state).status, CampaignStatus::Completed);
    }
}
