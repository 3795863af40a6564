//! Local scene-editing helpers.
//!
//! These mutate only the controller's draft; nothing reaches the backend
//! until [`CampaignController::proceed_with_script`] submits the sequence.
//! All of them require the review checkpoint, since the draft exists only
//! there.

use viral_core::Language;
use viral_gateway::SceneRow;

use crate::controller::CampaignController;
use crate::error::CampaignError;
use crate::status::CampaignStatus;

/// Editable field of a scene row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneField {
    Timecode,
    Visual,
    Narration,
}

/// Seconds each appended scene spans by default.
const APPEND_STEP_SECS: i64 = 3;
/// Start offset used when the previous timecode cannot be parsed.
const FALLBACK_START_SECS: i64 = 15;

impl CampaignController {
    /// Overwrites one field of the scene at `index`.
    ///
    /// # Errors
    ///
    /// [`CampaignError::NotAwaitingReview`] outside the checkpoint,
    /// [`CampaignError::SceneIndex`] when `index` is out of range.
    pub fn update_scene(
        &self,
        index: usize,
        field: SceneField,
        value: &str,
    ) -> Result<(), CampaignError> {
        self.with_draft(|draft, _| {
            let len = draft.len();
            let scene = draft
                .get_mut(index)
                .ok_or(CampaignError::SceneIndex { index, len })?;
            match field {
                SceneField::Timecode => scene.timecode = value.to_string(),
                SceneField::Visual => scene.visual_cue = value.to_string(),
                SceneField::Narration => scene.audio = value.to_string(),
            }
            Ok(())
        })
    }

    /// Removes the scene at `index`.
    ///
    /// # Errors
    ///
    /// [`CampaignError::NotAwaitingReview`] outside the checkpoint,
    /// [`CampaignError::SceneIndex`] when `index` is out of range.
    pub fn remove_scene(&self, index: usize) -> Result<(), CampaignError> {
        self.with_draft(|draft, _| {
            if index >= draft.len() {
                return Err(CampaignError::SceneIndex {
                    index,
                    len: draft.len(),
                });
            }
            draft.remove(index);
            Ok(())
        })
    }

    /// Appends a scene whose timecode starts where the previous one ends
    /// (falling back to 15 when that is unparseable), with locale-specific
    /// placeholder text.
    ///
    /// # Errors
    ///
    /// [`CampaignError::NotAwaitingReview`] outside the checkpoint.
    pub fn add_scene(&self) -> Result<(), CampaignError> {
        self.with_draft(|draft, language| {
            let start = draft
                .last()
                .and_then(|row| parse_end_seconds(&row.timecode))
                .unwrap_or(FALLBACK_START_SECS);
            draft.push(SceneRow {
                timecode: format!("{start}-{}s", start + APPEND_STEP_SECS),
                visual_cue: if language.is_rtl() {
                    "مشهد جديد".to_string()
                } else {
                    "New scene visual".to_string()
                },
                audio: if language.is_rtl() {
                    "\"أدخل النص المنطوق هنا\"".to_string()
                } else {
                    "\"Your narration text here\"".to_string()
                },
            });
            Ok(())
        })
    }

    fn with_draft<F>(&self, edit: F) -> Result<(), CampaignError>
    where
        F: FnOnce(&mut Vec<SceneRow>, Language) -> Result<(), CampaignError>,
    {
        let mut state = self.state_lock();
        if state.status != CampaignStatus::ScriptReady {
            return Err(CampaignError::NotAwaitingReview {
                status: state.status,
            });
        }
        let language = state.language;
        let draft = state.draft.get_or_insert_with(Vec::new);
        edit(draft, language)
    }
}

/// Parses the end offset out of a `"<a>-<b>s"` timecode.
fn parse_end_seconds(timecode: &str) -> Option<i64> {
    let (_, tail) = timecode.split_once('-')?;
    tail.trim().trim_end_matches('s').trim().parse().ok()
}
