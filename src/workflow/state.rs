//! Workflow state machine phases and shared session state.
//!
//! [`WorkflowPhase`] drives the controller's state machine.  The UI reads
//! it via [`SharedWorkflow`] to decide which actions to enable.
//!
//! [`WorkflowState`] is the single source of truth for one session: current
//! phase, the selected file, the latest transcription result, the segment
//! editor, the quota tracker, progress, and any error message.  It is an
//! explicit context object — nothing here is process-global — so multiple
//! independent sessions can coexist and tests need no shared fixtures.
//!
//! [`SharedWorkflow`] is a type alias for `Arc<Mutex<WorkflowState>>` — cheap
//! to clone and safe to share; do not hold the lock across `.await` points.

use std::sync::{Arc, Mutex};

use crate::backend::TranscribeResponse;
use crate::config::AppConfig;
use crate::media::FileIntake;
use crate::progress::ProgressCell;
use crate::ratelimit::RateLimitTracker;
use crate::segment::SegmentEditor;

// ---------------------------------------------------------------------------
// WorkflowPhase
// ---------------------------------------------------------------------------

/// States of the subtitle workflow.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──select──▶ FileSelected
/// FileSelected ──transcribe──▶ Transcribing
///                              ──success──▶ Ready
///                              ──failure | rate-limited──▶ FileSelected
/// Ready ──burn──▶ Burning ──success | failure | rate-limited──▶ Ready
/// any state ──select──▶ FileSelected   (prior result discarded)
/// ```
///
/// There is no terminal state; the machine is reusable for the whole
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// No file selected yet.
    Idle,

    /// A file passed intake; transcription can start.
    FileSelected,

    /// A transcribe request is outstanding; the progress ramp is running.
    Transcribing,

    /// A transcription result is held; segments are editable and exports
    /// (including burn) are available.
    Ready,

    /// A burn request is outstanding.
    Burning,
}

impl WorkflowPhase {
    /// Returns `true` while a backend request is outstanding.
    ///
    /// The UI uses this to disable the transcribe/burn buttons while busy.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowPhase::Transcribing | WorkflowPhase::Burning)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "Idle",
            WorkflowPhase::FileSelected => "File selected",
            WorkflowPhase::Transcribing => "Transcribing",
            WorkflowPhase::Ready => "Ready",
            WorkflowPhase::Burning => "Burning",
        }
    }
}

impl Default for WorkflowPhase {
    fn default() -> Self {
        WorkflowPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// WorkflowState
// ---------------------------------------------------------------------------

/// Shared session state — the single source of truth for the UI.
///
/// Held behind [`SharedWorkflow`].  The controller mutates it; the UI layer
/// reads it.
pub struct WorkflowState {
    /// Current phase of the workflow.
    pub phase: WorkflowPhase,

    /// Upload validation and custody of the selected file.
    pub intake: FileIntake,

    /// Latest transcription result, including the SRT/VTT snapshots used by
    /// static exports.  `None` until a transcribe call succeeds; discarded
    /// when a new file is selected.
    pub result: Option<TranscribeResponse>,

    /// Editable view of the result's segments.
    pub editor: SegmentEditor,

    /// Remaining-quota bookkeeping from response metadata.
    pub rate: RateLimitTracker,

    /// Percentage cell written by the synthetic progress estimator.
    pub progress: ProgressCell,

    /// Message to display after a rejected selection or a failed request.
    ///
    /// Cleared whenever a new selection or request is accepted.
    pub error_message: Option<String>,
}

impl WorkflowState {
    /// Create a fresh session in `Idle` with limits taken from config.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            phase: WorkflowPhase::default(),
            intake: FileIntake::new(config.upload.max_bytes()),
            result: None,
            editor: SegmentEditor::new(),
            rate: RateLimitTracker::new(config.backend.daily_quota),
            progress: ProgressCell::new(),
            error_message: None,
        }
    }

    /// Current progress percentage, 0–100.
    pub fn progress_pct(&self) -> u8 {
        self.progress.get()
    }
}

// ---------------------------------------------------------------------------
// SharedWorkflow
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`WorkflowState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedWorkflow = Arc<Mutex<WorkflowState>>;

/// Construct a new [`SharedWorkflow`] for one session.
pub fn new_shared_workflow(config: &AppConfig) -> SharedWorkflow {
    Arc::new(Mutex::new(WorkflowState::new(config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_and_terminal_free() {
        assert_eq!(WorkflowPhase::default(), WorkflowPhase::Idle);
    }

    #[test]
    fn only_outstanding_requests_are_busy() {
        assert!(!WorkflowPhase::Idle.is_busy());
        assert!(!WorkflowPhase::FileSelected.is_busy());
        assert!(WorkflowPhase::Transcribing.is_busy());
        assert!(!WorkflowPhase::Ready.is_busy());
        assert!(WorkflowPhase::Burning.is_busy());
    }

    #[test]
    fn labels_are_non_empty() {
        for phase in [
            WorkflowPhase::Idle,
            WorkflowPhase::FileSelected,
            WorkflowPhase::Transcribing,
            WorkflowPhase::Ready,
            WorkflowPhase::Burning,
        ] {
            assert!(!phase.label().is_empty());
        }
    }

    #[test]
    fn fresh_state_is_empty_idle() {
        let state = WorkflowState::new(&AppConfig::default());
        assert_eq!(state.phase, WorkflowPhase::Idle);
        assert!(state.intake.current().is_none());
        assert!(state.result.is_none());
        assert!(state.editor.is_empty());
        assert_eq!(state.rate.remaining(), None);
        assert_eq!(state.progress_pct(), 0);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn intake_limit_comes_from_config() {
        let mut config = AppConfig::default();
        config.upload.max_size_mb = 1;
        let state = WorkflowState::new(&config);
        assert_eq!(state.intake.max_bytes(), 1024 * 1024);
    }

    #[test]
    fn shared_workflow_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedWorkflow>();
    }

    #[test]
    fn shared_workflow_can_be_cloned_and_mutated() {
        let state = new_shared_workflow(&AppConfig::default());
        let state2 = Arc::clone(&state);

        state.lock().unwrap().phase = WorkflowPhase::FileSelected;
        assert_eq!(state2.lock().unwrap().phase, WorkflowPhase::FileSelected);
    }
}
