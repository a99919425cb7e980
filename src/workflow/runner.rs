//! Workflow controller — drives the select → transcribe → edit → export
//! state machine.
//!
//! [`WorkflowController`] owns the [`SharedWorkflow`] and responds to
//! [`WorkflowCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Control flow
//!
//! ```text
//! WorkflowCommand::SelectFile
//!   └─▶ intake check → bump generation, discard result/segments  [FileSelected]
//!
//! WorkflowCommand::Transcribe
//!   └─▶ spawn transcribe job + progress ramp                     [Transcribing]
//!         settle: Success      → seed editor, force 100          [Ready]
//!                 RateLimited  → quota notice                    [FileSelected]
//!                 Failed       → generic notice                  [FileSelected]
//!
//! WorkflowCommand::Burn  (requires Ready)
//!   └─▶ spawn burn job                                           [Burning]
//!         settle: Success      → deliver subtitled.mp4           [Ready]
//!                 RateLimited / Failed → notice                  [Ready]
//! ```
//!
//! Backend jobs settle through an internal event channel, so the command
//! loop stays responsive while a request is outstanding.  A dispatched
//! request cannot be aborted; instead every job carries the file-selection
//! generation current at dispatch, and a settlement whose generation is
//! stale is discarded.  Selecting a new file mid-flight therefore resets
//! local state immediately and the late response lands in the void.
//!
//! Every settlement — success, rate-limited or failed — first routes its
//! quota metadata through the [`RateLimitTracker`].
//!
//! [`RateLimitTracker`]: crate::ratelimit::RateLimitTracker

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::{BackendOutcome, SubtitleBackend, TranscribeResponse};
use crate::config::AppConfig;
use crate::export::{DownloadSink, ExportCoordinator, SubtitleFormat};
use crate::lang::Language;
use crate::media::MediaFile;
use crate::progress::ProgressHandle;
use crate::segment::Segment;

use super::session::{JobOutcome, JobSettled, TranscriptionSession};
use super::state::{SharedWorkflow, WorkflowPhase};

/// Blocking notice shown when the backend refuses a call with 429.
pub const QUOTA_NOTICE: &str = "Daily limit reached. Try again tomorrow.";

/// Notice prefix for a burn request that failed for any other reason.
pub const BURN_FAILED_NOTICE: &str = "Failed to burn subtitles";

// ---------------------------------------------------------------------------
// WorkflowCommand
// ---------------------------------------------------------------------------

/// User actions the controller responds to.
#[derive(Debug)]
pub enum WorkflowCommand {
    /// A file was picked or dropped.  Permitted in any phase; acceptance
    /// discards the prior result and segments.
    SelectFile(MediaFile),
    /// Start transcription of the held file.
    Transcribe { language: Language },
    /// Overwrite the text of one segment.
    EditSegment { index: usize, text: String },
    /// Export the stored SRT or VTT snapshot through the download sink.
    Download(SubtitleFormat),
    /// Start the server-side burn of the held file with the result's SRT.
    Burn,
}

// ---------------------------------------------------------------------------
// WorkflowController
// ---------------------------------------------------------------------------

/// Drives the complete subtitle workflow for one session.
///
/// Create with [`WorkflowController::new`], then call [`run`](Self::run)
/// inside a tokio task.  `run` returns once the command channel closes and
/// no request is outstanding.
pub struct WorkflowController {
    state: SharedWorkflow,
    session: TranscriptionSession,
    exporter: ExportCoordinator,
    events_tx: mpsc::Sender<JobSettled>,
    events_rx: mpsc::Receiver<JobSettled>,
    /// Bumped on every accepted file selection; jobs dispatched under an
    /// older value settle into the void.
    generation: u64,
    /// Generation of the currently outstanding job, if any.  At most one
    /// backend request is in flight at a time.
    in_flight: Option<u64>,
    /// Ramp of the outstanding transcribe job; consumed exactly once.
    progress: Option<ProgressHandle>,
}

impl WorkflowController {
    /// Create a new controller.
    ///
    /// # Arguments
    ///
    /// * `state`   — shared session state (also read by the UI).
    /// * `backend` — subtitle service client (e.g. `HttpBackend`).
    /// * `sink`    — where exported artifacts are delivered (e.g. `DirSink`).
    /// * `config`  — progress ramp shape and other limits.
    pub fn new(
        state: SharedWorkflow,
        backend: Arc<dyn SubtitleBackend>,
        sink: Arc<dyn DownloadSink>,
        config: &AppConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(8);
        Self {
            state,
            session: TranscriptionSession::new(Arc::clone(&backend), config.progress.clone()),
            exporter: ExportCoordinator::new(backend, sink),
            events_tx,
            events_rx,
            generation: 0,
            in_flight: None,
            progress: None,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the controller until `commands` is closed and any outstanding
    /// request has settled.
    ///
    /// This is an `async fn` and should be spawned as a tokio task.
    pub async fn run(mut self, mut commands: mpsc::Receiver<WorkflowCommand>) {
        let mut commands_open = true;
        loop {
            tokio::select! {
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command),
                    None => commands_open = false,
                },
                Some(settled) = self.events_rx.recv(), if self.in_flight.is_some() => {
                    self.handle_settled(settled);
                }
            }
            if !commands_open && self.in_flight.is_none() {
                break;
            }
        }

        log::info!("workflow: command channel closed, controller shutting down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    fn handle_command(&mut self, command: WorkflowCommand) {
        match command {
            WorkflowCommand::SelectFile(candidate) => self.handle_select(candidate),
            WorkflowCommand::Transcribe { language } => self.handle_transcribe(language),
            WorkflowCommand::EditSegment { index, text } => self.handle_edit(index, text),
            WorkflowCommand::Download(format) => self.handle_download(format),
            WorkflowCommand::Burn => self.handle_burn(),
        }
    }

    /// Validate and adopt a new file; a fresh selection invalidates the
    /// previous result wherever the workflow stood.
    fn handle_select(&mut self, candidate: MediaFile) {
        let name = candidate.name().to_owned();

        let accepted = {
            let mut st = self.state.lock().unwrap();
            match st.intake.select(candidate) {
                Ok(()) => {
                    st.result = None;
                    st.editor.clear();
                    st.phase = WorkflowPhase::FileSelected;
                    st.error_message = None;
                    true
                }
                Err(e) => {
                    log::warn!("workflow: rejected {name}: {e}");
                    st.error_message = Some(e.to_string());
                    false
                }
            }
        };

        if accepted {
            // Supersede any outstanding request; its settlement is now stale.
            self.generation += 1;
            // Stop the old ramp before zeroing the cell so a late tick
            // cannot overwrite the reset.
            if let Some(handle) = self.progress.take() {
                handle.abandon();
            }
            self.state.lock().unwrap().progress.reset();
            log::debug!(
                "workflow: selected {name} → FileSelected (generation {})",
                self.generation
            );
        }
    }

    fn handle_transcribe(&mut self, language: Language) {
        if self.in_flight.is_some() {
            log::warn!("workflow: transcribe refused, a request is already outstanding");
            return;
        }

        let (file, cell) = {
            let mut st = self.state.lock().unwrap();
            if st.phase.is_busy() {
                log::warn!("workflow: transcribe refused in phase {}", st.phase.label());
                return;
            }
            let Some(file) = st.intake.current().cloned() else {
                log::warn!("workflow: transcribe refused, no file selected");
                return;
            };
            st.phase = WorkflowPhase::Transcribing;
            st.error_message = None;
            (file, st.progress.clone())
        };

        log::debug!(
            "workflow: transcribing {} ({} bytes, language={language})",
            file.name(),
            file.size()
        );

        let handle =
            self.session
                .start(self.generation, file, language, cell, self.events_tx.clone());
        self.progress = Some(handle);
        self.in_flight = Some(self.generation);
    }

    fn handle_edit(&mut self, index: usize, text: String) {
        let mut st = self.state.lock().unwrap();
        if let Err(e) = st.editor.set_text(index, text) {
            log::error!("workflow: {e}");
            st.error_message = Some(e.to_string());
        }
    }

    fn handle_download(&mut self, format: SubtitleFormat) {
        let result = self.state.lock().unwrap().result.clone();
        let Some(result) = result else {
            log::warn!("workflow: download refused, no transcription result yet");
            return;
        };
        if let Err(e) = self.exporter.download_static(&result, format) {
            log::error!("workflow: {e}");
            self.state.lock().unwrap().error_message = Some(e.to_string());
        }
    }

    fn handle_burn(&mut self) {
        if self.in_flight.is_some() {
            log::warn!("workflow: burn refused, a request is already outstanding");
            return;
        }

        let (file, srt) = {
            let mut st = self.state.lock().unwrap();
            if st.phase != WorkflowPhase::Ready {
                log::warn!("workflow: burn refused in phase {}", st.phase.label());
                return;
            }
            let Some(file) = st.intake.current().cloned() else {
                log::warn!("workflow: burn refused, no file held");
                return;
            };
            let Some(srt) = st.result.as_ref().map(|r| r.srt.clone()) else {
                log::warn!("workflow: burn refused, no result held");
                return;
            };
            st.phase = WorkflowPhase::Burning;
            st.error_message = None;
            (file, srt)
        };

        log::debug!("workflow: burning subtitles into {}", file.name());

        self.exporter
            .start_burn(self.generation, file, srt, self.events_tx.clone());
        self.in_flight = Some(self.generation);
    }

    // -----------------------------------------------------------------------
    // Settlement handlers
    // -----------------------------------------------------------------------

    fn handle_settled(&mut self, settled: JobSettled) {
        if self.in_flight == Some(settled.generation) {
            self.in_flight = None;
        }
        if settled.generation != self.generation {
            log::debug!(
                "workflow: discarding stale settlement from generation {} (now at {})",
                settled.generation,
                self.generation
            );
            return;
        }
        match settled.outcome {
            JobOutcome::Transcribe(outcome) => self.finish_transcribe(outcome),
            JobOutcome::Burn(outcome) => self.finish_burn(outcome),
        }
    }

    fn finish_transcribe(&mut self, outcome: BackendOutcome<TranscribeResponse>) {
        let progress = self.progress.take();
        let mut st = self.state.lock().unwrap();
        st.rate.observe(&outcome.meta());

        match outcome {
            BackendOutcome::Success { value, .. } => {
                st.editor
                    .reseed(value.segments.iter().cloned().map(Segment::from));
                st.result = Some(value);
                st.phase = WorkflowPhase::Ready;
                st.error_message = None;
                drop(st);
                if let Some(handle) = progress {
                    handle.finish();
                }
                log::debug!("workflow: transcription complete → Ready");
            }
            BackendOutcome::RateLimited { .. } => {
                st.phase = WorkflowPhase::FileSelected;
                st.error_message = Some(QUOTA_NOTICE.to_owned());
                drop(st);
                if let Some(handle) = progress {
                    handle.abandon();
                }
                log::warn!("workflow: transcription rate-limited → FileSelected");
            }
            BackendOutcome::Failed { reason, .. } => {
                st.phase = WorkflowPhase::FileSelected;
                st.error_message = Some(format!("Transcription failed: {reason}"));
                drop(st);
                if let Some(handle) = progress {
                    handle.abandon();
                }
                log::error!("workflow: transcription failed: {reason}");
            }
        }
    }

    /// A failed burn leaves the existing result untouched, so every
    /// settlement returns the workflow to `Ready`.
    fn finish_burn(&mut self, outcome: BackendOutcome<Vec<u8>>) {
        let mut st = self.state.lock().unwrap();
        st.rate.observe(&outcome.meta());
        st.phase = WorkflowPhase::Ready;

        match outcome {
            BackendOutcome::Success { value, .. } => {
                drop(st);
                match self.exporter.deliver_burned(value) {
                    Ok(()) => log::debug!("workflow: burn complete → Ready"),
                    Err(e) => {
                        log::error!("workflow: {e}");
                        self.state.lock().unwrap().error_message = Some(e.to_string());
                    }
                }
            }
            BackendOutcome::RateLimited { .. } => {
                st.error_message = Some(QUOTA_NOTICE.to_owned());
                log::warn!("workflow: burn rate-limited → Ready");
            }
            BackendOutcome::Failed { reason, .. } => {
                st.error_message = Some(format!("{BURN_FAILED_NOTICE}: {reason}"));
                log::error!("workflow: burn failed: {reason}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
