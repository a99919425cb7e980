//! Transcription session — dispatches the transcribe job and owns the
//! progress estimator's lifecycle policy.
//!
//! A dispatched job is fire-and-forget from the caller's perspective: there
//! is no way to abort it server-side once sent.  What the controller *can*
//! do is refuse to apply a settlement that belongs to a superseded file
//! selection, so every job is tagged with the generation current at
//! dispatch time and settles by sending a [`JobSettled`] event back over a
//! channel.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::{BackendOutcome, SubtitleBackend, TranscribeResponse};
use crate::config::ProgressConfig;
use crate::lang::Language;
use crate::media::MediaFile;
use crate::progress::{ProgressCell, ProgressHandle};

// ---------------------------------------------------------------------------
// Job settlement events
// ---------------------------------------------------------------------------

/// Outcome of a finished backend job.
#[derive(Debug)]
pub enum JobOutcome {
    Transcribe(BackendOutcome<TranscribeResponse>),
    Burn(BackendOutcome<Vec<u8>>),
}

/// Sent by a job task when its backend call settles.
///
/// `generation` is the file-selection generation captured at dispatch; the
/// controller discards settlements whose generation is stale, which is what
/// prevents a late response from overwriting newer state.
#[derive(Debug)]
pub struct JobSettled {
    pub generation: u64,
    pub outcome: JobOutcome,
}

// ---------------------------------------------------------------------------
// TranscriptionSession
// ---------------------------------------------------------------------------

/// Dispatches transcribe jobs and starts their progress ramps.
pub struct TranscriptionSession {
    backend: Arc<dyn SubtitleBackend>,
    progress_config: ProgressConfig,
}

impl TranscriptionSession {
    pub fn new(backend: Arc<dyn SubtitleBackend>, progress_config: ProgressConfig) -> Self {
        Self {
            backend,
            progress_config,
        }
    }

    /// Dispatch a transcribe job and start its synthetic progress ramp.
    ///
    /// The returned [`ProgressHandle`] must be consumed exactly once when
    /// the job settles or is preempted; the controller owns that decision.
    pub fn start(
        &self,
        generation: u64,
        file: MediaFile,
        language: Language,
        progress: ProgressCell,
        events: mpsc::Sender<JobSettled>,
    ) -> ProgressHandle {
        let handle = ProgressHandle::start(progress, &self.progress_config);

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let outcome = backend.transcribe(&file, language).await;
            // The controller may already be gone; nothing to do then.
            let _ = events
                .send(JobSettled {
                    generation,
                    outcome: JobOutcome::Transcribe(outcome),
                })
                .await;
        });

        handle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
