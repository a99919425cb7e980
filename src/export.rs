//! Export coordination — static subtitle downloads and the burn job.
//!
//! Static exports (`subtitles.srt` / `subtitles.vtt`) come straight from the
//! rendered payloads stored in the transcription result.  They are snapshots
//! from response time, not re-rendered from the editor's current text, so
//! repeated downloads with no intervening transcription are byte-identical.
//!
//! The burn export is server-executed: the original media file and the SRT
//! payload go back to the backend, which composites the subtitles into the
//! video frames and returns new media bytes, delivered as `subtitled.mp4`.
//!
//! [`DownloadSink`] is the seam to whatever "download" means in the host
//! environment; the library ships [`DirSink`], which writes artifacts into a
//! directory.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::backend::{SubtitleBackend, TranscribeResponse};
use crate::media::MediaFile;
use crate::workflow::session::{JobOutcome, JobSettled};

// ---------------------------------------------------------------------------
// SubtitleFormat
// ---------------------------------------------------------------------------

/// Static subtitle export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// SubRip — `subtitles.srt`.
    Srt,
    /// WebVTT — `subtitles.vtt`.
    Vtt,
}

impl SubtitleFormat {
    /// File name the artifact is downloaded as.
    pub fn file_name(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "subtitles.srt",
            SubtitleFormat::Vtt => "subtitles.vtt",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "application/x-subrip",
            SubtitleFormat::Vtt => "text/vtt",
        }
    }
}

/// File name of the burned video artifact.
pub const BURNED_FILE_NAME: &str = "subtitled.mp4";

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// A downloadable payload produced by an export operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Failures while handing an artifact to the download sink.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to deliver {name}: {source}")]
    Delivery {
        name: String,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// DownloadSink
// ---------------------------------------------------------------------------

/// Receives finished artifacts — the stand-in for a browser download.
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, artifact: &Artifact) -> io::Result<()>;
}

/// Writes artifacts into a directory, creating it on first use.
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirSink {
    fn deliver(&self, artifact: &Artifact) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.name);
        std::fs::write(&path, &artifact.bytes)?;
        log::info!("export: wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ExportCoordinator
// ---------------------------------------------------------------------------

/// Produces downloadable artifacts from the current result and drives the
/// server-executed burn job.
pub struct ExportCoordinator {
    backend: Arc<dyn SubtitleBackend>,
    sink: Arc<dyn DownloadSink>,
}

impl ExportCoordinator {
    pub fn new(backend: Arc<dyn SubtitleBackend>, sink: Arc<dyn DownloadSink>) -> Self {
        Self { backend, sink }
    }

    /// Deliver the stored rendering of `format` through the sink.
    pub fn download_static(
        &self,
        result: &TranscribeResponse,
        format: SubtitleFormat,
    ) -> Result<(), ExportError> {
        let payload = match format {
            SubtitleFormat::Srt => &result.srt,
            SubtitleFormat::Vtt => &result.vtt,
        };
        let artifact = Artifact {
            name: format.file_name().to_owned(),
            media_type: format.media_type().to_owned(),
            bytes: payload.clone().into_bytes(),
        };
        self.deliver(artifact)
    }

    /// Deliver the backend's burned video bytes as `subtitled.mp4`.
    pub fn deliver_burned(&self, bytes: Vec<u8>) -> Result<(), ExportError> {
        self.deliver(Artifact {
            name: BURNED_FILE_NAME.to_owned(),
            media_type: "video/mp4".to_owned(),
            bytes,
        })
    }

    /// Dispatch a burn job; its settlement arrives on `events` tagged with
    /// `generation` so stale completions can be discarded.
    pub fn start_burn(
        &self,
        generation: u64,
        file: MediaFile,
        srt: String,
        events: mpsc::Sender<JobSettled>,
    ) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let outcome = backend.burn(&file, &srt).await;
            // The controller may already be gone; nothing to do then.
            let _ = events
                .send(JobSettled {
                    generation,
                    outcome: JobOutcome::Burn(outcome),
                })
                .await;
        });
    }

    fn deliver(&self, artifact: Artifact) -> Result<(), ExportError> {
        self.sink
            .deliver(&artifact)
            .map_err(|source| ExportError::Delivery {
                name: artifact.name.clone(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// MemorySink  (test double)
// ---------------------------------------------------------------------------

/// Captures delivered artifacts for assertions.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemorySink(std::sync::Mutex<Vec<Artifact>>);

#[cfg(test)]
impl MemorySink {
    pub(crate) fn artifacts(&self) -> Vec<Artifact> {
        self.0.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl DownloadSink for MemorySink {
    fn deliver(&self, artifact: &Artifact) -> io::Result<()> {
        self.0.lock().unwrap().push(artifact.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
