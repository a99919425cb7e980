//! Workflow controller module — the orchestration core.
//!
//! This module wires file intake, the transcription session, the segment
//! editor, quota tracking and export coordination into one state machine,
//! and exposes the shared state that a UI layer reads.
//!
//! # Architecture
//!
//! ```text
//! WorkflowCommand (mpsc)                 JobSettled (internal mpsc)
//!        │                                      ▲
//!        ▼                                      │
//! WorkflowController::run()  ← async tokio task │
//!        │                                      │
//!        ├─ SelectFile  → FileIntake, bump generation
//!        ├─ Transcribe  → TranscriptionSession::start ──▶ tokio::spawn ─┘
//!        ├─ EditSegment → SegmentEditor
//!        ├─ Download    → ExportCoordinator → DownloadSink
//!        └─ Burn        → ExportCoordinator::start_burn ─▶ tokio::spawn ─┘
//!
//! SharedWorkflow (Arc<Mutex<WorkflowState>>) ←── read by the UI layer
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use autosub::backend::HttpBackend;
//! use autosub::config::AppConfig;
//! use autosub::export::DirSink;
//! use autosub::lang::Language;
//! use autosub::media::MediaFile;
//! use autosub::workflow::{new_shared_workflow, WorkflowCommand, WorkflowController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!     let state = new_shared_workflow(&config);
//!
//!     let backend = Arc::new(HttpBackend::from_config(&config.backend));
//!     let sink = Arc::new(DirSink::new(config.export.resolved_download_dir()));
//!
//!     let controller =
//!         WorkflowController::new(state.clone(), backend, sink, &config);
//!
//!     let (tx, rx) = mpsc::channel(16);
//!     tokio::spawn(controller.run(rx));
//!
//!     // The UI layer sends commands and polls `state` for phase/progress.
//!     let file = MediaFile::new("talk.mp3", "audio/mpeg", std::fs::read("talk.mp3").unwrap());
//!     tx.send(WorkflowCommand::SelectFile(file)).await.unwrap();
//!     tx.send(WorkflowCommand::Transcribe { language: Language::Auto }).await.unwrap();
//! }
//! ```

pub mod runner;
pub mod session;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{WorkflowCommand, WorkflowController, BURN_FAILED_NOTICE, QUOTA_NOTICE};
pub use session::{JobOutcome, JobSettled, TranscriptionSession};
pub use state::{new_shared_workflow, SharedWorkflow, WorkflowPhase, WorkflowState};
