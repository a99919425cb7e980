//! autosub — client-side orchestration core for an auto-subtitle workflow.
//!
//! The library drives the full select → transcribe → edit → export loop
//! against a remote subtitle backend, without doing any media work itself:
//!
//! * [`media`] — upload validation and custody of the selected file.
//! * [`lang`] — supported transcription languages and the auto-detect
//!   sentinel.
//! * [`backend`] — the HTTP contract: multipart `/transcribe` and `/burn`,
//!   quota headers, and the tagged success / rate-limited / failed outcome.
//! * [`ratelimit`] — remaining-quota bookkeeping from response metadata.
//! * [`segment`] — the editable, bounds-checked subtitle cue collection.
//! * [`progress`] — the synthetic wall-clock progress ramp.
//! * [`export`] — static SRT/VTT downloads and the server-executed burn.
//! * [`workflow`] — the controller state machine tying it all together,
//!   plus the shared state a UI layer reads.
//! * [`config`] — TOML-backed settings and platform paths.
//!
//! See [`workflow`] for the quick-start wiring example.

pub mod backend;
pub mod config;
pub mod export;
pub mod lang;
pub mod media;
pub mod progress;
pub mod ratelimit;
pub mod segment;
pub mod workflow;
