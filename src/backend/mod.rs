//! Subtitle backend client module.
//!
//! This module provides:
//! * [`SubtitleBackend`] — async trait implemented by all backend clients.
//! * [`HttpBackend`] — `reqwest` multipart client for the real service.
//! * [`BackendOutcome`] — tagged success / rate-limited / failed outcome.
//! * [`TranscribeResponse`] / [`SegmentDto`] — `/transcribe` response body.
//! * [`ResponseMeta`] — quota headers attached to every response.

pub mod client;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{HttpBackend, SubtitleBackend};
pub use types::{BackendOutcome, ResponseMeta, SegmentDto, TranscribeResponse};

// test-only re-export so workflow tests can import the scripted backend
// without `use autosub::backend::client::MockBackend`.
#[cfg(test)]
pub use client::MockBackend;
