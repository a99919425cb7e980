//! Remaining-quota bookkeeping from backend response metadata.
//!
//! The tracker is a pure observer: it mirrors what the server last reported
//! and never gates a request.  Exhaustion is only ever discovered from a
//! response status, not from a locally tracked zero.

use crate::backend::ResponseMeta;

/// HTTP status the backend uses to signal quota exhaustion.
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

// ---------------------------------------------------------------------------
// RateLimitTracker
// ---------------------------------------------------------------------------

/// Mirrors the backend's remaining-quota counter for UI display.
///
/// `remaining` is `None` until the first response carrying the quota header
/// arrives.  The server is authoritative: every observed header value
/// overwrites the tracked one, and the counter is never decremented locally
/// in anticipation of a call.
#[derive(Debug, Clone)]
pub struct RateLimitTracker {
    remaining: Option<u32>,
    daily_quota: u32,
}

impl RateLimitTracker {
    /// `daily_quota` is the display-only ceiling ("N of `daily_quota` uses
    /// left"); it may be replaced by the backend's own limit header.
    pub fn new(daily_quota: u32) -> Self {
        Self {
            remaining: None,
            daily_quota,
        }
    }

    /// Fold a response's quota metadata into the tracker.
    ///
    /// Absent headers leave the tracked values untouched; present ones
    /// overwrite them regardless of the response status.
    pub fn observe(&mut self, meta: &ResponseMeta) {
        if let Some(remaining) = meta.remaining {
            self.remaining = Some(remaining);
        }
        if let Some(limit) = meta.limit {
            self.daily_quota = limit;
        }
    }

    /// Uses left in the current period, as last reported by the server.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Quota ceiling for display next to [`remaining`](Self::remaining).
    pub fn daily_quota(&self) -> u32 {
        self.daily_quota
    }

    /// Whether a response status signals quota exhaustion.
    ///
    /// Independent of any header value — a 429 is exhaustion even when no
    /// remaining count was attached.
    pub fn is_exhausted(status: u16) -> bool {
        status == STATUS_TOO_MANY_REQUESTS
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
