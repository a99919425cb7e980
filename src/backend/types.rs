//! Wire types for the subtitle backend.
//!
//! The backend's JSON is richer than what the core needs (per-word timing,
//! token probabilities, …); serde drops the unknown fields and keeps only
//! what the workflow consumes.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// One subtitle cue as returned by `/transcribe`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentDto {
    /// Cue start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// Cue end time in seconds.
    #[serde(default)]
    pub end: f64,
    pub text: String,
}

/// Successful `/transcribe` response.
///
/// `srt` and `vtt` are fully rendered subtitle payloads reflecting the
/// segments at response time; the core treats them as immutable snapshots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscribeResponse {
    /// Detected (or requested) language code.
    #[serde(default)]
    pub language: Option<String>,
    /// Full transcript as one string.
    #[serde(default)]
    pub text: String,
    /// Ordered subtitle cues.
    pub segments: Vec<SegmentDto>,
    /// SubRip rendering of the segments.
    pub srt: String,
    /// WebVTT rendering of the segments.
    pub vtt: String,
}

// ---------------------------------------------------------------------------
// ResponseMeta
// ---------------------------------------------------------------------------

/// Quota metadata carried in response headers.
///
/// Present on any response when the backend tracks quota; either field is
/// `None` when its header was missing or unparseable (the backend sends
/// `"?"` on some paths).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// `X-RateLimit-Remaining` — uses left in the current period.
    pub remaining: Option<u32>,
    /// `X-RateLimit-Limit` — the period's quota ceiling.
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// BackendOutcome
// ---------------------------------------------------------------------------

/// Tagged outcome of a backend call.
///
/// Every call site matches all three branches; raw transport errors never
/// escape the backend client.  `meta` is attached to every branch because
/// even a 429 can carry a remaining count (typically 0).
#[derive(Debug, Clone)]
pub enum BackendOutcome<T> {
    /// 2xx with a usable body.
    Success { value: T, meta: ResponseMeta },
    /// 429 — quota exhausted for the current period.
    RateLimited { meta: ResponseMeta },
    /// Any other non-2xx status, transport failure, or malformed body.
    Failed { reason: String, meta: ResponseMeta },
}

impl<T> BackendOutcome<T> {
    /// Quota metadata of the response, whatever its outcome.
    pub fn meta(&self) -> ResponseMeta {
        match self {
            BackendOutcome::Success { meta, .. }
            | BackendOutcome::RateLimited { meta }
            | BackendOutcome::Failed { meta, .. } => *meta,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// The response shape produced by the real backend, including fields the
    /// core ignores (`id`, `avg_logprob`, …).
    const BACKEND_JSON: &str = r#"{
        "language": "en",
        "text": " hello world",
        "segments": [
            {"id": 0, "start": 0.0, "end": 1.0, "text": "hello", "avg_logprob": -0.2},
            {"id": 1, "start": 1.0, "end": 2.0, "text": "world", "avg_logprob": -0.3}
        ],
        "srt": "1\n00:00:00,000 --> 00:00:01,000\nhello\n",
        "vtt": "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nhello\n"
    }"#;

    #[test]
    fn transcribe_response_parses_backend_json() {
        let resp: TranscribeResponse = serde_json::from_str(BACKEND_JSON).unwrap();

        assert_eq!(resp.language.as_deref(), Some("en"));
        assert_eq!(resp.segments.len(), 2);
        assert_eq!(resp.segments[0].text, "hello");
        assert_eq!(resp.segments[1].text, "world");
        assert!((resp.segments[1].start - 1.0).abs() < f64::EPSILON);
        assert!(resp.srt.starts_with('1'));
        assert!(resp.vtt.starts_with("WEBVTT"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let resp: TranscribeResponse =
            serde_json::from_str(r#"{"segments": [], "srt": "", "vtt": ""}"#).unwrap();
        assert!(resp.language.is_none());
        assert!(resp.text.is_empty());
    }

    #[test]
    fn meta_is_reachable_from_every_branch() {
        let meta = ResponseMeta {
            remaining: Some(3),
            limit: Some(5),
        };

        let success: BackendOutcome<()> = BackendOutcome::Success { value: (), meta };
        let limited: BackendOutcome<()> = BackendOutcome::RateLimited { meta };
        let failed: BackendOutcome<()> = BackendOutcome::Failed {
            reason: "boom".into(),
            meta,
        };

        assert_eq!(success.meta(), meta);
        assert_eq!(limited.meta(), meta);
        assert_eq!(failed.meta(), meta);
    }
}
