//! `SubtitleBackend` trait and the `HttpBackend` implementation.
//!
//! The backend exposes two slow multipart endpoints: `POST /transcribe`
//! (media file + language → segments and rendered SRT/VTT payloads) and
//! `POST /burn` (media file + SRT text → re-encoded video bytes).  Both
//! carry quota headers on every response and use 429 to refuse calls once
//! the daily quota is spent.
//!
//! All transport failures are folded into [`BackendOutcome::Failed`] here so
//! callers handle exactly three branches and never see a raw `reqwest`
//! error.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};

use crate::config::BackendConfig;
use crate::lang::Language;
use crate::media::MediaFile;
use crate::ratelimit::RateLimitTracker;

use super::types::{BackendOutcome, ResponseMeta, TranscribeResponse};

// ---------------------------------------------------------------------------
// SubtitleBackend trait
// ---------------------------------------------------------------------------

/// Async trait for the remote transcription/burn service.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn SubtitleBackend>`).
#[async_trait]
pub trait SubtitleBackend: Send + Sync {
    /// Submit a media file for transcription.
    async fn transcribe(
        &self,
        file: &MediaFile,
        language: Language,
    ) -> BackendOutcome<TranscribeResponse>;

    /// Submit the original media file plus an SRT payload for server-side
    /// hard-subtitle compositing.  Success yields the re-encoded video bytes.
    async fn burn(&self, file: &MediaFile, srt: &str) -> BackendOutcome<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// Talks to the real backend over HTTP with `reqwest`.
///
/// All connection details come from [`BackendConfig`]; nothing is hardcoded.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build an `HttpBackend` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Multipart part carrying the media file bytes.
    fn media_part(file: &MediaFile) -> Part {
        let part = Part::bytes(file.bytes().to_vec()).file_name(file.name().to_owned());
        // An unparseable MIME string just goes out without a content type.
        match part.mime_str(file.mime()) {
            Ok(part) => part,
            Err(_) => Part::bytes(file.bytes().to_vec()).file_name(file.name().to_owned()),
        }
    }
}

#[async_trait]
impl SubtitleBackend for HttpBackend {
    async fn transcribe(
        &self,
        file: &MediaFile,
        language: Language,
    ) -> BackendOutcome<TranscribeResponse> {
        let form = Form::new()
            .part("file", Self::media_part(file))
            .text("language", language.code());

        let url = format!("{}/transcribe", self.base_url);
        log::debug!("backend: POST {url} ({} bytes, language={language})", file.size());

        let response = match self.client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                return BackendOutcome::Failed {
                    reason: e.to_string(),
                    meta: ResponseMeta::default(),
                }
            }
        };

        let meta = parse_meta(response.headers());
        let status = response.status();

        if RateLimitTracker::is_exhausted(status.as_u16()) {
            return BackendOutcome::RateLimited { meta };
        }
        if !status.is_success() {
            return BackendOutcome::Failed {
                reason: format!("transcribe returned HTTP {status}"),
                meta,
            };
        }

        match response.json::<TranscribeResponse>().await {
            Ok(value) => BackendOutcome::Success { value, meta },
            Err(e) => BackendOutcome::Failed {
                reason: format!("malformed transcribe response: {e}"),
                meta,
            },
        }
    }

    async fn burn(&self, file: &MediaFile, srt: &str) -> BackendOutcome<Vec<u8>> {
        let form = Form::new()
            .part("file", Self::media_part(file))
            .text("srt", srt.to_owned());

        let url = format!("{}/burn", self.base_url);
        log::debug!("backend: POST {url} ({} bytes)", file.size());

        let response = match self.client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                return BackendOutcome::Failed {
                    reason: e.to_string(),
                    meta: ResponseMeta::default(),
                }
            }
        };

        let meta = parse_meta(response.headers());
        let status = response.status();

        if RateLimitTracker::is_exhausted(status.as_u16()) {
            return BackendOutcome::RateLimited { meta };
        }
        if !status.is_success() {
            return BackendOutcome::Failed {
                reason: format!("burn returned HTTP {status}"),
                meta,
            };
        }

        match response.bytes().await {
            Ok(bytes) => BackendOutcome::Success {
                value: bytes.to_vec(),
                meta,
            },
            Err(e) => BackendOutcome::Failed {
                reason: format!("failed to read burned video body: {e}"),
                meta,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

/// Extract quota metadata from response headers.
///
/// Parsed on every response regardless of status — an exhaustion response
/// still reports `remaining: 0`.
fn parse_meta(headers: &HeaderMap) -> ResponseMeta {
    ResponseMeta {
        remaining: header_u32(headers, "x-ratelimit-remaining"),
        limit: header_u32(headers, "x-ratelimit-limit"),
    }
}

/// A missing header or a non-numeric value (the backend sends `"?"` on some
/// paths) both come back as `None`.
fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// MockBackend  (test double)
// ---------------------------------------------------------------------------

/// Scripted backend used by workflow tests.
///
/// Returns pre-configured outcomes, optionally after a delay so tests can
/// interleave commands with an outstanding request.
#[cfg(test)]
pub struct MockBackend {
    pub transcribe_outcome: BackendOutcome<TranscribeResponse>,
    pub burn_outcome: BackendOutcome<Vec<u8>>,
    pub delay: Option<std::time::Duration>,
    pub transcribe_calls: std::sync::atomic::AtomicU32,
    pub burn_calls: std::sync::atomic::AtomicU32,
}

#[cfg(test)]
impl Default for MockBackend {
    fn default() -> Self {
        Self {
            transcribe_outcome: BackendOutcome::Failed {
                reason: "no transcribe outcome scripted".into(),
                meta: ResponseMeta::default(),
            },
            burn_outcome: BackendOutcome::Failed {
                reason: "no burn outcome scripted".into(),
                meta: ResponseMeta::default(),
            },
            delay: None,
            transcribe_calls: std::sync::atomic::AtomicU32::new(0),
            burn_calls: std::sync::atomic::AtomicU32::new(0),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SubtitleBackend for MockBackend {
    async fn transcribe(
        &self,
        _file: &MediaFile,
        _language: Language,
    ) -> BackendOutcome<TranscribeResponse> {
        self.transcribe_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.transcribe_outcome.clone()
    }

    async fn burn(&self, _file: &MediaFile, _srt: &str) -> BackendOutcome<Vec<u8>> {
        self.burn_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.burn_outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn meta_parses_both_quota_headers() {
        let meta = parse_meta(&headers(&[
            ("x-ratelimit-remaining", "3"),
            ("x-ratelimit-limit", "5"),
        ]));
        assert_eq!(meta.remaining, Some(3));
        assert_eq!(meta.limit, Some(5));
    }

    #[test]
    fn meta_is_empty_when_headers_are_absent() {
        assert_eq!(parse_meta(&HeaderMap::new()), ResponseMeta::default());
    }

    #[test]
    fn placeholder_header_value_parses_as_absent() {
        // The backend sends "?" on paths where it cannot compute the count.
        let meta = parse_meta(&headers(&[
            ("x-ratelimit-remaining", "?"),
            ("x-ratelimit-limit", "5"),
        ]));
        assert_eq!(meta.remaining, None);
        assert_eq!(meta.limit, Some(5));
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let backend = HttpBackend::from_config(&BackendConfig {
            base_url: "http://127.0.0.1:8000/".into(),
            ..BackendConfig::default()
        });
        assert_eq!(backend.base_url, "http://127.0.0.1:8000");
    }
}
