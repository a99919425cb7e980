//! Media file intake — validation and custody of the user's selection.
//!
//! [`MediaFile`] is an opaque handle to the selected binary content.  The
//! core never decodes it; it only needs the size (for the upload limit),
//! the MIME type (video vs. audio affects nothing here but is exposed for
//! the UI's preview decision), and the raw bytes for the multipart upload.
//!
//! [`FileIntake`] enforces the upload size limit and holds the currently
//! selected file.  It is purely synchronous; discarding stale transcription
//! state on re-selection is the controller's job.

use std::sync::Arc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

/// Coarse MIME category of a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    /// Anything else — still uploadable; the backend decides what to do.
    Other,
}

// ---------------------------------------------------------------------------
// MediaFile
// ---------------------------------------------------------------------------

/// An opaque handle to user-selected media content.
///
/// Cheap to clone: the payload is shared behind an `Arc`, so a clone handed
/// to an in-flight upload task does not copy the file bytes.
#[derive(Debug, Clone)]
pub struct MediaFile {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl MediaFile {
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Original file name, forwarded to the backend in the multipart part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full MIME type as reported by the picker (e.g. `"video/mp4"`).
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Coarse category derived from the MIME type prefix.
    pub fn kind(&self) -> MediaKind {
        if self.mime.starts_with("video/") {
            MediaKind::Video
        } else if self.mime.starts_with("audio/") {
            MediaKind::Audio
        } else {
            MediaKind::Other
        }
    }
}

// ---------------------------------------------------------------------------
// IntakeError
// ---------------------------------------------------------------------------

/// Local validation failures when selecting a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// The candidate exceeds the upload size limit.  Nothing was mutated.
    #[error("file is {size} bytes, which exceeds the {max} byte upload limit")]
    FileTooLarge { size: u64, max: u64 },
}

// ---------------------------------------------------------------------------
// FileIntake
// ---------------------------------------------------------------------------

/// Validates candidates against the upload limit and holds the current
/// selection.
#[derive(Debug, Clone)]
pub struct FileIntake {
    max_bytes: u64,
    current: Option<MediaFile>,
}

impl FileIntake {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            current: None,
        }
    }

    /// Accept or reject a candidate file.
    ///
    /// Rejection leaves the previously held file untouched.  Acceptance
    /// replaces it wholesale.
    pub fn select(&mut self, candidate: MediaFile) -> Result<(), IntakeError> {
        if candidate.size() > self.max_bytes {
            return Err(IntakeError::FileTooLarge {
                size: candidate.size(),
                max: self.max_bytes,
            });
        }
        self.current = Some(candidate);
        Ok(())
    }

    /// The currently held file, if any.
    pub fn current(&self) -> Option<&MediaFile> {
        self.current.as_ref()
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of(name: &str, mime: &str, len: usize) -> MediaFile {
        MediaFile::new(name, mime, vec![0u8; len])
    }

    #[test]
    fn oversized_candidate_is_rejected_without_mutation() {
        let mut intake = FileIntake::new(16);
        intake.select(file_of("ok.mp4", "video/mp4", 10)).unwrap();

        let err = intake
            .select(file_of("big.mp4", "video/mp4", 17))
            .unwrap_err();

        assert_eq!(err, IntakeError::FileTooLarge { size: 17, max: 16 });
        // The previously held file survives a rejected candidate.
        assert_eq!(intake.current().unwrap().name(), "ok.mp4");
    }

    #[test]
    fn candidate_at_exact_limit_is_accepted() {
        let mut intake = FileIntake::new(16);
        intake.select(file_of("edge.wav", "audio/wav", 16)).unwrap();
        assert_eq!(intake.current().unwrap().name(), "edge.wav");
    }

    #[test]
    fn acceptance_replaces_held_file_wholesale() {
        let mut intake = FileIntake::new(100);
        intake.select(file_of("a.mp4", "video/mp4", 10)).unwrap();
        intake.select(file_of("b.mp3", "audio/mpeg", 20)).unwrap();

        let held = intake.current().unwrap();
        assert_eq!(held.name(), "b.mp3");
        assert_eq!(held.size(), 20);
    }

    #[test]
    fn kind_is_derived_from_mime_prefix() {
        assert_eq!(file_of("v", "video/mp4", 1).kind(), MediaKind::Video);
        assert_eq!(file_of("a", "audio/wav", 1).kind(), MediaKind::Audio);
        assert_eq!(file_of("t", "text/plain", 1).kind(), MediaKind::Other);
    }

    #[test]
    fn clone_shares_payload() {
        let file = file_of("big.mp4", "video/mp4", 1024);
        let clone = file.clone();
        assert!(std::ptr::eq(file.bytes(), clone.bytes()));
    }
}
