//! In-memory subtitle segment collection with point edits.
//!
//! The editor is re-seeded in bulk when a transcription response arrives and
//! cleared when a new file is selected.  Ordering is fixed by the backend;
//! the text of a cue is the only thing the editor may change.  An edit to a
//! non-existent index fails loudly instead of being silently dropped.

use thiserror::Error;

use crate::backend::SegmentDto;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One timed subtitle cue.
///
/// `start`/`end` are carried opaquely from the backend; only `text` is
/// mutable through the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<SegmentDto> for Segment {
    fn from(dto: SegmentDto) -> Self {
        Self {
            start: dto.start,
            end: dto.end,
            text: dto.text,
        }
    }
}

// ---------------------------------------------------------------------------
// EditError
// ---------------------------------------------------------------------------

/// Rejected segment edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The index does not name an existing segment.
    #[error("segment index {index} is out of bounds ({len} segments)")]
    OutOfBounds { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// SegmentEditor
// ---------------------------------------------------------------------------

/// Ordered collection of segments supporting single-cue text edits.
///
/// Never reorders, inserts, or deletes; the sequence always mirrors the
/// latest transcription response.
#[derive(Debug, Clone, Default)]
pub struct SegmentEditor {
    segments: Vec<Segment>,
}

impl SegmentEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection from a fresh transcription response.
    pub fn reseed(&mut self, segments: impl IntoIterator<Item = Segment>) {
        self.segments = segments.into_iter().collect();
    }

    /// Overwrite the text of exactly one segment.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        let len = self.segments.len();
        match self.segments.get_mut(index) {
            Some(segment) => {
                segment.text = text.into();
                Ok(())
            }
            None => Err(EditError::OutOfBounds { index, len }),
        }
    }

    /// Read access for export and presentation, in backend order.
    pub fn all(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Discard all segments (a new file selection invalidates them).
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
