//! Frame boundary detection inside the working buffer.
//!
//! A frame spans from one marker to the next. The synchronizer keeps the
//! buffer aligned so that, whenever a marker is present, it sits at offset 0:
//!
//! ```text
//! before:  ..garbage.. MARKER payload MARKER payload...
//!                      ^start         ^end
//! after:   MARKER payload MARKER payload...
//!          ^0             ^end - start
//! ```
//!
//! Markers are trusted at face value. A byte run inside a payload that passes
//! the pattern's checks splits the frame there.

use super::frame_buffer::WorkingBuffer;
use super::pattern::SyncPattern;

/// Candidate frame inside the working buffer.
///
/// `None` marks a boundary that has not been found yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    /// Offset of the frame's marker.
    pub start: Option<usize>,
    /// Offset of the following marker (exclusive end of the frame).
    pub end: Option<usize>,
}

impl FrameRange {
    /// No marker in the buffer at all.
    pub const NO_SYNC: FrameRange = FrameRange {
        start: None,
        end: None,
    };

    /// Create a range with both boundaries known.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Check if this is a complete frame no longer than `max`.
    #[inline]
    pub fn is_valid(&self, max: usize) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end > start && end - start <= max,
            _ => false,
        }
    }

    /// `(start, end)` if the range is valid for `max`.
    #[inline]
    pub fn bounds(&self, max: usize) -> Option<(usize, usize)> {
        if self.is_valid(max) {
            self.start.zip(self.end)
        } else {
            None
        }
    }

    /// Frame length, when both ends are known.
    pub fn span(&self) -> Option<usize> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}

/// Result of [`Synchronizer::compute_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synced {
    /// Range relative to the (possibly realigned) buffer.
    pub range: FrameRange,
    /// Bytes discarded in front of the first marker.
    pub skipped: usize,
}

/// Scans the working buffer for markers of one codec.
#[derive(Debug, Clone)]
pub struct Synchronizer<P> {
    pattern: P,
}

impl<P: SyncPattern> Synchronizer<P> {
    /// Create a synchronizer for `pattern`.
    pub fn new(pattern: P) -> Self {
        Self { pattern }
    }

    /// The marker pattern in use.
    #[inline]
    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    /// Length of the marker in bytes.
    #[inline]
    pub fn marker_len(&self) -> usize {
        self.pattern.marker_len()
    }

    /// First marker offset at or after `from`.
    #[inline]
    pub fn find_marker(&self, window: &[u8], from: usize) -> Option<usize> {
        self.pattern.find(window, from)
    }

    /// Determine the current candidate frame.
    ///
    /// If the first marker is not at offset 0, the bytes before it are
    /// evicted and the returned range is renormalized to start at 0.
    pub fn compute_range(&self, buffer: &mut WorkingBuffer) -> Synced {
        let window = buffer.as_slice();
        let Some(start) = self.find_marker(window, 0) else {
            tracing::debug!(buffered = window.len(), "no sync word in buffer");
            return Synced {
                range: FrameRange::NO_SYNC,
                skipped: 0,
            };
        };
        let end = self.find_marker(window, start + self.marker_len());

        if start > 0 {
            tracing::debug!(start, "moving buffer to sync word");
            buffer.evict(start);
        }

        let range = FrameRange {
            start: Some(0),
            end: end.and_then(|end| end.checked_sub(start)),
        };
        tracing::debug!(?range, "frame range");

        Synced {
            range,
            skipped: start,
        }
    }
}
