//! Synchronization marker patterns.
//!
//! A pattern recognizes the fixed-length marker that starts every frame of a
//! given codec. Besides plain byte sequences, the MPEG audio and ADTS patterns
//! check the header fields that follow the sync bits, so a random `0xFF` run
//! inside a payload is only accepted when it also looks like a real header:
//!
//! ```text
//! MPEG audio  FFF-E  vv ll p | bbbb ss x x | ...
//!             sync   ver lay   rate  freq
//! ADTS        FFF    v 00 p  | pp ffff x c | ...
//!             sync    layer=0   prof freq
//! ```

use serde::{Deserialize, Serialize};

/// Marker window examined by the codec patterns (the MPEG/ADTS fixed header prefix).
pub const CODEC_MARKER_LEN: usize = 4;

/// A codec-specific synchronization marker.
pub trait SyncPattern {
    /// Length of the marker in bytes.
    fn marker_len(&self) -> usize;

    /// Check whether `candidate` (exactly `marker_len()` bytes) is a marker.
    fn matches(&self, candidate: &[u8]) -> bool;

    /// Find the first marker starting at or after `from`.
    ///
    /// A marker must lie completely inside `window` to be reported.
    fn find(&self, window: &[u8], from: usize) -> Option<usize> {
        let len = self.marker_len();
        if len == 0 || window.len() < len {
            return None;
        }
        (from..=window.len() - len).find(|&pos| self.matches(&window[pos..pos + len]))
    }
}

/// Exact byte-sequence marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytePattern {
    bytes: Vec<u8>,
}

impl BytePattern {
    /// Create a pattern matching `bytes` verbatim.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The marker bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl SyncPattern for BytePattern {
    fn marker_len(&self) -> usize {
        self.bytes.len()
    }

    fn matches(&self, candidate: &[u8]) -> bool {
        candidate == self.bytes.as_slice()
    }
}

/// MPEG-1/2/2.5 audio frame sync (MP3 and friends).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mp3Sync;

impl SyncPattern for Mp3Sync {
    fn marker_len(&self) -> usize {
        CODEC_MARKER_LEN
    }

    fn matches(&self, h: &[u8]) -> bool {
        if h.len() < CODEC_MARKER_LEN || h[0] != 0xFF || h[1] & 0xE0 != 0xE0 {
            return false;
        }
        let version = (h[1] >> 3) & 0b11;
        let layer = (h[1] >> 1) & 0b11;
        let bitrate_index = h[2] >> 4;
        let sample_rate_index = (h[2] >> 2) & 0b11;

        // 01 version and 00 layer are reserved; bitrate 1111 and rate 11 are invalid
        version != 0b01 && layer != 0b00 && bitrate_index != 0x0F && sample_rate_index != 0b11
    }
}

/// AAC ADTS frame sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdtsSync;

/// Sampling-frequency indices 13..=15 are reserved/escape in ADTS.
const ADTS_MAX_FREQ_INDEX: u8 = 12;

impl SyncPattern for AdtsSync {
    fn marker_len(&self) -> usize {
        CODEC_MARKER_LEN
    }

    fn matches(&self, h: &[u8]) -> bool {
        if h.len() < CODEC_MARKER_LEN || h[0] != 0xFF {
            return false;
        }
        // 12 sync bits plus a zero layer field
        if h[1] & 0xF6 != 0xF0 {
            return false;
        }
        (h[2] >> 2) & 0x0F <= ADTS_MAX_FREQ_INDEX
    }
}

/// Codec selector used in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodecKind {
    /// MPEG audio frames.
    Mp3,
    /// AAC in ADTS framing.
    Aac,
    /// Custom fixed marker.
    Marker { bytes: Vec<u8> },
}

/// The pattern chosen by a [`CodecKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Mp3(Mp3Sync),
    Aac(AdtsSync),
    Bytes(BytePattern),
}

impl From<&CodecKind> for Marker {
    fn from(kind: &CodecKind) -> Self {
        match kind {
            CodecKind::Mp3 => Marker::Mp3(Mp3Sync),
            CodecKind::Aac => Marker::Aac(AdtsSync),
            CodecKind::Marker { bytes } => Marker::Bytes(BytePattern::new(bytes.clone())),
        }
    }
}

impl SyncPattern for Marker {
    fn marker_len(&self) -> usize {
        match self {
            Marker::Mp3(p) => p.marker_len(),
            Marker::Aac(p) => p.marker_len(),
            Marker::Bytes(p) => p.marker_len(),
        }
    }

    fn matches(&self, candidate: &[u8]) -> bool {
        match self {
            Marker::Mp3(p) => p.matches(candidate),
            Marker::Aac(p) => p.matches(candidate),
            Marker::Bytes(p) => p.matches(candidate),
        }
    }
}
