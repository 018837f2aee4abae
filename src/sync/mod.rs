//! Sync module - working buffer, marker patterns and frame boundary search.
//!
//! - Fixed-capacity working buffer with shift-left eviction
//! - Pluggable synchronization markers (MP3, ADTS, raw bytes)
//! - Frame range computation with realignment to the first marker

mod frame_buffer;
mod pattern;
mod synchronizer;

pub use frame_buffer::WorkingBuffer;
pub use pattern::{
    AdtsSync, BytePattern, CodecKind, Marker, Mp3Sync, SyncPattern, CODEC_MARKER_LEN,
};
pub use synchronizer::{FrameRange, Synced, Synchronizer};
