//! Driver configuration.
//!
//! Fixed at construction; the driver never reconfigures mid-stream.
//!
//! # Example
//!
//! ```
//! use syncframe::config::{CodecKind, SyncConfig};
//!
//! let config = SyncConfig::from_json(
//!     r#"{"codec": {"type": "aac"}, "max_frame_size": 4096, "max_output_chunk_size": 2048}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.codec, CodecKind::Aac);
//! assert_eq!(config.copy_delay_ms, 0);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::sync::{Marker, SyncPattern};

pub use crate::sync::CodecKind;

/// Largest MPEG audio frame the MP3 preset buffers.
pub const MP3_MAX_FRAME_SIZE: usize = 1600;

/// PCM samples per MP3 frame (1152 per channel, stereo).
pub const MP3_MAX_OUTPUT_SIZE: usize = 1152 * 2;

/// Largest ADTS frame the AAC preset buffers.
pub const AAC_MAX_FRAME_SIZE: usize = 2100;

/// PCM samples per AAC frame (1024 per channel, up to two channels, SBR doubling).
pub const AAC_MAX_OUTPUT_SIZE: usize = 1024 * 2 * 2;

/// Per-codec driver settings.
///
/// Missing JSON fields fall back to the MP3 preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Marker recognized at the start of each frame.
    pub codec: CodecKind,
    /// Working buffer capacity in bytes.
    pub max_frame_size: usize,
    /// Largest PCM chunk (in samples) handed to the output sink at once.
    pub max_output_chunk_size: usize,
    /// Pause between pushed segments when copying from a source (0 = none).
    pub copy_delay_ms: u64,
}

impl SyncConfig {
    /// MP3 preset.
    pub fn mp3() -> Self {
        Self {
            codec: CodecKind::Mp3,
            max_frame_size: MP3_MAX_FRAME_SIZE,
            max_output_chunk_size: MP3_MAX_OUTPUT_SIZE,
            copy_delay_ms: 0,
        }
    }

    /// AAC (ADTS) preset.
    pub fn aac() -> Self {
        Self {
            codec: CodecKind::Aac,
            max_frame_size: AAC_MAX_FRAME_SIZE,
            max_output_chunk_size: AAC_MAX_OUTPUT_SIZE,
            copy_delay_ms: 0,
        }
    }

    /// Custom marker with an explicit buffer capacity.
    pub fn with_marker(marker: impl Into<Vec<u8>>, max_frame_size: usize) -> Self {
        Self {
            codec: CodecKind::Marker {
                bytes: marker.into(),
            },
            max_frame_size,
            ..Self::mp3()
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the working buffer capacity.
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }

    /// Set the PCM output chunk size.
    pub fn max_output_chunk_size(mut self, size: usize) -> Self {
        self.max_output_chunk_size = size;
        self
    }

    /// Set the delay inserted between copied segments.
    pub fn copy_delay(mut self, delay: Duration) -> Self {
        self.copy_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Delay between copied segments, if any.
    pub fn copy_delay_duration(&self) -> Option<Duration> {
        (self.copy_delay_ms > 0).then(|| Duration::from_millis(self.copy_delay_ms))
    }

    /// Build the marker pattern for the configured codec.
    pub fn marker(&self) -> Marker {
        Marker::from(&self.codec)
    }

    /// Check that a buffer of this size can hold a frame plus the next marker.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let marker_len = self.marker().marker_len();
        if marker_len == 0 {
            return Err(SyncError::Config("marker must not be empty".into()));
        }
        if self.max_frame_size < 2 * marker_len {
            return Err(SyncError::Config(format!(
                "max_frame_size {} cannot hold a frame of at least two {}-byte markers",
                self.max_frame_size, marker_len
            )));
        }
        if self.max_output_chunk_size == 0 {
            return Err(SyncError::Config(
                "max_output_chunk_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::mp3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(SyncConfig::mp3().validate().is_ok());
        assert!(SyncConfig::aac().validate().is_ok());
        assert_eq!(SyncConfig::default(), SyncConfig::mp3());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let config = SyncConfig::with_marker(Vec::new(), 128);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("marker must not be empty"));
    }

    #[test]
    fn test_buffer_too_small_rejected() {
        let config = SyncConfig::with_marker(b"SYNC".to_vec(), 7);
        assert!(config.validate().is_err());

        let config = SyncConfig::with_marker(b"SYNC".to_vec(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_output_chunk_rejected() {
        let config = SyncConfig::aac().max_output_chunk_size(0);

        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_from_json_custom_marker() {
        let config = SyncConfig::from_json(
            r#"{"codec": {"type": "marker", "bytes": [170, 85]}, "max_frame_size": 512, "copy_delay_ms": 5}"#,
        )
        .unwrap();

        assert_eq!(
            config.codec,
            CodecKind::Marker {
                bytes: vec![0xAA, 0x55]
            }
        );
        assert_eq!(config.max_frame_size, 512);
        assert_eq!(config.max_output_chunk_size, MP3_MAX_OUTPUT_SIZE);
        assert_eq!(config.copy_delay_duration(), Some(Duration::from_millis(5)));
        assert_eq!(config.marker().marker_len(), 2);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = SyncConfig::from_json(r#"{"codec": {"type": "flac"}}"#);

        assert!(matches!(result, Err(SyncError::Json(_))));
    }

    #[test]
    fn test_builder_setters() {
        let config = SyncConfig::mp3()
            .max_frame_size(4096)
            .max_output_chunk_size(512)
            .copy_delay(Duration::from_millis(3));

        assert_eq!(config.max_frame_size, 4096);
        assert_eq!(config.max_output_chunk_size, 512);
        assert_eq!(config.copy_delay_ms, 3);
        assert_eq!(SyncConfig::mp3().copy_delay_duration(), None);
    }

    #[test]
    fn test_json_round_trip_keeps_codec_tag() {
        let json = serde_json::to_string(&SyncConfig::aac()).unwrap();

        assert!(json.contains(r#""type":"aac""#));
    }
}
