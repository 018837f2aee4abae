//! Decoder module - the frame decoder collaborator and PCM output.
//!
//! The driver knows nothing about bitstreams. It hands each validated frame
//! to a [`FrameDecoder`] and forwards the resulting samples to a
//! [`PcmSink`].
//!
//! # Example
//!
//! ```
//! use syncframe::decoder::{DecodedFrame, FnDecoder, FrameDecoder};
//!
//! // A stand-in decoder producing one sample per input byte
//! let mut decoder = FnDecoder::new(|frame: &[u8]| {
//!     Ok(DecodedFrame::new(frame.iter().map(|&b| b as i16).collect()))
//! });
//!
//! let decoded = decoder.decode(&[1, 2, 3]).unwrap();
//! assert_eq!(decoded.samples, vec![1, 2, 3]);
//! ```

mod sink;

pub use sink::PcmSink;

use crate::error::DecodeError;

/// Stream parameters reported by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioInfo {
    /// 16-bit PCM with the given rate and channel count.
    pub fn pcm16(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample: 16,
        }
    }
}

/// Output of one decoded frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Interleaved PCM samples.
    pub samples: Vec<i16>,
    /// Stream parameters, if the decoder knows them.
    pub info: Option<AudioInfo>,
}

impl DecodedFrame {
    /// Frame without stream parameters.
    pub fn new(samples: Vec<i16>) -> Self {
        Self {
            samples,
            info: None,
        }
    }

    /// Attach stream parameters.
    pub fn with_info(mut self, info: AudioInfo) -> Self {
        self.info = Some(info);
        self
    }
}

/// A codec back end that turns one compressed frame into PCM.
///
/// `decode` receives a borrowed slice of the working buffer. The driver
/// reuses that memory right after the call returns.
pub trait FrameDecoder {
    /// Allocate decoder resources. Called by `start()`.
    fn begin(&mut self) -> Result<(), DecodeError> {
        Ok(())
    }

    /// Decode one frame, marker included.
    fn decode(&mut self, frame: &[u8]) -> Result<DecodedFrame, DecodeError>;

    /// Release decoder resources. Called by `stop()`.
    fn end(&mut self) {}
}

impl<D: FrameDecoder + ?Sized> FrameDecoder for Box<D> {
    fn begin(&mut self) -> Result<(), DecodeError> {
        (**self).begin()
    }

    fn decode(&mut self, frame: &[u8]) -> Result<DecodedFrame, DecodeError> {
        (**self).decode(frame)
    }

    fn end(&mut self) {
        (**self).end()
    }
}

/// Adapter turning a closure into a [`FrameDecoder`].
pub struct FnDecoder<F> {
    decode: F,
}

impl<F> FnDecoder<F>
where
    F: FnMut(&[u8]) -> Result<DecodedFrame, DecodeError>,
{
    /// Wrap `decode`.
    pub fn new(decode: F) -> Self {
        Self { decode }
    }
}

impl<F> FrameDecoder for FnDecoder<F>
where
    F: FnMut(&[u8]) -> Result<DecodedFrame, DecodeError>,
{
    fn decode(&mut self, frame: &[u8]) -> Result<DecodedFrame, DecodeError> {
        (self.decode)(frame)
    }
}
