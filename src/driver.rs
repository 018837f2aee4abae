//! Frame-synchronizing decode driver.
//!
//! Accepts an arbitrarily chunked byte stream, finds frame boundaries in the
//! working buffer and dispatches every complete frame to the decoder.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start()──► Active ──stop() / fatal decode──► Stopped
//!                     ▲  │                               │
//!                     │  └── push() ──┐                  │
//!                     │      ◄────────┘                  │
//!                     └────────────── start() ───────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use syncframe::decoder::{DecodedFrame, FnDecoder};
//! use syncframe::{FrameDriver, SyncConfig};
//!
//! let config = SyncConfig::with_marker(b"SYNC".to_vec(), 64);
//! let decoder = FnDecoder::new(|frame: &[u8]| Ok(DecodedFrame::new(vec![0; frame.len()])));
//! let mut driver = FrameDriver::new(config, decoder);
//!
//! driver.start().unwrap();
//! assert_eq!(driver.push(b"SYNCone").unwrap(), 7);
//! assert_eq!(driver.frames_processed(), 0); // waiting for the next marker
//! driver.push(b"SYNCtwo").unwrap();
//! assert_eq!(driver.frames_processed(), 1);
//! ```

use crate::config::SyncConfig;
use crate::decoder::{AudioInfo, DecodedFrame, FrameDecoder, PcmSink};
use crate::error::{DecodeError, Result, SyncError};
use crate::sync::{Marker, SyncPattern, Synced, Synchronizer, WorkingBuffer};

/// Driver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, never started.
    Idle,
    /// Buffer allocated, accepting pushes.
    Active,
    /// Stopped by the caller or by a fatal decoder error.
    Stopped,
}

/// Per-frame notifications reported to the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A frame was decoded and its samples forwarded to the output.
    FrameDecoded {
        index: u64,
        frame_len: usize,
        samples: usize,
    },
    /// A frame failed to decode and was dropped.
    FrameSkipped {
        index: u64,
        frame_len: usize,
        reason: String,
    },
    /// Bytes in front of the first marker were discarded.
    Resynchronized { skipped: usize },
    /// The buffer filled up without a decodable frame and was reset.
    GarbageDiscarded { bytes: usize },
    /// The decoder reported new stream parameters.
    AudioInfoChanged(AudioInfo),
    /// The decoder failed fatally; the driver is now stopped.
    Stopped { reason: String },
}

type EventHandler = Box<dyn FnMut(&SyncEvent) + Send>;

/// Incremental decode driver for marker-delimited frames.
///
/// Single-threaded and non-reentrant: the working buffer has no locking.
/// Every call to [`push`](Self::push) runs in time bounded by the input
/// size and the number of frames drained.
pub struct FrameDriver<D, P = Marker> {
    config: SyncConfig,
    synchronizer: Synchronizer<P>,
    decoder: D,
    /// Allocated by `start()`, released by `stop()`.
    buffer: Option<WorkingBuffer>,
    state: DriverState,
    frames_processed: u64,
    audio_info: Option<AudioInfo>,
    output: Option<Box<dyn PcmSink + Send>>,
    on_event: Option<EventHandler>,
}

impl<D: FrameDecoder> FrameDriver<D> {
    /// Create a driver using the marker of `config.codec`.
    pub fn new(config: SyncConfig, decoder: D) -> Self {
        let marker = config.marker();
        Self::with_pattern(config, marker, decoder)
    }
}

impl<D: FrameDecoder, P: SyncPattern> FrameDriver<D, P> {
    /// Create a driver with an explicit marker pattern.
    ///
    /// `config.codec` is ignored in favour of `pattern`.
    pub fn with_pattern(config: SyncConfig, pattern: P, decoder: D) -> Self {
        Self {
            config,
            synchronizer: Synchronizer::new(pattern),
            decoder,
            buffer: None,
            state: DriverState::Idle,
            frames_processed: 0,
            audio_info: None,
            output: None,
            on_event: None,
        }
    }

    /// Route decoded PCM to `sink`.
    pub fn set_output(&mut self, sink: impl PcmSink + Send + 'static) {
        self.output = Some(Box::new(sink));
    }

    /// Install the handler receiving [`SyncEvent`]s.
    pub fn on_event(&mut self, handler: impl FnMut(&SyncEvent) + Send + 'static) {
        self.on_event = Some(Box::new(handler));
    }

    /// Allocate the working buffer and decoder resources.
    ///
    /// Restarts the driver if it is already active.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Config`] if the configuration is invalid
    /// - [`SyncError::Allocation`] if the buffer cannot be allocated
    /// - [`SyncError::DecoderInit`] if the decoder fails to begin
    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            self.stop();
        }
        self.config.validate()?;
        if self.synchronizer.marker_len() == 0 {
            return Err(SyncError::Config("sync marker must not be empty".into()));
        }
        if self.synchronizer.marker_len() * 2 > self.config.max_frame_size {
            return Err(SyncError::Config(format!(
                "max_frame_size {} too small for {}-byte marker",
                self.config.max_frame_size,
                self.synchronizer.marker_len()
            )));
        }

        tracing::info!(
            bytes = self.config.max_frame_size,
            "allocating frame buffer"
        );
        let buffer = WorkingBuffer::try_with_capacity(self.config.max_frame_size).map_err(
            |e| {
                tracing::error!("Not enough memory for buffers: {}", e);
                e
            },
        )?;
        self.decoder
            .begin()
            .map_err(|e| SyncError::DecoderInit(e.to_string()))?;

        self.buffer = Some(buffer);
        self.frames_processed = 0;
        self.audio_info = None;
        self.state = DriverState::Active;
        Ok(())
    }

    /// Release resources. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state == DriverState::Active {
            self.decoder.end();
            self.state = DriverState::Stopped;
            tracing::info!(frames = self.frames_processed, "driver stopped");
        }
        self.buffer = None;
    }

    /// Append `data` and decode every complete frame it completes.
    ///
    /// Returns the number of input bytes consumed. This is `data.len()`
    /// unless a fatal decoder error stopped the driver part way through.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotActive`] unless the driver is active.
    pub fn push(&mut self, data: &[u8]) -> Result<usize> {
        if !self.is_active() {
            tracing::warn!("push on inactive driver");
            return Err(SyncError::NotActive);
        }
        tracing::debug!(len = data.len(), "push");

        // `drain` never leaves an active buffer full: it dispatches, realigns
        // or resets it. So every pass appends at least one byte.
        let mut consumed = 0;
        loop {
            let appended = match self.buffer.as_mut() {
                Some(buffer) => buffer.append(&data[consumed..]),
                None => break,
            };
            consumed += appended;

            let progressed = self.drain();
            if !self.is_active() || consumed == data.len() {
                break;
            }
            debug_assert!(appended > 0 || progressed, "push made no forward progress");
        }
        Ok(consumed)
    }

    /// Decode frames until the buffer holds no complete frame.
    ///
    /// Returns true if the buffer changed (frame evicted, realigned or reset).
    fn drain(&mut self) -> bool {
        let mut progressed = false;
        while self.is_active() {
            let Some(buffer) = self.buffer.as_mut() else {
                break;
            };
            let capacity = buffer.capacity();
            let Synced { range, skipped } = self.synchronizer.compute_range(buffer);
            if skipped > 0 {
                progressed = true;
                self.emit(SyncEvent::Resynchronized { skipped });
            }

            match range.bounds(capacity) {
                Some((start, end)) => {
                    self.dispatch(start, end);
                    if let Some(buffer) = self.buffer.as_mut() {
                        buffer.evict(end);
                    }
                    progressed = true;
                }
                None => {
                    if self.buffer.as_ref().is_some_and(WorkingBuffer::is_full) {
                        if range.start.is_some() {
                            tracing::warn!(
                                max = capacity,
                                "frame exceeds buffer, increase max_frame_size"
                            );
                        }
                        self.discard_buffer();
                        progressed = true;
                    }
                    break;
                }
            }
        }
        progressed
    }

    /// Decode `[start, end)` of the working buffer.
    fn dispatch(&mut self, start: usize, end: usize) {
        let Some(buffer) = self.buffer.as_ref() else {
            return;
        };
        let result = self.decoder.decode(&buffer.as_slice()[start..end]);
        let index = self.frames_processed;
        self.frames_processed += 1;
        let frame_len = end - start;

        match result {
            Ok(decoded) => self.deliver(index, frame_len, decoded),
            Err(DecodeError::Recoverable(reason)) => {
                tracing::warn!(index, frame_len, "skipping frame: {}", reason);
                self.emit(SyncEvent::FrameSkipped {
                    index,
                    frame_len,
                    reason,
                });
            }
            Err(DecodeError::Fatal(reason)) => {
                tracing::error!(index, "decoder failed fatally: {}", reason);
                self.stop();
                self.emit(SyncEvent::Stopped { reason });
            }
        }
    }

    fn deliver(&mut self, index: u64, frame_len: usize, decoded: DecodedFrame) {
        if let Some(info) = decoded.info {
            if self.audio_info != Some(info) {
                tracing::info!(?info, "audio info changed");
                self.audio_info = Some(info);
                self.emit(SyncEvent::AudioInfoChanged(info));
            }
        }

        if let Some(output) = self.output.as_mut() {
            for chunk in decoded.samples.chunks(self.config.max_output_chunk_size) {
                output.write_pcm(chunk);
            }
        }

        tracing::debug!(index, frame_len, samples = decoded.samples.len(), "frame decoded");
        self.emit(SyncEvent::FrameDecoded {
            index,
            frame_len,
            samples: decoded.samples.len(),
        });
    }

    /// Garbage recovery: drop everything buffered.
    fn discard_buffer(&mut self) {
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };
        let bytes = buffer.len();
        buffer.reset();
        tracing::warn!(bytes, "buffer full without usable frame, cleared");
        self.emit(SyncEvent::GarbageDiscarded { bytes });
    }

    fn emit(&mut self, event: SyncEvent) {
        if let Some(handler) = self.on_event.as_mut() {
            handler(&event);
        }
    }

    /// Check if the driver accepts pushes.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == DriverState::Active
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Frames handed to the decoder since the last `start()`.
    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Bytes waiting in the working buffer.
    pub fn buffered_len(&self) -> usize {
        self.buffer.as_ref().map_or(0, WorkingBuffer::len)
    }

    /// The buffered bytes, empty when not active.
    pub fn buffered(&self) -> &[u8] {
        self.buffer
            .as_ref()
            .map(WorkingBuffer::as_slice)
            .unwrap_or_default()
    }

    /// Last stream parameters reported by the decoder.
    #[inline]
    pub fn audio_info(&self) -> Option<AudioInfo> {
        self.audio_info
    }

    /// The driver configuration.
    #[inline]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The decoder.
    #[inline]
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Mutable access to the decoder.
    #[inline]
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }
}
