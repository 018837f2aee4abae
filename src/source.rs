//! Byte sources feeding a driver.
//!
//! The driver never blocks; waiting for input is the caller's job. These
//! helpers are that caller: they read whatever the source has, push it, and
//! re-push any remainder until the chunk is consumed.
//!
//! - [`StreamCopy`] - blocking `std::io::Read` sources, one chunk per `copy()`
//! - [`copy_async`] - tokio `AsyncRead` sources with an optional idle timeout
//!
//! # Example
//!
//! ```
//! use syncframe::decoder::{DecodedFrame, FnDecoder};
//! use syncframe::source::StreamCopy;
//! use syncframe::{FrameDriver, SyncConfig};
//!
//! let stream: &[u8] = b"SYNCabcSYNCdefSYNC";
//! let decoder = FnDecoder::new(|_: &[u8]| Ok(DecodedFrame::default()));
//! let mut driver = FrameDriver::new(SyncConfig::with_marker(b"SYNC".to_vec(), 64), decoder);
//! driver.start().unwrap();
//!
//! let mut copier = StreamCopy::with_buffer_size(stream, 5);
//! assert_eq!(copier.copy_all(&mut driver).unwrap(), 18);
//! assert_eq!(driver.frames_processed(), 2);
//! ```

use std::io::{ErrorKind, Read};
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::decoder::FrameDecoder;
use crate::driver::FrameDriver;
use crate::error::{Result, SyncError};
use crate::sync::SyncPattern;

/// Default read size per copy step.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 1024;

/// Copies a blocking reader into a driver.
pub struct StreamCopy<R> {
    reader: R,
    chunk: Vec<u8>,
}

impl<R: Read> StreamCopy<R> {
    /// Create a copier with the default read size.
    pub fn new(reader: R) -> Self {
        Self::with_buffer_size(reader, DEFAULT_COPY_BUFFER_SIZE)
    }

    /// Create a copier reading up to `size` bytes per step.
    pub fn with_buffer_size(reader: R, size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0u8; size.max(1)],
        }
    }

    /// Read one chunk and push all of it.
    ///
    /// Returns the number of bytes the driver consumed; 0 at end of input.
    /// Sleeps for the driver's configured copy delay between segments.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotActive`] without reading if the driver is not
    /// active.
    pub fn copy<D, P>(&mut self, driver: &mut FrameDriver<D, P>) -> Result<usize>
    where
        D: FrameDecoder,
        P: SyncPattern,
    {
        if !driver.is_active() {
            return Err(SyncError::NotActive);
        }
        let n = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if n == 0 {
            return Ok(0);
        }

        let delay = driver.config().copy_delay_duration();
        let mut written = 0;
        while written < n && driver.is_active() {
            written += driver.push(&self.chunk[written..n])?;
            tracing::trace!(written, total = n, "copied");
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }
        }
        if written < n {
            tracing::warn!(dropped = n - written, "driver stopped, dropping read bytes");
        }
        Ok(written)
    }

    /// Copy until end of input or until the driver stops.
    ///
    /// Returns the total number of bytes consumed.
    pub fn copy_all<D, P>(&mut self, driver: &mut FrameDriver<D, P>) -> Result<u64>
    where
        D: FrameDecoder,
        P: SyncPattern,
    {
        let mut total = 0u64;
        while driver.is_active() {
            let n = self.copy(driver)?;
            if n == 0 {
                break;
            }
            total += n as u64;
        }
        Ok(total)
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Pump an async reader into a driver until EOF or until the driver stops.
///
/// Returns the total number of bytes consumed.
///
/// # Errors
///
/// - [`SyncError::SourceIdle`] if a read yields nothing within `idle_timeout`
/// - [`SyncError::Io`] on read failure
pub async fn copy_async<R, D, P>(
    reader: &mut R,
    driver: &mut FrameDriver<D, P>,
    buffer_size: usize,
    idle_timeout: Option<Duration>,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    D: FrameDecoder,
    P: SyncPattern,
{
    let mut chunk = BytesMut::with_capacity(buffer_size.max(1));
    let delay = driver.config().copy_delay_duration();
    let mut total = 0u64;

    while driver.is_active() {
        chunk.clear();
        let read = reader.read_buf(&mut chunk);
        let n = match idle_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| SyncError::SourceIdle(limit))??,
            None => read.await?,
        };
        if n == 0 {
            tracing::debug!(total, "source finished");
            break;
        }

        let mut written = 0;
        while written < n && driver.is_active() {
            written += driver.push(&chunk[written..n])?;
        }
        if written < n {
            tracing::warn!(dropped = n - written, "driver stopped, dropping read bytes");
        }
        total += written as u64;

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(total)
}
