//! # syncframe
//!
//! Incremental frame-synchronizing decode driver for compressed audio.
//!
//! Feed an arbitrarily chunked byte stream (down to one byte at a time) into a
//! [`FrameDriver`]. It locates frame boundaries by their synchronization
//! markers inside a bounded working buffer and hands every complete frame to
//! a pluggable [`FrameDecoder`](decoder::FrameDecoder).
//!
//! ## Architecture
//!
//! - **Working buffer** ([`sync::WorkingBuffer`]): fixed capacity, append at
//!   the tail, shift-left eviction at the head
//! - **Synchronizer** ([`sync::Synchronizer`]): marker search, realignment
//!   and frame range computation
//! - **Driver** ([`FrameDriver`]): push/decode loop, garbage recovery and
//!   the `Idle → Active → Stopped` lifecycle
//!
//! ## Example
//!
//! ```
//! use syncframe::decoder::{DecodedFrame, FnDecoder};
//! use syncframe::{FrameDriver, SyncConfig, SyncEvent};
//!
//! let decoder = FnDecoder::new(|frame: &[u8]| Ok(DecodedFrame::new(vec![0; frame.len()])));
//! let mut driver = FrameDriver::new(SyncConfig::with_marker(b"SYNC".to_vec(), 256), decoder);
//! driver.on_event(|event| {
//!     if let SyncEvent::FrameDecoded { index, frame_len, .. } = event {
//!         println!("frame {index}: {frame_len} bytes");
//!     }
//! });
//! driver.start().unwrap();
//!
//! for byte in b"junkSYNCfirstSYNCsecondSYNC" {
//!     driver.push(&[*byte]).unwrap();
//! }
//! assert_eq!(driver.frames_processed(), 2);
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod source;
pub mod sync;

mod driver;

pub use config::SyncConfig;
pub use driver::{DriverState, FrameDriver, SyncEvent};
pub use error::{DecodeError, SyncError};
