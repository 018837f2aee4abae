//! Fixed-capacity working buffer for accumulating partial frames.
//!
//! The buffer is allocated once and never grows. Stream bytes are appended at
//! the tail and consumed from the head by shifting the remainder left:
//!
//! ```text
//! ┌──────────────── capacity ────────────────┐
//! │ valid stream bytes  │ undefined          │
//! └─────────────────────┴────────────────────┘
//! 0                 occupied
//! ```
//!
//! # Example
//!
//! ```
//! use syncframe::sync::WorkingBuffer;
//!
//! let mut buffer = WorkingBuffer::try_with_capacity(8).unwrap();
//! assert_eq!(buffer.append(b"0123456789"), 8); // only what fits
//! buffer.evict(3);
//! assert_eq!(buffer.as_slice(), b"34567");
//! ```

use crate::error::{Result, SyncError};

/// Owned linear buffer with explicit shift-left compaction.
///
/// `len() <= capacity()` holds after every operation.
#[derive(Debug)]
pub struct WorkingBuffer {
    /// Backing storage, always exactly `capacity` bytes long.
    storage: Vec<u8>,
    /// Number of valid bytes at the front of `storage`.
    occupied: usize,
}

impl WorkingBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Allocation`] if the memory cannot be reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| SyncError::Allocation {
                requested: capacity,
            })?;
        storage.resize(capacity, 0);

        Ok(Self {
            storage,
            occupied: 0,
        })
    }

    /// Copy as much of `data` as fits and return the number of bytes taken.
    ///
    /// Never overflows: when the buffer is full this returns 0 and the
    /// caller has to evict or reset before more data can be accepted.
    pub fn append(&mut self, data: &[u8]) -> usize {
        let take = data.len().min(self.remaining());
        if take > 0 {
            let old = self.occupied;
            self.storage[old..old + take].copy_from_slice(&data[..take]);
            self.occupied += take;
            tracing::trace!(old, take, occupied = self.occupied, "append");
        }
        take
    }

    /// Discard the prefix `[0, offset)` and shift the rest to offset 0.
    ///
    /// An offset past the occupied length empties the buffer.
    pub fn evict(&mut self, offset: usize) {
        let offset = offset.min(self.occupied);
        if offset == 0 {
            return;
        }
        self.storage.copy_within(offset..self.occupied, 0);
        self.occupied -= offset;
    }

    /// Drop all buffered bytes.
    #[inline]
    pub fn reset(&mut self) {
        self.occupied = 0;
    }

    /// The valid window `[0, len())`.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.occupied]
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Check if the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Fixed capacity chosen at allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Free space left for `append`.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.occupied
    }

    /// Check if no more bytes can be appended.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied == self.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_within_capacity() {
        let mut buffer = WorkingBuffer::try_with_capacity(16).unwrap();

        assert_eq!(buffer.append(b"hello"), 5);
        assert_eq!(buffer.as_slice(), b"hello");
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.remaining(), 11);
        assert!(!buffer.is_full());
    }

    #[test]
    fn test_append_partial_when_full() {
        let mut buffer = WorkingBuffer::try_with_capacity(4).unwrap();

        assert_eq!(buffer.append(b"abcdef"), 4);
        assert!(buffer.is_full());
        assert_eq!(buffer.append(b"gh"), 0);
        assert_eq!(buffer.as_slice(), b"abcd");
    }

    #[test]
    fn test_evict_shifts_left() {
        let mut buffer = WorkingBuffer::try_with_capacity(10).unwrap();
        buffer.append(b"0123456789");

        buffer.evict(4);

        assert_eq!(buffer.as_slice(), b"456789");
        assert_eq!(buffer.remaining(), 4);

        // Freed space is reusable
        assert_eq!(buffer.append(b"abcd"), 4);
        assert_eq!(buffer.as_slice(), b"456789abcd");
    }

    #[test]
    fn test_evict_past_end_empties() {
        let mut buffer = WorkingBuffer::try_with_capacity(8).unwrap();
        buffer.append(b"abc");

        buffer.evict(100);

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_evict_zero_is_noop() {
        let mut buffer = WorkingBuffer::try_with_capacity(8).unwrap();
        buffer.append(b"abc");

        buffer.evict(0);

        assert_eq!(buffer.as_slice(), b"abc");
    }

    #[test]
    fn test_reset_clears() {
        let mut buffer = WorkingBuffer::try_with_capacity(8).unwrap();
        buffer.append(b"abcdefgh");

        buffer.reset();

        assert!(buffer.is_empty());
        assert_eq!(buffer.remaining(), 8);
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_occupancy_never_exceeds_capacity() {
        let mut buffer = WorkingBuffer::try_with_capacity(7).unwrap();
        let data: Vec<u8> = (0..=255).collect();

        for step in 0..200usize {
            match step % 5 {
                0 | 1 | 2 => {
                    buffer.append(&data[..step % 11]);
                }
                3 => buffer.evict(step % 4),
                _ => {
                    if step % 3 == 0 {
                        buffer.reset();
                    }
                }
            }
            assert!(buffer.len() <= buffer.capacity());
        }
    }

    #[test]
    fn test_allocation_failure_is_reported() {
        let result = WorkingBuffer::try_with_capacity(usize::MAX);

        assert!(matches!(
            result,
            Err(SyncError::Allocation {
                requested: usize::MAX
            })
        ));
    }
}
