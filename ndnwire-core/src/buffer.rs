//! Growable output buffer with a pluggable growth policy.
//!
//! Encoders write through [`DynamicByteBuffer`], which either reallocates
//! on demand ([`Reallocate`]) or enforces a hard capacity ([`NoGrow`]) for
//! deployments with a bounded memory budget. The back-aligned primitives
//! exist for the TLV encoder, which fills its output tail-to-head because
//! a parent's length is unknown until its children are written.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("buffer needs {needed} bytes but holds {capacity} and has no grow strategy")]
    TooSmallNoGrowStrategy { needed: usize, capacity: usize },
}

/// Growth policy injected into a [`DynamicByteBuffer`] at construction.
pub trait GrowStrategy: Send + Sync {
    /// Makes `bytes` at least `needed` long, or fails.
    fn grow(&self, bytes: &mut Vec<u8>, needed: usize) -> Result<(), BufferError>;
}

/// Reallocate-and-copy: grows to the larger of `needed` and double the
/// current length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reallocate;

impl GrowStrategy for Reallocate {
    fn grow(&self, bytes: &mut Vec<u8>, needed: usize) -> Result<(), BufferError> {
        let target = needed.max(bytes.len() * 2);
        bytes.resize(target, 0);
        Ok(())
    }
}

/// Refuses to grow. Exceeding the initial capacity is an error, which
/// keeps the memory bound a checkable property rather than a convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGrow;

impl GrowStrategy for NoGrow {
    fn grow(&self, bytes: &mut Vec<u8>, needed: usize) -> Result<(), BufferError> {
        Err(BufferError::TooSmallNoGrowStrategy {
            needed,
            capacity: bytes.len(),
        })
    }
}

/// A byte buffer of fixed logical length that can be enlarged through its
/// grow strategy.
///
/// The whole buffer is always initialized; `len()` is its current size,
/// not a write cursor. Callers address it with absolute offsets from the
/// front or the back.
pub struct DynamicByteBuffer {
    bytes: Vec<u8>,
    grow: Box<dyn GrowStrategy>,
}

impl DynamicByteBuffer {
    /// A buffer of `initial_length` zeroed bytes that reallocates on
    /// demand.
    pub fn new(initial_length: usize) -> Self {
        Self::with_strategy(initial_length, Box::new(Reallocate))
    }

    /// A fixed-capacity buffer: any operation needing more than `length`
    /// bytes fails with [`BufferError::TooSmallNoGrowStrategy`].
    pub fn fixed(length: usize) -> Self {
        Self::with_strategy(length, Box::new(NoGrow))
    }

    pub fn with_strategy(initial_length: usize, grow: Box<dyn GrowStrategy>) -> Self {
        Self {
            bytes: vec![0; initial_length],
            grow,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Ensures the buffer is at least `length` bytes, growing at the back
    /// so front-relative offsets stay valid.
    pub fn ensure_length(&mut self, length: usize) -> Result<(), BufferError> {
        if self.bytes.len() >= length {
            return Ok(());
        }
        self.grow.grow(&mut self.bytes, length)
    }

    /// Ensures the buffer is at least `length` bytes, shifting existing
    /// content to the back so back-relative offsets stay valid.
    pub fn ensure_length_from_back(&mut self, length: usize) -> Result<(), BufferError> {
        if self.bytes.len() >= length {
            return Ok(());
        }
        let old_len = self.bytes.len();
        self.grow.grow(&mut self.bytes, length)?;
        let new_len = self.bytes.len();
        self.bytes.copy_within(0..old_len, new_len - old_len);
        Ok(())
    }

    /// Writes `value` starting at `offset`, growing as needed.
    pub fn copy(&mut self, value: &[u8], offset: usize) -> Result<(), BufferError> {
        let end = offset + value.len();
        self.ensure_length(end)?;
        self.bytes[offset..end].copy_from_slice(value);
        Ok(())
    }

    /// Writes `value` so its first byte lands `offset_from_back` bytes
    /// before the end of the buffer. Requires `value.len() <=
    /// offset_from_back`.
    pub fn copy_from_back(&mut self, value: &[u8], offset_from_back: usize) -> Result<(), BufferError> {
        debug_assert!(value.len() <= offset_from_back);
        self.ensure_length_from_back(offset_from_back)?;
        let start = self.bytes.len() - offset_from_back;
        self.bytes[start..start + value.len()].copy_from_slice(value);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// The last `length` bytes.
    pub fn slice_from_back(&self, length: usize) -> &[u8] {
        &self.bytes[self.bytes.len() - length..]
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for DynamicByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicByteBuffer")
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_grows_on_demand() {
        let mut buffer = DynamicByteBuffer::new(4);
        buffer.copy(&[1, 2, 3], 6).unwrap();
        assert!(buffer.len() >= 9);
        assert_eq!(&buffer.as_slice()[6..9], &[1, 2, 3]);
    }

    #[test]
    fn test_grow_doubles() {
        let mut buffer = DynamicByteBuffer::new(8);
        buffer.ensure_length(9).unwrap();
        assert_eq!(buffer.len(), 16);
        buffer.ensure_length(100).unwrap();
        assert_eq!(buffer.len(), 100);
    }

    #[test]
    fn test_fixed_capacity_errors() {
        let mut buffer = DynamicByteBuffer::fixed(4);
        buffer.copy(&[1, 2], 0).unwrap();
        let err = buffer.copy(&[1, 2, 3], 2).unwrap_err();
        assert_eq!(
            err,
            BufferError::TooSmallNoGrowStrategy {
                needed: 5,
                capacity: 4
            }
        );
    }

    #[test]
    fn test_grow_from_back_preserves_tail() {
        let mut buffer = DynamicByteBuffer::new(4);
        buffer.copy_from_back(&[9, 8], 2).unwrap();
        assert_eq!(buffer.slice_from_back(2), &[9, 8]);
        // Force a reallocation; the tail must move with the back.
        buffer.copy_from_back(&[7, 6, 5], 10).unwrap();
        assert_eq!(buffer.slice_from_back(2), &[9, 8]);
        let len = buffer.len();
        assert_eq!(&buffer.as_slice()[len - 10..len - 7], &[7, 6, 5]);
    }
}
