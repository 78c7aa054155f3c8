//! Immutable byte views.
//!
//! [`Blob`] is the unit of payload ownership throughout the codec: an
//! immutable byte sequence backed by reference-counted storage, so slicing
//! a decoded packet into name components, content and signature bytes
//! shares one allocation instead of copying. [`SignedBlob`] pairs an
//! encoding with the byte range a signature covers.

use std::fmt;
use std::ops::{Deref, Range};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An immutable, cheaply clonable view over a byte sequence.
///
/// Equality is byte-wise. Cloning and slicing are O(1) and share the
/// underlying storage, which also keeps a decoded view alive independently
/// of the buffer it was sliced from.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blob {
    bytes: Bytes,
}

impl Blob {
    /// Creates an empty blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a static byte slice without copying.
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            bytes: Bytes::from_static(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a sub-view sharing this blob's storage.
    ///
    /// Panics if the range is out of bounds, like slice indexing.
    pub fn slice(&self, range: Range<usize>) -> Blob {
        Self {
            bytes: self.bytes.slice(range),
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(value),
        }
    }
}

impl From<&[u8]> for Blob {
    /// Copies the slice into owned storage.
    fn from(value: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(value),
        }
    }
}

impl<const N: usize> From<&[u8; N]> for Blob {
    fn from(value: &[u8; N]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(value),
        }
    }
}

impl From<Bytes> for Blob {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<&str> for Blob {
    fn from(value: &str) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(value.as_bytes()),
        }
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq<[u8]> for Blob {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[u8]> for Blob {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob[{}](", self.len())?;
        for (i, byte) in self.bytes.iter().take(16).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        if self.len() > 16 {
            write!(f, " ..")?;
        }
        write!(f, ")")
    }
}

/// An encoded packet together with its signed-portion byte range.
///
/// The range is the hard contract between the codec and any signer or
/// verifier: a digest is computed over exactly `blob[begin..end]` of the
/// original encoding, never over a re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlob {
    blob: Blob,
    signed_begin: usize,
    signed_end: usize,
}

impl SignedBlob {
    pub fn new(blob: Blob, signed_begin: usize, signed_end: usize) -> Self {
        debug_assert!(signed_begin <= signed_end && signed_end <= blob.len());
        Self {
            blob,
            signed_begin,
            signed_end,
        }
    }

    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    pub fn into_blob(self) -> Blob {
        self.blob
    }

    /// Offset of the first signed byte.
    pub fn signed_begin(&self) -> usize {
        self.signed_begin
    }

    /// Offset one past the last signed byte.
    pub fn signed_end(&self) -> usize {
        self.signed_end
    }

    pub fn signed_range(&self) -> Range<usize> {
        self.signed_begin..self.signed_end
    }

    /// The bytes a signature covers.
    pub fn signed_portion(&self) -> &[u8] {
        &self.blob.as_slice()[self.signed_range()]
    }

    pub fn len(&self) -> usize {
        self.blob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.blob.as_slice()
    }
}

impl AsRef<[u8]> for SignedBlob {
    fn as_ref(&self) -> &[u8] {
        self.blob.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_byte_wise() {
        let a = Blob::from(vec![1u8, 2, 3]);
        let b = Blob::from(&[1u8, 2, 3][..]);
        let c = Blob::from(vec![1u8, 2, 4]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, &[1u8, 2, 3][..]);
    }

    #[test]
    fn test_slice_shares_storage() {
        let blob = Blob::from(vec![0u8, 1, 2, 3, 4, 5]);
        let sub = blob.slice(2..5);
        assert_eq!(sub.as_slice(), &[2, 3, 4]);
        // Same allocation, not a copy.
        assert_eq!(sub.as_slice().as_ptr(), blob.as_slice()[2..].as_ptr());
    }

    #[test]
    fn test_signed_portion() {
        let blob = Blob::from(vec![9u8, 8, 7, 6, 5]);
        let signed = SignedBlob::new(blob, 1, 4);
        assert_eq!(signed.signed_portion(), &[8, 7, 6]);
        assert_eq!(signed.signed_range(), 1..4);
    }
}
