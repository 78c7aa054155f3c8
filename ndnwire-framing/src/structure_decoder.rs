//! Incremental detection of TLV element boundaries.
//!
//! [`TlvStructureDecoder`] walks the outermost type and length headers of
//! one TLV element across successive byte chunks, without decoding any of
//! its content, and reports the offset at which the element ends. It is
//! the state machine underneath [`ElementReader`](crate::ElementReader).

use thiserror::Error;

use ndnwire_common::MAX_NDN_PACKET_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    /// The first octet of an element header was zero, which no TLV type
    /// encodes. This usually means the stream has lost element alignment.
    #[error("malformed TLV header: first octet is zero")]
    FirstOctetZero,

    /// An element declared more bytes than the configured maximum. The
    /// check runs as soon as the length header is complete, so a hostile
    /// peer cannot make the reader buffer an arbitrarily large element.
    #[error("TLV element of {length} bytes exceeds the {max} byte maximum")]
    PacketExceedsMaxSize { length: u64, max: usize },

    /// The accumulation buffer could not hold a partial element.
    #[error(transparent)]
    Buffer(#[from] ndnwire_core::BufferError),
}

/// Outcome of feeding one chunk to [`TlvStructureDecoder::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The whole chunk was consumed and the element is still open. At
    /// least this many further bytes are needed before it can close.
    NeedMoreBytes(usize),
    /// The element ends this many bytes into the chunk just fed. Any
    /// remaining chunk bytes belong to the next element.
    ElementComplete(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadTypeByte,
    ReadTypeVarNumberExtra,
    ReadLengthByte,
    ReadLengthVarNumberExtra,
    ReadValueBytes,
    Done,
}

/// Resumable scanner for the end of one top-level TLV element.
///
/// Feed it successive chunks of a byte stream; it consumes the element's
/// type header, length header and value span, carrying unfinished
/// VarNumber headers over chunk boundaries in a fixed scratch buffer.
/// After an error the internal state is unspecified and [`reset`] must be
/// called before the decoder is reused.
///
/// [`reset`]: TlvStructureDecoder::reset
#[derive(Debug)]
pub struct TlvStructureDecoder {
    state: State,
    /// VarNumber extension bytes still expected for the current header.
    header_pending: usize,
    /// Length-header extension bytes collected so far, at most 8.
    scratch: [u8; 8],
    scratch_len: usize,
    /// Value bytes still to consume once both headers are read.
    value_pending: u64,
    /// Bytes of the current element consumed since the last reset.
    consumed: usize,
    max_element_size: usize,
}

impl TlvStructureDecoder {
    pub fn new() -> Self {
        Self::with_max_element_size(MAX_NDN_PACKET_SIZE)
    }

    /// A decoder rejecting elements larger than `max_element_size` bytes,
    /// headers included.
    pub fn with_max_element_size(max_element_size: usize) -> Self {
        Self {
            state: State::ReadTypeByte,
            header_pending: 0,
            scratch: [0; 8],
            scratch_len: 0,
            value_pending: 0,
            consumed: 0,
            max_element_size,
        }
    }

    pub fn max_element_size(&self) -> usize {
        self.max_element_size
    }

    /// Total bytes of the current element consumed since the last reset,
    /// summed over every `feed` call.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Prepares for the next element without reallocating.
    pub fn reset(&mut self) {
        self.state = State::ReadTypeByte;
        self.header_pending = 0;
        self.scratch_len = 0;
        self.value_pending = 0;
        self.consumed = 0;
    }

    /// Advances the scan with the next chunk of the stream.
    ///
    /// On [`Progress::ElementComplete`] the element spans every byte fed
    /// since the last reset up to the returned chunk offset. On an error
    /// the chunk is consumed exactly through the offending header, which
    /// [`consumed`](Self::consumed) reflects.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Progress, FramingError> {
        let mut pos = 0;
        loop {
            match self.state {
                State::Done => return Ok(Progress::ElementComplete(pos)),
                State::ReadTypeByte => {
                    let Some(&octet) = chunk.get(pos) else {
                        return Ok(Progress::NeedMoreBytes(1));
                    };
                    if octet == 0 {
                        return Err(FramingError::FirstOctetZero);
                    }
                    pos += 1;
                    self.consumed += 1;
                    match octet {
                        253 => self.begin_header_extra(2, State::ReadTypeVarNumberExtra),
                        254 => self.begin_header_extra(4, State::ReadTypeVarNumberExtra),
                        255 => self.begin_header_extra(8, State::ReadTypeVarNumberExtra),
                        _ => self.state = State::ReadLengthByte,
                    }
                }
                State::ReadTypeVarNumberExtra => {
                    // The type code's value is irrelevant to the element
                    // boundary, so its extension bytes are only skipped.
                    let take = self.header_pending.min(chunk.len() - pos);
                    pos += take;
                    self.consumed += take;
                    self.header_pending -= take;
                    if self.header_pending > 0 {
                        return Ok(Progress::NeedMoreBytes(self.header_pending));
                    }
                    self.state = State::ReadLengthByte;
                }
                State::ReadLengthByte => {
                    let Some(&octet) = chunk.get(pos) else {
                        return Ok(Progress::NeedMoreBytes(1));
                    };
                    pos += 1;
                    self.consumed += 1;
                    match octet {
                        253 => self.begin_header_extra(2, State::ReadLengthVarNumberExtra),
                        254 => self.begin_header_extra(4, State::ReadLengthVarNumberExtra),
                        255 => self.begin_header_extra(8, State::ReadLengthVarNumberExtra),
                        _ => self.begin_value(u64::from(octet))?,
                    }
                }
                State::ReadLengthVarNumberExtra => {
                    let take = self.header_pending.min(chunk.len() - pos);
                    self.scratch[self.scratch_len..self.scratch_len + take]
                        .copy_from_slice(&chunk[pos..pos + take]);
                    self.scratch_len += take;
                    pos += take;
                    self.consumed += take;
                    self.header_pending -= take;
                    if self.header_pending > 0 {
                        return Ok(Progress::NeedMoreBytes(self.header_pending));
                    }
                    let mut length = 0u64;
                    for &byte in &self.scratch[..self.scratch_len] {
                        length = (length << 8) | u64::from(byte);
                    }
                    self.begin_value(length)?;
                }
                State::ReadValueBytes => {
                    let available = chunk.len() - pos;
                    if (available as u64) < self.value_pending {
                        self.value_pending -= available as u64;
                        self.consumed += available;
                        let need = usize::try_from(self.value_pending).unwrap_or(usize::MAX);
                        return Ok(Progress::NeedMoreBytes(need));
                    }
                    let take = self.value_pending as usize;
                    pos += take;
                    self.consumed += take;
                    self.value_pending = 0;
                    self.state = State::Done;
                    return Ok(Progress::ElementComplete(pos));
                }
            }
        }
    }

    fn begin_header_extra(&mut self, pending: usize, state: State) {
        self.header_pending = pending;
        self.scratch_len = 0;
        self.state = state;
    }

    /// Both headers are read; `length` is the declared value length.
    fn begin_value(&mut self, length: u64) -> Result<(), FramingError> {
        // A nine byte length header can declare a total past u64::MAX.
        let total = (self.consumed as u64).saturating_add(length);
        if total > self.max_element_size as u64 {
            return Err(FramingError::PacketExceedsMaxSize {
                length: total,
                max: self.max_element_size,
            });
        }
        if length == 0 {
            self.state = State::Done;
        } else {
            self.value_pending = length;
            self.state = State::ReadValueBytes;
        }
        Ok(())
    }
}

impl Default for TlvStructureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_element_in_one_chunk() {
        let mut decoder = TlvStructureDecoder::new();
        let progress = decoder.feed(&[6, 3, 1, 2, 3]).unwrap();
        assert_eq!(progress, Progress::ElementComplete(5));
        assert_eq!(decoder.consumed(), 5);
    }

    #[test]
    fn test_trailing_bytes_are_not_consumed() {
        let mut decoder = TlvStructureDecoder::new();
        let progress = decoder.feed(&[8, 1, 0xaa, 6, 0]).unwrap();
        assert_eq!(progress, Progress::ElementComplete(3));
        assert_eq!(decoder.consumed(), 3);
    }

    #[test]
    fn test_one_byte_at_a_time() {
        let mut decoder = TlvStructureDecoder::new();
        assert_eq!(decoder.feed(&[6]).unwrap(), Progress::NeedMoreBytes(1));
        assert_eq!(decoder.feed(&[3]).unwrap(), Progress::NeedMoreBytes(3));
        assert_eq!(decoder.feed(&[1]).unwrap(), Progress::NeedMoreBytes(2));
        assert_eq!(decoder.feed(&[2]).unwrap(), Progress::NeedMoreBytes(1));
        assert_eq!(decoder.feed(&[3]).unwrap(), Progress::ElementComplete(1));
        assert_eq!(decoder.consumed(), 5);
    }

    #[test]
    fn test_zero_length_element() {
        let mut decoder = TlvStructureDecoder::new();
        assert_eq!(decoder.feed(&[8, 0]).unwrap(), Progress::ElementComplete(2));
    }

    #[test]
    fn test_length_header_split_across_chunks() {
        // Length 300 encodes as marker 253 plus two bytes.
        let mut decoder = TlvStructureDecoder::new();
        assert_eq!(decoder.feed(&[6, 253]).unwrap(), Progress::NeedMoreBytes(2));
        assert_eq!(decoder.feed(&[1]).unwrap(), Progress::NeedMoreBytes(1));
        assert_eq!(decoder.feed(&[44]).unwrap(), Progress::NeedMoreBytes(300));
        let value = vec![0u8; 300];
        assert_eq!(
            decoder.feed(&value).unwrap(),
            Progress::ElementComplete(300)
        );
        assert_eq!(decoder.consumed(), 304);
    }

    #[test]
    fn test_extended_type_header() {
        // Type 400 encodes as marker 253 plus two bytes.
        let mut decoder = TlvStructureDecoder::new();
        let progress = decoder.feed(&[253, 1, 144, 1, 0x55]).unwrap();
        assert_eq!(progress, Progress::ElementComplete(5));
    }

    #[test]
    fn test_first_octet_zero_rejected() {
        let mut decoder = TlvStructureDecoder::new();
        let err = decoder.feed(&[0, 6, 1, 2]).unwrap_err();
        assert_eq!(err, FramingError::FirstOctetZero);
        assert_eq!(decoder.consumed(), 0);
    }

    #[test]
    fn test_oversize_fails_before_buffering_value() {
        // Declares 9000 value bytes; only the four header bytes are fed.
        let mut decoder = TlvStructureDecoder::new();
        let err = decoder.feed(&[6, 253, 0x23, 0x28]).unwrap_err();
        assert_eq!(
            err,
            FramingError::PacketExceedsMaxSize {
                length: 9004,
                max: MAX_NDN_PACKET_SIZE,
            }
        );
        // The headers were consumed, so the caller can compute how much
        // of the element is still in flight.
        assert_eq!(decoder.consumed(), 4);
    }

    #[test]
    fn test_oversize_with_nine_byte_length_header() {
        // Declares 2^32 value bytes via the 255 length marker.
        let mut decoder = TlvStructureDecoder::new();
        let err = decoder
            .feed(&[6, 255, 0, 0, 0, 1, 0, 0, 0, 0])
            .unwrap_err();
        assert_eq!(
            err,
            FramingError::PacketExceedsMaxSize {
                length: (1u64 << 32) + 10,
                max: MAX_NDN_PACKET_SIZE,
            }
        );
        assert_eq!(decoder.consumed(), 10);
    }

    #[test]
    fn test_largest_declarable_length_saturates_the_size_check() {
        // u64::MAX value bytes; the total with the ten header bytes
        // does not fit in a u64.
        let mut decoder = TlvStructureDecoder::new();
        let mut header = vec![6u8, 255];
        header.extend_from_slice(&[0xff; 8]);
        let err = decoder.feed(&header).unwrap_err();
        assert_eq!(
            err,
            FramingError::PacketExceedsMaxSize {
                length: u64::MAX,
                max: MAX_NDN_PACKET_SIZE,
            }
        );
        assert_eq!(decoder.consumed(), 10);
    }

    #[test]
    fn test_configured_maximum() {
        let mut decoder = TlvStructureDecoder::with_max_element_size(8);
        let err = decoder.feed(&[6, 7]).unwrap_err();
        assert_eq!(
            err,
            FramingError::PacketExceedsMaxSize { length: 9, max: 8 }
        );

        decoder.reset();
        assert_eq!(
            decoder.feed(&[6, 6, 0, 0, 0, 0, 0, 0]).unwrap(),
            Progress::ElementComplete(8)
        );
    }

    #[test]
    fn test_reset_between_elements() {
        let mut decoder = TlvStructureDecoder::new();
        assert_eq!(decoder.feed(&[7, 1, 9]).unwrap(), Progress::ElementComplete(3));
        decoder.reset();
        assert_eq!(decoder.consumed(), 0);
        assert_eq!(decoder.feed(&[5, 2]).unwrap(), Progress::NeedMoreBytes(2));
        assert_eq!(decoder.feed(&[1, 2]).unwrap(), Progress::ElementComplete(2));
    }

    #[test]
    fn test_partial_value_reports_remaining() {
        let mut decoder = TlvStructureDecoder::new();
        assert_eq!(decoder.feed(&[6, 5, 1, 2]).unwrap(), Progress::NeedMoreBytes(3));
        assert_eq!(decoder.feed(&[3, 4]).unwrap(), Progress::NeedMoreBytes(1));
        assert_eq!(decoder.feed(&[5]).unwrap(), Progress::ElementComplete(1));
    }
}
