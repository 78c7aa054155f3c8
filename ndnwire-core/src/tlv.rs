//! NDN-TLV primitives: the VarNumber integer codec, the back-to-front
//! [`TlvEncoder`] and the forward-reading [`TlvDecoder`].
//!
//! A TLV element is `VarNumber(type) VarNumber(length) value[length]`.
//! VarNumber encodes values below 253 in one byte; larger values use a
//! marker byte (253, 254 or 255) followed by 2, 4 or 8 big-endian bytes.
//! The encoder fills its buffer tail-to-head so a parent's type and
//! length can be prepended after its children are written, which is the
//! only way to emit nested TLVs in a single pass.

use ndnwire_common::tlv_type;
use thiserror::Error;

use crate::blob::Blob;
use crate::buffer::{BufferError, DynamicByteBuffer};

/// Errors raised while encoding or decoding TLV structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlvError {
    /// A VarNumber's continuation bytes are truncated.
    #[error("malformed TLV header")]
    MalformedHeader,
    /// The decoder needs more bytes than the buffer holds. Streaming
    /// callers treat this as "wait for more input"; one-shot callers
    /// treat it as fatal.
    #[error("read past end of buffer: need {requested} bytes, {available} available")]
    ReadPastEnd { requested: usize, available: usize },
    /// A required field is missing, a type code mismatched, or an
    /// unrecognized critical type (code 31 or below) was found.
    #[error("unexpected TLV type {0}")]
    UnexpectedTlvType(u64),
    /// A nested decoder consumed a different byte count than the
    /// container declared.
    #[error("nested TLV consumed up to offset {offset} but declared end is {end}")]
    TlvLengthMismatch { offset: usize, end: usize },
    #[error("invalid non-negative integer length {0}")]
    InvalidIntegerLength(usize),
    #[error("conflicting Interest fields: {0}")]
    InvalidInterestFields(&'static str),
    #[error("implicit digest component must be {expected} bytes, got {actual}")]
    InvalidComponentLength { expected: usize, actual: usize },
    #[error("component does not begin with marker {expected:#04x}")]
    InvalidComponentMarker { expected: u8 },
    #[error("invalid name URI: {0}")]
    InvalidUri(&'static str),
    #[error("string TLV value is not valid UTF-8")]
    InvalidUtf8,
    #[error("unrecognized encryption algorithm {0}")]
    UnrecognizedEncryptionAlgorithm(u64),
    #[error("invalid ISO timestamp in ValidityPeriod")]
    InvalidTimestamp,
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Number of bytes `value` occupies as a VarNumber.
pub fn var_number_size(value: u64) -> usize {
    if value < 253 {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Reads a VarNumber from the front of `input`, returning the value and
/// the number of bytes consumed.
pub fn decode_var_number(input: &[u8]) -> Result<(u64, usize), TlvError> {
    let first = *input.first().ok_or(TlvError::ReadPastEnd {
        requested: 1,
        available: 0,
    })?;
    match first {
        0..=252 => Ok((u64::from(first), 1)),
        253 => {
            let bytes: [u8; 2] = input
                .get(1..3)
                .and_then(|b| b.try_into().ok())
                .ok_or(TlvError::MalformedHeader)?;
            Ok((u64::from(u16::from_be_bytes(bytes)), 3))
        }
        254 => {
            let bytes: [u8; 4] = input
                .get(1..5)
                .and_then(|b| b.try_into().ok())
                .ok_or(TlvError::MalformedHeader)?;
            Ok((u64::from(u32::from_be_bytes(bytes)), 5))
        }
        255 => {
            let bytes: [u8; 8] = input
                .get(1..9)
                .and_then(|b| b.try_into().ok())
                .ok_or(TlvError::MalformedHeader)?;
            Ok((u64::from_be_bytes(bytes), 9))
        }
    }
}

/// Reads the type and length header of the element at the front of
/// `input`: `(type, length, header_size)`.
///
/// Useful for dispatching a framed element (Interest, Data or LpPacket)
/// without committing to a full decode.
pub fn decode_type_and_length(input: &[u8]) -> Result<(u64, u64, usize), TlvError> {
    let (type_, type_size) = decode_var_number(input)?;
    let (length, length_size) = decode_var_number(&input[type_size..])?;
    Ok((type_, length, type_size + length_size))
}

/// Number of bytes `value` occupies as a nonNegativeInteger (1, 2, 4
/// or 8, chosen by magnitude).
pub fn non_negative_integer_size(value: u64) -> usize {
    if value <= 0xff {
        1
    } else if value <= 0xffff {
        2
    } else if value <= 0xffff_ffff {
        4
    } else {
        8
    }
}

/// Encodes `value` as a minimal nonNegativeInteger into a fresh Vec.
pub fn encode_non_negative_integer(value: u64) -> Vec<u8> {
    match non_negative_integer_size(value) {
        1 => vec![value as u8],
        2 => (value as u16).to_be_bytes().to_vec(),
        4 => (value as u32).to_be_bytes().to_vec(),
        _ => value.to_be_bytes().to_vec(),
    }
}

/// Decodes a nonNegativeInteger occupying the whole of `bytes`.
pub fn decode_non_negative_integer(bytes: &[u8]) -> Result<u64, TlvError> {
    match bytes.len() {
        1 => Ok(u64::from(bytes[0])),
        2 => Ok(u64::from(u16::from_be_bytes(bytes.try_into().unwrap()))),
        4 => Ok(u64::from(u32::from_be_bytes(bytes.try_into().unwrap()))),
        8 => Ok(u64::from_be_bytes(bytes.try_into().unwrap())),
        other => Err(TlvError::InvalidIntegerLength(other)),
    }
}

fn write_var_number_scratch(value: u64, scratch: &mut [u8; 9]) -> usize {
    if value < 253 {
        scratch[0] = value as u8;
        1
    } else if value <= 0xffff {
        scratch[0] = 253;
        scratch[1..3].copy_from_slice(&(value as u16).to_be_bytes());
        3
    } else if value <= 0xffff_ffff {
        scratch[0] = 254;
        scratch[1..5].copy_from_slice(&(value as u32).to_be_bytes());
        5
    } else {
        scratch[0] = 255;
        scratch[1..9].copy_from_slice(&value.to_be_bytes());
        9
    }
}

/// TLV encoder writing from the back of a [`DynamicByteBuffer`].
///
/// Because output grows toward the front, callers write an element's
/// fields in reverse order, then prepend the element's type and length
/// with [`write_type_and_length`](Self::write_type_and_length) using the
/// byte count written since the element started. `len()` is the number
/// of bytes written so far, all of them at the back of the buffer.
pub struct TlvEncoder {
    output: DynamicByteBuffer,
    length: usize,
}

impl TlvEncoder {
    const INITIAL_LENGTH: usize = 256;

    pub fn new() -> Self {
        Self::with_buffer(DynamicByteBuffer::new(Self::INITIAL_LENGTH))
    }

    /// Encodes into a caller-supplied buffer; pass a
    /// [`DynamicByteBuffer::fixed`] buffer to enforce a hard output
    /// bound.
    pub fn with_buffer(output: DynamicByteBuffer) -> Self {
        Self { output, length: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Writes raw bytes in front of everything written so far.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), TlvError> {
        self.length += value.len();
        self.output.copy_from_back(value, self.length)?;
        Ok(())
    }

    pub fn write_var_number(&mut self, value: u64) -> Result<(), TlvError> {
        let mut scratch = [0u8; 9];
        let size = write_var_number_scratch(value, &mut scratch);
        self.write_bytes(&scratch[..size])
    }

    /// Prepends a type and length header. `length` is normally the byte
    /// count written since the element's value started.
    pub fn write_type_and_length(&mut self, type_: u64, length: usize) -> Result<(), TlvError> {
        // Back-to-front: length first so the header reads type, length.
        self.write_var_number(length as u64)?;
        self.write_var_number(type_)
    }

    /// Writes a nonNegativeInteger in its minimal 1/2/4/8-byte form.
    pub fn write_non_negative_integer(&mut self, value: u64) -> Result<(), TlvError> {
        match non_negative_integer_size(value) {
            1 => self.write_bytes(&[value as u8]),
            2 => self.write_bytes(&(value as u16).to_be_bytes()),
            4 => self.write_bytes(&(value as u32).to_be_bytes()),
            _ => self.write_bytes(&value.to_be_bytes()),
        }
    }

    pub fn write_blob_tlv(&mut self, type_: u64, value: &[u8]) -> Result<(), TlvError> {
        self.write_bytes(value)?;
        self.write_type_and_length(type_, value.len())
    }

    pub fn write_optional_blob_tlv(
        &mut self,
        type_: u64,
        value: Option<&[u8]>,
    ) -> Result<(), TlvError> {
        match value {
            Some(value) => self.write_blob_tlv(type_, value),
            None => Ok(()),
        }
    }

    pub fn write_non_negative_integer_tlv(
        &mut self,
        type_: u64,
        value: u64,
    ) -> Result<(), TlvError> {
        let save_length = self.length;
        self.write_non_negative_integer(value)?;
        self.write_type_and_length(type_, self.length - save_length)
    }

    pub fn write_optional_non_negative_integer_tlv(
        &mut self,
        type_: u64,
        value: Option<u64>,
    ) -> Result<(), TlvError> {
        match value {
            Some(value) => self.write_non_negative_integer_tlv(type_, value),
            None => Ok(()),
        }
    }

    /// Consumes the encoder and returns the written bytes.
    pub fn finish(self) -> Blob {
        let mut bytes = self.output.into_vec();
        let tail = bytes.split_off(bytes.len() - self.length);
        Blob::from(tail)
    }
}

impl Default for TlvEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward-reading TLV decoder over a shared input buffer.
///
/// Blob reads are zero-copy slices of the input, so they stay valid (and
/// keep the input alive) after the decoder is dropped.
pub struct TlvDecoder {
    input: Blob,
    offset: usize,
}

impl TlvDecoder {
    pub fn new(input: &Blob) -> Self {
        Self {
            input: input.clone(),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the read position; used when a caller captures a raw TLV
    /// span and skips over it.
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    fn require(&self, count: usize) -> Result<(), TlvError> {
        let available = self.input.len() - self.offset;
        if count > available {
            return Err(TlvError::ReadPastEnd {
                requested: count,
                available,
            });
        }
        Ok(())
    }

    pub fn read_var_number(&mut self) -> Result<u64, TlvError> {
        let (value, size) = decode_var_number(&self.input.as_slice()[self.offset..])?;
        self.offset += size;
        Ok(value)
    }

    /// The type code of the next TLV before `end_offset`, without
    /// consuming it; `None` at or past `end_offset`.
    pub fn peek_type(&self, end_offset: usize) -> Result<Option<u64>, TlvError> {
        if self.offset >= end_offset {
            return Ok(None);
        }
        let (type_, _) = decode_var_number(&self.input.as_slice()[self.offset..])?;
        Ok(Some(type_))
    }

    /// Reads a header that must have type `expected_type`; returns the
    /// declared length.
    pub fn read_type_and_length(&mut self, expected_type: u64) -> Result<usize, TlvError> {
        let save_offset = self.offset;
        let type_ = self.read_var_number()?;
        if type_ != expected_type {
            self.offset = save_offset;
            return Err(TlvError::UnexpectedTlvType(type_));
        }
        let length = self.read_var_number()?;
        usize::try_from(length).map_err(|_| TlvError::ReadPastEnd {
            requested: usize::MAX,
            available: self.input.len() - self.offset,
        })
    }

    /// Opens a nested container of type `expected_type`; returns the
    /// offset one past its value. The declared length must fit in the
    /// input.
    pub fn read_nested_tlvs_start(&mut self, expected_type: u64) -> Result<usize, TlvError> {
        let length = self.read_type_and_length(expected_type)?;
        self.require(length)?;
        Ok(self.offset + length)
    }

    /// Skips one TLV the decoder does not recognize, enforcing the
    /// evolvability rule: types 31 and below are critical and abort the
    /// decode, higher types are skipped as opaque spans.
    pub fn skip_unrecognized(&mut self) -> Result<(), TlvError> {
        let type_ = self.read_var_number()?;
        if type_ <= tlv_type::CRITICAL_TYPE_MAX {
            return Err(TlvError::UnexpectedTlvType(type_));
        }
        let length = self.read_var_number()?;
        let length = usize::try_from(length).map_err(|_| TlvError::ReadPastEnd {
            requested: usize::MAX,
            available: self.input.len() - self.offset,
        })?;
        self.require(length)?;
        self.offset += length;
        log::trace!("skipped unrecognized TLV type {type_} ({length} bytes)");
        Ok(())
    }

    /// Closes a container opened with
    /// [`read_nested_tlvs_start`](Self::read_nested_tlvs_start),
    /// skipping any unrecognized trailing fields and verifying the
    /// consumed count matches the declared length.
    pub fn finish_nested_tlvs(&mut self, end_offset: usize) -> Result<(), TlvError> {
        while self.offset < end_offset {
            self.skip_unrecognized()?;
        }
        if self.offset != end_offset {
            return Err(TlvError::TlvLengthMismatch {
                offset: self.offset,
                end: end_offset,
            });
        }
        Ok(())
    }

    /// Reads a TLV of `expected_type`, returning its value as a shared
    /// slice of the input.
    pub fn read_blob_tlv(&mut self, expected_type: u64) -> Result<Blob, TlvError> {
        let length = self.read_type_and_length(expected_type)?;
        self.require(length)?;
        let value = self.input.slice(self.offset..self.offset + length);
        self.offset += length;
        Ok(value)
    }

    pub fn read_optional_blob_tlv(
        &mut self,
        expected_type: u64,
        end_offset: usize,
    ) -> Result<Option<Blob>, TlvError> {
        if self.peek_type(end_offset)? == Some(expected_type) {
            Ok(Some(self.read_blob_tlv(expected_type)?))
        } else {
            Ok(None)
        }
    }

    /// Decodes a nonNegativeInteger spanning the next `length` bytes.
    pub fn read_non_negative_integer(&mut self, length: usize) -> Result<u64, TlvError> {
        self.require(length)?;
        let value =
            decode_non_negative_integer(&self.input.as_slice()[self.offset..self.offset + length])?;
        self.offset += length;
        Ok(value)
    }

    pub fn read_non_negative_integer_tlv(&mut self, expected_type: u64) -> Result<u64, TlvError> {
        let length = self.read_type_and_length(expected_type)?;
        self.read_non_negative_integer(length)
    }

    pub fn read_optional_non_negative_integer_tlv(
        &mut self,
        expected_type: u64,
        end_offset: usize,
    ) -> Result<Option<u64>, TlvError> {
        if self.peek_type(end_offset)? == Some(expected_type) {
            Ok(Some(self.read_non_negative_integer_tlv(expected_type)?))
        } else {
            Ok(None)
        }
    }

    /// Reads a presence-flag TLV: present (value ignored) means true,
    /// absent means false.
    pub fn read_boolean_tlv(
        &mut self,
        expected_type: u64,
        end_offset: usize,
    ) -> Result<bool, TlvError> {
        if self.peek_type(end_offset)? == Some(expected_type) {
            let length = self.read_type_and_length(expected_type)?;
            self.require(length)?;
            self.offset += length;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// A shared slice of the raw input; used to capture an entire TLV
    /// (e.g. a Generic SignatureInfo or a Link encoding) verbatim.
    pub fn get_slice(&self, begin: usize, end: usize) -> Result<Blob, TlvError> {
        if end > self.input.len() || begin > end {
            return Err(TlvError::ReadPastEnd {
                requested: end.saturating_sub(begin),
                available: self.input.len().saturating_sub(begin),
            });
        }
        Ok(self.input.slice(begin..end))
    }
}
