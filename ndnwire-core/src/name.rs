//! NDN names: ordered component sequences with URI conversion,
//! naming-convention markers and canonical ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ndnwire_common::{naming_marker, tlv_type, SHA256_DIGEST_SIZE};
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::tlv::{
    decode_non_negative_integer, encode_non_negative_integer, TlvDecoder, TlvEncoder, TlvError,
};

/// The wire type of a name component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Generic,
    ImplicitSha256Digest,
}

/// One component of a [`Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameComponent {
    component_type: ComponentType,
    value: Blob,
}

impl NameComponent {
    /// A generic component holding `value` verbatim.
    pub fn new(value: impl Into<Blob>) -> Self {
        Self {
            component_type: ComponentType::Generic,
            value: value.into(),
        }
    }

    /// An ImplicitSha256DigestComponent; the digest must be exactly 32
    /// bytes.
    pub fn from_implicit_sha256_digest(digest: impl Into<Blob>) -> Result<Self, TlvError> {
        let value = digest.into();
        if value.len() != SHA256_DIGEST_SIZE {
            return Err(TlvError::InvalidComponentLength {
                expected: SHA256_DIGEST_SIZE,
                actual: value.len(),
            });
        }
        Ok(Self {
            component_type: ComponentType::ImplicitSha256Digest,
            value,
        })
    }

    /// A generic component holding `number` as a nonNegativeInteger.
    pub fn from_number(number: u64) -> Self {
        Self::new(encode_non_negative_integer(number))
    }

    /// A generic component holding a marker octet followed by `number`
    /// as a nonNegativeInteger.
    pub fn from_number_with_marker(number: u64, marker: u8) -> Self {
        let mut bytes = Vec::with_capacity(9);
        bytes.push(marker);
        bytes.extend_from_slice(&encode_non_negative_integer(number));
        Self::new(bytes)
    }

    pub fn from_segment(segment: u64) -> Self {
        Self::from_number_with_marker(segment, naming_marker::SEGMENT)
    }

    pub fn from_segment_offset(offset: u64) -> Self {
        Self::from_number_with_marker(offset, naming_marker::SEGMENT_OFFSET)
    }

    pub fn from_version(version: u64) -> Self {
        Self::from_number_with_marker(version, naming_marker::VERSION)
    }

    /// `timestamp` is in microseconds since the UNIX epoch.
    pub fn from_timestamp(timestamp: u64) -> Self {
        Self::from_number_with_marker(timestamp, naming_marker::TIMESTAMP)
    }

    pub fn from_sequence_number(sequence_number: u64) -> Self {
        Self::from_number_with_marker(sequence_number, naming_marker::SEQUENCE_NUMBER)
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn is_generic(&self) -> bool {
        self.component_type == ComponentType::Generic
    }

    pub fn is_implicit_sha256_digest(&self) -> bool {
        self.component_type == ComponentType::ImplicitSha256Digest
    }

    pub fn value(&self) -> &Blob {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Interprets the whole value as a nonNegativeInteger.
    pub fn to_number(&self) -> Result<u64, TlvError> {
        decode_non_negative_integer(self.value.as_slice())
    }

    /// Interprets the value as a marker octet followed by a
    /// nonNegativeInteger, checking the marker.
    pub fn to_number_with_marker(&self, marker: u8) -> Result<u64, TlvError> {
        match self.value.as_slice().split_first() {
            Some((&first, rest)) if first == marker => decode_non_negative_integer(rest),
            _ => Err(TlvError::InvalidComponentMarker { expected: marker }),
        }
    }

    pub fn to_segment(&self) -> Result<u64, TlvError> {
        self.to_number_with_marker(naming_marker::SEGMENT)
    }

    pub fn to_segment_offset(&self) -> Result<u64, TlvError> {
        self.to_number_with_marker(naming_marker::SEGMENT_OFFSET)
    }

    pub fn to_version(&self) -> Result<u64, TlvError> {
        self.to_number_with_marker(naming_marker::VERSION)
    }

    pub fn to_timestamp(&self) -> Result<u64, TlvError> {
        self.to_number_with_marker(naming_marker::TIMESTAMP)
    }

    pub fn to_sequence_number(&self) -> Result<u64, TlvError> {
        self.to_number_with_marker(naming_marker::SEQUENCE_NUMBER)
    }

    /// The component in URI form, with non-unreserved bytes
    /// percent-escaped.
    pub fn to_escaped_string(&self) -> String {
        let mut out = String::new();
        self.write_escaped(&mut out);
        out
    }

    fn type_code(&self) -> u64 {
        match self.component_type {
            ComponentType::ImplicitSha256Digest => tlv_type::IMPLICIT_SHA256_DIGEST_COMPONENT,
            ComponentType::Generic => tlv_type::NAME_COMPONENT,
        }
    }

    fn write_escaped(&self, out: &mut String) {
        if self.component_type == ComponentType::ImplicitSha256Digest {
            out.push_str("sha256digest=");
            out.push_str(&hex_encode(self.value.as_slice()));
            return;
        }
        let bytes = self.value.as_slice();
        if bytes.iter().all(|&byte| byte == b'.') {
            // A value of zero or more periods gets three extra periods
            // so it survives the URI path syntax.
            out.push_str("...");
            for _ in bytes {
                out.push('.');
            }
            return;
        }
        for &byte in bytes {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.' | b'_') {
                out.push(byte as char);
            } else {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        encoder.write_blob_tlv(self.type_code(), self.value.as_slice())
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        let save_offset = decoder.offset();
        let type_ = decoder.read_var_number()?;
        decoder.seek(save_offset);
        let value = decoder.read_blob_tlv(type_)?;
        if type_ == tlv_type::IMPLICIT_SHA256_DIGEST_COMPONENT {
            Self::from_implicit_sha256_digest(value)
        } else {
            Ok(Self::new(value))
        }
    }
}

impl Ord for NameComponent {
    /// NDN canonical order: type code, then length, then byte-wise.
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_code()
            .cmp(&other.type_code())
            .then_with(|| self.value.len().cmp(&other.value.len()))
            .then_with(|| self.value.as_slice().cmp(other.value.as_slice()))
    }
}

impl PartialOrd for NameComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_escaped_string())
    }
}

impl From<&str> for NameComponent {
    /// Takes the UTF-8 bytes verbatim, without URI unescaping.
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<&[u8]> for NameComponent {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

/// A hierarchical NDN name.
///
/// Lexicographic over components in canonical component order, so a
/// sorted container of names interleaves prefixes before their
/// extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    components: Vec<NameComponent>,
}

impl Name {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: Vec<NameComponent>) -> Self {
        Self { components }
    }

    /// Parses a URI such as `/video/%00%01` or
    /// `ndn:/a/sha256digest=<64 hex digits>`. Scheme and authority
    /// prefixes are stripped; components of one to two periods are
    /// ignored per the URI convention.
    pub fn from_uri(uri: &str) -> Result<Self, TlvError> {
        let mut uri = uri.trim();
        // Strip a scheme such as "ndn:" when the colon comes before any
        // slash.
        if let Some(colon) = uri.find(':') {
            if uri.find('/').map_or(true, |slash| colon < slash) {
                uri = uri[colon + 1..].trim();
            }
        }
        if let Some(rest) = uri.strip_prefix('/') {
            if let Some(after_authority) = rest.strip_prefix('/') {
                // "//authority/..." carries an authority to skip.
                match after_authority.find('/') {
                    Some(slash) => uri = after_authority[slash + 1..].trim_start(),
                    None => return Ok(Self::new()),
                }
            } else {
                uri = rest;
            }
        }
        let mut name = Self::new();
        if uri.is_empty() {
            return Ok(name);
        }
        for part in uri.split('/') {
            if let Some(hex_digest) = part.strip_prefix("sha256digest=") {
                let digest = hex_decode(hex_digest)?;
                name.components
                    .push(NameComponent::from_implicit_sha256_digest(digest)?);
            } else if let Some(value) = unescape_component(part)? {
                name.components.push(NameComponent::new(value));
            }
        }
        Ok(name)
    }

    /// The URI form; the empty name renders as `/`.
    pub fn to_uri(&self) -> String {
        if self.components.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for component in &self.components {
            out.push('/');
            component.write_escaped(&mut out);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[NameComponent] {
        &self.components
    }

    pub fn get(&self, index: usize) -> Option<&NameComponent> {
        self.components.get(index)
    }

    pub fn last(&self) -> Option<&NameComponent> {
        self.components.last()
    }

    pub fn append(&mut self, component: impl Into<NameComponent>) -> &mut Self {
        self.components.push(component.into());
        self
    }

    pub fn append_name(&mut self, name: &Name) -> &mut Self {
        self.components.extend_from_slice(&name.components);
        self
    }

    pub fn append_segment(&mut self, segment: u64) -> &mut Self {
        self.append(NameComponent::from_segment(segment))
    }

    pub fn append_version(&mut self, version: u64) -> &mut Self {
        self.append(NameComponent::from_version(version))
    }

    pub fn append_timestamp(&mut self, timestamp: u64) -> &mut Self {
        self.append(NameComponent::from_timestamp(timestamp))
    }

    pub fn append_sequence_number(&mut self, sequence_number: u64) -> &mut Self {
        self.append(NameComponent::from_sequence_number(sequence_number))
    }

    pub fn pop(&mut self) -> Option<NameComponent> {
        self.components.pop()
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// The first `count` components (all of them if `count` exceeds the
    /// length).
    pub fn get_prefix(&self, count: usize) -> Name {
        self.get_sub_name(0, count)
    }

    pub fn get_sub_name(&self, start: usize, count: usize) -> Name {
        let start = start.min(self.components.len());
        let end = start.saturating_add(count).min(self.components.len());
        Name {
            components: self.components[start..end].to_vec(),
        }
    }

    /// True when every component of `self` equals the corresponding
    /// component of `other`. The empty name is a prefix of everything.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(ours, theirs)| ours == theirs)
    }

    /// Encodes just this name as a wire TLV.
    pub fn encode(&self) -> Result<Blob, TlvError> {
        let mut encoder = TlvEncoder::new();
        self.encode_tlv(&mut encoder)?;
        Ok(encoder.finish())
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        let mut decoder = TlvDecoder::new(input);
        let (name, _, _) = Self::decode_tlv(&mut decoder)?;
        Ok(name)
    }

    /// Appends the name TLV to `encoder` and returns the offsets (in
    /// the coordinates of the bytes written so far, counted from the
    /// front) of the first component's first byte and the last
    /// component's first byte. Both equal the value start for an empty
    /// name. Callers re-base these when they prepend further bytes.
    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(usize, usize), TlvError> {
        let save_length = encoder.len();
        let mut signed_end_from_back = 0;
        for (index, component) in self.components.iter().enumerate().rev() {
            component.encode_tlv(encoder)?;
            if index + 1 == self.components.len() {
                signed_end_from_back = encoder.len();
            }
        }
        let signed_begin_from_back = encoder.len();
        encoder.write_type_and_length(tlv_type::NAME, encoder.len() - save_length)?;
        let signed_begin = encoder.len() - signed_begin_from_back;
        let signed_end = if self.components.is_empty() {
            signed_begin
        } else {
            encoder.len() - signed_end_from_back
        };
        Ok((signed_begin, signed_end))
    }

    /// Decodes a name TLV, also returning the input offsets of the
    /// first component and of the last component (equal when the name
    /// is empty).
    pub(crate) fn decode_tlv(
        decoder: &mut TlvDecoder,
    ) -> Result<(Self, usize, usize), TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(tlv_type::NAME)?;
        let signed_begin = decoder.offset();
        let mut signed_end = signed_begin;
        let mut components = Vec::new();
        while decoder.offset() < end_offset {
            signed_end = decoder.offset();
            components.push(NameComponent::decode_tlv(decoder)?);
        }
        decoder.finish_nested_tlvs(end_offset)?;
        Ok((Self { components }, signed_begin, signed_end))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for Name {
    type Err = TlvError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        Self::from_uri(uri)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, TlvError> {
    let raw = hex.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(TlvError::InvalidUri("odd-length hex digest"));
    }
    raw.chunks_exact(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|text| u8::from_str_radix(text, 16).ok())
                .ok_or(TlvError::InvalidUri("invalid hex digit in digest"))
        })
        .collect()
}

/// Percent-unescapes one URI path segment. `Ok(None)` means the segment
/// is an ignorable run of zero to two periods.
fn unescape_component(part: &str) -> Result<Option<Vec<u8>>, TlvError> {
    let mut bytes = Vec::with_capacity(part.len());
    let raw = part.as_bytes();
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let escape = raw
                .get(i + 1..i + 3)
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .ok_or(TlvError::InvalidUri("truncated percent-escape"))?;
            bytes.push(
                u8::from_str_radix(escape, 16)
                    .map_err(|_| TlvError::InvalidUri("invalid percent-escape"))?,
            );
            i += 3;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }
    if bytes.iter().all(|&byte| byte == b'.') {
        if bytes.len() <= 2 {
            // "", "." and ".." have path meaning, not component meaning.
            return Ok(None);
        }
        return Ok(Some(bytes[3..].to_vec()));
    }
    Ok(Some(bytes))
}
