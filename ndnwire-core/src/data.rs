//! Data packets: MetaInfo, content and the signature envelope.
//!
//! The signed portion of an encoded Data runs from the first byte of
//! the Name TLV up to (not including) the first byte of the
//! SignatureValue TLV, so it covers Name, MetaInfo, Content and
//! SignatureInfo.

use ndnwire_common::{content_type, tlv_type};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::blob::{Blob, SignedBlob};
use crate::name::{Name, NameComponent};
use crate::signature::Signature;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

/// The ContentType carried in MetaInfo. `Blob` is the wire default and
/// is omitted from the encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    Blob,
    Link,
    Key,
    Nack,
    /// A code this crate does not model; round-trips unchanged.
    Other(u64),
}

impl ContentType {
    pub fn code(&self) -> u64 {
        match self {
            ContentType::Blob => content_type::BLOB,
            ContentType::Link => content_type::LINK,
            ContentType::Key => content_type::KEY,
            ContentType::Nack => content_type::NACK,
            ContentType::Other(code) => *code,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            content_type::BLOB => ContentType::Blob,
            content_type::LINK => ContentType::Link,
            content_type::KEY => ContentType::Key,
            content_type::NACK => ContentType::Nack,
            other => ContentType::Other(other),
        }
    }
}

/// A Data packet's MetaInfo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    content_type: ContentType,
    freshness_period_ms: Option<u64>,
    final_block_id: Option<NameComponent>,
}

impl MetaInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn set_content_type(&mut self, content_type: ContentType) -> &mut Self {
        self.content_type = content_type;
        self
    }

    pub fn freshness_period_ms(&self) -> Option<u64> {
        self.freshness_period_ms
    }

    pub fn set_freshness_period_ms(&mut self, value: Option<u64>) -> &mut Self {
        self.freshness_period_ms = value;
        self
    }

    pub fn final_block_id(&self) -> Option<&NameComponent> {
        self.final_block_id.as_ref()
    }

    pub fn set_final_block_id(&mut self, component: Option<NameComponent>) -> &mut Self {
        self.final_block_id = component;
        self
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let save_length = encoder.len();
        if let Some(final_block_id) = &self.final_block_id {
            let final_block_save_length = encoder.len();
            final_block_id.encode_tlv(encoder)?;
            encoder.write_type_and_length(
                tlv_type::FINAL_BLOCK_ID,
                encoder.len() - final_block_save_length,
            )?;
        }
        encoder.write_optional_non_negative_integer_tlv(
            tlv_type::FRESHNESS_PERIOD,
            self.freshness_period_ms,
        )?;
        if self.content_type != ContentType::Blob {
            // Blob is the wire default and stays implicit.
            encoder
                .write_non_negative_integer_tlv(tlv_type::CONTENT_TYPE, self.content_type.code())?;
        }
        encoder.write_type_and_length(tlv_type::META_INFO, encoder.len() - save_length)
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(tlv_type::META_INFO)?;
        let content_type = decoder
            .read_optional_non_negative_integer_tlv(tlv_type::CONTENT_TYPE, end_offset)?
            .map_or(ContentType::Blob, ContentType::from_code);
        let freshness_period_ms =
            decoder.read_optional_non_negative_integer_tlv(tlv_type::FRESHNESS_PERIOD, end_offset)?;
        let final_block_id = if decoder.peek_type(end_offset)? == Some(tlv_type::FINAL_BLOCK_ID) {
            let final_block_end = decoder.read_nested_tlvs_start(tlv_type::FINAL_BLOCK_ID)?;
            let component = NameComponent::decode_tlv(decoder)?;
            decoder.finish_nested_tlvs(final_block_end)?;
            Some(component)
        } else {
            None
        };
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(Self {
            content_type,
            freshness_period_ms,
            final_block_id,
        })
    }
}

/// An NDN Data packet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    name: Name,
    meta_info: MetaInfo,
    content: Blob,
    signature: Signature,
}

impl Data {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            meta_info: MetaInfo::new(),
            content: Blob::default(),
            signature: Signature::default(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn name_mut(&mut self) -> &mut Name {
        &mut self.name
    }

    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name = name;
        self
    }

    pub fn meta_info(&self) -> &MetaInfo {
        &self.meta_info
    }

    pub fn meta_info_mut(&mut self) -> &mut MetaInfo {
        &mut self.meta_info
    }

    pub fn set_meta_info(&mut self, meta_info: MetaInfo) -> &mut Self {
        self.meta_info = meta_info;
        self
    }

    pub fn content(&self) -> &Blob {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<Blob>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn signature_mut(&mut self) -> &mut Signature {
        &mut self.signature
    }

    pub fn set_signature(&mut self, signature: Signature) -> &mut Self {
        self.signature = signature;
        self
    }

    /// Encodes to the wire form, with the signed portion bracketing
    /// Name through SignatureInfo.
    pub fn encode(&self) -> Result<SignedBlob, TlvError> {
        let mut encoder = TlvEncoder::new();
        let (signed_begin, signed_end) = self.encode_tlv(&mut encoder)?;
        Ok(SignedBlob::new(encoder.finish(), signed_begin, signed_end))
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        Self::decode_signed(input).map(|(data, _)| data)
    }

    /// Decodes, also returning the input bracketed by the signed
    /// portion found at the fields' actual positions.
    pub fn decode_signed(input: &Blob) -> Result<(Self, SignedBlob), TlvError> {
        let mut decoder = TlvDecoder::new(input);
        let (data, signed_begin, signed_end) = Self::decode_tlv(&mut decoder)?;
        Ok((data, SignedBlob::new(input.clone(), signed_begin, signed_end)))
    }

    /// The name extended with the implicit SHA-256 digest of the whole
    /// wire encoding.
    pub fn full_name(&self) -> Result<Name, TlvError> {
        let wire = self.encode()?;
        let digest = Sha256::digest(wire.as_slice());
        let mut full_name = self.name.clone();
        full_name.append(NameComponent::from_implicit_sha256_digest(
            digest.to_vec(),
        )?);
        Ok(full_name)
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(usize, usize), TlvError> {
        let save_length = encoder.len();
        encoder.write_blob_tlv(tlv_type::SIGNATURE_VALUE, self.signature.signature().as_slice())?;
        let signed_end_from_back = encoder.len();
        self.signature.encode_info_tlv(encoder)?;
        encoder.write_blob_tlv(tlv_type::CONTENT, self.content.as_slice())?;
        self.meta_info.encode_tlv(encoder)?;
        self.name.encode_tlv(encoder)?;
        let signed_begin_from_back = encoder.len();
        encoder.write_type_and_length(tlv_type::DATA, encoder.len() - save_length)?;
        Ok((
            encoder.len() - signed_begin_from_back,
            encoder.len() - signed_end_from_back,
        ))
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<(Self, usize, usize), TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(tlv_type::DATA)?;
        let mut name = None;
        let mut signed_begin = decoder.offset();
        let mut signed_end = decoder.offset();
        let mut meta_info = MetaInfo::new();
        let mut content = Blob::default();
        let mut signature = None;
        let mut signature_value = None;
        while let Some(element_type) = decoder.peek_type(end_offset)? {
            match element_type {
                tlv_type::NAME => {
                    signed_begin = decoder.offset();
                    let (decoded, _, _) = Name::decode_tlv(decoder)?;
                    name = Some(decoded);
                }
                tlv_type::META_INFO => meta_info = MetaInfo::decode_tlv(decoder)?,
                tlv_type::CONTENT => content = decoder.read_blob_tlv(tlv_type::CONTENT)?,
                tlv_type::SIGNATURE_INFO => signature = Some(Signature::decode_info_tlv(decoder)?),
                tlv_type::SIGNATURE_VALUE => {
                    signed_end = decoder.offset();
                    signature_value = Some(decoder.read_blob_tlv(tlv_type::SIGNATURE_VALUE)?);
                }
                _ => decoder.skip_unrecognized()?,
            }
        }
        decoder.finish_nested_tlvs(end_offset)?;
        let name = name.ok_or(TlvError::UnexpectedTlvType(tlv_type::NAME))?;
        let mut signature =
            signature.ok_or(TlvError::UnexpectedTlvType(tlv_type::SIGNATURE_INFO))?;
        let signature_value =
            signature_value.ok_or(TlvError::UnexpectedTlvType(tlv_type::SIGNATURE_VALUE))?;
        signature.set_signature(signature_value);
        Ok((
            Self {
                name,
                meta_info,
                content,
                signature,
            },
            signed_begin,
            signed_end,
        ))
    }
}
