//! Signature metadata carried in a Data packet's SignatureInfo, plus
//! the KeyLocator and ValidityPeriod structures it nests.
//!
//! This crate does not sign or verify; it round-trips the wire fields
//! so callers can layer crypto on top.

use chrono::{DateTime, NaiveDateTime, Utc};
use ndnwire_common::{signature_type, tlv_type, validity_type};
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::name::Name;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

/// Where a verifier can find the signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyLocator {
    /// The name of the key or certificate.
    KeyName(Name),
    /// A SHA-256 digest identifying the key.
    KeyDigest(Blob),
}

impl KeyLocator {
    /// Writes a key locator TLV of `outer_type` (KeyLocator in
    /// SignatureInfo, PublisherPublicKeyLocator in Selectors). `None`
    /// writes an empty locator TLV.
    pub(crate) fn encode_tlv(
        key_locator: Option<&KeyLocator>,
        outer_type: u64,
        encoder: &mut TlvEncoder,
    ) -> Result<(), TlvError> {
        let save_length = encoder.len();
        match key_locator {
            Some(KeyLocator::KeyName(name)) => {
                name.encode_tlv(encoder)?;
            }
            Some(KeyLocator::KeyDigest(digest)) => {
                encoder.write_blob_tlv(tlv_type::KEY_LOCATOR_DIGEST, digest.as_slice())?;
            }
            None => {}
        }
        encoder.write_type_and_length(outer_type, encoder.len() - save_length)
    }

    /// Reads a key locator TLV of `outer_type`; an empty value decodes
    /// to `None`.
    pub(crate) fn decode_tlv(
        outer_type: u64,
        decoder: &mut TlvDecoder,
    ) -> Result<Option<KeyLocator>, TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(outer_type)?;
        let key_locator = match decoder.peek_type(end_offset)? {
            None => None,
            Some(tlv_type::NAME) => {
                let (name, _, _) = Name::decode_tlv(decoder)?;
                Some(KeyLocator::KeyName(name))
            }
            Some(tlv_type::KEY_LOCATOR_DIGEST) => Some(KeyLocator::KeyDigest(
                decoder.read_blob_tlv(tlv_type::KEY_LOCATOR_DIGEST)?,
            )),
            Some(other) => return Err(TlvError::UnexpectedTlvType(other)),
        };
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(key_locator)
    }
}

/// The time window in which a signature is valid, in milliseconds since
/// the UNIX epoch. The wire form is a pair of ISO 8601 compact UTC
/// timestamps, so sub-second precision is truncated on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    not_before: u64,
    not_after: u64,
}

impl ValidityPeriod {
    pub fn new(not_before: u64, not_after: u64) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    pub fn not_before(&self) -> u64 {
        self.not_before
    }

    pub fn not_after(&self) -> u64 {
        self.not_after
    }

    /// True when `time_ms` falls inside the period, inclusive on both
    /// ends.
    pub fn is_valid_at(&self, time_ms: u64) -> bool {
        self.not_before <= time_ms && time_ms <= self.not_after
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let save_length = encoder.len();
        encoder.write_blob_tlv(
            validity_type::NOT_AFTER,
            to_iso_string(self.not_after)?.as_bytes(),
        )?;
        encoder.write_blob_tlv(
            validity_type::NOT_BEFORE,
            to_iso_string(self.not_before)?.as_bytes(),
        )?;
        encoder.write_type_and_length(validity_type::VALIDITY_PERIOD, encoder.len() - save_length)
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(validity_type::VALIDITY_PERIOD)?;
        let not_before = from_iso_string(decoder.read_blob_tlv(validity_type::NOT_BEFORE)?)?;
        let not_after = from_iso_string(decoder.read_blob_tlv(validity_type::NOT_AFTER)?)?;
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

fn to_iso_string(time_ms: u64) -> Result<String, TlvError> {
    let seconds = i64::try_from(time_ms / 1000).map_err(|_| TlvError::InvalidTimestamp)?;
    let datetime =
        DateTime::<Utc>::from_timestamp(seconds, 0).ok_or(TlvError::InvalidTimestamp)?;
    Ok(datetime.format("%Y%m%dT%H%M%S").to_string())
}

fn from_iso_string(value: Blob) -> Result<u64, TlvError> {
    let text = std::str::from_utf8(value.as_slice()).map_err(|_| TlvError::InvalidUtf8)?;
    let datetime = NaiveDateTime::parse_from_str(text, "%Y%m%dT%H%M%S")
        .map_err(|_| TlvError::InvalidTimestamp)?;
    u64::try_from(datetime.and_utc().timestamp_millis()).map_err(|_| TlvError::InvalidTimestamp)
}

/// A Data packet's signature: the SignatureInfo metadata together with
/// the SignatureValue bytes.
///
/// Unrecognized signature types decode to [`Signature::Generic`], which
/// preserves the whole SignatureInfo TLV so the packet re-encodes
/// byte-identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    DigestSha256 {
        signature: Blob,
    },
    Sha256WithRsa {
        key_locator: Option<KeyLocator>,
        validity_period: Option<ValidityPeriod>,
        signature: Blob,
    },
    Sha256WithEcdsa {
        key_locator: Option<KeyLocator>,
        validity_period: Option<ValidityPeriod>,
        signature: Blob,
    },
    HmacWithSha256 {
        key_locator: Option<KeyLocator>,
        signature: Blob,
    },
    Generic {
        /// The full SignatureInfo TLV, header included.
        signature_info_encoding: Blob,
        /// The decoded SignatureType, if the encoding held one.
        type_code: Option<u64>,
        signature: Blob,
    },
}

impl Signature {
    /// The SignatureType code this variant encodes as, when known.
    pub fn type_code(&self) -> Option<u64> {
        match self {
            Signature::DigestSha256 { .. } => Some(signature_type::DIGEST_SHA256),
            Signature::Sha256WithRsa { .. } => Some(signature_type::SHA256_WITH_RSA),
            Signature::Sha256WithEcdsa { .. } => Some(signature_type::SHA256_WITH_ECDSA),
            Signature::HmacWithSha256 { .. } => Some(signature_type::HMAC_WITH_SHA256),
            Signature::Generic { type_code, .. } => *type_code,
        }
    }

    /// The SignatureValue bytes.
    pub fn signature(&self) -> &Blob {
        match self {
            Signature::DigestSha256 { signature }
            | Signature::Sha256WithRsa { signature, .. }
            | Signature::Sha256WithEcdsa { signature, .. }
            | Signature::HmacWithSha256 { signature, .. }
            | Signature::Generic { signature, .. } => signature,
        }
    }

    pub fn set_signature(&mut self, value: Blob) {
        match self {
            Signature::DigestSha256 { signature }
            | Signature::Sha256WithRsa { signature, .. }
            | Signature::Sha256WithEcdsa { signature, .. }
            | Signature::HmacWithSha256 { signature, .. }
            | Signature::Generic { signature, .. } => *signature = value,
        }
    }

    pub fn key_locator(&self) -> Option<&KeyLocator> {
        match self {
            Signature::Sha256WithRsa { key_locator, .. }
            | Signature::Sha256WithEcdsa { key_locator, .. }
            | Signature::HmacWithSha256 { key_locator, .. } => key_locator.as_ref(),
            Signature::DigestSha256 { .. } | Signature::Generic { .. } => None,
        }
    }

    pub fn validity_period(&self) -> Option<&ValidityPeriod> {
        match self {
            Signature::Sha256WithRsa {
                validity_period, ..
            }
            | Signature::Sha256WithEcdsa {
                validity_period, ..
            } => validity_period.as_ref(),
            _ => None,
        }
    }

    /// Writes the SignatureInfo TLV. A Generic signature's stored
    /// encoding is validated as a SignatureInfo TLV, then written
    /// verbatim.
    pub(crate) fn encode_info_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        if let Signature::Generic {
            signature_info_encoding,
            ..
        } = self
        {
            let mut check = TlvDecoder::new(signature_info_encoding);
            let end_offset = check.read_nested_tlvs_start(tlv_type::SIGNATURE_INFO)?;
            check.read_non_negative_integer_tlv(tlv_type::SIGNATURE_TYPE)?;
            check.finish_nested_tlvs(end_offset)?;
            return encoder.write_bytes(signature_info_encoding.as_slice());
        }
        let save_length = encoder.len();
        match self {
            Signature::DigestSha256 { .. } => {}
            Signature::Sha256WithRsa {
                key_locator,
                validity_period,
                ..
            }
            | Signature::Sha256WithEcdsa {
                key_locator,
                validity_period,
                ..
            } => {
                if let Some(period) = validity_period {
                    period.encode_tlv(encoder)?;
                }
                KeyLocator::encode_tlv(key_locator.as_ref(), tlv_type::KEY_LOCATOR, encoder)?;
            }
            Signature::HmacWithSha256 { key_locator, .. } => {
                KeyLocator::encode_tlv(key_locator.as_ref(), tlv_type::KEY_LOCATOR, encoder)?;
            }
            Signature::Generic { .. } => unreachable!(),
        }
        // type_code() is Some for every variant but Generic.
        let type_code = self.type_code().unwrap_or_default();
        encoder.write_non_negative_integer_tlv(tlv_type::SIGNATURE_TYPE, type_code)?;
        encoder.write_type_and_length(tlv_type::SIGNATURE_INFO, encoder.len() - save_length)
    }

    /// Reads a SignatureInfo TLV. The SignatureValue is left empty for
    /// the caller to fill in.
    pub(crate) fn decode_info_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        let begin_offset = decoder.offset();
        let end_offset = decoder.read_nested_tlvs_start(tlv_type::SIGNATURE_INFO)?;
        let type_code = decoder.read_non_negative_integer_tlv(tlv_type::SIGNATURE_TYPE)?;
        let signature = match type_code {
            signature_type::DIGEST_SHA256 => Signature::DigestSha256 {
                signature: Blob::default(),
            },
            signature_type::SHA256_WITH_RSA => Signature::Sha256WithRsa {
                key_locator: KeyLocator::decode_tlv(tlv_type::KEY_LOCATOR, decoder)?,
                validity_period: decode_optional_validity_period(decoder, end_offset)?,
                signature: Blob::default(),
            },
            signature_type::SHA256_WITH_ECDSA => Signature::Sha256WithEcdsa {
                key_locator: KeyLocator::decode_tlv(tlv_type::KEY_LOCATOR, decoder)?,
                validity_period: decode_optional_validity_period(decoder, end_offset)?,
                signature: Blob::default(),
            },
            signature_type::HMAC_WITH_SHA256 => Signature::HmacWithSha256 {
                key_locator: KeyLocator::decode_tlv(tlv_type::KEY_LOCATOR, decoder)?,
                signature: Blob::default(),
            },
            other => {
                // Preserve the whole TLV so it re-encodes unchanged.
                let signature = Signature::Generic {
                    signature_info_encoding: decoder.get_slice(begin_offset, end_offset)?,
                    type_code: Some(other),
                    signature: Blob::default(),
                };
                decoder.seek(end_offset);
                signature
            }
        };
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(signature)
    }
}

impl Default for Signature {
    fn default() -> Self {
        Signature::DigestSha256 {
            signature: Blob::default(),
        }
    }
}

fn decode_optional_validity_period(
    decoder: &mut TlvDecoder,
    end_offset: usize,
) -> Result<Option<ValidityPeriod>, TlvError> {
    if decoder.peek_type(end_offset)? == Some(validity_type::VALIDITY_PERIOD) {
        Ok(Some(ValidityPeriod::decode_tlv(decoder)?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_round_trip(signature: &Signature) -> Signature {
        let mut encoder = TlvEncoder::new();
        signature.encode_info_tlv(&mut encoder).unwrap();
        let wire = encoder.finish();
        let mut decoder = TlvDecoder::new(&wire);
        Signature::decode_info_tlv(&mut decoder).unwrap()
    }

    #[test]
    fn test_validity_period_iso_form() {
        // 1e9 seconds after the epoch is 2001-09-09T01:46:40 UTC.
        let period = ValidityPeriod::new(1_000_000_000_000, 1_000_086_400_000);
        let mut encoder = TlvEncoder::new();
        period.encode_tlv(&mut encoder).unwrap();
        let wire = encoder.finish();
        let text = String::from_utf8_lossy(wire.as_slice()).into_owned();
        assert!(text.contains("20010909T014640"));
        assert!(text.contains("20010910T014640"));

        let mut decoder = TlvDecoder::new(&wire);
        assert_eq!(ValidityPeriod::decode_tlv(&mut decoder).unwrap(), period);
    }

    #[test]
    fn test_validity_period_truncates_milliseconds() {
        let period = ValidityPeriod::new(1_000_000_000_700, 2_000_000_000_999);
        let mut encoder = TlvEncoder::new();
        period.encode_tlv(&mut encoder).unwrap();
        let wire = encoder.finish();
        let mut decoder = TlvDecoder::new(&wire);
        let decoded = ValidityPeriod::decode_tlv(&mut decoder).unwrap();
        assert_eq!(decoded.not_before(), 1_000_000_000_000);
        assert_eq!(decoded.not_after(), 2_000_000_000_000);
    }

    #[test]
    fn test_validity_period_window() {
        let period = ValidityPeriod::new(1_000, 2_000);
        assert!(!period.is_valid_at(999));
        assert!(period.is_valid_at(1_000));
        assert!(period.is_valid_at(2_000));
        assert!(!period.is_valid_at(2_001));
    }

    #[test]
    fn test_digest_sha256_info() {
        let signature = Signature::DigestSha256 {
            signature: Blob::default(),
        };
        let mut encoder = TlvEncoder::new();
        signature.encode_info_tlv(&mut encoder).unwrap();
        // SignatureInfo(22) { SignatureType(27) = 0 }
        assert_eq!(encoder.finish().as_slice(), &[22, 3, 27, 1, 0]);
        assert_eq!(info_round_trip(&signature), signature);
    }

    #[test]
    fn test_rsa_info_round_trip() {
        let signature = Signature::Sha256WithRsa {
            key_locator: Some(KeyLocator::KeyName(Name::from_uri("/issuer/KEY/1").unwrap())),
            validity_period: Some(ValidityPeriod::new(1_000_000_000_000, 2_000_000_000_000)),
            signature: Blob::default(),
        };
        assert_eq!(info_round_trip(&signature), signature);
    }

    #[test]
    fn test_hmac_info_with_digest_locator() {
        let signature = Signature::HmacWithSha256 {
            key_locator: Some(KeyLocator::KeyDigest(Blob::from(&[0x11u8; 32]))),
            signature: Blob::default(),
        };
        assert_eq!(info_round_trip(&signature), signature);
    }

    #[test]
    fn test_empty_key_locator_round_trip() {
        let signature = Signature::Sha256WithEcdsa {
            key_locator: None,
            validity_period: None,
            signature: Blob::default(),
        };
        assert_eq!(info_round_trip(&signature), signature);
    }

    #[test]
    fn test_unknown_type_decodes_to_generic() {
        // SignatureInfo with type 200 and a private field 201.
        let wire = Blob::from(&[22u8, 7, 27, 1, 200, 201, 2, 0xca, 0xfe]);
        let mut decoder = TlvDecoder::new(&wire);
        let signature = Signature::decode_info_tlv(&mut decoder).unwrap();
        match &signature {
            Signature::Generic {
                signature_info_encoding,
                type_code,
                ..
            } => {
                assert_eq!(*type_code, Some(200));
                assert_eq!(signature_info_encoding.as_slice(), wire.as_slice());
            }
            other => panic!("expected Generic, got {other:?}"),
        }
        // And it re-encodes byte for byte.
        let mut encoder = TlvEncoder::new();
        signature.encode_info_tlv(&mut encoder).unwrap();
        assert_eq!(encoder.finish().as_slice(), wire.as_slice());
    }

    #[test]
    fn test_generic_rejects_invalid_encoding() {
        let signature = Signature::Generic {
            signature_info_encoding: Blob::from(&b"not tlv"[..]),
            type_code: None,
            signature: Blob::default(),
        };
        let mut encoder = TlvEncoder::new();
        assert!(signature.encode_info_tlv(&mut encoder).is_err());
    }
}
