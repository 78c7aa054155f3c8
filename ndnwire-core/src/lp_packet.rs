//! NDNLPv2 link-layer packets: hop-by-hop header fields wrapped around
//! a network-layer fragment.
//!
//! Unrecognized header fields are ignorable only when their type is odd
//! and falls in the reserved range 800 to 959; anything else aborts the
//! decode.

use ndnwire_common::{lp_type, nack_reason, tlv_type};
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

/// The reason carried in a network NACK. `None` encodes as an empty
/// Nack TLV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NackReason {
    #[default]
    None,
    Congestion,
    Duplicate,
    NoRoute,
    /// A reason code this crate does not model; round-trips unchanged.
    Other(u64),
}

impl NackReason {
    pub fn code(&self) -> u64 {
        match self {
            NackReason::None => 0,
            NackReason::Congestion => nack_reason::CONGESTION,
            NackReason::Duplicate => nack_reason::DUPLICATE,
            NackReason::NoRoute => nack_reason::NO_ROUTE,
            NackReason::Other(code) => *code,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => NackReason::None,
            nack_reason::CONGESTION => NackReason::Congestion,
            nack_reason::DUPLICATE => NackReason::Duplicate,
            nack_reason::NO_ROUTE => NackReason::NoRoute,
            other => NackReason::Other(other),
        }
    }
}

/// A network-level NACK header, sent in place of a Data to reject an
/// Interest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkNack {
    reason: NackReason,
}

impl NetworkNack {
    pub fn new(reason: NackReason) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> NackReason {
        self.reason
    }

    pub fn set_reason(&mut self, reason: NackReason) -> &mut Self {
        self.reason = reason;
        self
    }
}

/// An NDNLPv2 LpPacket: optional header fields plus the bytes of the
/// network packet it carries.
///
/// The fragment is kept as raw bytes; decode it with
/// [`Interest::decode`](crate::interest::Interest::decode) or
/// [`Data::decode`](crate::data::Data::decode) after inspecting its
/// first type octet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpPacket {
    incoming_face_id: Option<u64>,
    next_hop_face_id: Option<u64>,
    congestion_mark: Option<u64>,
    nack: Option<NetworkNack>,
    fragment: Blob,
}

impl LpPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incoming_face_id(&self) -> Option<u64> {
        self.incoming_face_id
    }

    pub fn set_incoming_face_id(&mut self, face_id: Option<u64>) -> &mut Self {
        self.incoming_face_id = face_id;
        self
    }

    pub fn next_hop_face_id(&self) -> Option<u64> {
        self.next_hop_face_id
    }

    pub fn set_next_hop_face_id(&mut self, face_id: Option<u64>) -> &mut Self {
        self.next_hop_face_id = face_id;
        self
    }

    pub fn congestion_mark(&self) -> Option<u64> {
        self.congestion_mark
    }

    pub fn set_congestion_mark(&mut self, mark: Option<u64>) -> &mut Self {
        self.congestion_mark = mark;
        self
    }

    pub fn nack(&self) -> Option<&NetworkNack> {
        self.nack.as_ref()
    }

    pub fn set_nack(&mut self, nack: Option<NetworkNack>) -> &mut Self {
        self.nack = nack;
        self
    }

    /// The wire bytes of the carried network packet; empty for a
    /// header-only LpPacket.
    pub fn fragment(&self) -> &Blob {
        &self.fragment
    }

    pub fn set_fragment(&mut self, fragment: impl Into<Blob>) -> &mut Self {
        self.fragment = fragment.into();
        self
    }

    pub fn encode(&self) -> Result<Blob, TlvError> {
        let mut encoder = TlvEncoder::new();
        self.encode_tlv(&mut encoder)?;
        Ok(encoder.finish())
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        let mut decoder = TlvDecoder::new(input);
        Self::decode_tlv(&mut decoder)
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let save_length = encoder.len();
        if !self.fragment.is_empty() {
            encoder.write_blob_tlv(lp_type::FRAGMENT, self.fragment.as_slice())?;
        }
        // Header fields in descending type order, so the wire reads
        // ascending.
        encoder.write_optional_non_negative_integer_tlv(
            lp_type::CONGESTION_MARK,
            self.congestion_mark,
        )?;
        encoder.write_optional_non_negative_integer_tlv(
            lp_type::INCOMING_FACE_ID,
            self.incoming_face_id,
        )?;
        encoder.write_optional_non_negative_integer_tlv(
            lp_type::NEXT_HOP_FACE_ID,
            self.next_hop_face_id,
        )?;
        if let Some(nack) = &self.nack {
            let nack_save_length = encoder.len();
            if nack.reason() != NackReason::None {
                encoder
                    .write_non_negative_integer_tlv(lp_type::NACK_REASON, nack.reason().code())?;
            }
            encoder.write_type_and_length(lp_type::NACK, encoder.len() - nack_save_length)?;
        }
        encoder.write_type_and_length(lp_type::LP_PACKET, encoder.len() - save_length)
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(lp_type::LP_PACKET)?;
        let mut packet = LpPacket::new();
        while decoder.offset() < end_offset {
            let field_type = decoder.read_var_number()?;
            let field_length = usize::try_from(decoder.read_var_number()?).unwrap_or(usize::MAX);
            let field_end = decoder.offset().saturating_add(field_length);
            if field_end > decoder.input_len() {
                return Err(TlvError::ReadPastEnd {
                    requested: field_length,
                    available: decoder.input_len() - decoder.offset(),
                });
            }
            match field_type {
                lp_type::FRAGMENT => {
                    packet.fragment = decoder.get_slice(decoder.offset(), field_end)?;
                    decoder.seek(field_end);
                    // The fragment is the last field.
                    break;
                }
                lp_type::NACK => {
                    let code = decoder
                        .read_optional_non_negative_integer_tlv(lp_type::NACK_REASON, field_end)?
                        .unwrap_or(0);
                    packet.nack = Some(NetworkNack::new(NackReason::from_code(code)));
                    decoder.finish_nested_tlvs(field_end)?;
                }
                lp_type::INCOMING_FACE_ID => {
                    packet.incoming_face_id = Some(decoder.read_non_negative_integer(field_length)?);
                }
                lp_type::NEXT_HOP_FACE_ID => {
                    packet.next_hop_face_id = Some(decoder.read_non_negative_integer(field_length)?);
                }
                lp_type::CONGESTION_MARK => {
                    packet.congestion_mark = Some(decoder.read_non_negative_integer(field_length)?);
                }
                other => {
                    let can_ignore = (lp_type::IGNORE_MIN..=lp_type::IGNORE_MAX).contains(&other)
                        && other % 2 == 1;
                    if !can_ignore {
                        return Err(TlvError::UnexpectedTlvType(other));
                    }
                    log::trace!("ignoring LpPacket header field type {other}");
                    decoder.seek(field_end);
                }
            }
        }
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(packet)
    }
}

/// True when `input` starts an LpPacket rather than a bare Interest or
/// Data.
pub fn is_lp_packet(input: &[u8]) -> bool {
    crate::tlv::decode_var_number(input)
        .map(|(type_, _)| type_ == lp_type::LP_PACKET)
        .unwrap_or(false)
}

/// Splits a received network-layer element: an LpPacket is unwrapped to
/// its headers and fragment, while a bare Interest or Data passes
/// through with no headers.
pub fn unwrap_lp_packet(element: &Blob) -> Result<LpPacket, TlvError> {
    if is_lp_packet(element.as_slice()) {
        LpPacket::decode(element)
    } else {
        let mut packet = LpPacket::new();
        packet.set_fragment(element.clone());
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interest::Interest;
    use crate::name::Name;
    use ndnwire_common::tlv_type as network_type;

    fn interest_fragment() -> Blob {
        let mut interest = Interest::new(Name::from_uri("/lp/test").unwrap());
        interest.set_nonce(Some(Blob::from(&[9u8, 9, 9, 9])));
        interest.encode().unwrap().into_blob()
    }

    #[test]
    fn test_round_trip_with_headers() {
        let mut packet = LpPacket::new();
        packet
            .set_incoming_face_id(Some(6))
            .set_next_hop_face_id(Some(7))
            .set_congestion_mark(Some(1))
            .set_fragment(interest_fragment());
        let wire = packet.encode().unwrap();
        assert_eq!(
            crate::tlv::decode_var_number(wire.as_slice()).unwrap().0,
            lp_type::LP_PACKET
        );
        let decoded = LpPacket::decode(&wire).unwrap();
        assert_eq!(decoded, packet);

        // The fragment is itself a decodable Interest.
        let interest = Interest::decode(decoded.fragment()).unwrap();
        assert_eq!(interest.name().to_uri(), "/lp/test");
    }

    #[test]
    fn test_nack_round_trip() {
        let mut packet = LpPacket::new();
        packet
            .set_nack(Some(NetworkNack::new(NackReason::NoRoute)))
            .set_fragment(interest_fragment());
        let decoded = LpPacket::decode(&packet.encode().unwrap()).unwrap();
        assert_eq!(decoded.nack().unwrap().reason(), NackReason::NoRoute);
    }

    #[test]
    fn test_nack_without_reason() {
        let mut packet = LpPacket::new();
        packet.set_nack(Some(NetworkNack::default()));
        let wire = packet.encode().unwrap();
        // Nack(800) with empty value; 800 encodes as a 3-byte type.
        assert_eq!(wire.as_slice(), &[100, 4, 253, 3, 32, 0]);
        let decoded = LpPacket::decode(&wire).unwrap();
        assert_eq!(decoded.nack().unwrap().reason(), NackReason::None);
    }

    #[test]
    fn test_unknown_reason_code_preserved() {
        let mut packet = LpPacket::new();
        packet.set_nack(Some(NetworkNack::new(NackReason::Other(321))));
        let decoded = LpPacket::decode(&packet.encode().unwrap()).unwrap();
        assert_eq!(decoded.nack().unwrap().reason(), NackReason::Other(321));
    }

    #[test]
    fn test_ignorable_header_field() {
        // Type 803 is odd and inside the reserved range, so it is
        // skipped; the face id after it is still read.
        let mut encoder = TlvEncoder::new();
        encoder.write_non_negative_integer_tlv(lp_type::INCOMING_FACE_ID, 9).unwrap();
        encoder.write_blob_tlv(803, &[0xde, 0xad]).unwrap();
        let body_len = encoder.len();
        encoder.write_type_and_length(lp_type::LP_PACKET, body_len).unwrap();
        let wire = encoder.finish();

        let decoded = LpPacket::decode(&wire).unwrap();
        assert_eq!(decoded.incoming_face_id(), Some(9));
    }

    #[test]
    fn test_unignorable_header_field() {
        // Type 802 is even, so it cannot be skipped.
        let mut encoder = TlvEncoder::new();
        encoder.write_blob_tlv(802, &[0xde, 0xad]).unwrap();
        let body_len = encoder.len();
        encoder.write_type_and_length(lp_type::LP_PACKET, body_len).unwrap();
        let wire = encoder.finish();

        assert_eq!(
            LpPacket::decode(&wire),
            Err(TlvError::UnexpectedTlvType(802))
        );
    }

    #[test]
    fn test_bare_packet_passthrough() {
        let fragment = interest_fragment();
        let unwrapped = unwrap_lp_packet(&fragment).unwrap();
        assert!(unwrapped.nack().is_none());
        assert_eq!(unwrapped.fragment().as_slice(), fragment.as_slice());
        assert!(!is_lp_packet(fragment.as_slice()));
        assert_eq!(
            crate::tlv::decode_var_number(fragment.as_slice()).unwrap().0,
            network_type::INTEREST
        );
    }
}
