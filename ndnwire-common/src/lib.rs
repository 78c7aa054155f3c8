//! Wire-level constants shared across the ndnwire crates: packet size
//! limits and the assigned NDN-TLV, NDNLPv2 and NFD management type
//! numbers.
//!
//! All TLV type codes are `u64` because a TLV type is a VarNumber on the
//! wire; the handful of one-octet naming-convention markers stay `u8`.

/// Maximum size of an encoded NDN packet, in bytes.
///
/// The practical limit agreed across NDN forwarders; the framer rejects
/// any element whose declared size exceeds this.
pub const MAX_NDN_PACKET_SIZE: usize = 8800;

/// Size of a SHA-256 digest in bytes, and therefore of an implicit
/// digest name component.
pub const SHA256_DIGEST_SIZE: usize = 32;

/// AES-128 block size in bytes (initial vector length for CBC payloads).
pub const AES_128_BLOCK_SIZE: usize = 16;

/// Nonce length emitted in encoded Interests, in bytes.
pub const INTEREST_NONCE_SIZE: usize = 4;

/// Core NDN-TLV type numbers for Interest/Data packets and their nested
/// fields.
pub mod tlv_type {
    pub const IMPLICIT_SHA256_DIGEST_COMPONENT: u64 = 1;
    pub const INTEREST: u64 = 5;
    pub const DATA: u64 = 6;
    pub const NAME: u64 = 7;
    pub const NAME_COMPONENT: u64 = 8;
    pub const SELECTORS: u64 = 9;
    pub const NONCE: u64 = 10;
    pub const INTEREST_LIFETIME: u64 = 12;
    pub const MIN_SUFFIX_COMPONENTS: u64 = 13;
    pub const MAX_SUFFIX_COMPONENTS: u64 = 14;
    pub const PUBLISHER_PUBLIC_KEY_LOCATOR: u64 = 15;
    pub const EXCLUDE: u64 = 16;
    pub const CHILD_SELECTOR: u64 = 17;
    pub const MUST_BE_FRESH: u64 = 18;
    pub const ANY: u64 = 19;
    pub const META_INFO: u64 = 20;
    pub const CONTENT: u64 = 21;
    pub const SIGNATURE_INFO: u64 = 22;
    pub const SIGNATURE_VALUE: u64 = 23;
    pub const CONTENT_TYPE: u64 = 24;
    pub const FRESHNESS_PERIOD: u64 = 25;
    pub const FINAL_BLOCK_ID: u64 = 26;
    pub const SIGNATURE_TYPE: u64 = 27;
    pub const KEY_LOCATOR: u64 = 28;
    pub const KEY_LOCATOR_DIGEST: u64 = 29;
    pub const FORWARDING_HINT: u64 = 30;
    pub const SELECTED_DELEGATION: u64 = 32;

    /// Unrecognized types at or below this code abort decoding of their
    /// container; higher codes are skipped.
    pub const CRITICAL_TYPE_MAX: u64 = 31;
}

/// Delegation entries, nested inside ForwardingHint or a Link payload.
/// These numbers are context-local and overlap the top-level table.
pub mod link_type {
    pub const PREFERENCE: u64 = 30;
    pub const DELEGATION: u64 = 31;
}

/// SignatureType codes carried in SignatureInfo.
pub mod signature_type {
    pub const DIGEST_SHA256: u64 = 0;
    pub const SHA256_WITH_RSA: u64 = 1;
    pub const SHA256_WITH_ECDSA: u64 = 3;
    pub const HMAC_WITH_SHA256: u64 = 4;
}

/// ContentType codes carried in MetaInfo.
pub mod content_type {
    pub const BLOB: u64 = 0;
    pub const LINK: u64 = 1;
    pub const KEY: u64 = 2;
    pub const NACK: u64 = 3;
}

/// ValidityPeriod and its ISO timestamp fields, nested in SignatureInfo.
pub mod validity_type {
    pub const VALIDITY_PERIOD: u64 = 253;
    pub const NOT_BEFORE: u64 = 254;
    pub const NOT_AFTER: u64 = 255;
}

/// NDNLPv2 link-protocol types.
pub mod lp_type {
    pub const FRAGMENT: u64 = 80;
    pub const LP_PACKET: u64 = 100;
    pub const NACK: u64 = 800;
    pub const NACK_REASON: u64 = 801;
    pub const NEXT_HOP_FACE_ID: u64 = 816;
    pub const INCOMING_FACE_ID: u64 = 817;
    pub const CONGESTION_MARK: u64 = 832;

    /// Bounds of the NDNLPv2 header-field number space. An unrecognized
    /// field inside this range with an odd type code is ignorable; any
    /// other unrecognized field invalidates the whole LpPacket.
    pub const IGNORE_MIN: u64 = 800;
    pub const IGNORE_MAX: u64 = 959;
}

/// NetworkNack reason codes.
pub mod nack_reason {
    pub const CONGESTION: u64 = 50;
    pub const DUPLICATE: u64 = 100;
    pub const NO_ROUTE: u64 = 150;
}

/// NFD management types for ControlParameters/ControlResponse.
pub mod control_type {
    pub const CONTROL_RESPONSE: u64 = 101;
    pub const STATUS_CODE: u64 = 102;
    pub const STATUS_TEXT: u64 = 103;
    pub const CONTROL_PARAMETERS: u64 = 104;
    pub const FACE_ID: u64 = 105;
    pub const COST: u64 = 106;
    pub const STRATEGY: u64 = 107;
    pub const FLAGS: u64 = 108;
    pub const EXPIRATION_PERIOD: u64 = 109;
    pub const LOCAL_CONTROL_FEATURE: u64 = 110;
    pub const ORIGIN: u64 = 111;
    pub const URI: u64 = 114;
}

/// NFD route registration flag bits (the Flags value in
/// ControlParameters).
pub mod registration_flag {
    pub const CHILD_INHERIT: u64 = 1;
    pub const CAPTURE: u64 = 2;
}

/// Name-based access control / encrypted content types.
pub mod encrypt_type {
    pub const ENCRYPTED_CONTENT: u64 = 130;
    pub const ENCRYPTION_ALGORITHM: u64 = 131;
    pub const ENCRYPTED_PAYLOAD: u64 = 132;
    pub const INITIAL_VECTOR: u64 = 133;
}

/// One-octet markers for the NDN naming conventions: a marked number
/// name component is the marker byte followed by a nonNegativeInteger.
pub mod naming_marker {
    pub const SEGMENT: u8 = 0x00;
    pub const SEGMENT_OFFSET: u8 = 0xFB;
    pub const TIMESTAMP: u8 = 0xFC;
    pub const VERSION: u8 = 0xFD;
    pub const SEQUENCE_NUMBER: u8 = 0xFE;
}
