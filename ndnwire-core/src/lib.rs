//! NDN-TLV wire codec: names, Interest and Data packets, NDNLPv2 link
//! packets and the management encodings, over a back-to-front TLV
//! encoder and a zero-copy decoder.
//!
//! Encoding writes children before parents so nesting needs no length
//! pre-computation; decoding hands out [`Blob`] slices that share the
//! input buffer. Packets that carry signatures encode to a
//! [`SignedBlob`] that brackets the signed portion of the wire bytes.

pub mod blob;
pub mod buffer;
pub mod control;
pub mod data;
pub mod delegation_set;
pub mod encrypted_content;
pub mod interest;
pub mod lp_packet;
pub mod name;
pub mod signature;
pub mod tlv;

pub use blob::{Blob, SignedBlob};
pub use buffer::{BufferError, DynamicByteBuffer, GrowStrategy, NoGrow, Reallocate};
pub use control::{ControlParameters, ControlResponse};
pub use data::{ContentType, Data, MetaInfo};
pub use delegation_set::{Delegation, DelegationSet};
pub use encrypted_content::{EncryptAlgorithmType, EncryptedContent};
pub use interest::{Exclude, ExcludeEntry, Interest};
pub use lp_packet::{is_lp_packet, unwrap_lp_packet, LpPacket, NackReason, NetworkNack};
pub use name::{ComponentType, Name, NameComponent};
pub use signature::{KeyLocator, Signature, ValidityPeriod};
pub use tlv::{
    decode_non_negative_integer, decode_type_and_length, decode_var_number, TlvDecoder,
    TlvEncoder, TlvError,
};
