//! Delegation sets: preference-ordered name lists used by an
//! Interest's ForwardingHint and by Link objects.

use ndnwire_common::{link_type, tlv_type};
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::name::Name;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

/// One delegation: a name with a routing preference (lower is
/// preferred).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    preference: u64,
    name: Name,
}

impl Delegation {
    pub fn new(preference: u64, name: Name) -> Self {
        Self { preference, name }
    }

    pub fn preference(&self) -> u64 {
        self.preference
    }

    pub fn name(&self) -> &Name {
        &self.name
    }
}

/// An ordered list of [`Delegation`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationSet {
    delegations: Vec<Delegation>,
}

impl DelegationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts keeping the list sorted by preference then name,
    /// replacing any existing delegation with the same name.
    pub fn add(&mut self, preference: u64, name: Name) {
        self.remove(&name);
        let index = self
            .delegations
            .iter()
            .position(|existing| (existing.preference, &existing.name) > (preference, &name))
            .unwrap_or(self.delegations.len());
        self.delegations.insert(index, Delegation { preference, name });
    }

    /// Appends without sorting; decode uses this to preserve wire
    /// order.
    pub fn add_unsorted(&mut self, preference: u64, name: Name) {
        self.delegations.push(Delegation { preference, name });
    }

    /// Removes the delegation with `name`, returning whether one was
    /// present.
    pub fn remove(&mut self, name: &Name) -> bool {
        let before = self.delegations.len();
        self.delegations.retain(|delegation| delegation.name != *name);
        self.delegations.len() != before
    }

    pub fn len(&self) -> usize {
        self.delegations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Delegation> {
        self.delegations.get(index)
    }

    pub fn delegations(&self) -> &[Delegation] {
        &self.delegations
    }

    pub fn clear(&mut self) {
        self.delegations.clear();
    }

    /// Encodes the bare sequence of Delegation TLVs, with no outer
    /// container. This is the form a Link object carries as Data
    /// content; a ForwardingHint wraps the same bytes in its own TLV.
    pub fn encode(&self) -> Result<Blob, TlvError> {
        let mut encoder = TlvEncoder::new();
        self.encode_tlv(&mut encoder)?;
        Ok(encoder.finish())
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        let mut decoder = TlvDecoder::new(input);
        let mut set = Self::new();
        set.decode_tlv(input.len(), &mut decoder)?;
        Ok(set)
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        for delegation in self.delegations.iter().rev() {
            let save_length = encoder.len();
            delegation.name.encode_tlv(encoder)?;
            encoder.write_non_negative_integer_tlv(link_type::PREFERENCE, delegation.preference)?;
            encoder.write_type_and_length(link_type::DELEGATION, encoder.len() - save_length)?;
        }
        Ok(())
    }

    /// Reads Delegation TLVs up to `end_offset`, appending in wire
    /// order.
    pub(crate) fn decode_tlv(
        &mut self,
        end_offset: usize,
        decoder: &mut TlvDecoder,
    ) -> Result<(), TlvError> {
        while decoder.offset() < end_offset {
            let delegation_end = decoder.read_nested_tlvs_start(link_type::DELEGATION)?;
            let preference = decoder.read_non_negative_integer_tlv(link_type::PREFERENCE)?;
            let (name, _, _) = Name::decode_tlv(decoder)?;
            decoder.finish_nested_tlvs(delegation_end)?;
            self.add_unsorted(preference, name);
        }
        Ok(())
    }
}
