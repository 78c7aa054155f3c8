//! Interest packets: selectors, nonce handling, forwarding hints and
//! the signed-portion bracketing used by signed interests.

use std::fmt;

use ndnwire_common::{tlv_type, INTEREST_NONCE_SIZE};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::blob::{Blob, SignedBlob};
use crate::delegation_set::DelegationSet;
use crate::name::{Name, NameComponent};
use crate::signature::KeyLocator;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

/// One entry of an [`Exclude`] filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcludeEntry {
    /// Matches any component, bounded by the neighboring components.
    Any,
    Component(NameComponent),
}

/// An Interest's Exclude selector: a sequence of components and ANY
/// wildcards describing component ranges the requester refuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclude {
    entries: Vec<ExcludeEntry>,
}

impl Exclude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_any(&mut self) -> &mut Self {
        self.entries.push(ExcludeEntry::Any);
        self
    }

    pub fn append_component(&mut self, component: impl Into<NameComponent>) -> &mut Self {
        self.entries.push(ExcludeEntry::Component(component.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExcludeEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ExcludeEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True when the filter excludes `component`. An ANY entry covers
    /// the open range between its neighboring components in canonical
    /// order, or everything on an unbounded side.
    pub fn matches(&self, component: &NameComponent) -> bool {
        let mut i = 0;
        while i < self.entries.len() {
            match &self.entries[i] {
                ExcludeEntry::Any => {
                    if i > 0 && matches!(self.entries[i - 1], ExcludeEntry::Any) {
                        // Consecutive ANY entries collapse into one.
                        i += 1;
                        continue;
                    }
                    let lower_bound = match i.checked_sub(1).map(|prev| &self.entries[prev]) {
                        Some(ExcludeEntry::Component(lower)) => Some(lower),
                        _ => None,
                    };
                    // The next component entry bounds the range above.
                    let upper_bound = self.entries[i + 1..]
                        .iter()
                        .enumerate()
                        .find_map(|(offset, entry)| match entry {
                            ExcludeEntry::Component(upper) => Some((i + 1 + offset, upper)),
                            ExcludeEntry::Any => None,
                        });
                    match (lower_bound, upper_bound) {
                        (Some(lower), Some((upper_index, upper))) => {
                            if component > lower && component < upper {
                                return true;
                            }
                            // Let the next pass test equality with the
                            // upper bound.
                            i = upper_index;
                            continue;
                        }
                        (None, Some((upper_index, upper))) => {
                            if component < upper {
                                return true;
                            }
                            i = upper_index;
                            continue;
                        }
                        (Some(lower), None) => {
                            if component > lower {
                                return true;
                            }
                        }
                        (None, None) => return true,
                    }
                }
                ExcludeEntry::Component(entry) => {
                    if component == entry {
                        return true;
                    }
                }
            }
            i += 1;
        }
        false
    }

    /// The URI filter form, e.g. `a,*,z`.
    pub fn to_uri(&self) -> String {
        let mut out = String::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            match entry {
                ExcludeEntry::Any => out.push('*'),
                ExcludeEntry::Component(component) => out.push_str(&component.to_escaped_string()),
            }
        }
        out
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let save_length = encoder.len();
        for entry in self.entries.iter().rev() {
            match entry {
                ExcludeEntry::Any => encoder.write_type_and_length(tlv_type::ANY, 0)?,
                ExcludeEntry::Component(component) => component.encode_tlv(encoder)?,
            }
        }
        encoder.write_type_and_length(tlv_type::EXCLUDE, encoder.len() - save_length)
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(tlv_type::EXCLUDE)?;
        let mut exclude = Exclude::new();
        while decoder.offset() < end_offset {
            if decoder.read_boolean_tlv(tlv_type::ANY, end_offset)? {
                exclude.append_any();
            } else {
                exclude.append_component(NameComponent::decode_tlv(decoder)?);
            }
        }
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(exclude)
    }
}

impl fmt::Display for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

/// An NDN Interest packet.
///
/// `must_be_fresh` defaults to true in a new Interest; its wire default
/// is false, so an Interest decoded without Selectors reports false.
/// Encoding generates a random 4-byte nonce when none is set, which
/// makes Interest encoding non-deterministic unless a nonce is pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    name: Name,
    min_suffix_components: Option<u64>,
    max_suffix_components: Option<u64>,
    key_locator: Option<KeyLocator>,
    exclude: Exclude,
    child_selector: Option<u64>,
    must_be_fresh: bool,
    nonce: Option<Blob>,
    interest_lifetime_ms: Option<u64>,
    forwarding_hint: DelegationSet,
    link_wire_encoding: Option<Blob>,
    selected_delegation_index: Option<u64>,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            min_suffix_components: None,
            max_suffix_components: None,
            key_locator: None,
            exclude: Exclude::new(),
            child_selector: None,
            must_be_fresh: true,
            nonce: None,
            interest_lifetime_ms: None,
            forwarding_hint: DelegationSet::new(),
            link_wire_encoding: None,
            selected_delegation_index: None,
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

    pub fn min_suffix_components(&self) -> Option<u64> {
        self.min_suffix_components
    }

    pub fn set_min_suffix_components(&mut self, value: Option<u64>) -> &mut Self {
        self.min_suffix_components = value;
        self
    }

    pub fn max_suffix_components(&self) -> Option<u64> {
        self.max_suffix_components
    }

    pub fn set_max_suffix_components(&mut self, value: Option<u64>) -> &mut Self {
        self.max_suffix_components = value;
        self
    }

    /// The PublisherPublicKeyLocator selector.
    pub fn key_locator(&self) -> Option<&KeyLocator> {
        self.key_locator.as_ref()
    }

    pub fn set_key_locator(&mut self, key_locator: Option<KeyLocator>) -> &mut Self {
        self.key_locator = key_locator;
        self
    }

    pub fn exclude(&self) -> &Exclude {
        &self.exclude
    }

    pub fn exclude_mut(&mut self) -> &mut Exclude {
        &mut self.exclude
    }

    pub fn child_selector(&self) -> Option<u64> {
        self.child_selector
    }

    pub fn set_child_selector(&mut self, value: Option<u64>) -> &mut Self {
        self.child_selector = value;
        self
    }

    pub fn must_be_fresh(&self) -> bool {
        self.must_be_fresh
    }

    pub fn set_must_be_fresh(&mut self, value: bool) -> &mut Self {
        self.must_be_fresh = value;
        self
    }

    pub fn nonce(&self) -> Option<&Blob> {
        self.nonce.as_ref()
    }

    pub fn set_nonce(&mut self, nonce: Option<Blob>) -> &mut Self {
        self.nonce = nonce;
        self
    }

    pub fn interest_lifetime_ms(&self) -> Option<u64> {
        self.interest_lifetime_ms
    }

    pub fn set_interest_lifetime_ms(&mut self, value: Option<u64>) -> &mut Self {
        self.interest_lifetime_ms = value;
        self
    }

    pub fn forwarding_hint(&self) -> &DelegationSet {
        &self.forwarding_hint
    }

    pub fn forwarding_hint_mut(&mut self) -> &mut DelegationSet {
        &mut self.forwarding_hint
    }

    /// The raw bytes of an embedded Link object (a full Data TLV).
    pub fn link_wire_encoding(&self) -> Option<&Blob> {
        self.link_wire_encoding.as_ref()
    }

    pub fn set_link_wire_encoding(&mut self, encoding: Option<Blob>) -> &mut Self {
        self.link_wire_encoding = encoding;
        self
    }

    pub fn selected_delegation_index(&self) -> Option<u64> {
        self.selected_delegation_index
    }

    pub fn set_selected_delegation_index(&mut self, index: Option<u64>) -> &mut Self {
        self.selected_delegation_index = index;
        self
    }

    /// True when this Interest would be satisfied by a Data packet with
    /// `name`: the Interest name must be a prefix, the suffix count
    /// must sit inside the min/max bounds (counting the implicit digest
    /// component), and the first suffix component must not be excluded.
    pub fn matches_name(&self, name: &Name) -> bool {
        if !self.name.is_prefix_of(name) {
            return false;
        }
        let suffix_count = (name.len() + 1 - self.name.len()) as u64;
        if let Some(min) = self.min_suffix_components {
            if suffix_count < min {
                return false;
            }
        }
        if let Some(max) = self.max_suffix_components {
            if suffix_count > max {
                return false;
            }
        }
        if !self.exclude.is_empty() && name.len() > self.name.len() {
            if let Some(next) = name.get(self.name.len()) {
                if self.exclude.matches(next) {
                    return false;
                }
            }
        }
        true
    }

    /// Encodes to the wire form. The signed portion of the result
    /// covers the name components except the last one.
    pub fn encode(&self) -> Result<SignedBlob, TlvError> {
        let mut encoder = TlvEncoder::new();
        let (signed_begin, signed_end) = self.encode_tlv(&mut encoder)?;
        Ok(SignedBlob::new(encoder.finish(), signed_begin, signed_end))
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        Self::decode_signed(input).map(|(interest, _)| interest)
    }

    /// Decodes, also returning the input bracketed by the signed
    /// portion found at the fields' actual positions.
    pub fn decode_signed(input: &Blob) -> Result<(Self, SignedBlob), TlvError> {
        let mut decoder = TlvDecoder::new(input);
        let (interest, signed_begin, signed_end) = Self::decode_tlv(&mut decoder)?;
        Ok((
            interest,
            SignedBlob::new(input.clone(), signed_begin, signed_end),
        ))
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(usize, usize), TlvError> {
        if !self.forwarding_hint.is_empty() {
            if self.selected_delegation_index.is_some() {
                return Err(TlvError::InvalidInterestFields(
                    "forwarding hint together with selected delegation",
                ));
            }
            if self.link_wire_encoding.is_some() {
                return Err(TlvError::InvalidInterestFields(
                    "forwarding hint together with link",
                ));
            }
        }
        if self.selected_delegation_index.is_some() && self.link_wire_encoding.is_none() {
            return Err(TlvError::InvalidInterestFields(
                "selected delegation without link",
            ));
        }
        let save_length = encoder.len();
        encoder.write_optional_non_negative_integer_tlv(
            tlv_type::SELECTED_DELEGATION,
            self.selected_delegation_index,
        )?;
        if let Some(link) = &self.link_wire_encoding {
            // The link is already a full Data TLV.
            encoder.write_bytes(link.as_slice())?;
        }
        if !self.forwarding_hint.is_empty() {
            let hint_save_length = encoder.len();
            self.forwarding_hint.encode_tlv(encoder)?;
            encoder
                .write_type_and_length(tlv_type::FORWARDING_HINT, encoder.len() - hint_save_length)?;
        }
        encoder.write_optional_non_negative_integer_tlv(
            tlv_type::INTEREST_LIFETIME,
            self.interest_lifetime_ms,
        )?;
        self.encode_nonce(encoder)?;
        self.encode_selectors(encoder)?;
        let (name_begin, name_end) = self.name.encode_tlv(encoder)?;
        let signed_begin_from_back = encoder.len() - name_begin;
        let signed_end_from_back = encoder.len() - name_end;
        encoder.write_type_and_length(tlv_type::INTEREST, encoder.len() - save_length)?;
        Ok((
            encoder.len() - signed_begin_from_back,
            encoder.len() - signed_end_from_back,
        ))
    }

    /// Writes the Nonce TLV, always 4 bytes: generated when unset,
    /// random-padded when shorter, truncated when longer.
    fn encode_nonce(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let mut nonce_bytes = [0u8; INTEREST_NONCE_SIZE];
        match &self.nonce {
            None => rand::thread_rng().fill(&mut nonce_bytes[..]),
            Some(nonce) => {
                let take = nonce.len().min(INTEREST_NONCE_SIZE);
                nonce_bytes[..take].copy_from_slice(&nonce.as_slice()[..take]);
                if take < INTEREST_NONCE_SIZE {
                    rand::thread_rng().fill(&mut nonce_bytes[take..]);
                }
            }
        }
        encoder.write_blob_tlv(tlv_type::NONCE, &nonce_bytes)
    }

    /// Writes the Selectors TLV, omitting it entirely when every
    /// selector has its wire-default value.
    fn encode_selectors(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let save_length = encoder.len();
        if self.must_be_fresh {
            encoder.write_type_and_length(tlv_type::MUST_BE_FRESH, 0)?;
        }
        encoder
            .write_optional_non_negative_integer_tlv(tlv_type::CHILD_SELECTOR, self.child_selector)?;
        if !self.exclude.is_empty() {
            self.exclude.encode_tlv(encoder)?;
        }
        if self.key_locator.is_some() {
            KeyLocator::encode_tlv(
                self.key_locator.as_ref(),
                tlv_type::PUBLISHER_PUBLIC_KEY_LOCATOR,
                encoder,
            )?;
        }
        encoder.write_optional_non_negative_integer_tlv(
            tlv_type::MAX_SUFFIX_COMPONENTS,
            self.max_suffix_components,
        )?;
        encoder.write_optional_non_negative_integer_tlv(
            tlv_type::MIN_SUFFIX_COMPONENTS,
            self.min_suffix_components,
        )?;
        if encoder.len() != save_length {
            encoder.write_type_and_length(tlv_type::SELECTORS, encoder.len() - save_length)?;
        }
        Ok(())
    }

    pub(crate) fn decode_tlv(
        decoder: &mut TlvDecoder,
    ) -> Result<(Self, usize, usize), TlvError> {
        let end_offset = decoder.read_nested_tlvs_start(tlv_type::INTEREST)?;
        let mut name = None;
        let mut signed_begin = decoder.offset();
        let mut signed_end = decoder.offset();
        let mut min_suffix_components = None;
        let mut max_suffix_components = None;
        let mut key_locator = None;
        let mut exclude = Exclude::new();
        let mut child_selector = None;
        let mut must_be_fresh = false;
        let mut nonce = None;
        let mut interest_lifetime_ms = None;
        let mut forwarding_hint = DelegationSet::new();
        let mut link_wire_encoding = None;
        let mut selected_delegation_index = None;
        while let Some(element_type) = decoder.peek_type(end_offset)? {
            match element_type {
                tlv_type::NAME => {
                    let (decoded, begin, end) = Name::decode_tlv(decoder)?;
                    signed_begin = begin;
                    signed_end = end;
                    name = Some(decoded);
                }
                tlv_type::SELECTORS => {
                    let selectors_end = decoder.read_nested_tlvs_start(tlv_type::SELECTORS)?;
                    min_suffix_components = decoder.read_optional_non_negative_integer_tlv(
                        tlv_type::MIN_SUFFIX_COMPONENTS,
                        selectors_end,
                    )?;
                    max_suffix_components = decoder.read_optional_non_negative_integer_tlv(
                        tlv_type::MAX_SUFFIX_COMPONENTS,
                        selectors_end,
                    )?;
                    if decoder.peek_type(selectors_end)?
                        == Some(tlv_type::PUBLISHER_PUBLIC_KEY_LOCATOR)
                    {
                        key_locator = KeyLocator::decode_tlv(
                            tlv_type::PUBLISHER_PUBLIC_KEY_LOCATOR,
                            decoder,
                        )?;
                    }
                    if decoder.peek_type(selectors_end)? == Some(tlv_type::EXCLUDE) {
                        exclude = Exclude::decode_tlv(decoder)?;
                    }
                    child_selector = decoder.read_optional_non_negative_integer_tlv(
                        tlv_type::CHILD_SELECTOR,
                        selectors_end,
                    )?;
                    must_be_fresh =
                        decoder.read_boolean_tlv(tlv_type::MUST_BE_FRESH, selectors_end)?;
                    decoder.finish_nested_tlvs(selectors_end)?;
                }
                tlv_type::NONCE => nonce = Some(decoder.read_blob_tlv(tlv_type::NONCE)?),
                tlv_type::INTEREST_LIFETIME => {
                    interest_lifetime_ms = Some(
                        decoder.read_non_negative_integer_tlv(tlv_type::INTEREST_LIFETIME)?,
                    );
                }
                tlv_type::FORWARDING_HINT => {
                    let hint_end = decoder.read_nested_tlvs_start(tlv_type::FORWARDING_HINT)?;
                    forwarding_hint.decode_tlv(hint_end, decoder)?;
                    decoder.finish_nested_tlvs(hint_end)?;
                }
                tlv_type::DATA => {
                    // An embedded Link object; keep the raw TLV.
                    let link_begin = decoder.offset();
                    let link_end = decoder.read_nested_tlvs_start(tlv_type::DATA)?;
                    decoder.seek(link_end);
                    link_wire_encoding = Some(decoder.get_slice(link_begin, link_end)?);
                }
                tlv_type::SELECTED_DELEGATION => {
                    selected_delegation_index = Some(
                        decoder.read_non_negative_integer_tlv(tlv_type::SELECTED_DELEGATION)?,
                    );
                }
                _ => decoder.skip_unrecognized()?,
            }
        }
        decoder.finish_nested_tlvs(end_offset)?;
        let name = name.ok_or(TlvError::UnexpectedTlvType(tlv_type::NAME))?;
        let nonce = nonce.ok_or(TlvError::UnexpectedTlvType(tlv_type::NONCE))?;
        if selected_delegation_index.is_some() && link_wire_encoding.is_none() {
            return Err(TlvError::InvalidInterestFields(
                "selected delegation without link",
            ));
        }
        Ok((
            Self {
                name,
                min_suffix_components,
                max_suffix_components,
                key_locator,
                exclude,
                child_selector,
                must_be_fresh,
                nonce: Some(nonce),
                interest_lifetime_ms,
                forwarding_hint,
                link_wire_encoding,
                selected_delegation_index,
            },
            signed_begin,
            signed_end,
        ))
    }
}

impl Default for Interest {
    fn default() -> Self {
        Self::new(Name::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_interest_round_trip() {
        let mut interest = Interest::new(Name::from_uri("/a/b").unwrap());
        interest.set_interest_lifetime_ms(Some(4000));
        let wire = interest.encode().unwrap();
        assert_eq!(wire.as_slice()[0], 5);

        let decoded = Interest::decode(wire.blob()).unwrap();
        assert_eq!(decoded.name().len(), 2);
        assert!(decoded.must_be_fresh());
        assert_eq!(decoded.interest_lifetime_ms(), Some(4000));
        assert_eq!(decoded.nonce().unwrap().len(), 4);
    }

    #[test]
    fn test_signed_portion_excludes_last_component() {
        let mut interest = Interest::new(Name::from_uri("/a/b").unwrap());
        interest.set_must_be_fresh(false);
        let wire = interest.encode().unwrap();
        // The portion starts at the first component TLV and stops
        // before the last component TLV.
        assert_eq!(wire.signed_portion(), &[8, 1, b'a']);

        let (_, signed) = Interest::decode_signed(wire.blob()).unwrap();
        assert_eq!(signed.signed_portion(), wire.signed_portion());
    }

    #[test]
    fn test_selectors_round_trip() {
        let mut interest = Interest::new(Name::from_uri("/prefix").unwrap());
        interest
            .set_min_suffix_components(Some(2))
            .set_max_suffix_components(Some(4))
            .set_child_selector(Some(1))
            .set_key_locator(Some(KeyLocator::KeyName(
                Name::from_uri("/key/name").unwrap(),
            )))
            .set_nonce(Some(Blob::from(&[1u8, 2, 3, 4])))
            .set_interest_lifetime_ms(Some(1500));
        interest
            .exclude_mut()
            .append_component("alpha")
            .append_any();

        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        assert_eq!(decoded, interest);
    }

    #[test]
    fn test_absent_selectors_decode_to_wire_defaults() {
        let mut interest = Interest::new(Name::from_uri("/plain").unwrap());
        interest.set_must_be_fresh(false);
        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        assert!(!decoded.must_be_fresh());
        assert_eq!(decoded.min_suffix_components(), None);
        assert!(decoded.exclude().is_empty());
    }

    #[test]
    fn test_short_nonce_padded_to_four_bytes() {
        let mut interest = Interest::new(Name::from_uri("/n").unwrap());
        interest.set_nonce(Some(Blob::from(&[0xaau8, 0xbb])));
        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        let nonce = decoded.nonce().unwrap();
        assert_eq!(nonce.len(), 4);
        assert_eq!(&nonce.as_slice()[..2], &[0xaa, 0xbb]);
    }

    #[test]
    fn test_forwarding_hint_round_trip() {
        let mut interest = Interest::new(Name::from_uri("/hinted").unwrap());
        interest
            .forwarding_hint_mut()
            .add(1, Name::from_uri("/route/a").unwrap());
        interest
            .forwarding_hint_mut()
            .add(2, Name::from_uri("/route/b").unwrap());
        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        assert_eq!(decoded.forwarding_hint(), interest.forwarding_hint());
    }

    #[test]
    fn test_forwarding_hint_conflicts() {
        let mut interest = Interest::new(Name::from_uri("/x").unwrap());
        interest
            .forwarding_hint_mut()
            .add(1, Name::from_uri("/route").unwrap());
        interest.set_link_wire_encoding(Some(Blob::from(&[6u8, 0])));
        assert!(matches!(
            interest.encode(),
            Err(TlvError::InvalidInterestFields(_))
        ));

        let mut interest = Interest::new(Name::from_uri("/x").unwrap());
        interest.set_selected_delegation_index(Some(0));
        // Selected delegation requires a link.
        assert!(matches!(
            interest.encode(),
            Err(TlvError::InvalidInterestFields(_))
        ));
    }

    #[test]
    fn test_link_round_trip() {
        let link = Blob::from(&[6u8, 3, 7, 1, 8]);
        let mut interest = Interest::new(Name::from_uri("/linked").unwrap());
        interest
            .set_link_wire_encoding(Some(link.clone()))
            .set_selected_delegation_index(Some(1));
        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        assert_eq!(decoded.link_wire_encoding(), Some(&link));
        assert_eq!(decoded.selected_delegation_index(), Some(1));
    }

    #[test]
    fn test_decode_tolerates_field_order_and_unknown_types() {
        // Nonce first, then Name, then an unrecognized skippable type.
        let wire = Blob::from(&[
            5u8, 14, 10, 4, 1, 2, 3, 4, 7, 3, 8, 1, b'a', 200, 1, 0xff,
        ]);
        let (interest, signed) = Interest::decode_signed(&wire).unwrap();
        assert_eq!(interest.name().to_uri(), "/a");
        assert!(!interest.must_be_fresh());
        // Offsets follow the actual Name position.
        assert_eq!(signed.signed_begin(), 10);
        assert_eq!(signed.signed_end(), 10);
    }

    #[test]
    fn test_decode_requires_nonce() {
        let wire = Blob::from(&[5u8, 5, 7, 3, 8, 1, b'a']);
        assert_eq!(
            Interest::decode(&wire),
            Err(TlvError::UnexpectedTlvType(10))
        );
    }

    #[test]
    fn test_matches_name() {
        let mut interest = Interest::new(Name::from_uri("/a/b").unwrap());
        assert!(interest.matches_name(&Name::from_uri("/a/b/c").unwrap()));
        assert!(interest.matches_name(&Name::from_uri("/a/b").unwrap()));
        assert!(!interest.matches_name(&Name::from_uri("/a/x").unwrap()));

        // Suffix counts include the implicit digest component.
        interest.set_min_suffix_components(Some(2));
        assert!(!interest.matches_name(&Name::from_uri("/a/b").unwrap()));
        assert!(interest.matches_name(&Name::from_uri("/a/b/c").unwrap()));
        interest.set_max_suffix_components(Some(2));
        assert!(!interest.matches_name(&Name::from_uri("/a/b/c/d").unwrap()));

        interest.set_min_suffix_components(None);
        interest.set_max_suffix_components(None);
        interest.exclude_mut().append_component("c");
        assert!(!interest.matches_name(&Name::from_uri("/a/b/c").unwrap()));
        assert!(interest.matches_name(&Name::from_uri("/a/b/d").unwrap()));
    }

    #[test]
    fn test_exclude_matches_ranges() {
        // "b,*,m" excludes b, everything between, and m.
        let mut exclude = Exclude::new();
        exclude.append_component("b").append_any().append_component("m");
        assert!(exclude.matches(&NameComponent::from("b")));
        assert!(exclude.matches(&NameComponent::from("f")));
        assert!(exclude.matches(&NameComponent::from("m")));
        assert!(!exclude.matches(&NameComponent::from("a")));
        assert!(!exclude.matches(&NameComponent::from("z")));
        assert_eq!(exclude.to_uri(), "b,*,m");
    }

    #[test]
    fn test_exclude_unbounded_ranges() {
        // Leading ANY excludes everything up to the bound.
        let mut exclude = Exclude::new();
        exclude.append_any().append_component("m");
        assert!(exclude.matches(&NameComponent::from("a")));
        assert!(exclude.matches(&NameComponent::from("m")));
        assert!(!exclude.matches(&NameComponent::from("z")));

        // Trailing ANY excludes everything from the bound up.
        let mut exclude = Exclude::new();
        exclude.append_component("m").append_any();
        assert!(!exclude.matches(&NameComponent::from("a")));
        assert!(exclude.matches(&NameComponent::from("m")));
        assert!(exclude.matches(&NameComponent::from("z")));
    }

    #[test]
    fn test_exclude_wire_round_trip() {
        let mut interest = Interest::new(Name::from_uri("/e").unwrap());
        interest
            .exclude_mut()
            .append_any()
            .append_component("cut")
            .append_any();
        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        assert_eq!(decoded.exclude(), interest.exclude());
    }
}
