//! Property tests: structurally valid packets must survive an
//! encode/decode round trip, and re-encoding must be byte-stable.

use ndnwire_core::tlv::decode_var_number;
use ndnwire_core::{
    Blob, Data, Interest, Name, NameComponent, Signature, TlvEncoder,
};
use proptest::prelude::*;

fn arb_component() -> impl Strategy<Value = NameComponent> {
    proptest::collection::vec(any::<u8>(), 0..12).prop_map(|bytes| NameComponent::new(bytes))
}

fn arb_name() -> impl Strategy<Value = Name> {
    proptest::collection::vec(arb_component(), 0..6).prop_map(Name::from_components)
}

proptest! {
    #[test]
    fn var_number_round_trip(value in any::<u64>()) {
        let mut encoder = TlvEncoder::new();
        encoder.write_var_number(value).unwrap();
        let wire = encoder.finish();
        let (decoded, consumed) = decode_var_number(wire.as_slice()).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(consumed, wire.len());
    }

    #[test]
    fn name_wire_round_trip(name in arb_name()) {
        let wire = name.encode().unwrap();
        prop_assert_eq!(Name::decode(&wire).unwrap(), name);
    }

    #[test]
    fn name_uri_round_trip(name in arb_name()) {
        let uri = name.to_uri();
        prop_assert_eq!(Name::from_uri(&uri).unwrap(), name);
    }

    #[test]
    fn interest_round_trip(
        name in arb_name(),
        must_be_fresh in any::<bool>(),
        lifetime in proptest::option::of(0u64..1 << 40),
        child_selector in proptest::option::of(0u64..=1),
        min_suffix in proptest::option::of(0u64..16),
        max_suffix in proptest::option::of(0u64..16),
        nonce in any::<[u8; 4]>(),
    ) {
        let mut interest = Interest::new(name);
        interest
            .set_must_be_fresh(must_be_fresh)
            .set_interest_lifetime_ms(lifetime)
            .set_child_selector(child_selector)
            .set_min_suffix_components(min_suffix)
            .set_max_suffix_components(max_suffix)
            .set_nonce(Some(Blob::from(&nonce)));
        let wire = interest.encode().unwrap();
        let decoded = Interest::decode(wire.blob()).unwrap();
        prop_assert_eq!(decoded, interest);
    }

    #[test]
    fn data_round_trip_and_stable(
        name in arb_name(),
        content in proptest::collection::vec(any::<u8>(), 0..64),
        freshness in proptest::option::of(0u64..1 << 32),
        signature_bytes in proptest::collection::vec(any::<u8>(), 0..40),
    ) {
        let mut data = Data::new(name);
        data.set_content(content);
        data.meta_info_mut().set_freshness_period_ms(freshness);
        data.set_signature(Signature::DigestSha256 {
            signature: Blob::from(signature_bytes),
        });
        let first = data.encode().unwrap();
        let decoded = Data::decode(first.blob()).unwrap();
        prop_assert_eq!(&decoded, &data);
        let second = decoded.encode().unwrap();
        prop_assert_eq!(first.as_slice(), second.as_slice());
        prop_assert_eq!(first.signed_range(), second.signed_range());
    }
}
