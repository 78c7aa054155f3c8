//! JSON round trips of the packet models, as used for logging and
//! fixtures.

use ndnwire_core::{Blob, Data, Interest, KeyLocator, Name, Signature};

#[test]
fn test_interest_json_round_trip() {
    let mut interest = Interest::new(Name::from_uri("/json/demo").unwrap());
    interest
        .set_interest_lifetime_ms(Some(2000))
        .set_nonce(Some(Blob::from(&[1u8, 2, 3, 4])));
    let json = serde_json::to_string(&interest).unwrap();
    let back: Interest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, interest);
}

#[test]
fn test_data_json_round_trip() {
    let mut data = Data::new(Name::from_uri("/json/data").unwrap());
    data.set_content(&b"body"[..]);
    data.set_signature(Signature::HmacWithSha256 {
        key_locator: Some(KeyLocator::KeyName(Name::from_uri("/shared/key").unwrap())),
        signature: Blob::from(&[0xddu8; 32]),
    });
    let json = serde_json::to_value(&data).unwrap();
    let back: Data = serde_json::from_value(json).unwrap();
    assert_eq!(back, data);
}
