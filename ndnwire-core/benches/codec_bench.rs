use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndnwire_core::{Blob, Data, Interest, Name, Signature};

fn sample_interest() -> Interest {
    let mut interest = Interest::new(Name::from_uri("/bench/interest/encode").unwrap());
    interest
        .set_interest_lifetime_ms(Some(4000))
        .set_nonce(Some(Blob::from(&[0xa5u8, 0x5a, 0xa5, 0x5a])));
    interest
}

fn sample_data() -> Data {
    let mut data = Data::new(Name::from_uri("/bench/data/encode").unwrap());
    data.set_content(vec![0x42u8; 1024]);
    data.meta_info_mut().set_freshness_period_ms(Some(10_000));
    data.set_signature(Signature::DigestSha256 {
        signature: Blob::from(&[0x99u8; 32]),
    });
    data
}

fn bench_interest_encode(c: &mut Criterion) {
    let interest = sample_interest();
    c.bench_function("interest_encode", |b| {
        b.iter(|| black_box(&interest).encode().unwrap())
    });
}

fn bench_interest_decode(c: &mut Criterion) {
    let wire = sample_interest().encode().unwrap().into_blob();
    c.bench_function("interest_decode", |b| {
        b.iter(|| Interest::decode(black_box(&wire)).unwrap())
    });
}

fn bench_data_encode(c: &mut Criterion) {
    let data = sample_data();
    c.bench_function("data_encode_1k", |b| {
        b.iter(|| black_box(&data).encode().unwrap())
    });
}

fn bench_data_decode(c: &mut Criterion) {
    let wire = sample_data().encode().unwrap().into_blob();
    c.bench_function("data_decode_1k", |b| {
        b.iter(|| Data::decode(black_box(&wire)).unwrap())
    });
}

fn bench_name_uri(c: &mut Criterion) {
    let name = Name::from_uri("/bench/uri/with%20escapes/and/five/components").unwrap();
    c.bench_function("name_to_uri", |b| b.iter(|| black_box(&name).to_uri()));
}

criterion_group!(
    benches,
    bench_interest_encode,
    bench_interest_decode,
    bench_data_encode,
    bench_data_decode,
    bench_name_uri
);
criterion_main!(benches);
