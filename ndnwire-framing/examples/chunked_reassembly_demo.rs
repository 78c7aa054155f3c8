use ndnwire_core::{Blob, Data, Interest, Name, Signature, TlvEncoder};
use ndnwire_framing::ElementReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🔗 Chunked Reassembly Demo");
    println!("==========================");

    // Build the packets a producer side would emit.
    let mut interest = Interest::new(Name::from_uri("/demo/reassembly/file")?);
    interest.set_interest_lifetime_ms(Some(4000));
    let interest_wire = interest.encode()?;

    let mut wires = vec![interest_wire.as_slice().to_vec()];
    for segment in 0..3u64 {
        let mut name = Name::from_uri("/demo/reassembly/file")?;
        name.append_version(1).append_segment(segment);
        let mut data = Data::new(name);
        data.set_content(vec![segment as u8; 100]);
        data.set_signature(Signature::DigestSha256 {
            signature: Blob::from(&[0u8; 32]),
        });
        wires.push(data.encode()?.as_slice().to_vec());
    }

    let stream: Vec<u8> = wires.concat();
    println!(
        "📦 Encoded 1 interest + 3 data segments into a {} byte stream",
        stream.len()
    );

    // Feed the stream the way a TCP read loop would: in chunks that
    // ignore element boundaries entirely.
    let mut received = Vec::new();
    {
        let mut reader = ElementReader::new(|element: &[u8]| {
            received.push(element.to_vec());
            match element[0] {
                5 => {
                    let interest = Interest::decode(&Blob::from(element)).unwrap();
                    println!("  ⬅️  interest {}", interest.name().to_uri());
                }
                6 => {
                    let data = Data::decode(&Blob::from(element)).unwrap();
                    println!(
                        "  ⬅️  data {} ({} content bytes)",
                        data.name().to_uri(),
                        data.content().len()
                    );
                }
                other => println!("  ⬅️  element of type {other}"),
            }
        });

        for (i, chunk) in stream.chunks(7).enumerate() {
            if i == 0 {
                println!("📡 Feeding {} byte chunks:", chunk.len());
            }
            reader.on_received_data(chunk)?;
        }
    }
    println!("✅ Reassembled {} elements from 7 byte chunks", received.len());
    assert_eq!(received, wires);

    // The framer rejects an element from its declared length alone, so a
    // hostile peer cannot force unbounded buffering.
    let mut encoder = TlvEncoder::new();
    encoder.write_blob_tlv(6, &vec![0u8; 9000])?;
    let oversize = encoder.finish();

    let mut reader = ElementReader::new(|_element: &[u8]| {
        println!("  ⬅️  unexpected element");
    });
    match reader.on_received_data(&oversize.as_slice()[..16]) {
        Err(err) => println!("🛑 Oversize element rejected after 16 bytes: {err}"),
        Ok(()) => println!("❓ expected the oversize element to be rejected"),
    }

    Ok(())
}
