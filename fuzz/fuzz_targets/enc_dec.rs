#![no_main]
use libfuzzer_sys::fuzz_target;
use safe_url::pct_enc::{self, Decode, DecodedChunk, PATH_SAFEST, USERINFO_SAFEST};

fuzz_target!(|data: &[u8]| {
    let encoded = pct_enc::encode(data, USERINFO_SAFEST);
    assert_eq!(data, &*pct_enc::decode_to_bytes(&encoded));

    // `%` is allowed, so encoding twice changes nothing.
    let encoded = pct_enc::encode(data, PATH_SAFEST);
    assert_eq!(pct_enc::encode(encoded.as_bytes(), PATH_SAFEST), encoded);

    let decoded = pct_enc::decode_to_bytes(&encoded);

    let mut len = 0;
    for chunk in Decode::new(&encoded) {
        len += match chunk {
            DecodedChunk::Unencoded(s) => s.len(),
            DecodedChunk::PctDecoded(_) => 1,
        };
    }
    assert_eq!(len, decoded.len());
});
