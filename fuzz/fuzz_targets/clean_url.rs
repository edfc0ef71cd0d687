#![no_main]
use libfuzzer_sys::fuzz_target;
use safe_url::clean_url;

fuzz_target!(|data: &str| {
    let clean = clean_url(data);
    assert_eq!(clean_url(&clean), clean);
});
