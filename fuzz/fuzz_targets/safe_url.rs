#![no_main]
use libfuzzer_sys::fuzz_target;
use safe_url::{safe_download_url, safe_url_string};

fuzz_target!(|data: &str| {
    let safe = safe_url_string(data);
    assert!(safe.bytes().all(|x| x.is_ascii_graphic()), "{safe:?}");
    assert_eq!(safe_url_string(&safe), safe);

    let download = safe_download_url(data);
    assert_eq!(safe_download_url(&download), download);
});
