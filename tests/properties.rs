use proptest::prelude::*;
use safe_url::{
    clean_url,
    pct_enc::{self, USERINFO_SAFEST},
    safe_download_url, safe_url_string,
};

const URLISH: &str = "(https?://|//|/|;)?[a-zA-Z0-9 %:/?#@;=&+.'|~\\[\\]\t£éüÉ-]{0,40}";
const HOSTISH: &str = "(https?://|//)[a-fA-F0-9%£üÉ.|]{1,12}(:[0-9a]{0,3})?(/[a-z%é;.]{0,8})?";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    #[test]
    fn safe_url_is_idempotent(url in URLISH) {
        let once = safe_url_string(&url);
        prop_assert_eq!(safe_url_string(&once), once);
    }

    #[test]
    fn safe_url_is_idempotent_on_hosts(url in HOSTISH) {
        let once = safe_url_string(&url);
        prop_assert_eq!(safe_url_string(&once), once);
    }

    #[test]
    fn safe_download_url_is_idempotent(url in prop_oneof![URLISH, HOSTISH]) {
        let once = safe_download_url(&url);
        prop_assert_eq!(safe_download_url(&once), once);
    }

    #[test]
    fn safe_url_is_printable_ascii(url in URLISH) {
        let safe = safe_url_string(&url);
        prop_assert!(safe.bytes().all(|x| x.is_ascii_graphic()), "{}", safe);
    }

    #[test]
    fn clean_url_is_idempotent(url in prop_oneof![URLISH, HOSTISH]) {
        let once = clean_url(&url);
        prop_assert_eq!(clean_url(&once), once);
    }
}

proptest! {
    #[test]
    fn decode_reverses_encode(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let encoded = pct_enc::encode(&bytes, USERINFO_SAFEST);
        prop_assert!(USERINFO_SAFEST.or(pct_enc::Table::new(b"%")).allows_all(&encoded));
        prop_assert_eq!(&*pct_enc::decode_to_bytes(&encoded), &bytes[..]);
    }
}
