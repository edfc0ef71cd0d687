//! Conversions between text and the bytes of a character encoding.

use crate::{
    error::{EncodingError, Error, Result},
    pct_enc::{self, Table},
};
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use std::{borrow::Cow, str};

const NOTHING: Table = Table::new(b"");

/// Looks up a character encoding by its [WHATWG label], e.g. `"latin1"` or `"Shift_JIS"`.
///
/// [WHATWG label]: https://encoding.spec.whatwg.org/#names-and-labels
///
/// # Examples
///
/// ```
/// use safe_url::encoding_for_label;
///
/// assert_eq!(encoding_for_label("latin1")?.name(), "windows-1252");
/// assert!(encoding_for_label("klingon").is_err());
/// # Ok::<_, safe_url::Error>(())
/// ```
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_owned()))
}

/// Encodes text, failing if any character is unmappable.
pub(crate) fn encode<'a>(
    s: &'a str,
    encoding: &'static Encoding,
) -> Result<Cow<'a, [u8]>, EncodingError> {
    let (bytes, _, had_errors) = encoding.encode(s);
    if had_errors {
        Err(EncodingError {
            encoding: encoding.name(),
        })
    } else {
        Ok(bytes)
    }
}

/// Encodes text, falling back to UTF-8 if any character is unmappable.
pub(crate) fn encode_or_utf8<'a>(s: &'a str, encoding: &'static Encoding) -> Cow<'a, [u8]> {
    encode(s, encoding).unwrap_or_else(|err| {
        tracing::debug!(%err, "falling back to UTF-8");
        Cow::Borrowed(s.as_bytes())
    })
}

/// Decodes bytes, percent-encoding every malformed sequence instead of replacing it.
pub(crate) fn decode<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Cow<'a, str> {
    if encoding == UTF_8 {
        if let Ok(s) = str::from_utf8(bytes) {
            return Cow::Borrowed(s);
        }
    }

    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = String::with_capacity(bytes.len());
    let mut pos = 0;
    loop {
        let src = &bytes[pos..];
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .unwrap_or(src.len());
        out.reserve(needed);

        let (result, read) = decoder.decode_to_string_without_replacement(src, &mut out, true);
        pos += read;
        match result {
            DecoderResult::InputEmpty => return Cow::Owned(out),
            DecoderResult::OutputFull => {}
            DecoderResult::Malformed(bad, consumed) => {
                let end = pos - usize::from(consumed);
                let start = end.saturating_sub(usize::from(bad));
                pct_enc::encode_to(&bytes[start..end], NOTHING, &mut out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

    #[test]
    fn encodes_representable_text() {
        assert_eq!(&*encode("café", WINDOWS_1252).unwrap(), b"caf\xe9");
        assert_eq!(&*encode("café", UTF_8).unwrap(), "café".as_bytes());
    }

    #[test]
    fn unmappable_text_is_an_error() {
        let err = encode("ア", WINDOWS_1252).unwrap_err();
        assert_eq!(err.to_string(), "text is not representable in windows-1252");
        assert_eq!(&*encode_or_utf8("ア", WINDOWS_1252), "ア".as_bytes());
    }

    #[test]
    fn decodes_valid_bytes() {
        assert_eq!(decode(b"caf\xe9", WINDOWS_1252), "café");
        assert_eq!(decode(b"\x83\x41", SHIFT_JIS), "ア");
        assert!(matches!(decode(b"plain", UTF_8), Cow::Borrowed("plain")));
    }

    #[test]
    fn percent_encodes_malformed_bytes() {
        assert_eq!(decode(b"a\xffb", UTF_8), "a%FFb");
        assert_eq!(decode(b"\xff\xfe", UTF_8), "%FF%FE");
        assert_eq!(decode(b"a\xe3\x81", UTF_8), "a%E3%81");
    }

    #[test]
    fn looks_up_labels() {
        assert_eq!(encoding_for_label(" UTF8 ").unwrap(), UTF_8);
        assert_eq!(
            encoding_for_label("nope"),
            Err(Error::UnknownEncoding("nope".to_owned()))
        );
    }
}
