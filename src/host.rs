//! Host name encoding.

use crate::{
    error::HostEncodingError,
    pct_enc::{self, Decode, DecodedChunk},
};
use std::borrow::Cow;

const MAX_LABEL_LEN: usize = 63;

/// Converts a host name to its ASCII form.
///
/// Non-ASCII hosts go through IDNA processing, unless they contain a code
/// point forbidden in a domain such as `%`. Every host must then consist
/// of non-empty labels of at most 63 bytes, ignoring one trailing dot.
pub(crate) fn to_ascii(host: &str) -> Result<Cow<'_, str>, HostEncodingError> {
    let ascii = if host.is_ascii() {
        Cow::Borrowed(host)
    } else {
        if host.contains(is_forbidden) {
            return Err(HostEncodingError::Rejected);
        }
        let encoded = idna::domain_to_ascii(host).map_err(|_| HostEncodingError::Rejected)?;
        Cow::Owned(encoded)
    };
    check_labels(&ascii)?;
    Ok(ascii)
}

fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\0'..=' '
            | '#'
            | '%'
            | '/'
            | ':'
            | '<'
            | '>'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '|'
            | '\x7f'
    )
}

fn check_labels(host: &str) -> Result<(), HostEncodingError> {
    let host = host.strip_suffix('.').unwrap_or(host);
    for label in host.split('.') {
        if label.is_empty() {
            return Err(HostEncodingError::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(HostEncodingError::LabelTooLong);
        }
    }
    Ok(())
}

/// Lowercases a host, leaving percent-encoded octets uppercase.
pub(crate) fn to_lowercase(host: &str) -> String {
    let mut buf = String::with_capacity(host.len());
    for chunk in Decode::new(host) {
        match chunk {
            DecodedChunk::Unencoded(s) => buf.push_str(&s.to_lowercase()),
            DecodedChunk::PctDecoded(x) => buf.push_str(pct_enc::encode_byte(x)),
        }
    }
    buf
}
