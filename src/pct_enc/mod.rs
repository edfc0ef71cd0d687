//! Percent-encoding utilities.
//!
//! Decoding here is tolerant: a `%` that does not start a valid
//! percent-encoded octet is kept as is, and decoded bytes are not
//! required to form valid UTF-8.

mod table;

pub use table::*;

use std::{borrow::Cow, iter::FusedIterator, str};

/// Percent-encodes a byte sequence with the given table.
///
/// Bytes allowed by the table are copied, and every other byte is written
/// as `%` followed by two uppercase hexadecimal digits.
///
/// # Examples
///
/// ```
/// use safe_url::pct_enc::{self, PATH_SAFEST};
///
/// assert_eq!(pct_enc::encode("/résumé 1".as_bytes(), PATH_SAFEST), "/r%C3%A9sum%C3%A9%201");
/// ```
#[must_use]
pub fn encode(bytes: &[u8], table: Table) -> String {
    let mut buf = String::with_capacity(bytes.len());
    encode_to(bytes, table, &mut buf);
    buf
}

/// Percent-encodes a byte sequence with the given table, appending to a buffer.
pub fn encode_to(bytes: &[u8], table: Table, buf: &mut String) {
    let mut rem = bytes;
    while !rem.is_empty() {
        let i = rem.iter().position(|&x| !table.allows(x)).unwrap_or(rem.len());
        let (allowed, tail) = rem.split_at(i);
        // Allowed bytes are ASCII.
        buf.push_str(str::from_utf8(allowed).unwrap_or_default());
        match tail.split_first() {
            Some((&x, tail)) => {
                buf.push_str(encode_byte(x));
                rem = tail;
            }
            None => break,
        }
    }
}

/// Decodes every valid percent-encoded octet in a string.
///
/// Invalid or incomplete octets are left untouched.
///
/// # Examples
///
/// ```
/// use safe_url::pct_enc;
///
/// assert_eq!(&*pct_enc::decode_to_bytes("a%20b%zz%E9"), b"a b%zz\xe9");
/// ```
#[must_use]
pub fn decode_to_bytes(s: &str) -> Cow<'_, [u8]> {
    if !s.contains('%') {
        return Cow::Borrowed(s.as_bytes());
    }
    let mut buf = Vec::with_capacity(s.len());
    for chunk in Decode::new(s) {
        match chunk {
            DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
            DecodedChunk::PctDecoded(x) => buf.push(x),
        }
    }
    Cow::Owned(buf)
}

/// Decodes a path while keeping its structure intact.
///
/// Works like [`decode_to_bytes`], except that the octets of `/`, `?` and `%`
/// stay encoded (in uppercase), and so does a `%` that does not start an
/// octet. Decoding the result once more therefore yields the same bytes as
/// decoding the input once.
///
/// # Examples
///
/// ```
/// use safe_url::pct_enc;
///
/// assert_eq!(&*pct_enc::unquote_path("/a%2fb%3F%7Euser%2541"), b"/a%2Fb%3F~user%2541");
/// ```
#[must_use]
pub fn unquote_path(path: &str) -> Cow<'_, [u8]> {
    if !path.contains('%') {
        return Cow::Borrowed(path.as_bytes());
    }
    let mut buf = Vec::with_capacity(path.len());
    for chunk in Decode::new(path) {
        match chunk {
            DecodedChunk::Unencoded(s) => match s.strip_prefix('%') {
                Some(rest) => {
                    buf.extend_from_slice(b"%25");
                    buf.extend_from_slice(rest.as_bytes());
                }
                None => buf.extend_from_slice(s.as_bytes()),
            },
            DecodedChunk::PctDecoded(x @ (b'/' | b'?' | b'%')) => {
                buf.extend_from_slice(encode_byte(x).as_bytes());
            }
            DecodedChunk::PctDecoded(x) => buf.push(x),
        }
    }
    Cow::Owned(buf)
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet, returning `None` if either byte is not hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> Option<u8> {
    let (hi, lo) = (OCTET_TABLE_HI[hi as usize], OCTET_TABLE_LO[lo as usize]);
    (hi != 0xff && lo != 0xff).then_some(hi | lo)
}

/// An iterator used to decode a percent-encoded string slice.
///
/// See the [`DecodedChunk`] type for documentation of the items yielded by this iterator.
///
/// # Examples
///
/// ```
/// use safe_url::pct_enc::{Decode, DecodedChunk};
///
/// let mut chunks = Decode::new("a%41%g");
/// assert!(matches!(chunks.next(), Some(DecodedChunk::Unencoded("a"))));
/// assert!(matches!(chunks.next(), Some(DecodedChunk::PctDecoded(b'A'))));
/// assert!(matches!(chunks.next(), Some(DecodedChunk::Unencoded("%g"))));
/// assert!(chunks.next().is_none());
/// ```
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    ///
    /// A subslice starts with `%` only when that `%` does not begin a valid octet.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    /// Creates an iterator decoding the given string slice.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn next_octet(&self) -> Option<u8> {
        match self.source.as_bytes() {
            [b'%', hi, lo, ..] => decode_octet(*hi, *lo),
            _ => None,
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            return None;
        }
        if let Some(x) = self.next_octet() {
            self.source = &self.source[3..];
            return Some(DecodedChunk::PctDecoded(x));
        }
        // Skip a leading invalid `%` before searching for the next one.
        let i = self.source.as_bytes()[1..]
            .iter()
            .position(|&x| x == b'%')
            .map_or(self.source.len(), |i| i + 1);
        let s;
        (s, self.source) = self.source.split_at(i);
        Some(DecodedChunk::Unencoded(s))
    }
}

impl FusedIterator for Decode<'_> {}

/// Percent-encodes a single byte as an uppercase triplet.
pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}
