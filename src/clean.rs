//! Canonical URL strings.

use crate::{
    charset,
    component::{Authority, UrlParts},
    host,
    parse::strip_url,
    pct_enc::{self, PATH_SAFE},
    query::parse_query_to_bytes,
};
use encoding_rs::{Encoding, UTF_8};
use std::convert::Infallible;

/// A configurable normalizer of URLs into a canonical form.
///
/// URLs that differ only in query parameter order, percent-encoding,
/// netloc case or a dropped fragment normalize to the same string, and
/// normalizing twice changes nothing.
///
/// # Examples
///
/// ```
/// use safe_url::Cleaner;
///
/// let cleaner = Cleaner::new();
/// assert_eq!(
///     cleaner.clean("HTTP://WWW.Example.com:/do?c=3&b=5&b=2&a=50#frag"),
///     "http://www.example.com/do?a=50&b=2&b=5&c=3"
/// );
/// assert_eq!(
///     cleaner.clean("http://www.example.com/a%2fb/%7euser/r%C3%A9sum%C3%A9?q=a b"),
///     "http://www.example.com/a%2Fb/~user/r%C3%A9sum%C3%A9?q=a+b"
/// );
///
/// let cleaner = Cleaner::new().keep_blank_values(false).keep_fragments(true);
/// assert_eq!(
///     cleaner.clean("http://www.example.com/do?a=1&b=&c#frag"),
///     "http://www.example.com/do?a=1#frag"
/// );
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct Cleaner {
    keep_blank_values: bool,
    keep_fragments: bool,
    encoding: &'static Encoding,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    /// Creates a new `Cleaner` with default options.
    pub fn new() -> Self {
        Self {
            keep_blank_values: true,
            keep_fragments: false,
            encoding: UTF_8,
        }
    }

    /// Sets whether to keep query parameters with blank values. This defaults to `true`.
    pub fn keep_blank_values(mut self, value: bool) -> Self {
        self.keep_blank_values = value;
        self
    }

    /// Sets whether to keep the fragment. This defaults to `false`.
    pub fn keep_fragments(mut self, value: bool) -> Self {
        self.keep_fragments = value;
        self
    }

    /// Sets the encoding of the query and the fragment. This defaults to UTF-8.
    ///
    /// If the encoding cannot represent them, the whole URL is encoded as UTF-8.
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Normalizes a URL.
    #[must_use]
    pub fn clean(&self, url: &str) -> String {
        let url = strip_url(url);
        let parts = match requote(&url, |s| {
            charset::encode(s, self.encoding).map(|bytes| bytes.into_owned())
        }) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!(%err, "requoting URL as UTF-8");
                match requote(&url, |s| Ok::<_, Infallible>(s.as_bytes().to_vec())) {
                    Ok(parts) => parts,
                    Err(never) => match never {},
                }
            }
        };

        let mut params = parse_query_to_bytes(
            parts.query.as_deref().unwrap_or_default(),
            self.keep_blank_values,
        );
        params.sort_unstable();
        let query = form_encode(&params);

        let mut path = pct_enc::encode(&pct_enc::unquote_path(&parts.path), PATH_SAFE);
        if path.is_empty() {
            path.push('/');
        } else {
            if parts.scheme.is_empty() && parts.netloc.is_none() {
                escape_first_segment_colons(&mut path);
            }
            escape_leading_semicolon(&mut path);
        }

        let netloc = parts.netloc.map(|netloc| {
            let mut netloc = netloc.to_lowercase();
            netloc.truncate(netloc.trim_end_matches(':').len());
            netloc
        });

        UrlParts {
            scheme: parts.scheme,
            netloc,
            path,
            params: parts.params,
            query: (!query.is_empty()).then_some(query),
            fragment: parts.fragment.filter(|_| self.keep_fragments),
        }
        .to_string()
    }
}

/// Splits a URL, encoding the host with IDNA and every other component
/// except the netloc with [`PATH_SAFE`].
///
/// The path and the params are encoded as UTF-8, and the query and the
/// fragment with `encode`.
fn requote<E>(url: &str, encode: impl Fn(&str) -> Result<Vec<u8>, E>) -> Result<UrlParts, E> {
    let parts = UrlParts::split_with_params(url);

    let netloc = parts.netloc.as_deref().map(idna_netloc);
    let path = pct_enc::encode(parts.path.as_bytes(), PATH_SAFE);
    let params = parts
        .params
        .as_deref()
        .map(|p| pct_enc::encode(p.as_bytes(), PATH_SAFE));
    let query = match parts.query.as_deref() {
        Some(q) => Some(pct_enc::encode(&encode(q)?, PATH_SAFE)),
        None => None,
    };
    let fragment = match parts.fragment.as_deref() {
        Some(f) => Some(pct_enc::encode(&encode(f)?, PATH_SAFE)),
        None => None,
    };

    Ok(UrlParts {
        scheme: parts.scheme,
        netloc,
        path,
        params,
        query,
        fragment,
    })
}

/// Replaces the host of a netloc with its IDNA form, or keeps the netloc as is.
fn idna_netloc(netloc: &str) -> String {
    let auth = Authority::new(netloc);
    let Some(host) = auth.host().filter(|h| !h.is_ascii() && !auth.has_ip_literal()) else {
        return netloc.to_owned();
    };
    match host::to_ascii(host) {
        Ok(ascii) => {
            let (start, end) = auth.host_bounds();
            format!("{}{ascii}{}", &netloc[..start], &netloc[end..])
        }
        Err(err) => {
            tracing::debug!(%err, host, "keeping non-ASCII host");
            netloc.to_owned()
        }
    }
}

/// Serializes decoded pairs as `application/x-www-form-urlencoded`.
fn form_encode(pairs: &[(Vec<u8>, Vec<u8>)]) -> String {
    let mut buf = String::new();
    for (key, value) in pairs {
        if !buf.is_empty() {
            buf.push('&');
        }
        buf.extend(form_urlencoded::byte_serialize(key));
        buf.push('=');
        buf.extend(form_urlencoded::byte_serialize(value));
    }
    buf
}

/// Escapes `:` in the first segment of a rootless path so that it is not
/// read as a scheme delimiter.
fn escape_first_segment_colons(path: &mut String) {
    let end = path.find('/').unwrap_or(path.len());
    if path[..end].contains(':') {
        let escaped = path[..end].replace(':', "%3A");
        path.replace_range(..end, &escaped);
    }
}

/// Escapes a `;` that starts the path, which would otherwise open the params
/// of an empty path.
fn escape_leading_semicolon(path: &mut String) {
    if path.starts_with(';') {
        path.replace_range(..1, "%3B");
    }
}

/// Normalizes a URL with the default options.
///
/// See [`Cleaner`] for details.
#[must_use]
pub fn clean_url(url: &str) -> String {
    Cleaner::new().clean(url)
}
