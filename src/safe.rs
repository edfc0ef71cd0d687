//! Safe URL strings.

use crate::{
    charset,
    component::{self, Authority, UrlParts},
    host,
    parse::strip_url,
    pct_enc::{
        self, FRAGMENT_SAFEST, HOST_SAFE, IP_LITERAL_SAFE, PATH_SAFEST, QUERY_SAFEST,
        QUERY_SAFEST_SPECIAL, USERINFO_SAFEST,
    },
    resolve,
};
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;

static PARENT_DIRS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/?(\.\./)+").expect("parent directory pattern is valid"));

/// A configurable builder of safe URL strings.
///
/// A safe URL carries every byte outside its segment's table as an uppercase
/// percent-encoded octet, and building it again changes nothing. Existing
/// percent-encoded octets are kept, so a path encoded in another charset,
/// such as `%A3`, survives untouched.
///
/// | Segment | Table |
/// |---|---|
/// | username, password | [`USERINFO_SAFEST`] |
/// | host | IDNA, then [`HOST_SAFE`]; [`IP_LITERAL_SAFE`] in brackets |
/// | path | [`PATH_SAFEST`] |
/// | query | [`QUERY_SAFEST_SPECIAL`] |
/// | fragment | [`FRAGMENT_SAFEST`] |
///
/// # Examples
///
/// ```
/// use safe_url::SafeUrl;
///
/// let safe = SafeUrl::new();
/// assert_eq!(
///     safe.encode(" http://Us er@www.EXAMPLE.com/résumé 1?q='x'#a b\n"),
///     "http://Us%20er@www.example.com/r%C3%A9sum%C3%A9%201?q=%27x%27#a%20b"
/// );
/// assert_eq!(safe.encode("http://münchen.de/%A3"), "http://xn--mnchen-3ya.de/%A3");
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct SafeUrl {
    encoding: &'static Encoding,
    path_encoding: &'static Encoding,
    quote_path: bool,
    special_query_for_all_schemes: bool,
}

impl Default for SafeUrl {
    fn default() -> Self {
        Self::new()
    }
}

impl SafeUrl {
    /// Creates a new `SafeUrl` with default options.
    pub fn new() -> Self {
        Self {
            encoding: UTF_8,
            path_encoding: UTF_8,
            quote_path: true,
            special_query_for_all_schemes: true,
        }
    }

    /// Sets the encoding of the query, the fragment and hosts that IDNA
    /// rejects, and of the input of [`encode_bytes`]. This defaults to UTF-8.
    ///
    /// Text that the encoding cannot represent is encoded as UTF-8 instead.
    ///
    /// [`encode_bytes`]: Self::encode_bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::SafeUrl;
    ///
    /// let safe = SafeUrl::new().encoding(encoding_rs::WINDOWS_1252);
    /// assert_eq!(safe.encode("http://example.com/é?q=é"), "http://example.com/%C3%A9?q=%E9");
    /// assert_eq!(safe.encode("http://example.com/?q=ア"), "http://example.com/?q=%E3%82%A2");
    /// ```
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the encoding of the path. This defaults to UTF-8.
    pub fn path_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.path_encoding = encoding;
        self
    }

    /// Sets whether to percent-encode the path. This defaults to `true`.
    pub fn quote_path(mut self, value: bool) -> Self {
        self.quote_path = value;
        self
    }

    /// Sets whether every scheme encodes `'` in the query. This defaults to `true`.
    ///
    /// With `false`, only special schemes encode it.
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::SafeUrl;
    ///
    /// let safe = SafeUrl::new().special_query_for_all_schemes(false);
    /// assert_eq!(safe.encode("foo://host/?q='x'"), "foo://host/?q='x'");
    /// assert_eq!(safe.encode("http://host/?q='x'"), "http://host/?q=%27x%27");
    /// ```
    pub fn special_query_for_all_schemes(mut self, value: bool) -> Self {
        self.special_query_for_all_schemes = value;
        self
    }

    /// Makes a URL string safe.
    #[must_use]
    pub fn encode(&self, url: &str) -> String {
        let url = strip_url(url);
        let parts = UrlParts::split(&url);

        let netloc = parts.authority().map(|auth| self.encode_netloc(&auth));

        let path = if self.quote_path {
            let bytes = charset::encode_or_utf8(&parts.path, self.path_encoding);
            pct_enc::encode(&bytes, PATH_SAFEST)
        } else {
            parts.path
        };

        let query_table =
            if self.special_query_for_all_schemes || component::is_special(&parts.scheme) {
                QUERY_SAFEST_SPECIAL
            } else {
                QUERY_SAFEST
            };
        let query = parts
            .query
            .map(|q| pct_enc::encode(&charset::encode_or_utf8(&q, self.encoding), query_table));
        let fragment = parts.fragment.map(|f| {
            pct_enc::encode(&charset::encode_or_utf8(&f, self.encoding), FRAGMENT_SAFEST)
        });

        UrlParts {
            scheme: parts.scheme,
            netloc,
            path,
            params: None,
            query,
            fragment,
        }
        .to_string()
    }

    /// Makes a URL given as bytes safe.
    ///
    /// The bytes are decoded with the configured [`encoding`], and every
    /// malformed sequence is percent-encoded instead of replaced.
    ///
    /// [`encoding`]: Self::encoding
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::SafeUrl;
    ///
    /// let safe = SafeUrl::new();
    /// assert_eq!(safe.encode_bytes(b"http://example.com/\xff x"), "http://example.com/%FF%20x");
    /// ```
    #[must_use]
    pub fn encode_bytes(&self, url: &[u8]) -> String {
        self.encode(&charset::decode(url, self.encoding))
    }

    /// Makes a URL string safe for downloading.
    ///
    /// In addition to [`encode`], the fragment is dropped, `.` and `..`
    /// segments are collapsed, and an empty path becomes `/`. A trailing
    /// slash of the path is kept.
    ///
    /// [`encode`]: Self::encode
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::SafeUrl;
    ///
    /// let safe = SafeUrl::new();
    /// assert_eq!(safe.download("http://example.com/a/./b/../c/#top"), "http://example.com/a/c/");
    /// assert_eq!(safe.download("http://example.com"), "http://example.com/");
    /// assert_eq!(safe.download("../../a/b"), "a/b");
    /// ```
    #[must_use]
    pub fn download(&self, url: &str) -> String {
        let mut parts = UrlParts::split(&self.encode(url));
        parts.fragment = None;
        parts.path = if parts.path.is_empty() {
            "/".to_owned()
        } else {
            let mut path = PARENT_DIRS
                .replace_all(&resolve::normpath(&parts.path), "")
                .into_owned();
            if parts.path.ends_with('/') && !path.ends_with('/') {
                path.push('/');
            }
            path
        };
        parts.to_string()
    }

    fn encode_netloc(&self, auth: &Authority<'_>) -> String {
        let mut buf = String::with_capacity(auth.as_str().len());

        if let Some(username) = auth.username() {
            pct_enc::encode_to(&pct_enc::decode_to_bytes(username), USERINFO_SAFEST, &mut buf);
            if let Some(password) = auth.password() {
                buf.push(':');
                pct_enc::encode_to(&pct_enc::decode_to_bytes(password), USERINFO_SAFEST, &mut buf);
            }
            buf.push('@');
        }

        if let Some(host) = auth.host() {
            let host = host::to_lowercase(host);
            if auth.has_ip_literal() {
                buf.push('[');
                pct_enc::encode_to(host.as_bytes(), IP_LITERAL_SAFE, &mut buf);
                buf.push(']');
            } else {
                match host::to_ascii(&host) {
                    Ok(ascii) => pct_enc::encode_to(ascii.as_bytes(), HOST_SAFE, &mut buf),
                    Err(err) => {
                        tracing::debug!(%err, %host, "encoding host without IDNA");
                        let bytes = charset::encode_or_utf8(&host, self.encoding);
                        pct_enc::encode_to(&bytes, HOST_SAFE, &mut buf);
                    }
                }
            }
        }

        match auth.port_to_u16() {
            Ok(Some(port)) => {
                buf.push(':');
                buf.push_str(&port.to_string());
            }
            Ok(None) => {}
            Err(err) => tracing::debug!(%err, "dropping port"),
        }
        buf
    }
}

/// Makes a URL string safe with the default options.
///
/// See [`SafeUrl`] for details.
#[must_use]
pub fn safe_url_string(url: &str) -> String {
    SafeUrl::new().encode(url)
}

/// Makes a URL string safe for downloading with the default options.
///
/// See [`SafeUrl::download`] for details.
#[must_use]
pub fn safe_download_url(url: &str) -> String {
    SafeUrl::new().download(url)
}
