//! URL components.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The six components of a URL.
///
/// A `UrlParts` is produced by [`split`] or [`split_with_params`] and turned
/// back into a string with [`to_string`]. No component is decoded by
/// splitting, and `None` differs from `Some("")`: the former means the
/// delimiter of the component was absent. Joining the parts of a split
/// string therefore gives back the same string, except that the scheme
/// is lowercased.
///
/// Replace components with struct update syntax:
///
/// ```
/// use safe_url::UrlParts;
///
/// let parts = UrlParts::split("HTTP://example.com/a?b#c");
/// assert_eq!(parts.scheme, "http");
/// assert_eq!(parts.netloc.as_deref(), Some("example.com"));
///
/// let parts = UrlParts { query: None, fragment: None, ..parts };
/// assert_eq!(parts.to_string(), "http://example.com/a");
/// ```
///
/// [`split`]: UrlParts::split
/// [`split_with_params`]: UrlParts::split_with_params
/// [`to_string`]: ToString::to_string
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UrlParts {
    /// The scheme, lowercased, or empty if there is none.
    pub scheme: String,
    /// The network location after `//`.
    pub netloc: Option<String>,
    /// The path.
    pub path: String,
    /// The parameters of the last path segment, after `;`.
    pub params: Option<String>,
    /// The query, after `?`.
    pub query: Option<String>,
    /// The fragment, after `#`.
    pub fragment: Option<String>,
}

impl UrlParts {
    /// Returns a view of the network location.
    #[must_use]
    pub fn authority(&self) -> Option<Authority<'_>> {
        self.netloc.as_deref().map(Authority::new)
    }
}

/// A view of a network location, i.e., `[userinfo@]host[:port]`.
///
/// The userinfo ends at the last `@`. The host is enclosed in brackets
/// when the rest starts with `[`, and otherwise ends at the first `:`.
///
/// # Examples
///
/// ```
/// use safe_url::Authority;
///
/// let auth = Authority::new("user:pa:ss@[::1]:8080");
/// assert_eq!(auth.username(), Some("user"));
/// assert_eq!(auth.password(), Some("pa:ss"));
/// assert_eq!(auth.host(), Some("::1"));
/// assert!(auth.has_ip_literal());
/// assert_eq!(auth.port_to_u16(), Ok(Some(8080)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Authority<'a> {
    val: &'a str,
    userinfo_end: Option<usize>,
    host_bounds: (usize, usize),
    port_start: Option<usize>,
    ip_literal: bool,
}

impl<'a> Authority<'a> {
    /// Splits a network location into its subcomponents.
    #[must_use]
    pub fn new(val: &'a str) -> Self {
        let userinfo_end = val.rfind('@');
        let host_start = userinfo_end.map_or(0, |i| i + 1);
        let hostinfo = &val[host_start..];

        let (host_bounds, port_start, ip_literal) =
            if let Some(bracketed) = hostinfo.strip_prefix('[') {
                let start = host_start + 1;
                let end = bracketed.find(']').map_or(val.len(), |i| start + i);
                let port_start = val[end..].find(':').map(|i| end + i + 1);
                ((start, end), port_start, true)
            } else {
                let end = hostinfo.find(':').map_or(val.len(), |i| host_start + i);
                let port_start = (end < val.len()).then_some(end + 1);
                ((host_start, end), port_start, false)
            };

        Self {
            val,
            userinfo_end,
            host_bounds,
            port_start,
            ip_literal,
        }
    }

    /// Returns the network location as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.val
    }

    /// Returns the userinfo, i.e., everything before the last `@`.
    #[must_use]
    pub fn userinfo(&self) -> Option<&'a str> {
        self.userinfo_end.map(|i| &self.val[..i])
    }

    /// Returns the part of the userinfo before the first `:`.
    #[must_use]
    pub fn username(&self) -> Option<&'a str> {
        self.userinfo()
            .map(|s| s.split_once(':').map_or(s, |(user, _)| user))
    }

    /// Returns the part of the userinfo after the first `:`.
    #[must_use]
    pub fn password(&self) -> Option<&'a str> {
        self.userinfo()
            .and_then(|s| s.split_once(':'))
            .map(|(_, pass)| pass)
    }

    /// Returns the host, without brackets, or `None` if it is empty.
    #[must_use]
    pub fn host(&self) -> Option<&'a str> {
        let (start, end) = self.host_bounds;
        Some(&self.val[start..end]).filter(|s| !s.is_empty())
    }

    pub(crate) fn host_bounds(&self) -> (usize, usize) {
        self.host_bounds
    }

    /// Checks whether the host is enclosed in brackets.
    #[must_use]
    pub fn has_ip_literal(&self) -> bool {
        self.ip_literal
    }

    /// Returns the raw port, which may be empty or invalid.
    #[must_use]
    pub fn port(&self) -> Option<&'a str> {
        self.port_start.map(|i| &self.val[i..])
    }

    /// Converts the port to a `u16`.
    ///
    /// An absent or empty port converts to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPort`] if the port contains a non-digit
    /// or is greater than 65535.
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::{Authority, Error};
    ///
    /// assert_eq!(Authority::new("localhost:4673").port_to_u16(), Ok(Some(4673)));
    /// assert_eq!(Authority::new("localhost:").port_to_u16(), Ok(None));
    /// assert_eq!(
    ///     Authority::new("localhost:123456").port_to_u16(),
    ///     Err(Error::InvalidPort("123456".to_owned()))
    /// );
    /// ```
    pub fn port_to_u16(&self) -> Result<Option<u16>> {
        match self.port().filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(s) if s.bytes().all(|x| x.is_ascii_digit()) => s
                .parse()
                .map(Some)
                .map_err(|_| Error::InvalidPort(s.to_owned())),
            Some(s) => Err(Error::InvalidPort(s.to_owned())),
        }
    }
}

/// Returns the default port of a special scheme.
///
/// `file` is special but has no default port.
#[must_use]
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ftp" => Some(21),
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

/// Checks whether a lowercase scheme is one of `ftp`, `file`, `http`, `https`, `ws` and `wss`.
#[must_use]
pub fn is_special(scheme: &str) -> bool {
    matches!(scheme, "ftp" | "file" | "http" | "https" | "ws" | "wss")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_without_userinfo_or_port() {
        let auth = Authority::new("example.com");
        assert_eq!(auth.userinfo(), None);
        assert_eq!(auth.username(), None);
        assert_eq!(auth.password(), None);
        assert_eq!(auth.host(), Some("example.com"));
        assert_eq!(auth.port(), None);
        assert!(!auth.has_ip_literal());
    }

    #[test]
    fn userinfo_ends_at_last_at_sign() {
        let auth = Authority::new("a@b:c@d@host:1");
        assert_eq!(auth.userinfo(), Some("a@b:c@d"));
        assert_eq!(auth.username(), Some("a@b"));
        assert_eq!(auth.password(), Some("c@d"));
        assert_eq!(auth.host(), Some("host"));
        assert_eq!(auth.port(), Some("1"));
    }

    #[test]
    fn empty_host_and_port() {
        let auth = Authority::new("user@:80");
        assert_eq!(auth.host(), None);
        assert_eq!(auth.port_to_u16(), Ok(Some(80)));
        assert_eq!(Authority::new("").host(), None);
        assert_eq!(Authority::new("x:").port(), Some(""));
    }

    #[test]
    fn ip_literals() {
        let auth = Authority::new("[::1]");
        assert_eq!(auth.host(), Some("::1"));
        assert_eq!(auth.port(), None);

        let auth = Authority::new("[::1");
        assert_eq!(auth.host(), Some("::1"));

        let auth = Authority::new("[::1]junk:80");
        assert_eq!(auth.host(), Some("::1"));
        assert_eq!(auth.port(), Some("80"));

        let auth = Authority::new("a[b");
        assert!(!auth.has_ip_literal());
        assert_eq!(auth.host(), Some("a[b"));
    }

    #[test]
    fn invalid_ports() {
        for port in ["+80", "8 0", "65536", "８０"] {
            let netloc = format!("host:{port}");
            assert_eq!(
                Authority::new(&netloc).port_to_u16(),
                Err(Error::InvalidPort(port.to_owned()))
            );
        }
        assert_eq!(Authority::new("host:080").port_to_u16(), Ok(Some(80)));
    }

    #[test]
    fn special_schemes() {
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("file"), None);
        assert!(is_special("file"));
        assert!(!is_special("foo"));
    }
}
