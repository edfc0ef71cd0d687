use crate::{component::UrlParts, pct_enc::SCHEME};
use std::borrow::Cow;

/// Schemes whose last path segment may carry `;params`.
const USES_PARAMS: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtsps", "rtspu",
    "sip", "sips", "mms", "sftp", "tel",
];

/// Removes the characters a URL must never carry unencoded at its edges or as layout.
///
/// Strips C0 control characters and spaces from both ends, then deletes every
/// tab, line feed and carriage return.
///
/// # Examples
///
/// ```
/// use safe_url::strip_url;
///
/// assert_eq!(strip_url(" \thttp://exa\nmple.com/a b\r\n\0"), "http://example.com/a b");
/// ```
#[must_use]
pub fn strip_url(url: &str) -> Cow<'_, str> {
    let trimmed = url.trim_matches(|c: char| c <= ' ');
    if trimmed.contains(|c| matches!(c, '\t' | '\n' | '\r')) {
        Cow::Owned(
            trimmed
                .chars()
                .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
                .collect(),
        )
    } else {
        Cow::Borrowed(trimmed)
    }
}

impl UrlParts {
    /// Splits a URL into its components, leaving `params` empty.
    ///
    /// The text before the first `:` is the scheme if it starts with an ASCII
    /// letter and only contains letters, digits, `+`, `-` and `.`. A following
    /// `//` introduces the network location, which ends at the first `/`, `?`
    /// or `#`. The fragment follows the first `#`, and the query the first `?`
    /// before it.
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::UrlParts;
    ///
    /// let parts = UrlParts::split("foo://user@host:1/p;x?q=1#frag");
    /// assert_eq!(parts.scheme, "foo");
    /// assert_eq!(parts.netloc.as_deref(), Some("user@host:1"));
    /// assert_eq!(parts.path, "/p;x");
    /// assert_eq!(parts.params, None);
    /// assert_eq!(parts.query.as_deref(), Some("q=1"));
    /// assert_eq!(parts.fragment.as_deref(), Some("frag"));
    /// ```
    #[must_use]
    pub fn split(url: &str) -> Self {
        let (scheme, rest) = split_scheme(url);

        let (netloc, rest) = match rest.strip_prefix("//") {
            Some(rest) => {
                let end = rest
                    .find(|c| matches!(c, '/' | '?' | '#'))
                    .unwrap_or(rest.len());
                (Some(&rest[..end]), &rest[end..])
            }
            None => (None, rest),
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (rest, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        Self {
            scheme: scheme.to_ascii_lowercase(),
            netloc: netloc.map(str::to_owned),
            path: path.to_owned(),
            params: None,
            query: query.map(str::to_owned),
            fragment: fragment.map(str::to_owned),
        }
    }

    /// Splits a URL like [`split`], additionally taking `;params`
    /// off the last path segment.
    ///
    /// Params are only recognized for the schemes that use them, such as
    /// `http`, `https`, `ftp` and the empty scheme.
    ///
    /// [`split`]: Self::split
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::UrlParts;
    ///
    /// let parts = UrlParts::split_with_params("http://host/a;b/c;d?q");
    /// assert_eq!(parts.path, "/a;b/c");
    /// assert_eq!(parts.params.as_deref(), Some("d"));
    /// assert_eq!(parts.to_string(), "http://host/a;b/c;d?q");
    ///
    /// let parts = UrlParts::split_with_params("foo://host/c;d");
    /// assert_eq!(parts.params, None);
    /// ```
    #[must_use]
    pub fn split_with_params(url: &str) -> Self {
        let mut parts = Self::split(url);
        if USES_PARAMS.contains(&parts.scheme.as_str()) {
            let last_seg = parts.path.rfind('/').unwrap_or(0);
            if let Some(i) = parts.path[last_seg..].find(';') {
                let i = last_seg + i;
                parts.params = Some(parts.path[i + 1..].to_owned());
                parts.path.truncate(i);
            }
        }
        parts
    }
}

fn split_scheme(url: &str) -> (&str, &str) {
    match url.split_once(':') {
        Some((scheme, rest))
            if scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && SCHEME.allows_all(scheme) =>
        {
            (scheme, rest)
        }
        _ => ("", url),
    }
}
