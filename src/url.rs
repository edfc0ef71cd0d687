//! The `Url` wrapper and the `is_url` prefix check.

use crate::{component::UrlParts, resolve};
use regex::{Captures, Regex};
use std::hash;

/// Checks whether a string starts with `file://`, `http://` or `https://`.
///
/// # Examples
///
/// ```
/// use safe_url::is_url;
///
/// assert!(is_url("https://example.com"));
/// assert!(is_url("file:///etc/hosts"));
/// assert!(!is_url("ftp://example.com"));
/// assert!(!is_url("example.com"));
/// ```
#[must_use]
pub fn is_url(value: &str) -> bool {
    value
        .split_once("://")
        .map_or(false, |(scheme, _)| matches!(scheme, "file" | "http" | "https"))
}

/// A URL string together with its components.
///
/// The string is kept exactly as given; comparison and hashing use it
/// unchanged. Components are split as by [`UrlParts::split_with_params`].
///
/// # Examples
///
/// ```
/// use safe_url::Url;
///
/// let url = Url::new("http://example.com/a/b/file.tar.gz");
/// assert!(url.is_valid());
/// assert_eq!(url.decompose_path(&[]), ["a", "b", "file.tar.gz"]);
/// assert_eq!(url.stem(), Some("file.tar"));
/// assert_eq!(url.extension(), Some("gz"));
/// assert_eq!(url.join("../c?x=1"), "http://example.com/a/c?x=1");
/// ```
#[derive(Clone)]
pub struct Url {
    raw: String,
    parts: UrlParts,
}

impl Url {
    /// Creates a `Url` from a string.
    pub fn new(url: impl Into<String>) -> Self {
        let raw = url.into();
        let parts = UrlParts::split_with_params(&raw);
        Self { raw, parts }
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consumes this `Url` and yields the underlying [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }

    /// Returns the components of the URL.
    #[must_use]
    pub fn parts(&self) -> &UrlParts {
        &self.parts
    }

    /// Checks whether the URL starts with `/`.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.raw.starts_with('/')
    }

    /// Checks whether the URL starts with `http://` or `https://`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.raw.starts_with("http://") || self.raw.starts_with("https://")
    }

    /// Checks whether the URL has a non-empty fragment or ends with `#`.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.parts.fragment.as_deref().map_or(false, |f| !f.is_empty()) || self.raw.ends_with('#')
    }

    /// Checks whether the scheme is `https`.
    #[must_use]
    pub fn is_secured(&self) -> bool {
        self.parts.scheme == "https"
    }

    /// Checks whether another URL has the same network location.
    #[must_use]
    pub fn is_same_domain(&self, other: &str) -> bool {
        UrlParts::split_with_params(other).netloc == self.parts.netloc
    }

    /// Checks whether another URL has the same path, treating an empty path
    /// and `/` as equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::Url;
    ///
    /// let url = Url::new("http://example.com");
    /// assert!(url.compare("https://other.example/"));
    /// assert!(!url.compare("http://example.com/a"));
    /// ```
    #[must_use]
    pub fn compare(&self, other: &str) -> bool {
        let other = UrlParts::split_with_params(other);
        let (a, b) = (self.parts.path.as_str(), other.path.as_str());
        a == b || matches!((a, b), ("", "/") | ("/", ""))
    }

    /// Checks whether the URL contains a substring.
    #[must_use]
    pub fn contains(&self, pat: &str) -> bool {
        self.raw.contains(pat)
    }

    /// Resolves a reference against this URL.
    ///
    /// Resolution follows [Section 5.2 of RFC 3986], ignoring the fragment of
    /// this URL. A relative reference with a path cannot be resolved against
    /// a URL with neither a network location nor an absolute path, and is
    /// returned unchanged.
    ///
    /// [Section 5.2 of RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2
    ///
    /// # Examples
    ///
    /// ```
    /// use safe_url::Url;
    ///
    /// let base = Url::new("http://example.com/foo/bar#frag");
    /// assert_eq!(base.join("baz"), "http://example.com/foo/baz");
    /// assert_eq!(base.join("../../../baz"), "http://example.com/baz");
    /// assert_eq!(base.join("?q"), "http://example.com/foo/bar?q");
    /// assert_eq!(base.join("#top"), "http://example.com/foo/bar#top");
    /// assert_eq!(base.join("//other.example/x"), "http://other.example/x");
    /// assert_eq!(base.join("mailto:a@b"), "mailto:a@b");
    /// ```
    #[must_use]
    pub fn join(&self, reference: &str) -> Url {
        let base = UrlParts::split(&self.raw);
        let resolved = resolve::resolve(&base, &UrlParts::split(reference));
        Url::new(resolved.to_string())
    }

    /// Returns the path segments, skipping empty ones and those in `exclude`.
    #[must_use]
    pub fn decompose_path(&self, exclude: &[&str]) -> Vec<&str> {
        self.parts
            .path
            .split('/')
            .filter(|seg| !seg.is_empty() && !exclude.contains(seg))
            .collect()
    }

    fn file_name(&self) -> Option<&str> {
        self.parts.path.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Returns the last path segment without its extension.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => Some(stem),
            _ => Some(name),
        }
    }

    /// Returns the extension of the last path segment, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.file_name()?
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, ext)| ext)
    }

    /// Checks whether the pattern matches anywhere in the URL.
    #[must_use]
    pub fn is_match(&self, re: &Regex) -> bool {
        re.is_match(&self.raw)
    }

    /// Checks whether the pattern matches anywhere in the path.
    #[must_use]
    pub fn path_matches(&self, re: &Regex) -> bool {
        re.is_match(&self.parts.path)
    }

    /// Returns the captures of the first match of the pattern in the URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use regex::Regex;
    /// use safe_url::Url;
    ///
    /// let url = Url::new("http://example.com/items/42");
    /// let re = Regex::new(r"/items/(\d+)").unwrap();
    /// assert_eq!(&url.capture(&re).unwrap()[1], "42");
    /// ```
    #[must_use]
    pub fn capture<'a>(&'a self, re: &Regex) -> Option<Captures<'a>> {
        re.captures(&self.raw)
    }
}

impl From<&str> for Url {
    fn from(url: &str) -> Self {
        Url::new(url)
    }
}

impl From<String> for Url {
    fn from(url: String) -> Self {
        Url::new(url)
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Url {}

impl PartialEq<str> for Url {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Url {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl hash::Hash for Url {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
