//! Query-parameter utilities.
//!
//! A query is read as a sequence of tokens separated by `&` or `;`, each
//! split once on its first `=`. A token without `=` or with an empty value
//! is *blank*. Every function here takes the same stance on blank tokens:
//! with `keep_blank_values` they become `(key, "")` pairs, otherwise they
//! are skipped. Only [`QueryCleaner::strict`] turns malformed tokens into
//! errors.

use crate::{
    component::UrlParts,
    error::{Error, Result},
    pct_enc,
};
use std::{borrow::Cow, collections::HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A decoded query parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueryParam {
    /// The key.
    pub key: String,
    /// The value, empty for blank parameters.
    pub value: String,
}

impl QueryParam {
    /// Creates a parameter from a key and a value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for QueryParam {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// An ordered list of decoded query parameters.
///
/// Keys may repeat. The order is the order of insertion unless the list is
/// explicitly sorted, and deduplication keeps the first occurrence of a key.
///
/// # Examples
///
/// ```
/// use safe_url::QueryParams;
///
/// let mut params = QueryParams::parse("b=2&a=1;b=3&c", false);
/// assert_eq!(params.get("b"), Some("2"));
/// assert_eq!(params.get_all("b").collect::<Vec<_>>(), ["2", "3"]);
/// assert_eq!(params.get("c"), None);
///
/// params.sort();
/// assert_eq!(params.to_form_string(), "a=1&b=2&b=3");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct QueryParams(Vec<QueryParam>);

impl QueryParams {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query, decoding `+` as space and percent-encoded octets as UTF-8.
    ///
    /// Invalid UTF-8 is replaced with `U+FFFD`.
    #[must_use]
    pub fn parse(query: &str, keep_blank_values: bool) -> Self {
        pairs(query, keep_blank_values)
            .map(|(key, value)| QueryParam {
                key: String::from_utf8_lossy(&decode_form(key)).into_owned(),
                value: String::from_utf8_lossy(&decode_form(value)).into_owned(),
            })
            .collect()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryParam> {
        self.0.iter()
    }

    /// Returns the value of the first parameter with the given key.
    #[must_use]
    pub fn get<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.get_all(key).next()
    }

    /// Returns the values of every parameter with the given key, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(QueryParam::new(key, value));
    }

    /// Sets the value of the first parameter with the given key, or appends
    /// a new parameter if there is none.
    pub fn upsert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.0.iter_mut().find(|p| p.key == key) {
            Some(p) => p.value = value.into(),
            None => self.0.push(QueryParam {
                key,
                value: value.into(),
            }),
        }
    }

    /// Removes every parameter whose key has occurred before.
    pub fn dedup_keys(&mut self) {
        let mut seen = HashSet::new();
        self.0.retain(|p| seen.insert(p.key.clone()));
    }

    /// Removes every parameter whose key is not in `keys`.
    pub fn retain_keys<S: AsRef<str>>(&mut self, keys: &[S]) {
        self.0.retain(|p| keys.iter().any(|k| k.as_ref() == p.key));
    }

    /// Sorts the parameters by key, then by value.
    pub fn sort(&mut self) {
        self.0.sort_unstable();
    }

    /// Serializes the parameters as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_form_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter().map(|p| (&p.key, &p.value)))
            .finish()
    }

    /// Joins the parameters with the given separators, without encoding them.
    #[must_use]
    pub fn join(&self, separator: &str, kv_separator: &str) -> String {
        self.0
            .iter()
            .map(|p| format!("{}{kv_separator}{}", p.key, p.value))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl<P: Into<QueryParam>> FromIterator<P> for QueryParams {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<P: Into<QueryParam>> Extend<P> for QueryParams {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for QueryParams {
    type Item = QueryParam;
    type IntoIter = std::vec::IntoIter<QueryParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = &'a QueryParam;
    type IntoIter = std::slice::Iter<'a, QueryParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Splits a query into raw key/value pairs.
fn pairs(query: &str, keep_blank_values: bool) -> impl Iterator<Item = (&str, &str)> {
    query
        .split(|c| c == '&' || c == ';')
        .filter(|token| !token.is_empty())
        .filter_map(move |token| {
            let (key, value) = token.split_once('=').unwrap_or((token, ""));
            if value.is_empty() && !keep_blank_values {
                tracing::trace!(token, "skipping blank query parameter");
                None
            } else {
                Some((key, value))
            }
        })
}

fn decode_form(s: &str) -> Cow<'_, [u8]> {
    if s.contains('+') {
        Cow::Owned(pct_enc::decode_to_bytes(&s.replace('+', " ")).into_owned())
    } else {
        pct_enc::decode_to_bytes(s)
    }
}

/// Parses a query into decoded parameters.
///
/// See [`QueryParams::parse`].
#[must_use]
pub fn parse_query(query: &str, keep_blank_values: bool) -> QueryParams {
    QueryParams::parse(query, keep_blank_values)
}

/// Parses a query into pairs of decoded bytes, without requiring UTF-8.
///
/// # Examples
///
/// ```
/// use safe_url::parse_query_to_bytes;
///
/// assert_eq!(
///     parse_query_to_bytes("a=%FF+b&c", true),
///     [(b"a".to_vec(), b"\xff b".to_vec()), (b"c".to_vec(), Vec::new())]
/// );
/// ```
#[must_use]
pub fn parse_query_to_bytes(query: &str, keep_blank_values: bool) -> Vec<(Vec<u8>, Vec<u8>)> {
    pairs(query, keep_blank_values)
        .map(|(key, value)| (decode_form(key).into_owned(), decode_form(value).into_owned()))
        .collect()
}

/// Returns the decoded value of the first query parameter with the given name.
///
/// Use [`Option::unwrap_or`] to supply a default.
///
/// # Examples
///
/// ```
/// use safe_url::get_url_parameter;
///
/// let url = "http://example.com/?a=1&b=&a=2&c=x+y";
/// assert_eq!(get_url_parameter(url, "a", false).as_deref(), Some("1"));
/// assert_eq!(get_url_parameter(url, "b", false), None);
/// assert_eq!(get_url_parameter(url, "b", true).as_deref(), Some(""));
/// assert_eq!(get_url_parameter(url, "c", false).as_deref(), Some("x y"));
/// assert_eq!(get_url_parameter(url, "d", false).unwrap_or_default(), "");
/// ```
#[must_use]
pub fn get_url_parameter(url: &str, name: &str, keep_blank_values: bool) -> Option<String> {
    let parts = UrlParts::split(url);
    let query = parts.query.as_deref().unwrap_or_default();
    QueryParams::parse(query, keep_blank_values)
        .into_iter()
        .find(|p| p.key == name)
        .map(|p| p.value)
}

/// Adds parameters to the query of a URL, replacing the values of existing keys.
///
/// The query is decoded keeping blank values, and only the first occurrence
/// of a key survives. Keys already present keep their position and take the
/// new value; new keys are appended in iteration order. The result is
/// re-encoded as `application/x-www-form-urlencoded`. An empty result
/// removes the query, and an empty fragment is removed as well.
///
/// # Examples
///
/// ```
/// use safe_url::add_or_replace_parameter;
///
/// let url = "http://example.com/?a=1&b=2&a=3#top";
/// assert_eq!(
///     add_or_replace_parameter(url, [("b", "new value"), ("c", "é")]),
///     "http://example.com/?a=1&b=new+value&c=%C3%A9#top"
/// );
/// ```
#[must_use]
pub fn add_or_replace_parameter<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut parts = UrlParts::split(url);
    let mut current = QueryParams::parse(parts.query.as_deref().unwrap_or_default(), true);
    current.dedup_keys();

    let mut updates: QueryParams = params.into_iter().collect();
    updates.dedup_keys();
    for QueryParam { key, value } in updates {
        current.upsert(key, value);
    }

    let query = current.to_form_string();
    parts.query = (!query.is_empty()).then_some(query);
    parts.fragment = parts.fragment.filter(|f| !f.is_empty());
    parts.to_string()
}

/// Removes query parameters from a URL without decoding them.
///
/// With the default options only the first occurrence of each key is kept,
/// blank parameters are kept as `key=`, and the fragment is dropped.
///
/// # Examples
///
/// ```
/// use safe_url::QueryCleaner;
///
/// let url = "http://example.com/?a=1&b=2&a=3&c#top";
/// assert_eq!(QueryCleaner::new().clean(url)?, "http://example.com/?a=1&b=2&c=");
/// assert_eq!(
///     QueryCleaner::new().names(["b", "c"]).keep_blank_values(false).clean(url)?,
///     "http://example.com/?b=2"
/// );
/// assert_eq!(
///     QueryCleaner::new().unique(false).keep_fragments(true).clean(url)?,
///     "http://example.com/?a=1&b=2&a=3&c=#top"
/// );
/// # Ok::<_, safe_url::Error>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct QueryCleaner {
    names: Vec<String>,
    separator: String,
    kv_separator: String,
    unique: bool,
    keep_fragments: bool,
    keep_blank_values: bool,
    strict: bool,
}

impl Default for QueryCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCleaner {
    /// Creates a new `QueryCleaner` with default options.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            separator: "&".to_owned(),
            kv_separator: "=".to_owned(),
            unique: true,
            keep_fragments: false,
            keep_blank_values: true,
            strict: false,
        }
    }

    /// Keeps only the parameters with the given keys.
    ///
    /// An empty list, the default, keeps every key.
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the separator between parameters. This defaults to `"&"`.
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_owned();
        self
    }

    /// Sets the separator between a key and its value. This defaults to `"="`.
    pub fn kv_separator(mut self, kv_separator: &str) -> Self {
        self.kv_separator = kv_separator.to_owned();
        self
    }

    /// Sets whether to keep only the first occurrence of each key. This defaults to `true`.
    pub fn unique(mut self, value: bool) -> Self {
        self.unique = value;
        self
    }

    /// Sets whether to keep a non-empty fragment. This defaults to `false`.
    pub fn keep_fragments(mut self, value: bool) -> Self {
        self.keep_fragments = value;
        self
    }

    /// Sets whether to keep blank parameters. This defaults to `true`.
    pub fn keep_blank_values(mut self, value: bool) -> Self {
        self.keep_blank_values = value;
        self
    }

    /// Sets whether a token that does not split into exactly one key and one
    /// value is an error. This defaults to `false`.
    pub fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Removes the unwanted parameters from the query of a URL.
    ///
    /// The `?` is omitted when no parameter is left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySeparator`] if either separator is empty, or
    /// [`Error::MalformedQuery`] for a malformed token in strict mode.
    pub fn clean(&self, url: &str) -> Result<String> {
        let (sep, kv_sep) = (self.separator.as_str(), self.kv_separator.as_str());
        if sep.is_empty() || kv_sep.is_empty() {
            return Err(Error::EmptySeparator);
        }

        let (url, fragment) = url.split_once('#').map_or((url, None), |(u, f)| (u, Some(f)));
        let (base, query) = url.split_once('?').unwrap_or((url, ""));

        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for token in query.split(sep).filter(|t| !t.is_empty()) {
            if self.strict && token.split(kv_sep).count() != 2 {
                return Err(Error::MalformedQuery {
                    token: token.to_owned(),
                });
            }
            let (key, value) = token.split_once(kv_sep).unwrap_or((token, ""));
            if value.is_empty() && !self.keep_blank_values {
                continue;
            }
            if self.unique && seen.contains(key) {
                continue;
            }
            if !self.names.is_empty() && !self.names.iter().any(|n| n == key) {
                continue;
            }
            seen.insert(key);
            kept.push(format!("{key}{kv_sep}{value}"));
        }

        let mut buf = base.to_owned();
        if !kept.is_empty() {
            buf.push('?');
            buf.push_str(&kept.join(sep));
        }
        if let Some(fragment) = fragment.filter(|f| self.keep_fragments && !f.is_empty()) {
            buf.push('#');
            buf.push_str(fragment);
        }
        Ok(buf)
    }
}

/// Keeps the first occurrence of each query parameter named in `names`,
/// or of every parameter if `names` is empty.
///
/// See [`QueryCleaner`] for the other options.
///
/// # Errors
///
/// Never fails with the default options; see [`QueryCleaner::clean`].
pub fn clean_query_parameters(url: &str, names: &[&str]) -> Result<String> {
    QueryCleaner::new().names(names.iter().copied()).clean(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_split_on_first_equals() {
        let kept: Vec<_> = pairs("a=b=c&&;d=&e", true).collect();
        assert_eq!(kept, [("a", "b=c"), ("d", ""), ("e", "")]);
        let kept: Vec<_> = pairs("a=b=c&&;d=&e", false).collect();
        assert_eq!(kept, [("a", "b=c")]);
    }

    #[test]
    fn decodes_plus_before_octets() {
        assert_eq!(&*decode_form("a+b%2Bc"), b"a b+c");
    }

    #[test]
    fn upsert_replaces_first_only() {
        let mut params: QueryParams = [("a", "1"), ("a", "2")].into_iter().collect();
        params.upsert("a", "3");
        params.upsert("b", "4");
        assert_eq!(params.join("&", "="), "a=3&a=2&b=4");
    }

    #[test]
    fn retain_and_dedup() {
        let mut params: QueryParams = [("a", "1"), ("b", "2"), ("a", "3"), ("c", "4")]
            .into_iter()
            .collect();
        params.dedup_keys();
        assert_eq!(params.join(";", ":"), "a:1;b:2;c:4");
        params.retain_keys(&["c", "a"]);
        assert_eq!(params.join("&", "="), "a=1&c=4");
    }
}
