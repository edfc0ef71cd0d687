#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Safe and canonical URL strings, in the spirit of browsers and [RFC 3986].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! Two functions sit at the core of this crate:
//!
//! - [`safe_url_string`] percent-encodes every byte that a browser would,
//!   leaving existing percent-encoded octets alone. The result is stable:
//!   making it safe again changes nothing.
//!
//! - [`clean_url`] normalizes a URL so that equivalent URLs compare equal.
//!   Query parameters are sorted, the netloc is lowercased and the fragment
//!   is dropped by default.
//!
//! Both are shorthands for the builders [`SafeUrl`] and [`Cleaner`].
//! The [`query`] module has helpers for reading and rewriting query
//! parameters, and [`Url`] wraps a URL string with a few predicates.
//!
//! Neither function ever fails: input that is not a valid URL is encoded
//! and normalized as far as it goes. Only the few operations that take
//! configuration that can be invalid, such as an encoding label or a
//! separator, return a [`Result`].
//!
//! # Examples
//!
//! ```
//! use safe_url::{clean_url, safe_url_string};
//!
//! assert_eq!(
//!     safe_url_string("http://www.example.com/£?unit=µ"),
//!     "http://www.example.com/%C2%A3?unit=%C2%B5"
//! );
//! assert_eq!(
//!     clean_url("http://www.example.com/do?c=3&b=5&a=50#frag"),
//!     "http://www.example.com/do?a=50&b=5&c=3"
//! );
//! ```
//!
//! # Logging
//!
//! Fallbacks taken on malformed input, such as a host rejected by IDNA or
//! a port out of range, are reported through [`tracing`] events at the
//! `debug` and `trace` levels.
//!
//! # Feature flags
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for [`UrlParts`],
//!   [`QueryParam`] and [`QueryParams`].

pub mod pct_enc;
pub mod query;

mod charset;
mod clean;
mod component;
mod error;
mod fmt;
mod host;
mod parse;
mod resolve;
mod safe;
mod url;

pub use charset::encoding_for_label;
pub use clean::{clean_url, Cleaner};
pub use component::{default_port, is_special, Authority, UrlParts};
pub use error::{Error, Result};
pub use parse::strip_url;
pub use query::{
    add_or_replace_parameter, clean_query_parameters, get_url_parameter, parse_query,
    parse_query_to_bytes, QueryCleaner, QueryParam, QueryParams,
};
pub use safe::{safe_download_url, safe_url_string, SafeUrl};
pub use url::{is_url, Url};
