/// An error returned by the fallible operations of this crate.
///
/// Most operations never fail: malformed input is encoded rather than
/// rejected. Errors only arise from caller-supplied options or from
/// opting in to strict behavior.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The label does not name a character encoding.
    #[error("unknown character encoding label: {0:?}")]
    UnknownEncoding(String),
    /// A query separator or key/value separator is empty.
    #[error("empty query separator")]
    EmptySeparator,
    /// A query token does not split into exactly one key and one value.
    #[error("malformed query parameter: {token:?}")]
    MalformedQuery {
        /// The offending token.
        token: String,
    },
    /// The port is not a decimal number within the range of `u16`.
    #[error("invalid port: {0:?}")]
    InvalidPort(String),
}

/// A `Result` defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The text cannot be represented in the requested character encoding.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("text is not representable in {encoding}")]
pub(crate) struct EncodingError {
    pub(crate) encoding: &'static str,
}

/// A host cannot be encoded with IDNA.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum HostEncodingError {
    #[error("host contains an empty label")]
    EmptyLabel,
    #[error("host contains a label longer than 63 bytes")]
    LabelTooLong,
    #[error("host rejected by IDNA processing")]
    Rejected,
}
