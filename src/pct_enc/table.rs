//! Byte tables for each URL segment.
//!
//! The RFC 3986 table constants in this module are documented with
//! the ABNF notation of [RFC 5234]. The `*_SAFE` and `*_SAFEST` tables
//! are the character classes a segment may keep unencoded when a URL is
//! made safe or canonical.
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

/// A table specifying the bytes left unencoded in a URL segment.
///
/// Only printable ASCII (`0x21..=0x7E`) can be allowed. Space, controls and
/// non-ASCII bytes are always percent-encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Table(u64, u64);

impl Table {
    /// Creates a table that only allows the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not printable ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(
                matches!(cur, 0x21..=0x7e),
                "cannot allow a byte outside printable ASCII"
            );
            table |= 1u128.wrapping_shl(*cur as u32);
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Combines two tables into one.
    ///
    /// Returns a new table that allows all the bytes allowed
    /// by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Subtracts from this table.
    ///
    /// Returns a new table that allows all the bytes allowed
    /// by `self` but not allowed by `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether the table is a subset of another, i.e., `other`
    /// allows at least all the bytes allowed by `self`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & other.0 == self.0 && self.1 & other.1 == self.1
    }

    /// Checks whether the given byte is allowed by the table.
    #[inline]
    #[must_use]
    pub const fn allows(self, x: u8) -> bool {
        let table = if x < 64 {
            self.0
        } else if x < 128 {
            self.1
        } else {
            0
        };
        table & 1u64.wrapping_shl(x as u32) != 0
    }

    /// Checks whether every byte of the given string is allowed by the table.
    ///
    /// Percent signs are treated like any other byte.
    #[must_use]
    pub fn allows_all(self, s: &str) -> bool {
        s.bytes().all(|x| self.allows(x))
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

// Rules from RFC 3986:

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: Table = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: Table = new(b"0123456789");

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: Table = ALPHA.or(DIGIT).or(new(b"+-."));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: Table = new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: Table = new(b"!$&'()*+,;=");

// Segment classes:

/// Reserved and unreserved characters, `|` and `%`.
pub const SAFE: Table = RESERVED.or(UNRESERVED).or(new(b"|%"));

/// [`SAFE`] without `#`. Used by the canonical form for every segment.
pub const PATH_SAFE: Table = SAFE.sub(new(b"#"));

/// `userinfo` characters without `pct-encoded`.
pub const USERINFO_SAFE: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// [`USERINFO_SAFE`] without `:`, `;` and `=`.
///
/// Usernames and passwords are encoded separately, so the
/// delimiters between and inside them never survive unencoded.
pub const USERINFO_SAFEST: Table = USERINFO_SAFE.sub(new(b":;="));

/// [`SAFE`] without `#`, `[`, `]` and `|`.
pub const PATH_SAFEST: Table = SAFE.sub(new(b"#[]|"));

/// [`PATH_SAFEST`] without `'`, for queries of special schemes.
pub const QUERY_SAFEST_SPECIAL: Table = PATH_SAFEST.sub(new(b"'"));

/// Same as [`PATH_SAFEST`].
pub const QUERY_SAFEST: Table = PATH_SAFEST;

/// Same as [`PATH_SAFEST`].
pub const FRAGMENT_SAFEST: Table = PATH_SAFEST;

/// `reg-name` characters, percent signs included.
pub const HOST_SAFE: Table = UNRESERVED.or(SUB_DELIMS).or(new(b"%"));

/// [`HOST_SAFE`] plus `:`, for the inside of `[...]`.
pub const IP_LITERAL_SAFE: Table = HOST_SAFE.or(new(b":"));
