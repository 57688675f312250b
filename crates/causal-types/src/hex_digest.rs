//! Fixed-size byte arrays that serialize to/from `0x`-prefixed lowercase hex,
//! matching the wire form required throughout spec section 6.

use std::fmt;
use std::str::FromStr;

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

/// A fixed-size digest or signature, carried internally as raw bytes and
/// serialized as `0x` + lowercase hex.
///
/// Comparing two `HexDigest<N>` values with `Ord` gives the same result as
/// comparing their hex-string forms lexicographically (spec section 4.D's
/// "sorted pair" rule): each byte maps to exactly two hex digits, so
/// byte-array order and hex-string order coincide.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexDigest<const N: usize>(pub [u8; N]);

impl<const N: usize> HexDigest<N> {
    /// Wraps a raw byte array.
    pub fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Parses a `0x`-prefixed hex string of the expected length.
    pub fn parse(s: &str) -> Result<Self, HexDigestError> {
        let stripped = s.strip_prefix("0x").ok_or(HexDigestError::MissingPrefix)?;
        let decoded = hex::decode(stripped).map_err(|_| HexDigestError::InvalidHex)?;
        let bytes: [u8; N] = decoded
            .try_into()
            .map_err(|v: Vec<u8>| HexDigestError::WrongLength {
                expected: N,
                got: v.len(),
            })?;
        Ok(Self(bytes))
    }
}

/// Errors produced while parsing a [`HexDigest`] from its wire string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexDigestError {
    /// The string did not start with `0x`.
    #[error("hex value is missing the 0x prefix")]
    MissingPrefix,
    /// The string contained non-hex characters.
    #[error("value is not valid hex")]
    InvalidHex,
    /// The decoded byte length did not match the expected size.
    #[error("expected {expected} bytes, got {got}")]
    WrongLength { expected: usize, got: usize },
}

impl<const N: usize> fmt::Display for HexDigest<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Debug for HexDigest<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexDigest({})", self)
    }
}

impl<const N: usize> FromStr for HexDigest<N> {
    type Err = HexDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<const N: usize> Serialize for HexDigest<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, const N: usize> Deserialize<'de> for HexDigest<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(DeError::custom)
    }
}
