//! SHA-1 hashing and the prefix/suffix split used by range queries.

use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};

use crate::error::Error;

/// Length of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// Length of a SHA-1 digest rendered as hex.
pub const HASH_HEX_LEN: usize = DIGEST_LEN * 2;

/// Length of the hash prefix sent to the range API (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// Length of the suffix compared locally against range records.
pub const SUFFIX_LEN: usize = HASH_HEX_LEN - PREFIX_LEN;

/// Hex lookup table for uppercase encoding.
pub const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Normalises an ASCII hex character to uppercase, or `None` if it is not hex.
#[inline]
fn upper_hex(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' | b'A'..=b'F' => Some(c),
        b'a'..=b'f' => Some(c - b'a' + b'A'),
        _ => None,
    }
}

/// Parses exactly `N` hex characters, normalised to uppercase.
fn parse_upper_hex<const N: usize>(input: &str) -> Option<[u8; N]> {
    let bytes = input.as_bytes();
    if bytes.len() != N {
        return None;
    }
    let mut out = [0u8; N];
    for (dst, &c) in out.iter_mut().zip(bytes) {
        *dst = upper_hex(c)?;
    }
    Some(out)
}

/// Computes the uppercase hex SHA-1 digest of a password.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Hasher;

impl Sha1Hasher {
    pub fn new() -> Self {
        Self
    }

    /// Hashes the UTF-8 bytes of `password`. Total over all inputs, including `""`.
    pub fn hash(&self, password: &str) -> PasswordHash {
        let digest: [u8; DIGEST_LEN] = Sha1::digest(password.as_bytes()).into();
        PasswordHash::from_digest(&digest)
    }
}

/// A SHA-1 digest as 40 uppercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PasswordHash([u8; HASH_HEX_LEN]);

impl PasswordHash {
    pub fn from_digest(digest: &[u8; DIGEST_LEN]) -> Self {
        let mut hex = [0u8; HASH_HEX_LEN];
        for (i, byte) in digest.iter().enumerate() {
            hex[i * 2] = HEX_CHARS[(byte >> 4) as usize];
            hex[i * 2 + 1] = HEX_CHARS[(byte & 0x0f) as usize];
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: constructed only from HEX_CHARS or validated uppercase hex.
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }

    /// First 5 hex characters, the only part sent over the network.
    pub fn prefix(&self) -> HashPrefix {
        let mut prefix = [0u8; PREFIX_LEN];
        prefix.copy_from_slice(&self.0[..PREFIX_LEN]);
        HashPrefix(prefix)
    }

    /// Remaining 35 hex characters.
    pub fn suffix(&self) -> &str {
        &self.as_str()[PREFIX_LEN..]
    }
}

impl FromStr for PasswordHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_upper_hex(s).map(Self).ok_or_else(|| Error::InvalidHash(s.to_string()))
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash({})", self.as_str())
    }
}

/// Exactly 5 uppercase hex characters identifying one range of the corpus.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashPrefix([u8; PREFIX_LEN]);

impl HashPrefix {
    pub fn as_str(&self) -> &str {
        // SAFETY: constructed only from validated uppercase hex.
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }
}

impl FromStr for HashPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_upper_hex(s).map(Self).ok_or_else(|| Error::InvalidPrefix(s.to_string()))
    }
}

impl fmt::Display for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashPrefix({})", self.as_str())
    }
}
