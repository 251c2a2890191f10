//! Core types: block hashes and block-index entries.
//!
//! Hashes are opaque to this workspace. They are produced by the node's
//! hashing code and only ever compared for equality here.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::HashError;

/// A 32-byte block hash.
///
/// Bytes are stored in display order: `0[0]` is the most significant byte of
/// the hex form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes). Placeholder for networks without real checkpoints.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase 64-digit hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex hash.
    ///
    /// Accepts an optional `0x`/`0X` prefix. Shorter inputs are left-padded
    /// with zeros, so `"0x"` and `""` both decode to [`Hash256::ZERO`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn_core::types::Hash256;
    /// let h = Hash256::parse_hex("0x01ff").unwrap();
    /// assert_eq!(h.0[30], 0x01);
    /// assert_eq!(h.0[31], 0xff);
    /// assert!(Hash256::parse_hex("0x").unwrap().is_zero());
    /// ```
    pub const fn parse_hex(s: &str) -> Result<Self, HashError> {
        let bytes = s.as_bytes();
        let prefixed = bytes.len() >= 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X');
        let start = if prefixed { 2 } else { 0 };
        let digits = bytes.len() - start;
        if digits > 64 {
            return Err(HashError::TooLong { digits });
        }

        let mut out = [0u8; 32];
        let mut i = 0;
        while i < digits {
            let index = bytes.len() - 1 - i;
            let nibble = match hex_nibble(bytes[index]) {
                Some(v) => v,
                None => return Err(HashError::InvalidCharacter { index }),
            };
            let pos = 31 - i / 2;
            if i % 2 == 0 {
                out[pos] |= nibble;
            } else {
                out[pos] |= nibble << 4;
            }
            i += 1;
        }
        Ok(Self(out))
    }

    /// Parse a hash literal at compile time.
    ///
    /// Used for the compiled-in checkpoint tables: a malformed literal fails
    /// constant evaluation and therefore the build.
    pub const fn from_hex_const(s: &str) -> Self {
        match Self::parse_hex(s) {
            Ok(hash) => hash,
            Err(_) => panic!("invalid hash literal"),
        }
    }
}

const fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s.trim())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A node of the caller's block index, as seen by the checkpoint gate.
///
/// The gate only reads these; it never stores one past the call it was
/// handed in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockIndexEntry {
    /// Block height (genesis = 0).
    pub height: u64,
    /// Block header hash.
    pub hash: Hash256,
    /// Cumulative number of transactions from genesis through this block, inclusive.
    pub chain_tx: u64,
    /// Block timestamp, Unix seconds.
    pub time: u64,
}
