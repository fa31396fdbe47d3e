//! Fixed-width hash values and Blake3 hashing utilities.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while parsing a hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("malformed hash {input:?}: expected {expected} bytes of hex")]
    MalformedHash { input: String, expected: usize },
}

macro_rules! fixed_hash {
    ($(#[$attr:meta])* $name:ident, $len:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Length in bytes.
            pub const LEN: usize = $len;

            /// The zero hash (all zeros).
            pub const ZERO: Self = Self([0u8; $len]);

            /// Create a new hash from raw bytes.
            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Create a hash from a slice, if it has exactly the right length.
            pub fn from_slice(bytes: &[u8]) -> Option<Self> {
                <[u8; $len]>::try_from(bytes).ok().map(Self)
            }

            /// Get the underlying bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Convert to a lowercase hex string without prefix.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from a hex string (with or without 0x prefix, any case).
            pub fn from_hex(s: &str) -> Result<Self, HashError> {
                let malformed = || HashError::MalformedHash {
                    input: s.to_string(),
                    expected: $len,
                };
                let bytes = hex::decode(strip_hex_prefix(s)).map_err(|_| malformed())?;
                Self::from_slice(&bytes).ok_or_else(malformed)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{})", stringify!($name), &self.to_hex()[..8])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = HashError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(hash: $name) -> Self {
                hash.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_hex(&s).map_err(de::Error::custom)
                } else {
                    <[u8; $len]>::deserialize(deserializer).map(Self)
                }
            }
        }
    };
}

fixed_hash!(
    /// A 160-bit hash, used for lock script hashes and approvers.
    H160,
    20
);

fixed_hash!(
    /// A 256-bit hash, used for trackers, asset types and public key hashes.
    H256,
    32
);

/// Hash arbitrary data into a 256-bit digest.
pub fn blake256(data: &[u8]) -> H256 {
    H256(blake3::hash(data).into())
}

/// Hash arbitrary data into a 160-bit digest (truncated Blake3).
pub fn blake160(data: &[u8]) -> H160 {
    let digest = blake3::hash(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest.as_bytes()[..20]);
    H160(out)
}

/// Drop a leading `0x` or `0X`.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(blake256(b"hello world"), blake256(b"hello world"));
        assert_ne!(blake256(b"hello"), blake256(b"world"));
    }

    #[test]
    fn test_blake160_is_prefix_of_blake256() {
        let long = blake256(b"script");
        let short = blake160(b"script");
        assert_eq!(&long.0[..20], &short.0[..]);
    }

    #[test]
    fn test_hex_roundtrip() {
        let h = blake256(b"test data");
        let parsed = H256::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn test_from_hex_case_insensitive_and_prefixed() {
        let lower = "ab".repeat(20);
        let upper = format!("0x{}", "AB".repeat(20));
        let a = H160::from_hex(&lower).unwrap();
        let b = H160::from_hex(&upper).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_hex(), lower);

        let capital_prefix = format!("0X{}", lower);
        assert_eq!(H160::from_hex(&capital_prefix).unwrap(), a);
        assert_eq!(capital_prefix.parse::<H160>().unwrap(), a);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        let err = H160::from_hex(&"00".repeat(32)).unwrap_err();
        assert_eq!(
            err,
            HashError::MalformedHash {
                input: "00".repeat(32),
                expected: 20
            }
        );
        assert!(H256::from_hex(&"00".repeat(20)).is_err());
    }

    #[test]
    fn test_from_hex_rejects_bad_digits() {
        assert!(H256::from_hex(&"zz".repeat(32)).is_err());
        assert!(H256::from_hex("abc").is_err());
    }

    #[test]
    fn test_display() {
        let display = format!("{}", blake256(b"test"));
        assert!(display.starts_with("0x"));
        assert_eq!(display.len(), 66);
    }

    #[test]
    fn test_json_is_prefixed_hex() {
        let h = H160([0x11; 20]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(20)));
        let back: H160 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn test_bincode_is_raw_bytes() {
        let h = H256([7; 32]);
        let encoded = bincode::serialize(&h).unwrap();
        assert_eq!(encoded, vec![7; 32]);
    }
}
