//! Serde helpers that render byte sequences as hex strings in JSON.
//!
//! Binary formats keep the raw bytes.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::Deserialize;

use crate::hash::strip_hex_prefix;

fn decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(s))
}

/// `Vec<u8>` as a hex string.
pub mod bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(bytes))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            decode(&s).map_err(de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer)
        }
    }
}

/// `Vec<Vec<u8>>` as a list of hex strings.
pub mod bytes_list {
    use super::*;

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let human = serializer.is_human_readable();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            if human {
                seq.serialize_element(&hex::encode(item))?;
            } else {
                seq.serialize_element(item)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        if deserializer.is_human_readable() {
            let items = Vec::<String>::deserialize(deserializer)?;
            items
                .iter()
                .map(|s| decode(s).map_err(de::Error::custom))
                .collect()
        } else {
            Vec::<Vec<u8>>::deserialize(deserializer)
        }
    }
}
