//! Asset transfer addresses.
//!
//! An address names the lock an asset output is sent to. Its string form is
//! bech32 with a network-specific human-readable part (`<network id>a`, e.g.
//! `tca...`) over `[version, type] ++ payload`.

use crate::hash::{H160, H256};
use crate::script::standard_script_hash;
use crate::Bytes;
use bech32::{Bech32, Hrp};
use std::fmt;
use thiserror::Error;

/// Current address format version.
const ADDRESS_VERSION: u8 = 0;

/// Suffix appended to the network id to form the human-readable part.
const HRP_SUFFIX: &str = "a";

/// Errors that can occur while handling addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("bech32 error: {0}")]
    Bech32(String),
    #[error("unknown address version {0}")]
    UnknownVersion(u8),
    #[error("unknown address type {0}")]
    UnknownType(u8),
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("invalid network id {0:?}")]
    InvalidNetworkId(String),
}

/// Kind of lock an address stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AddressType {
    /// Pay to public key hash: the payload is the hash of a public key.
    PayToPublicKeyHash = 1,
}

impl AddressType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(AddressType::PayToPublicKeyHash),
            _ => None,
        }
    }
}

/// An address assets can be transferred to.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetTransferAddress {
    pub address_type: AddressType,
    pub payload: H256,
}

impl AssetTransferAddress {
    /// Build an address from its type byte and payload.
    pub fn from_type_and_payload(address_type: u8, payload: H256) -> Result<Self, AddressError> {
        let address_type =
            AddressType::from_byte(address_type).ok_or(AddressError::UnknownType(address_type))?;
        Ok(Self {
            address_type,
            payload,
        })
    }

    /// A P2PKH address for the given public key hash.
    pub fn p2pkh(public_key_hash: H256) -> Self {
        Self {
            address_type: AddressType::PayToPublicKeyHash,
            payload: public_key_hash,
        }
    }

    /// The lock script hash and lock parameters an output sent here carries.
    pub fn lock_script_hash_and_parameters(&self) -> (H160, Vec<Bytes>) {
        match self.address_type {
            AddressType::PayToPublicKeyHash => {
                (standard_script_hash(), vec![self.payload.0.to_vec()])
            }
        }
    }

    /// Encode as a bech32 string for the given network.
    pub fn to_string_for(&self, network_id: &str) -> Result<String, AddressError> {
        let hrp = Hrp::parse(&format!("{network_id}{HRP_SUFFIX}"))
            .map_err(|_| AddressError::InvalidNetworkId(network_id.to_string()))?;
        let mut data = Vec::with_capacity(2 + H256::LEN);
        data.push(ADDRESS_VERSION);
        data.push(self.address_type as u8);
        data.extend_from_slice(self.payload.as_bytes());
        bech32::encode::<Bech32>(hrp, &data).map_err(|e| AddressError::Bech32(e.to_string()))
    }

    /// Parse a bech32 address string, returning the network id and the address.
    pub fn from_string(s: &str) -> Result<(String, Self), AddressError> {
        let (hrp, data) = bech32::decode(s).map_err(|e| AddressError::Bech32(e.to_string()))?;
        let hrp = hrp.to_lowercase();
        let network_id = hrp
            .strip_suffix(HRP_SUFFIX)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AddressError::InvalidNetworkId(hrp.clone()))?;

        if data.len() != 2 + H256::LEN {
            return Err(AddressError::InvalidLength {
                expected: 2 + H256::LEN,
                got: data.len(),
            });
        }
        if data[0] != ADDRESS_VERSION {
            return Err(AddressError::UnknownVersion(data[0]));
        }
        let mut payload = [0u8; 32];
        payload.copy_from_slice(&data[2..]);
        let address = Self::from_type_and_payload(data[1], H256(payload))?;
        Ok((network_id.to_string(), address))
    }
}

impl fmt::Debug for AssetTransferAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetTransferAddress({:?}, {})", self.address_type, self.payload)
    }
}
