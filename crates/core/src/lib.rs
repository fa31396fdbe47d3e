//! Core primitives for assetkit.
//!
//! This crate provides the types a client needs to build and authorize
//! asset transactions:
//! - Fixed-width hashes and Blake3 hashing
//! - Ed25519 key material
//! - Lock/unlock scripts and the standard P2PKH pattern
//! - Assets, asset schemes and asset transfer addresses
//! - Transaction variants with canonical hashing and a JSON codec
//! - Chain configuration and a transaction factory

pub mod address;
pub mod asset;
pub mod config;
pub mod crypto;
pub mod factory;
pub mod hash;
pub mod script;
pub mod serde_hex;
pub mod transaction;
pub mod transfer;

/// An owned byte sequence (scripts, lock parameters).
pub type Bytes = Vec<u8>;

// Re-export commonly used types at the crate root
pub use address::{AddressError, AddressType, AssetTransferAddress};
pub use asset::{asset_type_from, shard_of, Asset, AssetOutPoint, AssetScheme, ShardId};
pub use config::{ChainConfig, ConfigError};
pub use crypto::{CryptoError, Keypair, PublicKey, Signature};
pub use factory::TransactionFactory;
pub use hash::{blake160, blake256, HashError, H160, H256};
pub use script::{
    standard_script, standard_script_hash, verify_standard, Instruction, Opcode, Script,
    ScriptError,
};
pub use transaction::{
    AssetMintOutput, AssetMintTransaction, DecodeError, PaymentTransaction,
    SetRegularKeyTransaction, Transaction, TransactionError,
};
pub use transfer::{AssetTransferInput, AssetTransferOutput, AssetTransferTransaction};
