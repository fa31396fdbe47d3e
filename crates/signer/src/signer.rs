//! The transaction signing capability.

use crate::keystore::KeyStoreError;
use assetkit_core::{
    Asset, AssetTransferAddress, AssetTransferTransaction, Bytes, ScriptError, TransactionError,
    H160,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while creating addresses or signing inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("input index {index} out of range ({len} inputs)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("input {0} does not carry the lock of the asset it spends")]
    InvalidInput(usize),

    #[error("unexpected lock script hash {0}")]
    UnexpectedLockScriptHash(H160),

    #[error("expected exactly one lock parameter, got {0}")]
    UnexpectedParameterCount(usize),

    #[error("no public key known for public key hash {0}")]
    UnknownPublicKeyHash(String),

    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl From<TransactionError> for SignerError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InputIndexOutOfRange { index, len } => {
                SignerError::IndexOutOfRange { index, len }
            }
        }
    }
}

/// The scripts that authorize spending one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockScripts {
    pub lock_script: Bytes,
    pub unlock_script: Bytes,
}

/// Something that can own assets and authorize spending them.
///
/// Every signing scheme (P2PKH today) implements this trait; callers never
/// need to know which one produced a witness.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Create a fresh address this signer can later unlock.
    async fn create_address(&self) -> Result<AssetTransferAddress, SignerError>;

    /// Whether this signer holds the key that unlocks `asset`.
    async fn is_unlockable(&self, asset: &Asset) -> bool;

    /// Produce the scripts for input `index` of `transaction`.
    async fn sign(
        &self,
        transaction: &AssetTransferTransaction,
        index: usize,
    ) -> Result<UnlockScripts, SignerError>;

    /// Produce the scripts spending `asset` within `transaction`.
    async fn unlock(
        &self,
        asset: &Asset,
        transaction: &AssetTransferTransaction,
    ) -> Result<UnlockScripts, SignerError>;

    /// Sign input `index` and store the scripts in it. On error the
    /// transaction is left untouched.
    async fn sign_input(
        &self,
        transaction: &mut AssetTransferTransaction,
        index: usize,
    ) -> Result<(), SignerError> {
        let scripts = self.sign(transaction, index).await?;
        transaction.set_input_scripts(index, scripts.lock_script, scripts.unlock_script)?;
        Ok(())
    }
}
