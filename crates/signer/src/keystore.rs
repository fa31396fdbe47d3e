//! Private key storage.
//!
//! Callers only ever see public keys and signatures; private keys stay inside
//! the store.

use assetkit_core::{Keypair, PublicKey, Signature, H256};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during key store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStoreError {
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

/// A store of private keys addressed by their public keys.
///
/// Both operations may suspend, so a store can be backed by an enclave or a
/// remote service.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Generate a key pair and return its public key.
    async fn create_key(&self) -> Result<PublicKey, KeyStoreError>;

    /// Sign a 32-byte message with the private key behind `public_key`.
    async fn sign(&self, public_key: &PublicKey, message: &H256)
        -> Result<Signature, KeyStoreError>;
}

/// Process-local key store.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<PublicKey, Keypair>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Whether the private key for `public_key` is held here.
    pub fn contains(&self, public_key: &PublicKey) -> bool {
        self.keys.read().contains_key(public_key)
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn create_key(&self) -> Result<PublicKey, KeyStoreError> {
        let keypair = Keypair::generate();
        let public_key = keypair.public_key.clone();
        self.keys.write().insert(public_key.clone(), keypair);
        debug!(public_key = %public_key, "created key");
        Ok(public_key)
    }

    async fn sign(
        &self,
        public_key: &PublicKey,
        message: &H256,
    ) -> Result<Signature, KeyStoreError> {
        let keys = self.keys.read();
        let keypair = keys
            .get(public_key)
            .ok_or_else(|| KeyStoreError::UnknownKey(public_key.to_hex()))?;
        Ok(keypair.sign_hash(message))
    }
}

impl std::fmt::Debug for MemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryKeyStore")
            .field("keys", &self.len())
            .finish()
    }
}
