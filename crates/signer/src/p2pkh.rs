//! Pay-to-public-key-hash signer.
//!
//! Assets locked with the standard script carry one parameter: the hash of
//! the owner's public key. The signer remembers which public key each hash it
//! handed out belongs to, and asks the key store to sign with it.

use crate::keystore::KeyStore;
use crate::signer::{SignerError, TransactionSigner, UnlockScripts};
use assetkit_core::{
    standard_script, standard_script_hash, Asset, AssetTransferAddress,
    AssetTransferTransaction, Bytes, PublicKey, Script, H160, H256,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Signer for the standard P2PKH lock.
pub struct P2pkh<K: KeyStore + ?Sized> {
    key_store: Arc<K>,
    /// Public key hash → public key, for every address created here.
    public_keys: RwLock<HashMap<H256, PublicKey>>,
}

impl<K: KeyStore + ?Sized> P2pkh<K> {
    pub fn new(key_store: Arc<K>) -> Self {
        Self {
            key_store,
            public_keys: RwLock::new(HashMap::new()),
        }
    }

    /// The backing key store.
    pub fn key_store(&self) -> &Arc<K> {
        &self.key_store
    }

    /// Number of addresses created so far.
    pub fn address_count(&self) -> usize {
        self.public_keys.read().len()
    }

    fn is_standard(lock_script_hash: &H160) -> bool {
        *lock_script_hash == standard_script_hash()
    }

    /// Look up the public key behind a lock parameter.
    fn resolve(&self, parameter: &[u8]) -> Result<PublicKey, SignerError> {
        H256::from_slice(parameter)
            .and_then(|hash| self.public_keys.read().get(&hash).cloned())
            .ok_or_else(|| SignerError::UnknownPublicKeyHash(hex::encode(parameter)))
    }

    /// Check a lock and return its single parameter.
    fn standard_parameter<'a>(
        lock_script_hash: &H160,
        parameters: &'a [Bytes],
    ) -> Result<&'a [u8], SignerError> {
        if !Self::is_standard(lock_script_hash) {
            return Err(SignerError::UnexpectedLockScriptHash(*lock_script_hash));
        }
        match parameters {
            [parameter] => Ok(parameter.as_slice()),
            _ => Err(SignerError::UnexpectedParameterCount(parameters.len())),
        }
    }

    async fn unlock_scripts(
        &self,
        public_key: &PublicKey,
        message: &H256,
    ) -> Result<UnlockScripts, SignerError> {
        let signature = self.key_store.sign(public_key, message).await?;
        Ok(UnlockScripts {
            lock_script: standard_script(),
            unlock_script: Script::standard_unlock(&signature, public_key).into_bytes(),
        })
    }
}

#[async_trait]
impl<K: KeyStore + ?Sized> TransactionSigner for P2pkh<K> {
    async fn create_address(&self) -> Result<AssetTransferAddress, SignerError> {
        let public_key = self.key_store.create_key().await?;
        let public_key_hash = public_key.hash();
        self.public_keys.write().insert(public_key_hash, public_key);
        debug!(public_key_hash = %public_key_hash, "created P2PKH address");
        Ok(AssetTransferAddress::p2pkh(public_key_hash))
    }

    async fn is_unlockable(&self, asset: &Asset) -> bool {
        if !Self::is_standard(&asset.lock_script_hash) {
            return false;
        }
        match asset.parameters.as_slice() {
            [parameter] if parameter.len() == H256::LEN => self.resolve(parameter).is_ok(),
            _ => false,
        }
    }

    async fn sign(
        &self,
        transaction: &AssetTransferTransaction,
        index: usize,
    ) -> Result<UnlockScripts, SignerError> {
        let len = transaction.inputs.len();
        let input = transaction
            .inputs
            .get(index)
            .ok_or(SignerError::IndexOutOfRange { index, len })?;
        let prev_out = &input.prev_out;
        let (lock_script_hash, parameters) =
            match (&prev_out.lock_script_hash, &prev_out.parameters) {
                (Some(hash), Some(parameters)) => (hash, parameters),
                _ => return Err(SignerError::InvalidInput(index)),
            };
        let public_key = Self::standard_parameter(lock_script_hash, parameters)
            .and_then(|parameter| self.resolve(parameter))
            .map_err(|err| {
                warn!(index, error = %err, "refusing to sign input");
                err
            })?;

        let message = transaction.hash_without_script();
        debug!(index, binding_hash = %message, "signing input");
        self.unlock_scripts(&public_key, &message).await
    }

    async fn unlock(
        &self,
        asset: &Asset,
        transaction: &AssetTransferTransaction,
    ) -> Result<UnlockScripts, SignerError> {
        let public_key = Self::standard_parameter(&asset.lock_script_hash, &asset.parameters)
            .and_then(|parameter| self.resolve(parameter))
            .map_err(|err| {
                warn!(
                    tracker = %asset.tracker,
                    index = asset.index,
                    error = %err,
                    "refusing to unlock asset"
                );
                err
            })?;

        let message = transaction.hash_without_script();
        debug!(tracker = %asset.tracker, index = asset.index, binding_hash = %message, "unlocking asset");
        self.unlock_scripts(&public_key, &message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::{KeyStoreError, MemoryKeyStore};
    use assetkit_core::{asset_type_from, verify_standard, AssetTransferOutput, Keypair};

    fn signer() -> P2pkh<MemoryKeyStore> {
        P2pkh::new(Arc::new(MemoryKeyStore::new()))
    }

    fn asset_for(address: &AssetTransferAddress) -> Asset {
        let (lock_script_hash, parameters) = address.lock_script_hash_and_parameters();
        Asset {
            asset_type: asset_type_from(&H256([1; 32]), 0),
            lock_script_hash,
            parameters,
            quantity: 10,
            shard_id: 0,
            tracker: H256([1; 32]),
            index: 0,
        }
    }

    fn transfer_of(assets: &[&Asset]) -> AssetTransferTransaction {
        let mut tx = AssetTransferTransaction::new("tc");
        tx.add_inputs(assets.iter().copied());
        let recipient = AssetTransferAddress::p2pkh(H256([7; 32]));
        tx.add_outputs([AssetTransferOutput::new(&recipient, assets[0].asset_type, 0, 10)]);
        tx
    }

    #[tokio::test]
    async fn test_create_address_registers_key() {
        let signer = signer();
        let address = signer.create_address().await.unwrap();
        assert_eq!(signer.address_count(), 1);
        assert_eq!(signer.key_store().len(), 1);
        assert!(signer.resolve(address.payload.as_bytes()).is_ok());
    }

    #[tokio::test]
    async fn test_is_unlockable() {
        let signer = signer();
        let address = signer.create_address().await.unwrap();
        let asset = asset_for(&address);
        assert!(signer.is_unlockable(&asset).await);

        let foreign = asset_for(&AssetTransferAddress::p2pkh(H256([3; 32])));
        assert!(!signer.is_unlockable(&foreign).await);

        let mut non_standard = asset.clone();
        non_standard.lock_script_hash = H160([0; 20]);
        assert!(!signer.is_unlockable(&non_standard).await);

        let mut two_params = asset.clone();
        two_params.parameters.push(vec![0; 32]);
        assert!(!signer.is_unlockable(&two_params).await);

        let mut short_param = asset;
        short_param.parameters = vec![vec![0; 20]];
        assert!(!signer.is_unlockable(&short_param).await);
    }

    #[tokio::test]
    async fn test_sign_errors() {
        let signer = signer();
        let address = signer.create_address().await.unwrap();
        let asset = asset_for(&address);
        let tx = transfer_of(&[&asset]);

        assert_eq!(
            signer.sign(&tx, 1).await.unwrap_err(),
            SignerError::IndexOutOfRange { index: 1, len: 1 }
        );

        let mut missing = tx.clone();
        missing.inputs[0].prev_out.parameters = None;
        assert_eq!(
            signer.sign(&missing, 0).await.unwrap_err(),
            SignerError::InvalidInput(0)
        );

        let mut wrong_lock = tx.clone();
        wrong_lock.inputs[0].prev_out.lock_script_hash = Some(H160([5; 20]));
        assert_eq!(
            signer.sign(&wrong_lock, 0).await.unwrap_err(),
            SignerError::UnexpectedLockScriptHash(H160([5; 20]))
        );

        let mut no_params = tx.clone();
        no_params.inputs[0].prev_out.parameters = Some(vec![]);
        assert_eq!(
            signer.sign(&no_params, 0).await.unwrap_err(),
            SignerError::UnexpectedParameterCount(0)
        );

        let mut unknown = tx;
        unknown.inputs[0].prev_out.parameters = Some(vec![vec![0xee; 32]]);
        assert_eq!(
            signer.sign(&unknown, 0).await.unwrap_err(),
            SignerError::UnknownPublicKeyHash("ee".repeat(32))
        );
    }

    #[tokio::test]
    async fn test_sign_produces_valid_witness() {
        let signer = signer();
        let address = signer.create_address().await.unwrap();
        let asset = asset_for(&address);
        let tx = transfer_of(&[&asset]);

        let scripts = signer.sign(&tx, 0).await.unwrap();
        assert_eq!(scripts.lock_script, standard_script());
        verify_standard(
            &scripts.lock_script,
            &scripts.unlock_script,
            &asset.parameters,
            &tx.hash_without_script(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_unlock_matches_sign() {
        let signer = signer();
        let address = signer.create_address().await.unwrap();
        let asset = asset_for(&address);
        let tx = transfer_of(&[&asset]);

        let unlocked = signer.unlock(&asset, &tx).await.unwrap();
        assert_eq!(unlocked.lock_script, standard_script());
        // Ed25519 signatures are deterministic.
        assert_eq!(unlocked, signer.sign(&tx, 0).await.unwrap());

        let stranger = asset_for(&AssetTransferAddress::p2pkh(H256([4; 32])));
        assert_eq!(
            signer.unlock(&stranger, &tx).await.unwrap_err(),
            SignerError::UnknownPublicKeyHash("04".repeat(32))
        );

        let mut wrong_lock = asset.clone();
        wrong_lock.lock_script_hash = H160([5; 20]);
        assert_eq!(
            signer.unlock(&wrong_lock, &tx).await.unwrap_err(),
            SignerError::UnexpectedLockScriptHash(H160([5; 20]))
        );

        let mut no_params = asset.clone();
        no_params.parameters.clear();
        assert_eq!(
            signer.unlock(&no_params, &tx).await.unwrap_err(),
            SignerError::UnexpectedParameterCount(0)
        );

        let mut two_params = asset;
        two_params.parameters.push(vec![0; 32]);
        assert_eq!(
            signer.unlock(&two_params, &tx).await.unwrap_err(),
            SignerError::UnexpectedParameterCount(2)
        );
    }

    #[tokio::test]
    async fn test_sign_input_failure_leaves_transaction() {
        let signer = signer();
        let stranger = asset_for(&AssetTransferAddress::p2pkh(H256([4; 32])));
        let mut tx = transfer_of(&[&stranger]);
        let before = tx.clone();

        assert!(signer.sign_input(&mut tx, 0).await.is_err());
        assert_eq!(tx, before);
    }

    #[tokio::test]
    async fn test_key_store_error_is_surfaced() {
        // A registry entry whose key is missing from the store.
        let signer = signer();
        let orphan = Keypair::generate().public_key;
        let hash = orphan.hash();
        signer.public_keys.write().insert(hash, orphan.clone());

        let asset = asset_for(&AssetTransferAddress::p2pkh(hash));
        let tx = transfer_of(&[&asset]);
        assert_eq!(
            signer.sign(&tx, 0).await.unwrap_err(),
            SignerError::KeyStore(KeyStoreError::UnknownKey(orphan.to_hex()))
        );
    }
}
