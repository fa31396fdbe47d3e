//! Builders for transactions on a configured network.

use crate::address::AssetTransferAddress;
use crate::asset::AssetScheme;
use crate::config::ChainConfig;
use crate::crypto::PublicKey;
use crate::hash::H160;
use crate::transaction::{AssetMintTransaction, PaymentTransaction, SetRegularKeyTransaction};
use crate::transfer::AssetTransferTransaction;

/// Creates transactions stamped with the configured network and shard.
#[derive(Debug, Clone, Default)]
pub struct TransactionFactory {
    config: ChainConfig,
}

impl TransactionFactory {
    pub fn new(config: ChainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Describe a new asset type on the configured shard.
    pub fn create_asset_scheme(
        &self,
        metadata: impl Into<String>,
        amount: u64,
        approver: Option<H160>,
    ) -> AssetScheme {
        AssetScheme {
            network_id: self.config.network_id.clone(),
            shard_id: self.config.shard_id,
            metadata: metadata.into(),
            amount,
            approver,
        }
    }

    /// Mint the whole supply of `scheme` to `recipient`.
    pub fn create_mint(
        &self,
        scheme: &AssetScheme,
        recipient: &AssetTransferAddress,
    ) -> AssetMintTransaction {
        scheme.create_mint_transaction(recipient)
    }

    pub fn create_payment(&self, recipient: H160, amount: u64) -> PaymentTransaction {
        PaymentTransaction { recipient, amount }
    }

    pub fn create_set_regular_key(&self, key: PublicKey) -> SetRegularKeyTransaction {
        SetRegularKeyTransaction { key }
    }

    /// An empty transfer; add inputs, burns and outputs before signing.
    pub fn create_transfer(&self) -> AssetTransferTransaction {
        AssetTransferTransaction::new(self.config.network_id.clone())
    }
}
