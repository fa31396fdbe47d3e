//! Assets, asset schemes and references to spendable outputs.

use crate::address::AssetTransferAddress;
use crate::hash::{blake256, H160, H256};
use crate::serde_hex;
use crate::transaction::{AssetMintOutput, AssetMintTransaction};
use crate::transfer::AssetTransferInput;
use crate::Bytes;
use serde::{Deserialize, Serialize};

/// Shard identifier.
pub type ShardId = u16;

/// Leading bytes of every asset type.
const ASSET_TYPE_PREFIX: [u8; 2] = [0x53, 0x00];

/// Derive the asset type minted by the transaction with the given tracker.
///
/// Layout: `[0x53, 0x00, shard_hi, shard_lo, blake256(tracker)[4..]]`.
pub fn asset_type_from(tracker: &H256, shard_id: ShardId) -> H256 {
    let mut asset_type = blake256(tracker.as_bytes());
    asset_type.0[..2].copy_from_slice(&ASSET_TYPE_PREFIX);
    asset_type.0[2..4].copy_from_slice(&shard_id.to_be_bytes());
    asset_type
}

/// The shard an asset type belongs to.
pub fn shard_of(asset_type: &H256) -> ShardId {
    ShardId::from_be_bytes([asset_type.0[2], asset_type.0[3]])
}

/// The minting policy of an asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetScheme {
    pub network_id: String,
    pub shard_id: ShardId,
    /// Free-form description of the asset.
    pub metadata: String,
    /// Total supply.
    pub amount: u64,
    /// Account that must approve transfers, if any.
    pub approver: Option<H160>,
}

impl AssetScheme {
    /// Build the transaction that mints this scheme's whole supply to `recipient`.
    pub fn create_mint_transaction(&self, recipient: &AssetTransferAddress) -> AssetMintTransaction {
        let (lock_script_hash, parameters) = recipient.lock_script_hash_and_parameters();
        AssetMintTransaction {
            network_id: self.network_id.clone(),
            shard_id: self.shard_id,
            metadata: self.metadata.clone(),
            approver: self.approver,
            output: AssetMintOutput {
                lock_script_hash,
                parameters,
                amount: self.amount,
            },
        }
    }
}

/// Reference to the output a transfer input consumes.
///
/// `lock_script_hash` and `parameters` are copied from the spent asset so a
/// signer can tell which key unlocks it. They are neither hashed nor serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOutPoint {
    /// Tracker of the transaction that created the asset.
    pub tracker: H256,
    /// Output index within that transaction.
    pub index: u32,
    pub asset_type: H256,
    pub shard_id: ShardId,
    pub quantity: u64,
    #[serde(skip)]
    pub lock_script_hash: Option<H160>,
    #[serde(skip)]
    pub parameters: Option<Vec<Bytes>>,
}

/// A spendable unit of an asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub asset_type: H256,
    pub lock_script_hash: H160,
    #[serde(with = "serde_hex::bytes_list")]
    pub parameters: Vec<Bytes>,
    pub quantity: u64,
    pub shard_id: ShardId,
    /// Tracker of the transaction that created this asset.
    pub tracker: H256,
    /// Output index within the creating transaction.
    pub index: u32,
}

impl Asset {
    /// The out point that refers to this asset.
    pub fn out_point(&self) -> AssetOutPoint {
        AssetOutPoint {
            tracker: self.tracker,
            index: self.index,
            asset_type: self.asset_type,
            shard_id: self.shard_id,
            quantity: self.quantity,
            lock_script_hash: Some(self.lock_script_hash),
            parameters: Some(self.parameters.clone()),
        }
    }

    /// An unsigned input spending this asset.
    pub fn create_transfer_input(&self) -> AssetTransferInput {
        AssetTransferInput::new(self.out_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asset() -> Asset {
        Asset {
            asset_type: asset_type_from(&H256([1; 32]), 3),
            lock_script_hash: H160([2; 20]),
            parameters: vec![vec![4; 32]],
            quantity: 100,
            shard_id: 3,
            tracker: H256([1; 32]),
            index: 0,
        }
    }

    #[test]
    fn test_asset_type_layout() {
        let asset_type = asset_type_from(&H256([9; 32]), 0xBEEF);
        assert_eq!(&asset_type.0[..2], &[0x53, 0x00]);
        assert_eq!(shard_of(&asset_type), 0xBEEF);
        assert_eq!(&asset_type.0[4..], &blake256(&[9; 32]).0[4..]);
    }

    #[test]
    fn test_asset_type_depends_on_tracker() {
        assert_ne!(
            asset_type_from(&H256([1; 32]), 0),
            asset_type_from(&H256([2; 32]), 0)
        );
    }

    #[test]
    fn test_out_point_carries_lock() {
        let asset = sample_asset();
        let out_point = asset.out_point();
        assert_eq!(out_point.tracker, asset.tracker);
        assert_eq!(out_point.quantity, 100);
        assert_eq!(out_point.lock_script_hash, Some(asset.lock_script_hash));
        assert_eq!(out_point.parameters, Some(asset.parameters.clone()));
    }

    #[test]
    fn test_transfer_input_is_unsigned() {
        let input = sample_asset().create_transfer_input();
        assert!(input.lock_script.is_empty());
        assert!(input.unlock_script.is_empty());
    }

    #[test]
    fn test_out_point_json_omits_lock_hints() {
        let out_point = sample_asset().out_point();
        assert!(out_point.lock_script_hash.is_some());
        let json = serde_json::to_value(&out_point).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["assetType", "index", "quantity", "shardId", "tracker"]);

        let back: AssetOutPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back.tracker, out_point.tracker);
        assert_eq!(back.lock_script_hash, None);
        assert_eq!(back.parameters, None);
    }

    #[test]
    fn test_create_mint_transaction() {
        let scheme = AssetScheme {
            network_id: "tc".to_string(),
            shard_id: 0,
            metadata: "gold".to_string(),
            amount: 1_000,
            approver: None,
        };
        let recipient = AssetTransferAddress::p2pkh(H256([5; 32]));
        let mint = scheme.create_mint_transaction(&recipient);
        assert_eq!(mint.output.amount, 1_000);
        assert_eq!(mint.output.parameters, vec![vec![5u8; 32]]);
        assert_eq!(mint.asset_scheme(), scheme);
    }
}
