//! Asset transfer transactions.
//!
//! A transfer consumes assets (inputs and burns) and creates new ones
//! (outputs). Each input is authorized by a lock/unlock script pair. The
//! unlock scripts sign the binding hash, which covers everything except those
//! scripts, so signing one input never invalidates another.

use crate::address::AssetTransferAddress;
use crate::asset::{Asset, AssetOutPoint, ShardId};
use crate::hash::{H160, H256};
use crate::serde_hex;
use crate::transaction::{Encoded, TransactionError};
use crate::Bytes;
use serde::{Deserialize, Serialize};

/// An input spending a previously created asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransferInput {
    pub prev_out: AssetOutPoint,
    #[serde(with = "serde_hex::bytes")]
    pub lock_script: Bytes,
    #[serde(with = "serde_hex::bytes")]
    pub unlock_script: Bytes,
}

impl AssetTransferInput {
    /// Create an unsigned input.
    pub fn new(prev_out: AssetOutPoint) -> Self {
        Self {
            prev_out,
            lock_script: Vec::new(),
            unlock_script: Vec::new(),
        }
    }

    /// Whether both scripts have been filled in.
    pub fn is_signed(&self) -> bool {
        !self.lock_script.is_empty() && !self.unlock_script.is_empty()
    }
}

/// An asset created by a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransferOutput {
    pub lock_script_hash: H160,
    #[serde(with = "serde_hex::bytes_list")]
    pub parameters: Vec<Bytes>,
    pub asset_type: H256,
    pub shard_id: ShardId,
    pub quantity: u64,
}

impl AssetTransferOutput {
    /// An output sending `quantity` of `asset_type` to `recipient`.
    pub fn new(
        recipient: &AssetTransferAddress,
        asset_type: H256,
        shard_id: ShardId,
        quantity: u64,
    ) -> Self {
        let (lock_script_hash, parameters) = recipient.lock_script_hash_and_parameters();
        Self {
            lock_script_hash,
            parameters,
            asset_type,
            shard_id,
            quantity,
        }
    }
}

/// Moves assets between locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransferTransaction {
    pub burns: Vec<AssetTransferInput>,
    pub inputs: Vec<AssetTransferInput>,
    pub outputs: Vec<AssetTransferOutput>,
    pub network_id: String,
}

impl AssetTransferTransaction {
    /// Create an empty transfer for the given network.
    pub fn new(network_id: impl Into<String>) -> Self {
        Self {
            burns: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            network_id: network_id.into(),
        }
    }

    /// Append unsigned inputs spending the given assets.
    pub fn add_inputs<'a>(&mut self, assets: impl IntoIterator<Item = &'a Asset>) -> &mut Self {
        self.inputs
            .extend(assets.into_iter().map(Asset::create_transfer_input));
        self
    }

    /// Append unsigned burns of the given assets.
    pub fn add_burns<'a>(&mut self, assets: impl IntoIterator<Item = &'a Asset>) -> &mut Self {
        self.burns
            .extend(assets.into_iter().map(Asset::create_transfer_input));
        self
    }

    /// Append outputs.
    pub fn add_outputs(&mut self, outputs: impl IntoIterator<Item = AssetTransferOutput>) -> &mut Self {
        self.outputs.extend(outputs);
        self
    }

    /// Identity hash. Covers the scripts, so it changes while inputs are signed.
    pub fn hash(&self) -> H256 {
        Encoded::AssetTransfer(EncodedTransfer::new(self, true)).hash()
    }

    /// Binding hash: the message every input's unlock script signs.
    pub fn hash_without_script(&self) -> H256 {
        Encoded::AssetTransfer(EncodedTransfer::new(self, false)).hash()
    }

    /// Hash assets created by this transaction refer to.
    pub fn tracker(&self) -> H256 {
        self.hash_without_script()
    }

    /// Fill in the scripts of one input. The only way scripts are mutated.
    pub fn set_input_scripts(
        &mut self,
        index: usize,
        lock_script: Bytes,
        unlock_script: Bytes,
    ) -> Result<(), TransactionError> {
        let len = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputIndexOutOfRange { index, len })?;
        input.lock_script = lock_script;
        input.unlock_script = unlock_script;
        Ok(())
    }

    /// The asset output `index` becomes once this transaction is applied.
    pub fn transferred_asset(&self, index: usize) -> Option<Asset> {
        let output = self.outputs.get(index)?;
        Some(Asset {
            asset_type: output.asset_type,
            lock_script_hash: output.lock_script_hash,
            parameters: output.parameters.clone(),
            quantity: output.quantity,
            shard_id: output.shard_id,
            tracker: self.tracker(),
            index: u32::try_from(index).ok()?,
        })
    }

    /// All assets this transaction creates, in output order.
    pub fn transferred_assets(&self) -> Vec<Asset> {
        (0..self.outputs.len())
            .filter_map(|i| self.transferred_asset(i))
            .collect()
    }
}

#[derive(Serialize)]
struct EncodedOutPoint {
    tracker: H256,
    index: u32,
    asset_type: H256,
    shard_id: ShardId,
    quantity: u64,
}

#[derive(Serialize)]
struct EncodedInput<'a> {
    prev_out: EncodedOutPoint,
    lock_script: &'a [u8],
    unlock_script: &'a [u8],
}

impl<'a> EncodedInput<'a> {
    fn new(input: &'a AssetTransferInput, with_scripts: bool) -> Self {
        let prev_out = &input.prev_out;
        let (lock_script, unlock_script): (&[u8], &[u8]) = if with_scripts {
            (input.lock_script.as_slice(), input.unlock_script.as_slice())
        } else {
            (&[], &[])
        };
        Self {
            prev_out: EncodedOutPoint {
                tracker: prev_out.tracker,
                index: prev_out.index,
                asset_type: prev_out.asset_type,
                shard_id: prev_out.shard_id,
                quantity: prev_out.quantity,
            },
            lock_script,
            unlock_script,
        }
    }
}

/// Canonical form of a transfer. Out point lock hints never take part.
#[derive(Serialize)]
pub(crate) struct EncodedTransfer<'a> {
    network_id: &'a str,
    burns: Vec<EncodedInput<'a>>,
    inputs: Vec<EncodedInput<'a>>,
    outputs: &'a [AssetTransferOutput],
}

impl<'a> EncodedTransfer<'a> {
    fn new(tx: &'a AssetTransferTransaction, with_scripts: bool) -> Self {
        let encode = |inputs: &'a [AssetTransferInput]| -> Vec<EncodedInput<'a>> {
            inputs
                .iter()
                .map(|input| EncodedInput::new(input, with_scripts))
                .collect()
        };
        Self {
            network_id: &tx.network_id,
            burns: encode(&tx.burns),
            inputs: encode(&tx.inputs),
            outputs: &tx.outputs,
        }
    }
}
