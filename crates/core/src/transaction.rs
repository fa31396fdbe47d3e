//! Transaction variants, canonical hashing and the JSON codec.
//!
//! JSON form: `"noop"` for the no-op transaction, otherwise an object with a
//! single key naming the variant (`payment`, `setRegularKey`, `assetMint`,
//! `assetTransfer`) whose value holds the variant's fields.

use crate::asset::{asset_type_from, Asset, AssetScheme, ShardId};
use crate::crypto::PublicKey;
use crate::hash::{blake256, H160, H256};
use crate::serde_hex;
use crate::transfer::{AssetTransferTransaction, EncodedTransfer};
use crate::Bytes;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding a transaction from JSON.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected transaction type: {0}")]
    UnexpectedTransactionType(String),
    #[error("decoding {0} transactions is not implemented")]
    UnimplementedDecode(String),
    #[error("invalid {kind} fields: {source}")]
    InvalidFields {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while operating on a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("input index {index} out of range ({len} inputs)")]
    InputIndexOutOfRange { index: usize, len: usize },
}

/// Transfer of the native coin to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub recipient: H160,
    pub amount: u64,
}

/// Replacement of the sender's regular key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRegularKeyTransaction {
    pub key: PublicKey,
}

/// Lock of the single output a mint creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMintOutput {
    pub lock_script_hash: H160,
    #[serde(with = "serde_hex::bytes_list")]
    pub parameters: Vec<Bytes>,
    pub amount: u64,
}

/// Creation of a new asset type together with its whole supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMintTransaction {
    pub network_id: String,
    pub shard_id: ShardId,
    pub metadata: String,
    pub approver: Option<H160>,
    pub output: AssetMintOutput,
}

impl AssetMintTransaction {
    /// Identity hash.
    pub fn hash(&self) -> H256 {
        Encoded::AssetMint(self).hash()
    }

    /// Hash assets created by this transaction refer to.
    pub fn tracker(&self) -> H256 {
        self.hash()
    }

    /// The asset type this transaction creates.
    pub fn asset_type(&self) -> H256 {
        asset_type_from(&self.tracker(), self.shard_id)
    }

    /// The scheme this transaction registers.
    pub fn asset_scheme(&self) -> AssetScheme {
        AssetScheme {
            network_id: self.network_id.clone(),
            shard_id: self.shard_id,
            metadata: self.metadata.clone(),
            amount: self.output.amount,
            approver: self.approver,
        }
    }

    /// The asset this transaction mints.
    pub fn minted_asset(&self) -> Asset {
        Asset {
            asset_type: self.asset_type(),
            lock_script_hash: self.output.lock_script_hash,
            parameters: self.output.parameters.clone(),
            quantity: self.output.amount,
            shard_id: self.shard_id,
            tracker: self.tracker(),
            index: 0,
        }
    }
}

/// A transaction of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Transaction {
    Noop,
    Payment(PaymentTransaction),
    SetRegularKey(SetRegularKeyTransaction),
    AssetMint(AssetMintTransaction),
    AssetTransfer(AssetTransferTransaction),
}

impl Transaction {
    /// Name of the variant as used in the JSON form.
    pub fn kind(&self) -> &'static str {
        match self {
            Transaction::Noop => "noop",
            Transaction::Payment(_) => "payment",
            Transaction::SetRegularKey(_) => "setRegularKey",
            Transaction::AssetMint(_) => "assetMint",
            Transaction::AssetTransfer(_) => "assetTransfer",
        }
    }

    /// Identity hash over the full canonical encoding.
    pub fn hash(&self) -> H256 {
        match self {
            Transaction::Noop => Encoded::Noop.hash(),
            Transaction::Payment(tx) => Encoded::Payment(tx).hash(),
            Transaction::SetRegularKey(tx) => Encoded::SetRegularKey(tx).hash(),
            Transaction::AssetMint(tx) => tx.hash(),
            Transaction::AssetTransfer(tx) => tx.hash(),
        }
    }

    /// Hash assets created by this transaction refer to. Stable across signing.
    pub fn tracker(&self) -> H256 {
        match self {
            Transaction::AssetTransfer(tx) => tx.tracker(),
            other => other.hash(),
        }
    }

    /// Encode to the JSON form.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).expect("transaction fields always serialize to JSON")
    }

    /// Decode from the JSON form.
    pub fn from_json(value: &Value) -> Result<Self, DecodeError> {
        if value.as_str() == Some("noop") {
            return Ok(Transaction::Noop);
        }
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::UnexpectedTransactionType(value.to_string()))?;
        let (kind, fields) = match object.iter().next() {
            Some(entry) if object.len() == 1 => entry,
            _ => {
                let keys: Vec<&str> = object.keys().map(String::as_str).collect();
                return Err(DecodeError::UnexpectedTransactionType(format!(
                    "keys [{}]",
                    keys.join(", ")
                )));
            }
        };
        match kind.as_str() {
            "payment" => Ok(Transaction::Payment(parse_fields(kind, fields)?)),
            "setRegularKey" => Ok(Transaction::SetRegularKey(parse_fields(kind, fields)?)),
            "assetMint" => Ok(Transaction::AssetMint(parse_fields(kind, fields)?)),
            // The wire form of transfer inputs and outputs is not settled yet.
            "assetTransfer" => Err(DecodeError::UnimplementedDecode(kind.clone())),
            other => Err(DecodeError::UnexpectedTransactionType(other.to_string())),
        }
    }
}

fn parse_fields<T: for<'de> Deserialize<'de>>(kind: &str, fields: &Value) -> Result<T, DecodeError> {
    T::deserialize(fields).map_err(|source| DecodeError::InvalidFields {
        kind: kind.to_string(),
        source,
    })
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Transaction::from_json(&value).map_err(de::Error::custom)
    }
}

impl From<PaymentTransaction> for Transaction {
    fn from(tx: PaymentTransaction) -> Self {
        Transaction::Payment(tx)
    }
}

impl From<SetRegularKeyTransaction> for Transaction {
    fn from(tx: SetRegularKeyTransaction) -> Self {
        Transaction::SetRegularKey(tx)
    }
}

impl From<AssetMintTransaction> for Transaction {
    fn from(tx: AssetMintTransaction) -> Self {
        Transaction::AssetMint(tx)
    }
}

impl From<AssetTransferTransaction> for Transaction {
    fn from(tx: AssetTransferTransaction) -> Self {
        Transaction::AssetTransfer(tx)
    }
}

/// Canonical binary form that identity and binding hashes are computed over.
/// The variant index comes first, so different kinds never collide.
#[derive(Serialize)]
pub(crate) enum Encoded<'a> {
    Noop,
    Payment(&'a PaymentTransaction),
    SetRegularKey(&'a SetRegularKeyTransaction),
    AssetMint(&'a AssetMintTransaction),
    AssetTransfer(EncodedTransfer<'a>),
}

impl Encoded<'_> {
    pub(crate) fn hash(&self) -> H256 {
        let encoded = bincode::serialize(self).expect("serialization should not fail");
        blake256(&encoded)
    }
}
