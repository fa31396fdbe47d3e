//! Key management and transaction signing for assetkit.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        TransactionSigner (capability)        │
//! │  create_address · is_unlockable · sign ·     │
//! │  unlock · sign_input                         │
//! └──────────────────────┬──────────────────────┘
//!                        │ implemented by
//! ┌──────────────────────▼──────────────────────┐
//! │   P2pkh: public key hash → public key map    │
//! └──────────────────────┬──────────────────────┘
//!                        │ create_key / sign
//! ┌──────────────────────▼──────────────────────┐
//! │  KeyStore (MemoryKeyStore or a remote one)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use assetkit_core::TransactionFactory;
//! use assetkit_signer::{MemoryKeyStore, P2pkh, TransactionSigner};
//!
//! # async fn run() -> Result<(), assetkit_signer::SignerError> {
//! let signer = P2pkh::new(Arc::new(MemoryKeyStore::new()));
//! let factory = TransactionFactory::default();
//!
//! let owner = signer.create_address().await?;
//! let mint = factory
//!     .create_asset_scheme("gold", 100, None)
//!     .create_mint_transaction(&owner);
//!
//! let mut transfer = factory.create_transfer();
//! transfer.add_inputs([&mint.minted_asset()]);
//! signer.sign_input(&mut transfer, 0).await?;
//! # Ok(())
//! # }
//! ```

pub mod keystore;
pub mod p2pkh;
pub mod signer;

// Re-export commonly used types
pub use keystore::{KeyStore, KeyStoreError, MemoryKeyStore};
pub use p2pkh::P2pkh;
pub use signer::{SignerError, TransactionSigner, UnlockScripts};
