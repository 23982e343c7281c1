//! # sluice-core
//! Transaction validation against a UTXO snapshot.
//!
//! The entry point is [`validation::TransactionValidator`], which runs the
//! rule pipeline over a [`types::Transaction`] using a [`traits::UtxoPool`]
//! for lookups and a [`traits::SignatureVerifier`] for authorization.

pub mod crypto;
pub mod error;
pub mod payload;
pub mod pool;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, InfrastructureError, ValidationError};
pub use payload::{payload_digest, signable_payload};
pub use pool::MemoryUtxoPool;
pub use traits::{SignatureVerifier, UtxoPool};
pub use types::{Identity, OutPoint, Transaction, TxInput, TxOutput, Utxo};
pub use validation::{validate_transaction, TransactionValidator, ValidationResult};
