//! Shared fixtures for scenario and property tests.

use sluice_core::crypto::{sign_input, KeyPair};
use sluice_core::pool::MemoryUtxoPool;
use sluice_core::types::*;

/// Deterministic keypair from a seed byte.
pub fn keypair(seed: u8) -> KeyPair {
    KeyPair::from_secret_bytes([seed; 32])
}

/// Opaque recipient identity from a seed byte.
pub fn recipient(seed: u8) -> Identity {
    Identity::from_bytes([seed; 32])
}

/// An unspent output paying `owner`.
pub fn make_utxo(txid: &str, index: u64, amount: Amount, owner: &KeyPair) -> Utxo {
    Utxo {
        outpoint: OutPoint::new(txid, index),
        recipient: owner.identity(),
        amount,
    }
}

/// Snapshot holding the given outputs.
pub fn make_pool(utxos: impl IntoIterator<Item = Utxo>) -> MemoryUtxoPool {
    let mut pool = MemoryUtxoPool::new();
    for utxo in utxos {
        pool.insert(utxo);
    }
    pool
}

/// Create an unsigned transaction spending `inputs` and paying `outputs`.
///
/// Each input claims `owner` as its owner.
pub fn make_tx(
    id: &str,
    inputs: &[OutPoint],
    outputs: &[(Amount, Identity)],
    owner: &KeyPair,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        inputs: inputs
            .iter()
            .map(|op| TxInput {
                utxo_id: op.clone(),
                owner: owner.identity(),
                signature: vec![],
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(amount, recipient)| TxOutput {
                recipient: recipient.clone(),
                amount: *amount,
            })
            .collect(),
        timestamp: 1_700_000_000_000,
    }
}

/// Sign every input with `signer`.
pub fn sign_all(tx: &mut Transaction, signer: &KeyPair) {
    for i in 0..tx.inputs.len() {
        sign_input(tx, i, signer).expect("input index in range");
    }
}
