//! Canonical signable payload.
//!
//! Signers and the validator must produce byte-identical payloads for the
//! same transaction, so the layout below is a versioned contract. Changing
//! it invalidates every signature issued under the previous version.
//!
//! # Layout (version 1)
//!
//! All integers are little-endian. Variable-length fields are prefixed by
//! their byte length as a `u64`.
//!
//! ```text
//! domain tag     "sluice/signable/v1"
//! id             UTF-8 transaction id
//! input count    u64
//!   txid         UTF-8 source transaction id
//!   index        u64
//!   owner        identity bytes
//! output count   u64
//!   recipient    identity bytes
//!   amount       i64
//! timestamp      u64
//! ```
//!
//! Input signatures are excluded to avoid circularity.

use crate::types::Transaction;

/// Domain separation tag and layout version.
pub const PAYLOAD_DOMAIN: &[u8] = b"sluice/signable/v1";

/// Build the canonical signable payload for a transaction.
pub fn signable_payload(tx: &Transaction) -> Vec<u8> {
    let mut data = Vec::with_capacity(estimated_len(tx));

    put_bytes(&mut data, PAYLOAD_DOMAIN);
    put_bytes(&mut data, tx.id.as_bytes());

    put_u64(&mut data, tx.inputs.len() as u64);
    for input in &tx.inputs {
        put_bytes(&mut data, input.utxo_id.txid.as_bytes());
        put_u64(&mut data, input.utxo_id.index);
        put_bytes(&mut data, input.owner.as_bytes());
    }

    put_u64(&mut data, tx.outputs.len() as u64);
    for output in &tx.outputs {
        put_bytes(&mut data, output.recipient.as_bytes());
        data.extend_from_slice(&output.amount.to_le_bytes());
    }

    put_u64(&mut data, tx.timestamp);
    data
}

/// BLAKE3 fingerprint of the signable payload.
pub fn payload_digest(tx: &Transaction) -> [u8; 32] {
    blake3::hash(&signable_payload(tx)).into()
}

fn put_u64(data: &mut Vec<u8>, value: u64) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn put_bytes(data: &mut Vec<u8>, bytes: &[u8]) {
    put_u64(data, bytes.len() as u64);
    data.extend_from_slice(bytes);
}

fn estimated_len(tx: &Transaction) -> usize {
    let inputs: usize = tx
        .inputs
        .iter()
        .map(|i| 24 + i.utxo_id.txid.len() + i.owner.as_bytes().len())
        .sum();
    let outputs: usize = tx
        .outputs
        .iter()
        .map(|o| 16 + o.recipient.as_bytes().len())
        .sum();
    40 + PAYLOAD_DOMAIN.len() + tx.id.len() + inputs + outputs
}
