//! Ledger data model: transactions, their inputs and outputs, and UTXOs.
//!
//! Amounts are signed 64-bit integers so that malformed (negative) values
//! can be represented and rejected. Totals are accumulated in `i128`.
//! Byte fields serialize as lowercase hex strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Amount of value carried by an output.
pub type Amount = i64;

/// Public identity of an output recipient or an input's claimed owner.
///
/// Opaque bytes as far as validation is concerned; the signature verifier
/// decides how to interpret them. [`Ed25519Verifier`](crate::crypto::Ed25519Verifier)
/// expects a 32-byte Ed25519 public key.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub Vec<u8>);

impl Identity {
    /// Create an identity from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse an identity from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s).map(Self)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", hex::encode(&self.0))
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_bytes::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        hex_bytes::deserialize(deserializer).map(Self)
    }
}

/// Reference to a specific output of a previous transaction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    /// Identifier of the transaction that created the output.
    pub txid: String,
    /// Index of the output within that transaction.
    pub index: u64,
}

impl OutPoint {
    pub fn new(txid: impl Into<String>, index: u64) -> Self {
        Self {
            txid: txid.into(),
            index,
        }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// A transaction input, spending a previously created output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    /// The output being spent.
    pub utxo_id: OutPoint,
    /// Identity the spender claims to act for. Informational only: the
    /// authorizing key is always the referenced UTXO's recipient.
    pub owner: Identity,
    /// Signature over the transaction's canonical signable payload.
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

/// A transaction output, creating a new spendable unit of value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    /// Identity entitled to spend this output.
    pub recipient: Identity,
    /// Value carried by the output. Must be strictly positive.
    pub amount: Amount,
}

/// A proposed transfer of value. Immutable once signed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Caller-assigned transaction identifier.
    pub id: String,
    /// Outputs consumed by this transaction, in signing order.
    pub inputs: Vec<TxInput>,
    /// Outputs created by this transaction, in signing order.
    pub outputs: Vec<TxOutput>,
    /// Creation time in Unix milliseconds. Opaque to validation.
    pub timestamp: u64,
}

impl Transaction {
    /// Sum of all output amounts.
    ///
    /// Accumulates in `i128`, which cannot overflow for any realistic
    /// number of `i64` amounts.
    pub fn total_output_amount(&self) -> i128 {
        self.outputs.iter().map(|out| i128::from(out.amount)).sum()
    }

    /// Outpoints referenced by the inputs, in input order.
    pub fn spent_outpoints(&self) -> impl Iterator<Item = &OutPoint> {
        self.inputs.iter().map(|input| &input.utxo_id)
    }
}

/// An unspent output as recorded by the UTXO pool.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    /// Where this output was created.
    pub outpoint: OutPoint,
    /// Identity whose signature authorizes spending this output.
    pub recipient: Identity,
    /// Value carried by the output.
    pub amount: Amount,
}

/// Serde adapter encoding byte vectors as lowercase hex strings.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
