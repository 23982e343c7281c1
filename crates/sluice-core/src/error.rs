//! Error types for transaction validation.
//!
//! [`ValidationError`] describes a rule a transaction broke and is always
//! returned inside a [`ValidationResult`](crate::validation::ValidationResult).
//! [`InfrastructureError`] means a collaborator failed and the validation
//! call could not complete.
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::types::{Amount, OutPoint};

/// Closed set of validation error codes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    EmptyInputs,
    EmptyOutputs,
    NonPositiveAmount,
    DoubleSpend,
    UtxoNotFound,
    AmountMismatch,
    InvalidSignature,
}

impl ErrorKind {
    /// Stable wire code, e.g. `"DOUBLE_SPEND"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyInputs => "EMPTY_INPUTS",
            Self::EmptyOutputs => "EMPTY_OUTPUTS",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::DoubleSpend => "DOUBLE_SPEND",
            Self::UtxoNotFound => "UTXO_NOT_FOUND",
            Self::AmountMismatch => "AMOUNT_MISMATCH",
            Self::InvalidSignature => "INVALID_SIGNATURE",
        }
    }

    /// Whether this code is produced by the structural stage.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::EmptyInputs | Self::EmptyOutputs | Self::NonPositiveAmount)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("transaction has no inputs")] EmptyInputs,
    #[error("transaction has no outputs")] EmptyOutputs,
    #[error("output {index} has non-positive amount {amount}")] NonPositiveAmount { index: usize, amount: Amount },
    #[error("input {index} spends {outpoint} more than once")] DoubleSpend { index: usize, outpoint: OutPoint },
    #[error("input {index} references unknown UTXO {outpoint}")] UtxoNotFound { index: usize, outpoint: OutPoint },
    #[error("input total {input_total} does not equal output total {output_total}")] AmountMismatch { input_total: i128, output_total: i128 },
    #[error("invalid signature on input {index} spending {outpoint}")] InvalidSignature { index: usize, outpoint: OutPoint },
}

impl ValidationError {
    /// The error code for this diagnostic.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInputs => ErrorKind::EmptyInputs,
            Self::EmptyOutputs => ErrorKind::EmptyOutputs,
            Self::NonPositiveAmount { .. } => ErrorKind::NonPositiveAmount,
            Self::DoubleSpend { .. } => ErrorKind::DoubleSpend,
            Self::UtxoNotFound { .. } => ErrorKind::UtxoNotFound,
            Self::AmountMismatch { .. } => ErrorKind::AmountMismatch,
            Self::InvalidSignature { .. } => ErrorKind::InvalidSignature,
        }
    }
}

/// Serialized as `{"code": "...", "message": "..."}`.
impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 2)?;
        state.serialize_field("code", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("utxo pool unavailable: {0}")] Unavailable(String),
    #[error("utxo pool backend: {0}")] Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    #[error("signature verifier unavailable: {0}")] Unavailable(String),
}

/// A collaborator failed; the validation call was abandoned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InfrastructureError {
    #[error(transparent)] Pool(#[from] PoolError),
    #[error(transparent)] Verifier(#[from] VerifierError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("input index out of bounds: {index} >= {len}")] InputIndexOutOfBounds { index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("json: {0}")] Json(#[from] serde_json::Error),
    #[error("duplicate UTXO in snapshot: {0}")] DuplicateUtxo(OutPoint),
}
