//! Transaction validation against a UTXO snapshot.
//!
//! The rule pipeline runs three stages in a fixed order:
//!
//! - **Structural**: non-empty inputs and outputs, strictly positive output
//!   amounts. Both emptiness checks and every amount check always run; any
//!   error here ends validation before the later stages.
//! - **Resolution**: in input order, rejects repeated outpoints, looks up
//!   each new outpoint in the pool, and accumulates the input total. The
//!   input and output totals are then compared exactly.
//! - **Authorization**: every input whose UTXO resolved must carry a valid
//!   signature over the canonical payload, checked against the UTXO's
//!   recorded recipient. The input's claimed `owner` plays no part.
//!
//! All detected errors are reported in detection order. Collaborator
//! failures abort the call with an [`InfrastructureError`] instead.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{ErrorKind, InfrastructureError, ValidationError};
use crate::payload::signable_payload;
use crate::traits::{SignatureVerifier, UtxoPool};
use crate::types::{Transaction, Utxo};

/// Outcome of validating one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// `true` iff `errors` is empty.
    pub valid: bool,
    /// Every detected error, in detection order.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The primary rejection reason, if any.
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Error codes in detection order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(ValidationError::kind).collect()
    }

    /// Convert into a `Result`, yielding the errors on rejection.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.valid { Ok(()) } else { Err(self.errors) }
    }
}

/// Validates transactions against a UTXO pool using a signature primitive.
///
/// Holds no state beyond its collaborators, so one validator may serve
/// concurrent callers when both collaborators allow concurrent reads.
#[derive(Debug, Clone)]
pub struct TransactionValidator<P, V> {
    pool: P,
    verifier: V,
}

impl<P: UtxoPool, V: SignatureVerifier> TransactionValidator<P, V> {
    pub fn new(pool: P, verifier: V) -> Self {
        Self { pool, verifier }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Run the full rule pipeline over `tx`.
    ///
    /// Never fails because of the transaction's content; malformed or
    /// dishonest transactions yield `Ok` with `valid == false`.
    pub fn validate(&self, tx: &Transaction) -> Result<ValidationResult, InfrastructureError> {
        let mut errors = check_structure(tx);
        if !errors.is_empty() {
            trace_errors(tx, &errors);
            debug!(txid = %tx.id, errors = errors.len(), stage = "structural", "transaction rejected");
            return Ok(ValidationResult::from_errors(errors));
        }

        let resolved = self.resolve_inputs(tx, &mut errors)?;
        self.check_signatures(tx, &resolved, &mut errors)?;

        trace_errors(tx, &errors);
        let result = ValidationResult::from_errors(errors);
        debug!(
            txid = %tx.id,
            valid = result.valid,
            errors = result.errors.len(),
            stage = "authorization",
            "transaction validated"
        );
        Ok(result)
    }

    /// Resolve inputs against the pool and check value conservation.
    ///
    /// Returns the resolved UTXOs paired with their input index. A repeated
    /// outpoint is reported once per repeat and contributes nothing; the
    /// first occurrence is processed normally.
    fn resolve_inputs(
        &self,
        tx: &Transaction,
        errors: &mut Vec<ValidationError>,
    ) -> Result<Vec<(usize, Utxo)>, InfrastructureError> {
        let mut seen = HashSet::with_capacity(tx.inputs.len());
        let mut resolved = Vec::with_capacity(tx.inputs.len());
        let mut input_total: i128 = 0;

        for (index, input) in tx.inputs.iter().enumerate() {
            let outpoint = &input.utxo_id;
            if !seen.insert(outpoint) {
                errors.push(ValidationError::DoubleSpend {
                    index,
                    outpoint: outpoint.clone(),
                });
                continue;
            }

            let utxo = self.pool.get_utxo(outpoint).inspect_err(|e| {
                warn!(txid = %tx.id, %outpoint, error = %e, "utxo lookup failed");
            })?;

            match utxo {
                Some(utxo) => {
                    input_total += i128::from(utxo.amount);
                    resolved.push((index, utxo));
                }
                None => errors.push(ValidationError::UtxoNotFound {
                    index,
                    outpoint: outpoint.clone(),
                }),
            }
        }

        let output_total = tx.total_output_amount();
        if input_total != output_total {
            errors.push(ValidationError::AmountMismatch {
                input_total,
                output_total,
            });
        }

        Ok(resolved)
    }

    /// Verify each resolved input against its UTXO's recipient.
    fn check_signatures(
        &self,
        tx: &Transaction,
        resolved: &[(usize, Utxo)],
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), InfrastructureError> {
        if resolved.is_empty() {
            return Ok(());
        }

        let payload = signable_payload(tx);
        trace!(txid = %tx.id, bytes = payload.len(), "built signable payload");

        for (index, utxo) in resolved {
            let input = &tx.inputs[*index];
            let authorized = self
                .verifier
                .verify(&payload, &input.signature, &utxo.recipient)
                .inspect_err(|e| {
                    warn!(txid = %tx.id, input = index, error = %e, "signature verifier failed");
                })?;

            if !authorized {
                errors.push(ValidationError::InvalidSignature {
                    index: *index,
                    outpoint: input.utxo_id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Validate `tx` against `pool` using `verifier`.
///
/// Convenience wrapper around [`TransactionValidator::validate`].
pub fn validate_transaction<P, V>(
    tx: &Transaction,
    pool: &P,
    verifier: &V,
) -> Result<ValidationResult, InfrastructureError>
where
    P: UtxoPool + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    TransactionValidator::new(pool, verifier).validate(tx)
}

/// Context-free structural checks. Every check runs.
fn check_structure(tx: &Transaction) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if tx.inputs.is_empty() {
        errors.push(ValidationError::EmptyInputs);
    }
    if tx.outputs.is_empty() {
        errors.push(ValidationError::EmptyOutputs);
    }

    for (index, output) in tx.outputs.iter().enumerate() {
        if output.amount <= 0 {
            errors.push(ValidationError::NonPositiveAmount {
                index,
                amount: output.amount,
            });
        }
    }

    errors
}

fn trace_errors(tx: &Transaction, errors: &[ValidationError]) {
    for err in errors {
        trace!(txid = %tx.id, code = %err.kind(), "{err}");
    }
}
