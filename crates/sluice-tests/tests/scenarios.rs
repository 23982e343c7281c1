//! End-to-end validation scenarios against an in-memory snapshot with
//! real Ed25519 signatures.

use std::sync::Arc;
use std::thread;

use sluice_core::crypto::Ed25519Verifier;
use sluice_core::types::OutPoint;
use sluice_core::{
    validate_transaction, ErrorKind, MemoryUtxoPool, TransactionValidator, ValidationError,
};
use sluice_tests::helpers::*;

#[test]
fn no_inputs_is_structural_rejection() {
    let alice = keypair(1);
    let tx = make_tx("t1", &[], &[(10, recipient(0xB0))], &alice);

    let result = validate_transaction(&tx, &MemoryUtxoPool::new(), &Ed25519Verifier).unwrap();

    assert!(!result.valid);
    assert_eq!(result.kinds(), vec![ErrorKind::EmptyInputs]);
}

#[test]
fn balanced_signed_spend_is_valid() {
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 0, 50, &alice)]);
    let mut tx = make_tx("t2", &[OutPoint::new("T", 0)], &[(50, recipient(0xB0))], &alice);
    sign_all(&mut tx, &alice);

    let result = validate_transaction(&tx, &pool, &Ed25519Verifier).unwrap();

    assert!(result.valid);
    assert!(result.errors.is_empty());
}

#[test]
fn double_reference_reported_once_and_counted_once() {
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 0, 40, &alice)]);
    let op = OutPoint::new("T", 0);
    let mut tx = make_tx("t3", &[op.clone(), op.clone()], &[(80, recipient(0xB0))], &alice);
    sign_all(&mut tx, &alice);

    let result = validate_transaction(&tx, &pool, &Ed25519Verifier).unwrap();

    let double_spends: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.kind() == ErrorKind::DoubleSpend)
        .collect();
    assert_eq!(double_spends.len(), 1);
    assert_eq!(
        double_spends[0],
        &ValidationError::DoubleSpend { index: 1, outpoint: op }
    );
    // 40 counted once against 80 of outputs.
    assert!(result.errors.contains(&ValidationError::AmountMismatch {
        input_total: 40,
        output_total: 80,
    }));
}

#[test]
fn unbalanced_spend_reports_both_totals() {
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 1, 30, &alice)]);
    let mut tx = make_tx("t4", &[OutPoint::new("T", 1)], &[(25, recipient(0xB0))], &alice);
    sign_all(&mut tx, &alice);

    let result = validate_transaction(&tx, &pool, &Ed25519Verifier).unwrap();

    assert!(result.errors.contains(&ValidationError::AmountMismatch {
        input_total: 30,
        output_total: 25,
    }));
}

#[test]
fn signature_from_wrong_identity_rejected() {
    let alice = keypair(1);
    let mallory = keypair(2);
    let pool = make_pool([make_utxo("T", 0, 50, &alice)]);
    let mut tx = make_tx("t5", &[OutPoint::new("T", 0)], &[(50, recipient(0xB0))], &alice);
    sign_all(&mut tx, &mallory);

    let result = validate_transaction(&tx, &pool, &Ed25519Verifier).unwrap();

    assert_eq!(
        result.errors,
        vec![ValidationError::InvalidSignature { index: 0, outpoint: OutPoint::new("T", 0) }]
    );
}

#[test]
fn zero_amount_output_treated_like_negative() {
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 0, 50, &alice)]);

    let zero = make_tx("t6", &[OutPoint::new("T", 0)], &[(0, recipient(0xB0))], &alice);
    let negative = make_tx("t6", &[OutPoint::new("T", 0)], &[(-1, recipient(0xB0))], &alice);

    let zero_result = validate_transaction(&zero, &pool, &Ed25519Verifier).unwrap();
    let negative_result = validate_transaction(&negative, &pool, &Ed25519Verifier).unwrap();

    assert_eq!(zero_result.kinds(), vec![ErrorKind::NonPositiveAmount]);
    assert_eq!(negative_result.kinds(), vec![ErrorKind::NonPositiveAmount]);
}

#[test]
fn same_utxo_found_by_two_transactions() {
    // Consumption is the ledger's job: both spends pass against one snapshot.
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 0, 50, &alice)]);
    let mut first = make_tx("a", &[OutPoint::new("T", 0)], &[(50, recipient(0xB0))], &alice);
    let mut second = make_tx("b", &[OutPoint::new("T", 0)], &[(50, recipient(0xC0))], &alice);
    sign_all(&mut first, &alice);
    sign_all(&mut second, &alice);

    let validator = TransactionValidator::new(&pool, Ed25519Verifier);
    assert!(validator.validate(&first).unwrap().valid);
    assert!(validator.validate(&second).unwrap().valid);
}

#[test]
fn signature_does_not_transfer_between_transactions() {
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 0, 50, &alice)]);
    let mut original = make_tx("a", &[OutPoint::new("T", 0)], &[(50, recipient(0xB0))], &alice);
    sign_all(&mut original, &alice);

    let mut replay = make_tx("b", &[OutPoint::new("T", 0)], &[(50, recipient(0xEE))], &alice);
    replay.inputs[0].signature = original.inputs[0].signature.clone();

    let result = validate_transaction(&replay, &pool, &Ed25519Verifier).unwrap();
    assert_eq!(result.kinds(), vec![ErrorKind::InvalidSignature]);
}

#[test]
fn shared_validator_across_threads() {
    let alice = keypair(1);
    let pool = Arc::new(make_pool([
        make_utxo("A", 0, 10, &alice),
        make_utxo("B", 0, 20, &alice),
    ]));
    let validator = Arc::new(TransactionValidator::new(Arc::clone(&pool), Ed25519Verifier));

    let handles: Vec<_> = [("A", 10), ("B", 20)]
        .into_iter()
        .map(|(txid, amount)| {
            let validator = Arc::clone(&validator);
            let mut tx = make_tx(txid, &[OutPoint::new(txid, 0)], &[(amount, recipient(0xB0))], &alice);
            sign_all(&mut tx, &alice);
            thread::spawn(move || validator.validate(&tx).unwrap())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().valid);
    }
}

#[test]
fn result_serializes_for_callers() {
    let alice = keypair(1);
    let pool = make_pool([make_utxo("T", 1, 30, &alice)]);
    let tx = make_tx("t", &[OutPoint::new("T", 1), OutPoint::new("U", 0)], &[(25, recipient(0xB0))], &alice);

    let result = validate_transaction(&tx, &pool, &Ed25519Verifier).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["valid"], false);
    let codes: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["UTXO_NOT_FOUND", "AMOUNT_MISMATCH", "INVALID_SIGNATURE"]);
}
