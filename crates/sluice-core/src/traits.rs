//! Collaborator interfaces consumed by the validator.
//!
//! - [`UtxoPool`]: point lookups against a stable snapshot of unspent outputs
//! - [`SignatureVerifier`]: the signature primitive
//!
//! Both distinguish a negative answer (`Ok(None)`, `Ok(false)`) from a
//! collaborator failure (`Err`), which aborts the validation call.

use std::sync::Arc;

use crate::error::{PoolError, VerifierError};
use crate::types::{Identity, OutPoint, Utxo};

/// Read-only view of the unspent output set.
///
/// Must behave as a pure read against a snapshot that does not change for
/// the duration of one validation call.
pub trait UtxoPool: Send + Sync {
    /// Look up an unspent output. Returns `None` if spent or unknown.
    fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, PoolError>;
}

/// Deterministic, side-effect-free signature check.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` over `payload` was produced by `identity`.
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        identity: &Identity,
    ) -> Result<bool, VerifierError>;
}

impl<T: UtxoPool + ?Sized> UtxoPool for &T {
    fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, PoolError> {
        (**self).get_utxo(outpoint)
    }
}

impl<T: UtxoPool + ?Sized> UtxoPool for Arc<T> {
    fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, PoolError> {
        (**self).get_utxo(outpoint)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        identity: &Identity,
    ) -> Result<bool, VerifierError> {
        (**self).verify(payload, signature, identity)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for Arc<T> {
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        identity: &Identity,
    ) -> Result<bool, VerifierError> {
        (**self).verify(payload, signature, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ------------------------------------------------------------------
    // Mock: UtxoPool
    // ------------------------------------------------------------------

    struct MockPool {
        utxos: HashMap<OutPoint, Utxo>,
    }

    impl UtxoPool for MockPool {
        fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, PoolError> {
            Ok(self.utxos.get(outpoint).cloned())
        }
    }

    // ------------------------------------------------------------------
    // Mock: SignatureVerifier
    // ------------------------------------------------------------------

    /// Accepts a signature iff it equals the identity bytes.
    struct EchoVerifier;

    impl SignatureVerifier for EchoVerifier {
        fn verify(
            &self,
            _payload: &[u8],
            signature: &[u8],
            identity: &Identity,
        ) -> Result<bool, VerifierError> {
            Ok(signature == identity.as_bytes())
        }
    }

    fn pool_with_one() -> MockPool {
        let op = OutPoint::new("T", 0);
        let mut utxos = HashMap::new();
        utxos.insert(
            op.clone(),
            Utxo { outpoint: op, recipient: Identity::from_bytes([1u8; 4]), amount: 10 },
        );
        MockPool { utxos }
    }

    #[test]
    fn lookup_distinguishes_output_index() {
        let pool = pool_with_one();
        assert!(pool.get_utxo(&OutPoint::new("T", 0)).unwrap().is_some());
        assert!(pool.get_utxo(&OutPoint::new("T", 1)).unwrap().is_none());
    }

    #[test]
    fn pool_through_reference_and_arc() {
        let pool = pool_with_one();
        let by_ref: &dyn UtxoPool = &pool;
        assert!(by_ref.get_utxo(&OutPoint::new("T", 0)).unwrap().is_some());

        let shared = Arc::new(pool);
        assert_eq!(
            shared.get_utxo(&OutPoint::new("T", 0)).unwrap().map(|u| u.amount),
            Some(10)
        );
    }

    #[test]
    fn verifier_through_reference_and_arc() {
        let id = Identity::from_bytes([5u8; 4]);
        let verifier = EchoVerifier;
        assert!((&verifier).verify(b"msg", &[5u8; 4], &id).unwrap());
        let shared: Arc<dyn SignatureVerifier> = Arc::new(EchoVerifier);
        assert!(!shared.verify(b"msg", &[6u8; 4], &id).unwrap());
    }
}
