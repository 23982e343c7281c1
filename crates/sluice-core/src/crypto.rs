//! Ed25519 signing and verification.
//!
//! [`Ed25519Verifier`] is the default [`SignatureVerifier`]: identities are
//! raw 32-byte Ed25519 public keys and signatures are 64 bytes over the
//! canonical signable payload. [`KeyPair`] and [`sign_input`] are the
//! signer side, used by wallets, fixtures, and benchmarks.
//!
//! Every input of a transaction signs the same payload; the payload
//! excludes signatures, so inputs can be signed independently in any order.

use ed25519_dalek::Signer;
use std::fmt;

use crate::error::{CryptoError, VerifierError};
use crate::payload::signable_payload;
use crate::traits::SignatureVerifier;
use crate::types::{Identity, Transaction};

/// Ed25519 keypair for signing transactions.
///
/// The secret key is zeroized on drop by ed25519-dalek.
pub struct KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl KeyPair {
    /// Generate a random keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a keypair from 32-byte secret key material.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&bytes),
        }
    }

    /// The public identity that outputs paying this key should record.
    pub fn identity(&self) -> Identity {
        Identity::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Get the raw secret key bytes (32 bytes). Handle with care.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign a message, returning the raw 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_secret_bytes(self.secret_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}

/// Sign a transaction input in place.
///
/// Signs the canonical payload and writes the signature into the input.
/// The input's `owner` field is left untouched.
pub fn sign_input(
    tx: &mut Transaction,
    input_index: usize,
    keypair: &KeyPair,
) -> Result<(), CryptoError> {
    if input_index >= tx.inputs.len() {
        return Err(CryptoError::InputIndexOutOfBounds {
            index: input_index,
            len: tx.inputs.len(),
        });
    }
    let signature = keypair.sign(&signable_payload(tx));
    tx.inputs[input_index].signature = signature.to_vec();
    Ok(())
}

/// Strict Ed25519 verification of a signature by an identity.
///
/// Returns the specific reason for rejection. Malformed keys and
/// signatures are rejected, never panicked on.
pub fn verify_signature(
    message: &[u8],
    signature: &[u8],
    identity: &Identity,
) -> Result<(), CryptoError> {
    let pk_bytes: [u8; 32] = identity
        .as_bytes()
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let key = ed25519_dalek::VerifyingKey::from_bytes(&pk_bytes)
        .map_err(|_| CryptoError::InvalidPublicKey)?;

    let sig_bytes: [u8; 64] = signature
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    key.verify_strict(message, &sig)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Default signature primitive backed by ed25519-dalek.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        identity: &Identity,
    ) -> Result<bool, VerifierError> {
        Ok(verify_signature(payload, signature, identity).is_ok())
    }
}
