//! In-memory UTXO snapshot.
//!
//! [`MemoryUtxoPool`] is the reference [`UtxoPool`] implementation used by
//! tests, benchmarks, and the CLI. Snapshots load from a JSON array of
//! [`Utxo`] records.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{PoolError, SnapshotError};
use crate::traits::UtxoPool;
use crate::types::{OutPoint, Utxo};

/// A `HashMap`-backed snapshot of unspent outputs.
#[derive(Debug, Clone, Default)]
pub struct MemoryUtxoPool {
    utxos: HashMap<OutPoint, Utxo>,
}

impl MemoryUtxoPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from UTXO records, rejecting duplicate outpoints.
    pub fn from_utxos(utxos: impl IntoIterator<Item = Utxo>) -> Result<Self, SnapshotError> {
        let mut pool = Self::new();
        for utxo in utxos {
            if pool.utxos.contains_key(&utxo.outpoint) {
                return Err(SnapshotError::DuplicateUtxo(utxo.outpoint));
            }
            pool.insert(utxo);
        }
        Ok(pool)
    }

    /// Parse a snapshot from a JSON array of UTXO records.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let utxos: Vec<Utxo> = serde_json::from_str(json)?;
        Self::from_utxos(utxos)
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Insert or replace an unspent output. Returns the previous record.
    pub fn insert(&mut self, utxo: Utxo) -> Option<Utxo> {
        self.utxos.insert(utxo.outpoint.clone(), utxo)
    }

    /// Remove an output from the snapshot.
    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<Utxo> {
        self.utxos.remove(outpoint)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Iterate over all unspent outputs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Utxo> {
        self.utxos.values()
    }
}

impl UtxoPool for MemoryUtxoPool {
    fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<Utxo>, PoolError> {
        Ok(self.utxos.get(outpoint).cloned())
    }
}
