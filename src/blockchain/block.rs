use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the ledger. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // Unix seconds (UTC), microsecond resolution
    pub transactions: Vec<Transaction>,
    pub proof: u128,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (index 1, sentinel linkage, fixed proof).
    pub fn genesis() -> Self {
        Self::new(1, Vec::new(), GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string())
    }

    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u128,
        previous_hash: String,
    ) -> Self {
        Self::new_with_timestamp(index, transactions, proof, previous_hash, now_secs())
    }

    pub fn new_with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u128,
        previous_hash: String,
        timestamp: f64,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

/// Current time as fractional Unix seconds.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
