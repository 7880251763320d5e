use log::{debug, info, warn};

use super::error::{LedgerError, Result};
use super::hash::{canonical_payload, canonical_string, hash_block, sha256_hex};
use super::pow::valid_proof;
use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, MAX_DIFFICULTY};
use crate::transaction::Transaction;

/// In-memory, append-only ledger with a pending-transaction buffer.
///
/// Callers that share a ledger between threads must hold one lock across
/// `verify_and_append` so the head cannot move between check and append.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new(difficulty: u32) -> Result<Self> {
        check_difficulty(difficulty)?;
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            difficulty,
        };
        ledger.create_genesis();
        Ok(ledger)
    }

    // Genesis is axiomatic: no proof-of-work check.
    fn create_genesis(&mut self) {
        let genesis = Block::new(
            1,
            std::mem::take(&mut self.pending),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        );
        debug!("genesis block created at {}", genesis.timestamp);
        self.chain.push(genesis);
    }

    /// The most recently appended block.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::ChainEmpty)
    }

    /// The full chain, oldest first.
    pub fn chain_view(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions waiting for the next block.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue a transaction and return the index of the block that will carry it.
    ///
    /// Payloads that cannot be canonically serialized are refused here so
    /// they never reach a block.
    pub fn enqueue_transaction(&mut self, tx: Transaction) -> Result<u64> {
        let index = self.last_block()?.index + 1;
        canonical_payload(&tx)?;
        self.pending.push(tx);
        debug!(
            "transaction queued for block #{} (pending={})",
            index,
            self.pending.len()
        );
        Ok(index)
    }

    /// Append a block whose proof the caller has already verified.
    ///
    /// Links to `previous_hash` when given, otherwise to the digest of the
    /// current head. The pending buffer moves into the block and is left empty.
    pub fn append_block(&mut self, proof: u128, previous_hash: Option<String>) -> Result<&Block> {
        let last = self.last_block()?;
        let index = last.index + 1;
        let previous_hash = match previous_hash {
            Some(h) => h,
            None => hash_block(last)?,
        };

        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, transactions, proof, previous_hash);

        // A block that cannot be hashed never enters the chain; the buffer is restored.
        if let Err(e) = canonical_string(&block) {
            self.pending = block.transactions;
            return Err(e);
        }

        self.chain.push(block);
        self.last_block()
    }

    /// Check `proof` against the current head and append a new block if it holds.
    ///
    /// `claimed_previous_hash` lets a miner pin the head it worked on; a
    /// mismatch means the head moved and the submission is stale.
    pub fn verify_and_append(
        &mut self,
        proof: u128,
        claimed_previous_hash: Option<&str>,
    ) -> Result<&Block> {
        let last = self.last_block()?;
        let reference = canonical_string(last)?;
        let head_hash = sha256_hex(reference.as_bytes());

        if let Some(claimed) = claimed_previous_hash {
            if claimed != head_hash {
                warn!("stale submission: claimed {} but head is {}", claimed, head_hash);
                return Err(LedgerError::StalePreviousHash {
                    claimed: claimed.to_string(),
                    actual: head_hash,
                });
            }
        }

        if !valid_proof(&reference, proof, self.difficulty) {
            warn!(
                "proof {} rejected for block #{} (difficulty={})",
                proof, last.index, self.difficulty
            );
            return Err(LedgerError::ProofRejected { proof });
        }

        let block = self.append_block(proof, Some(head_hash))?;
        info!(
            "block #{} forged (proof={}, txs={}, prev={})",
            block.index,
            block.proof,
            block.transactions.len(),
            block.previous_hash
        );
        Ok(block)
    }

    /// Audit genesis shape, index contiguity and hash linkage.
    ///
    /// Past proofs are not re-checked: the difficulty may have changed since.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if !genesis.is_genesis() || genesis.proof != GENESIS_PROOF {
            return false;
        }

        for pair in self.chain.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if current.index != prev.index + 1 {
                return false;
            }
            match hash_block(prev) {
                Ok(h) if h == current.previous_hash => {}
                _ => return false,
            }
        }

        true
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Affects verification of future submissions only.
    pub fn set_difficulty(&mut self, difficulty: u32) -> Result<()> {
        check_difficulty(difficulty)?;
        self.difficulty = difficulty;
        Ok(())
    }
}

fn check_difficulty(difficulty: u32) -> Result<()> {
    if difficulty > MAX_DIFFICULTY {
        return Err(LedgerError::DifficultyOutOfRange(difficulty));
    }
    Ok(())
}
