use thiserror::Error;

/// Errors produced by the ledger and the proof-of-work check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("proof {proof} does not satisfy the current difficulty")]
    ProofRejected { proof: u128 },

    #[error("stale previous hash: claimed {claimed}, current head is {actual}")]
    StalePreviousHash { claimed: String, actual: String },

    #[error("chain is empty")]
    ChainEmpty,

    #[error("block cannot be canonically serialized: {0}")]
    MalformedBlock(String),

    #[error("transaction cannot be canonically serialized: {0}")]
    MalformedTransaction(String),

    #[error("difficulty {0} exceeds the digest length")]
    DifficultyOutOfRange(u32),
}

impl LedgerError {
    /// Whether the caller may retry with different input (another proof, a
    /// fresh head, a valid payload or difficulty). The rest are invariant faults.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LedgerError::ChainEmpty | LedgerError::MalformedBlock(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
