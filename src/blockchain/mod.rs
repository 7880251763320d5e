pub mod block;
pub mod error;
pub mod hash;
pub mod model;
pub mod pow;

pub use block::Block;
pub use error::LedgerError;
pub use hash::{canonical_string, hash_block};
pub use model::Ledger;
pub use pow::{find_proof, valid_proof};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: u32 = 6;

/// Hex length of a SHA-256 digest; no difficulty can exceed it.
pub const MAX_DIFFICULTY: u32 = 64;

/// Proof recorded in the genesis block.
pub const GENESIS_PROOF: u128 = 100;

/// Linkage sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";
