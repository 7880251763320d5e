use super::hash::sha256_hex;

/// Check whether `proof` solves the puzzle for `reference`, the canonical
/// string of the block being extended: the SHA-256 of `reference` followed by
/// the decimal proof must start with `difficulty` zero hex digits.
///
/// A difficulty of 0 accepts everything; one above the digest length
/// accepts nothing.
pub fn valid_proof(reference: &str, proof: u128, difficulty: u32) -> bool {
    let guess = format!("{reference}{proof}");
    let digest = sha256_hex(guess.as_bytes());
    digest
        .get(..difficulty as usize)
        .is_some_and(|prefix| prefix.bytes().all(|b| b == b'0'))
}

/// Search proofs upward from 0 until one satisfies `valid_proof`.
///
/// This is the miner's side of the scheme; the ledger never calls it.
/// Expected work grows as 16^difficulty.
pub fn find_proof(reference: &str, difficulty: u32) -> u128 {
    let mut proof: u128 = 0;
    while !valid_proof(reference, proof, difficulty) {
        proof += 1;
    }
    proof
}
