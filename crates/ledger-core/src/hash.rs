use crate::constants::HASH_HEX_SIZE;
use crate::Block;
use sha2::{Digest, Sha256};

/// Digest over a block's canonical representation.
pub trait BlockHasher: Send + Sync {
    fn digest(&self, block: &Block) -> String;

    /// Length of every digest this hasher produces.
    fn digest_len(&self) -> usize {
        HASH_HEX_SIZE
    }
}

/// SHA-256, lowercase hex.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl BlockHasher for Sha256Hasher {
    fn digest(&self, block: &Block) -> String {
        let mut hasher = Sha256::new();
        hasher.update(block.canonical().as_bytes());
        hex::encode(hasher.finalize())
    }
}

pub fn count_leading_zero_chars(hash: &str) -> u32 {
    hash.bytes().take_while(|b| *b == b'0').count() as u32
}

/// True when `hash` starts with at least `difficulty` `'0'` characters.
pub fn hash_meets_difficulty(hash: &str, difficulty: u32) -> bool {
    count_leading_zero_chars(hash) >= difficulty
}
