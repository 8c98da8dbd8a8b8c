//! Block and chain validation.
//!
//! [`PowPolicy::Trusting`] performs only the linkage and digest checks and
//! accepts any hash the miner reports. [`PowPolicy::Verifying`] also re-checks
//! the difficulty schedule and the proof-of-work target.

use crate::constants::{GENESIS_DATA, GENESIS_DIFFICULTY};
use crate::hash::{hash_meets_difficulty, BlockHasher};
use crate::pow::difficulty_at;
use crate::{Block, ChainRejection, Rejection};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowPolicy {
    Trusting,
    #[default]
    Verifying,
}

pub fn check_block<H: BlockHasher + ?Sized>(
    hasher: &H,
    policy: PowPolicy,
    prev: &Block,
    candidate: &Block,
) -> Result<(), Rejection> {
    if prev.index.checked_add(1) != Some(candidate.index) {
        return Err(Rejection::IndexMismatch {
            parent: prev.index,
            found: candidate.index,
        });
    }
    if candidate.prev_hash != prev.hash {
        return Err(Rejection::PrevHashMismatch {
            expected: prev.hash.clone(),
            found: candidate.prev_hash.clone(),
        });
    }
    check_seal(hasher, policy, candidate)
}

pub fn is_block_valid<H: BlockHasher + ?Sized>(
    hasher: &H,
    policy: PowPolicy,
    prev: &Block,
    candidate: &Block,
) -> bool {
    check_block(hasher, policy, prev, candidate).is_ok()
}

/// Structural genesis check. Timestamps differ per process, so only the fixed
/// fields and the seal are compared.
pub fn check_genesis<H: BlockHasher + ?Sized>(
    hasher: &H,
    policy: PowPolicy,
    block: &Block,
) -> Result<(), Rejection> {
    if block.index != 0 || block.data != GENESIS_DATA || !block.prev_hash.is_empty() {
        return Err(Rejection::NotGenesis);
    }
    if block.difficulty != GENESIS_DIFFICULTY {
        return Err(Rejection::DifficultyMismatch {
            expected: GENESIS_DIFFICULTY,
            found: block.difficulty,
        });
    }
    check_seal(hasher, policy, block)
}

pub fn check_chain<H: BlockHasher + ?Sized>(
    hasher: &H,
    policy: PowPolicy,
    chain: &[Block],
) -> Result<(), ChainRejection> {
    let genesis = chain.first().ok_or(ChainRejection::Empty)?;
    check_genesis(hasher, policy, genesis).map_err(ChainRejection::BadGenesis)?;
    for pair in chain.windows(2) {
        check_block(hasher, policy, &pair[0], &pair[1]).map_err(|reason| {
            ChainRejection::BadLink {
                index: pair[1].index,
                reason,
            }
        })?;
    }
    Ok(())
}

pub fn is_chain_valid<H: BlockHasher + ?Sized>(
    hasher: &H,
    policy: PowPolicy,
    chain: &[Block],
) -> bool {
    check_chain(hasher, policy, chain).is_ok()
}

fn check_seal<H: BlockHasher + ?Sized>(
    hasher: &H,
    policy: PowPolicy,
    block: &Block,
) -> Result<(), Rejection> {
    if block.hash.len() != hasher.digest_len() {
        return Err(Rejection::MalformedHash {
            len: block.hash.len(),
            expected: hasher.digest_len(),
        });
    }
    let computed = hasher.digest(block);
    if computed != block.hash {
        return Err(Rejection::HashMismatch {
            stored: block.hash.clone(),
            computed,
        });
    }
    if policy == PowPolicy::Verifying {
        let expected = difficulty_at(block.index);
        if block.difficulty != expected {
            return Err(Rejection::DifficultyMismatch {
                expected,
                found: block.difficulty,
            });
        }
        if !hash_meets_difficulty(&block.hash, block.difficulty) {
            return Err(Rejection::InsufficientWork {
                hash: block.hash.clone(),
                difficulty: block.difficulty,
            });
        }
    }
    Ok(())
}
