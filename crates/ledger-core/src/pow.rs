use crate::constants::{CANCEL_CHECK_INTERVAL, DIFFICULTY_STEP, GENESIS_DATA, GENESIS_DIFFICULTY};
use crate::hash::{count_leading_zero_chars, hash_meets_difficulty, BlockHasher};
use crate::{Block, LedgerError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Difficulty of the block that follows `parent_index`.
pub fn difficulty_for_parent(parent_index: u64) -> u32 {
    u32::try_from(parent_index / DIFFICULTY_STEP + 1).unwrap_or(u32::MAX)
}

/// Scheduled difficulty for the block at `index`.
pub fn difficulty_at(index: u64) -> u32 {
    match index {
        0 => GENESIS_DIFFICULTY,
        i => difficulty_for_parent(i - 1),
    }
}

/// Expected number of hex-digest trials to meet `difficulty`, saturating.
pub fn expected_work(difficulty: u32) -> u128 {
    16u128.checked_pow(difficulty).unwrap_or(u128::MAX)
}

/// Work shown by the hashes themselves. The claimed `difficulty` field is
/// ignored, so only call this on blocks whose digests have been checked.
pub fn cumulative_work(blocks: &[Block]) -> u128 {
    blocks.iter().fold(0u128, |acc, b| {
        acc.saturating_add(expected_work(count_leading_zero_chars(&b.hash)))
    })
}

/// Mine the child of `parent` carrying `data`. Blocks the calling thread until
/// a suffix meets the scheduled difficulty.
pub fn mine_block<H: BlockHasher + ?Sized>(
    hasher: &H,
    parent: &Block,
    data: impl Into<String>,
) -> Result<Block, LedgerError> {
    seal(hasher, child_of(parent, data.into())?, None)
}

/// Like [`mine_block`], but gives up with [`LedgerError::Cancelled`] once
/// `cancel` is set. The flag is polled every `CANCEL_CHECK_INTERVAL` trials.
pub fn mine_block_cancellable<H: BlockHasher + ?Sized>(
    hasher: &H,
    parent: &Block,
    data: impl Into<String>,
    cancel: &AtomicBool,
) -> Result<Block, LedgerError> {
    seal(hasher, child_of(parent, data.into())?, Some(cancel))
}

/// The first block: index 0, fixed payload, empty parent hash.
pub fn genesis_block<H: BlockHasher + ?Sized>(hasher: &H) -> Result<Block, LedgerError> {
    let candidate = Block::candidate(0, String::new(), GENESIS_DATA.to_string(), GENESIS_DIFFICULTY);
    seal(hasher, candidate, None)
}

fn child_of(parent: &Block, data: String) -> Result<Block, LedgerError> {
    let index = parent
        .index
        .checked_add(1)
        .ok_or(LedgerError::IndexExhausted(parent.index))?;
    Ok(Block::candidate(
        index,
        parent.hash.clone(),
        data,
        difficulty_for_parent(parent.index),
    ))
}

fn seal<H: BlockHasher + ?Sized>(
    hasher: &H,
    mut block: Block,
    cancel: Option<&AtomicBool>,
) -> Result<Block, LedgerError> {
    for nonce in 0..=u64::MAX {
        if let Some(flag) = cancel {
            if nonce % CANCEL_CHECK_INTERVAL == 0 && flag.load(Ordering::Relaxed) {
                debug!(index = block.index, trials = nonce, "mining cancelled");
                return Err(LedgerError::Cancelled);
            }
        }
        block.suffix = format!("{nonce:x}");
        let hash = hasher.digest(&block);
        if hash_meets_difficulty(&hash, block.difficulty) {
            debug!(
                index = block.index,
                trials = nonce,
                difficulty = block.difficulty,
                %hash,
                "found valid hash"
            );
            block.hash = hash;
            return Ok(block);
        }
    }
    Err(LedgerError::NonceSpaceExhausted {
        difficulty: block.difficulty,
    })
}
