//! The canonical chain and its fork-choice rule.
//!
//! All mutation goes through a single mutex held only for "read tip" and
//! "validate + append". Mining happens outside it, so concurrent writers race
//! on the append and the loser is rejected because its parent is no longer the tip.

use crate::hash::{BlockHasher, Sha256Hasher};
use crate::pow::{self, cumulative_work};
use crate::validate::{self, PowPolicy};
use crate::{Block, LedgerError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

/// How a longer candidate chain is compared with the canonical one.
///
/// `LongestChain` adopts any strictly longer valid chain, even one built from
/// cheap low-difficulty blocks. `MostWork` additionally requires strictly more
/// cumulative work, measured from the leading zeros of each block's hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForkChoice {
    #[default]
    LongestChain,
    MostWork,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub pow_policy: PowPolicy,
    pub fork_choice: ForkChoice,
}

/// A mined block and whether it made it onto the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub accepted: bool,
    pub block: Block,
}

/// Outcome of offering a candidate chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adoption {
    pub adopted: bool,
    pub length: usize,
}

impl Adoption {
    fn rejected(length: usize) -> Self {
        Self {
            adopted: false,
            length,
        }
    }
}

pub struct Chain<H: BlockHasher = Sha256Hasher> {
    blocks: Mutex<Vec<Block>>,
    hasher: H,
    config: ChainConfig,
}

impl Chain<Sha256Hasher> {
    pub fn with_defaults() -> Result<Self, LedgerError> {
        Self::new(Sha256Hasher, ChainConfig::default())
    }
}

impl<H: BlockHasher> Chain<H> {
    /// Mine the genesis block and start a chain on it.
    pub fn new(hasher: H, config: ChainConfig) -> Result<Self, LedgerError> {
        let genesis = pow::genesis_block(&hasher)?;
        info!(hash = %genesis.hash, "genesis block created");
        Ok(Self {
            blocks: Mutex::new(vec![genesis]),
            hasher,
            config,
        })
    }

    /// A store with no genesis block. Every tip read fails until a chain is adopted.
    pub fn empty(hasher: H, config: ChainConfig) -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
            hasher,
            config,
        }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn config(&self) -> ChainConfig {
        self.config
    }

    pub fn tip(&self) -> Result<Block, LedgerError> {
        self.blocks.lock().last().cloned().ok_or(LedgerError::EmptyChain)
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.lock().is_empty()
    }

    /// Copy of the canonical chain.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.lock().clone()
    }

    /// Extend the chain with `candidate` if it is a valid child of the current tip.
    pub fn append(&self, candidate: Block) -> Result<(), LedgerError> {
        let mut blocks = self.blocks.lock();
        let tip = blocks.last().ok_or(LedgerError::EmptyChain)?;
        if let Err(reason) =
            validate::check_block(&self.hasher, self.config.pow_policy, tip, &candidate)
        {
            warn!(index = candidate.index, %reason, "block rejected");
            return Err(LedgerError::RejectedBlock {
                index: candidate.index,
                reason,
            });
        }
        debug!(index = candidate.index, hash = %candidate.hash, "block appended");
        blocks.push(candidate);
        Ok(())
    }

    /// Replace the canonical chain with `candidate` if it wins under the
    /// configured fork-choice rule. Losing candidates are dropped.
    pub fn try_adopt(&self, candidate: Vec<Block>) -> bool {
        self.adopt(candidate).adopted
    }

    /// [`Chain::try_adopt`], also reporting the canonical length at the moment
    /// the decision was made.
    pub fn adopt(&self, candidate: Vec<Block>) -> Adoption {
        let length = self.len();
        if candidate.len() <= length {
            debug!(len = candidate.len(), "candidate chain not longer, ignored");
            return Adoption::rejected(length);
        }
        if let Err(reason) =
            validate::check_chain(&self.hasher, self.config.pow_policy, &candidate)
        {
            warn!(%reason, "candidate chain invalid");
            return Adoption::rejected(length);
        }

        let mut blocks = self.blocks.lock();
        // The canonical chain may have grown while the candidate was validated.
        if candidate.len() <= blocks.len() {
            return Adoption::rejected(blocks.len());
        }
        if self.config.fork_choice == ForkChoice::MostWork
            && cumulative_work(&candidate) <= cumulative_work(&blocks)
        {
            debug!("candidate chain carries less work, ignored");
            return Adoption::rejected(blocks.len());
        }
        info!(
            old_len = blocks.len(),
            new_len = candidate.len(),
            "adopted candidate chain"
        );
        *blocks = candidate;
        Adoption {
            adopted: true,
            length: blocks.len(),
        }
    }

    /// Mine `data` on top of the current tip and try to append it. The block is
    /// returned whether or not it was accepted.
    pub fn submit_data(&self, data: impl Into<String>) -> Result<Submission, LedgerError> {
        let parent = self.tip()?;
        let block = pow::mine_block(&self.hasher, &parent, data)?;
        Ok(self.settle(block))
    }

    /// [`Chain::submit_data`] with cooperative cancellation. Cancellation only
    /// happens during mining, before the chain is locked for the append.
    pub fn submit_data_cancellable(
        &self,
        data: impl Into<String>,
        cancel: &AtomicBool,
    ) -> Result<Submission, LedgerError> {
        let parent = self.tip()?;
        let block = pow::mine_block_cancellable(&self.hasher, &parent, data, cancel)?;
        Ok(self.settle(block))
    }

    pub fn offer_chain(&self, candidate: Vec<Block>) -> bool {
        self.try_adopt(candidate)
    }

    fn settle(&self, block: Block) -> Submission {
        let accepted = self.append(block.clone()).is_ok();
        Submission { accepted, block }
    }
}
