use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("chain has no genesis block")]
    EmptyChain,

    #[error("block {index} rejected: {reason}")]
    RejectedBlock { index: u64, reason: Rejection },

    #[error("block {0} is the last possible index")]
    IndexExhausted(u64),

    #[error("mining cancelled")]
    Cancelled,

    #[error("nonce space exhausted at difficulty {difficulty}")]
    NonceSpaceExhausted { difficulty: u32 },
}

/// Why a single block failed validation against its parent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("index {found} does not follow parent index {parent}")]
    IndexMismatch { parent: u64, found: u64 },

    #[error("prev hash {found:?} does not match parent hash {expected:?}")]
    PrevHashMismatch { expected: String, found: String },

    #[error("hash is {len} characters, expected {expected}")]
    MalformedHash { len: usize, expected: usize },

    #[error("stored hash {stored:?} does not match recomputed digest {computed:?}")]
    HashMismatch { stored: String, computed: String },

    #[error("difficulty {found} differs from scheduled difficulty {expected}")]
    DifficultyMismatch { expected: u32, found: u32 },

    #[error("hash {hash:?} lacks {difficulty} leading zeros")]
    InsufficientWork { hash: String, difficulty: u32 },

    #[error("block does not match the genesis definition")]
    NotGenesis,
}

/// Why a candidate chain was not adopted. Never surfaced past `try_adopt`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainRejection {
    #[error("candidate chain is empty")]
    Empty,

    #[error("bad genesis block: {0}")]
    BadGenesis(Rejection),

    #[error("block {index} breaks the chain: {reason}")]
    BadLink { index: u64, reason: Rejection },
}
