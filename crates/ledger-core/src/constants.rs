pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;

/// Difficulty rises by one every this many blocks.
pub const DIFFICULTY_STEP: u64 = 256;

pub const GENESIS_DATA: &str = "first block";
pub const GENESIS_DIFFICULTY: u32 = 1;

/// Trials between two reads of a cancellation flag.
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;
