//! Append-only, hash-linked ledger with proof-of-work admission.
//!
//! [`chain::Chain`] owns the canonical sequence of [`Block`]s. New blocks are
//! mined by [`pow::mine_block`] and admitted after [`validate::check_block`].

pub mod block;
pub mod chain;
pub mod constants;
pub mod error;
pub mod hash;
pub mod pow;
pub mod validate;

pub use block::Block;
pub use chain::{Adoption, Chain, ChainConfig, ForkChoice, Submission};
pub use error::{ChainRejection, LedgerError, Rejection};
pub use hash::{BlockHasher, Sha256Hasher};
pub use validate::PowPolicy;
