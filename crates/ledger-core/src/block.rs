use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A sealed ledger entry. Field order matches the wire contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub prev_hash: String,
    pub suffix: String,
    pub difficulty: u32,
    pub hash: String,
}

impl Block {
    /// An unsealed block stamped with the current time; `suffix` and `hash`
    /// are filled in by the miner.
    pub fn candidate(index: u64, prev_hash: String, data: String, difficulty: u32) -> Self {
        Self {
            index,
            timestamp: now_timestamp(),
            data,
            prev_hash,
            suffix: String::new(),
            difficulty,
            hash: String::new(),
        }
    }

    /// The exact preimage fed to the hasher. `difficulty` and `hash` are not part of it.
    pub fn canonical(&self) -> String {
        format!(
            "index: {} - timestamp: {} - prevhash: {} - data: {} - suffix: {}",
            self.index, self.timestamp, self.prev_hash, self.data, self.suffix
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// RFC 3339 in UTC with nanoseconds, so blocks mined within one second still differ.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}
