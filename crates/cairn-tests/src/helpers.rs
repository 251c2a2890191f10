//! Shared test helpers for the integration suites.

use std::collections::HashMap;

use cairn_checkpoints::{CheckpointData, CheckpointTable};
use cairn_core::types::{BlockIndexEntry, Hash256};

/// Deterministic hash derived from a block height.
pub fn hash_for_height(height: u64) -> Hash256 {
    let mut bytes = [0xC0u8; 32];
    bytes[..8].copy_from_slice(&height.to_be_bytes());
    Hash256(bytes)
}

/// Build checkpoint data from `(height, hash)` pairs.
///
/// Panics on a malformed table, which is what tests want.
pub fn make_data(
    entries: Vec<(u64, Hash256)>,
    last_checkpoint_time: u64,
    last_checkpoint_tx_count: u64,
    tx_per_day: f64,
) -> CheckpointData {
    CheckpointData {
        table: CheckpointTable::new(entries).expect("valid checkpoint table"),
        last_checkpoint_time,
        last_checkpoint_tx_count,
        tx_per_day,
    }
}

/// A block index entry with the given height and hash.
pub fn make_entry(height: u64, hash: Hash256, chain_tx: u64, time: u64) -> BlockIndexEntry {
    BlockIndexEntry {
        height,
        hash,
        chain_tx,
        time,
    }
}

/// Index keyed by hash, the shape a node hands to the gate.
pub fn make_index(
    entries: impl IntoIterator<Item = BlockIndexEntry>,
) -> HashMap<Hash256, BlockIndexEntry> {
    entries.into_iter().map(|e| (e.hash, e)).collect()
}
