//! Compiled-in checkpoint tables, one per network.
//!
//! What makes a good checkpoint block:
//! - it is surrounded by blocks with reasonable timestamps (nothing before it
//!   with a later timestamp, nothing after it with an earlier one)
//! - it contains no unusual transactions
//!
//! When adding an entry, update the metadata of that network as well:
//! `last_checkpoint_tx_count` is the cumulative transaction count reported by
//! the node for the new last checkpoint block.

use cairn_core::constants::NetworkType;
use cairn_core::types::Hash256;

use crate::checkpoint::{CheckpointData, CheckpointTable};

const fn hash(hex: &str) -> Hash256 {
    Hash256::from_hex_const(hex)
}

const MAINNET_CHECKPOINTS: &[(u64, Hash256)] = &[
    (0, hash("0x4053f27502d05555eab8855c2ee464798c2a4a541a242ea75a52add46471d8ba")),
    (1, hash("0x8ff38ae466d640b4c4eb4db2f373c839ff65c863e78b90d5314552d8fbaa8478")),
    (50, hash("0xc3988e1913d72ba1a33bdb9cc34f460c5e90e0064199da648089c00a72f64712")),
    (100, hash("0xbe7619443976c18ada6ddc8a7b59a1ee47abee6eb68815b1abda02d981effa07")),
    (200, hash("0x478f4ab5e07c797126a17ea078461c474c5303f331fff3d1da31b44775a6c2f3")),
    (300, hash("0x80b6b17b168443dbb964f6da53d234c6f9e1c120b0f25c27b3d2174b7163c568")),
    (400, hash("0x559f0be318ae6bcab276793cbaba5a5236cee427d03e25919a63a543d7832893")),
    (500, hash("0x4bb42968ed8b5ce1103083300e11116c0a7483c0f8863e5f15c4fbc14bab79c7")),
    (600, hash("0xd55fe90b5d15d686d85cbf20879e8c006f1be80a6a544b72cefaacc305420b32")),
    (700, hash("0xbee62a461a0aa171173b3acf7939951f1abfbb17d51a28f56d25098550fef6ed")),
    (800, hash("0xe772ac92281bffe583383c016194ff252d5f59ef851def642c231d3eea353979")),
    (900, hash("0x396b0644027517ab056d6daa2d15ed3d75370c08e5ee62880c0d2d3e98129bb7")),
    (926, hash("0xca7fb79ddd4f673a1142a8a547428256cb478cacbb3c2c239a6de605542d495c")),
];

/// Testnet has no real checkpoints yet: a single all-zero placeholder at
/// genesis, which no real block hash matches.
const TESTNET_CHECKPOINTS: &[(u64, Hash256)] = &[(0, Hash256::ZERO)];

pub static MAINNET: CheckpointData = CheckpointData {
    table: CheckpointTable::from_static(MAINNET_CHECKPOINTS),
    last_checkpoint_time: 1_501_847_291,
    last_checkpoint_tx_count: 927,
    tx_per_day: 1000.0,
};

pub static TESTNET: CheckpointData = CheckpointData {
    table: CheckpointTable::from_static(TESTNET_CHECKPOINTS),
    last_checkpoint_time: 0,
    last_checkpoint_tx_count: 0,
    tx_per_day: 0.0,
};

/// Table and metadata for `network`.
pub fn checkpoint_data(network: NetworkType) -> &'static CheckpointData {
    match network {
        NetworkType::Mainnet => &MAINNET,
        NetworkType::Testnet => &TESTNET,
    }
}
