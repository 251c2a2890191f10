//! Header checkpoint verification.
//!
//! Pins known-good `(height, hash)` pairs so that a candidate chain carrying a
//! different hash at a pinned height is rejected, and locates the most advanced
//! checkpoint the local block index already contains.
//!
//! # Attack vectors
//!
//! - **Long-range rewrite:** Without checkpoints an attacker with sufficient
//!   hash power could rewrite arbitrarily deep history. Checkpoints pin known-
//!   good blocks so that a chain contradicting them is rejected outright.
//!
//! - **Checkpoint spoofing:** The checkpoint tables are compiled into the
//!   binary. An attacker would need to distribute a modified binary to exploit
//!   this, which is outside our threat model.
//!
//! - **Malformed tables:** An empty table or one with out-of-order heights
//!   would silently weaken the gate. Compiled-in tables are validated during
//!   constant evaluation, runtime tables by [`CheckpointTable::new`].
//!
//! # Usage
//!
//! The node should call [`Checkpoints::verify`] (or [`Checkpoints::check`] to
//! propagate with `?`) when connecting a block whose height is known. A
//! negative answer is a consensus-level rejection, never a warning. It should
//! call [`Checkpoints::is_below_checkpoint`] before accepting a reorg that
//! would disconnect blocks at or below the last checkpoint height.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, warn};

use cairn_core::constants::NetworkType;
use cairn_core::error::CheckpointError;
use cairn_core::traits::BlockIndex;
use cairn_core::types::{BlockIndexEntry, Hash256};

use crate::config::CheckpointConfig;
use crate::networks::checkpoint_data;
use crate::progress::guess_verification_progress;

/// An ordered, non-empty map from block height to pinned block hash.
///
/// Heights are strictly increasing. The table is immutable once built and only
/// exposes read-only accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CheckpointTable {
    entries: Cow<'static, [(u64, Hash256)]>,
}

impl CheckpointTable {
    /// Build a table from caller-supplied entries.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::EmptyTable`] for an empty list and
    /// [`CheckpointError::NonIncreasingHeight`] when heights are duplicated
    /// or out of order.
    pub fn new(entries: Vec<(u64, Hash256)>) -> Result<Self, CheckpointError> {
        if let Err(e) = validate(&entries) {
            warn!("rejecting malformed checkpoint table: {e}");
            return Err(e);
        }
        Ok(Self {
            entries: Cow::Owned(entries),
        })
    }

    /// Build a table over a compiled-in list.
    ///
    /// Intended for `static` initialisers: a malformed list aborts constant
    /// evaluation, so a bad table can never reach a running node.
    pub const fn from_static(entries: &'static [(u64, Hash256)]) -> Self {
        match validate(entries) {
            Ok(()) => Self {
                entries: Cow::Borrowed(entries),
            },
            Err(CheckpointError::EmptyTable) => panic!("checkpoint table is empty"),
            Err(_) => panic!("checkpoint heights must be strictly increasing"),
        }
    }

    /// Pinned hash at `height`, if `height` is a checkpoint.
    pub fn get(&self, height: u64) -> Option<&Hash256> {
        self.entries
            .binary_search_by_key(&height, |&(h, _)| h)
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// The highest checkpoint. Always present since tables are non-empty.
    pub fn last(&self) -> (u64, Hash256) {
        // Non-emptiness is enforced by both constructors.
        self.entries[self.entries.len() - 1]
    }

    /// Height of the highest checkpoint.
    pub fn last_height(&self) -> u64 {
        self.last().0
    }

    /// Entries in ascending height order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(u64, Hash256)> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; provided for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` when the table holds only the all-zero placeholder, meaning
    /// the network has no real checkpoints yet.
    pub fn is_placeholder(&self) -> bool {
        self.entries.iter().all(|(_, hash)| hash.is_zero())
    }
}

const fn validate(entries: &[(u64, Hash256)]) -> Result<(), CheckpointError> {
    if entries.is_empty() {
        return Err(CheckpointError::EmptyTable);
    }
    let mut i = 1;
    while i < entries.len() {
        let previous = entries[i - 1].0;
        let height = entries[i].0;
        if height <= previous {
            return Err(CheckpointError::NonIncreasingHeight { previous, height });
        }
        i += 1;
    }
    Ok(())
}

/// A checkpoint table paired with the metadata the progress estimator needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointData {
    /// Pinned `(height, hash)` pairs.
    pub table: CheckpointTable,
    /// Unix timestamp of the last checkpoint block.
    pub last_checkpoint_time: u64,
    /// Total transactions from genesis through the last checkpoint block.
    pub last_checkpoint_tx_count: u64,
    /// Expected transactions per day after the last checkpoint.
    pub tx_per_day: f64,
}

impl CheckpointData {
    /// `false` only when `height` is pinned and `hash` differs from the pin.
    ///
    /// Ignores the enforcement toggle; see [`Checkpoints::verify`].
    pub fn matches(&self, height: u64, hash: &Hash256) -> bool {
        self.table.get(height).is_none_or(|pinned| pinned == hash)
    }
}

/// The checkpoint gate as configured for one node.
///
/// Borrows the active [`CheckpointData`] and carries the enforcement toggle.
/// Cheap to copy and safe to share between threads: all state is immutable.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoints<'a> {
    data: &'a CheckpointData,
    enforce: bool,
}

impl Checkpoints<'static> {
    /// Gate over the compiled-in table for `network`.
    pub fn new(network: NetworkType, enforce: bool) -> Self {
        debug!(%network, enforce, "selecting checkpoint table");
        Self::with_data(checkpoint_data(network), enforce)
    }

    pub fn from_config(config: &CheckpointConfig) -> Self {
        Self::new(config.network, config.checkpoints)
    }
}

impl<'a> Checkpoints<'a> {
    /// Gate over an explicit table. Production code uses [`Checkpoints::new`];
    /// tests supply their own data here.
    pub fn with_data(data: &'a CheckpointData, enforce: bool) -> Self {
        Self { data, enforce }
    }

    /// The active table and metadata.
    pub fn data(&self) -> &'a CheckpointData {
        self.data
    }

    pub fn is_enforced(&self) -> bool {
        self.enforce
    }

    /// Whether a block with `hash` is acceptable at `height`.
    ///
    /// Always `true` when enforcement is disabled or `height` is not pinned.
    /// A `false` result must be treated as rejection of the candidate chain.
    pub fn verify(&self, height: u64, hash: &Hash256) -> bool {
        !self.enforce || self.data.matches(height, hash)
    }

    /// Like [`verify`](Self::verify) but reports the mismatch as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Mismatch`] when `height` is pinned to a
    /// different hash and enforcement is on.
    pub fn check(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        if !self.enforce {
            return Ok(());
        }
        match self.data.table.get(height) {
            Some(expected) if expected != hash => {
                warn!(height, %expected, got = %hash, "block contradicts checkpoint");
                Err(CheckpointError::Mismatch {
                    height,
                    expected: *expected,
                    got: *hash,
                })
            }
            _ => Ok(()),
        }
    }

    /// Lower bound on the chain length: the highest checkpoint height, or 0
    /// when enforcement is disabled.
    pub fn total_blocks_estimate(&self) -> u64 {
        if !self.enforce {
            return 0;
        }
        self.data.table.last_height()
    }

    /// Returns `true` if `height` is at or below the last checkpoint height.
    ///
    /// The node should reject any reorg that would disconnect blocks at or
    /// below this height. A table whose only checkpoint is at height 0 does
    /// not freeze anything.
    pub fn is_below_checkpoint(&self, height: u64) -> bool {
        let last = self.total_blocks_estimate();
        last > 0 && height <= last
    }

    /// The index entry of the highest checkpoint present in `index`.
    ///
    /// Scans from the highest checkpoint down so the node resumes from the
    /// most advanced block it has already stored. Returns `None` when
    /// enforcement is disabled or no checkpoint hash is in the index.
    pub fn last_checkpoint<'i, I>(&self, index: &'i I) -> Option<&'i BlockIndexEntry>
    where
        I: BlockIndex + ?Sized,
    {
        if !self.enforce {
            return None;
        }
        let found = self
            .data
            .table
            .iter()
            .rev()
            .find_map(|(_, hash)| index.lookup(hash));
        if let Some(entry) = found {
            debug!(height = entry.height, hash = %entry.hash, "last checkpoint reached");
        }
        found
    }

    /// Verification progress of `node` against the active metadata.
    ///
    /// See [`guess_verification_progress`].
    pub fn guess_progress(&self, node: Option<&BlockIndexEntry>, now: u64) -> f64 {
        guess_verification_progress(node, now, self.data)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn test_data() -> CheckpointData {
        CheckpointData {
            table: CheckpointTable::new(vec![
                (10, Hash256([0xAA; 32])),
                (50, Hash256([0xBB; 32])),
            ])
            .unwrap(),
            last_checkpoint_time: 1_500_000_000,
            last_checkpoint_tx_count: 60,
            tx_per_day: 100.0,
        }
    }

    fn entry(height: u64, hash: Hash256) -> BlockIndexEntry {
        BlockIndexEntry {
            height,
            hash,
            chain_tx: height + 1,
            time: 1_500_000_000,
        }
    }

    // ------------------------------------------------------------------
    // CheckpointTable
    // ------------------------------------------------------------------

    #[test]
    fn empty_table_rejected() {
        assert_eq!(
            CheckpointTable::new(vec![]).unwrap_err(),
            CheckpointError::EmptyTable
        );
    }

    #[test]
    fn duplicate_height_rejected() {
        let err = CheckpointTable::new(vec![
            (5, Hash256([1; 32])),
            (5, Hash256([2; 32])),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CheckpointError::NonIncreasingHeight {
                previous: 5,
                height: 5
            }
        );
    }

    #[test]
    fn decreasing_height_rejected() {
        let err = CheckpointTable::new(vec![
            (0, Hash256([1; 32])),
            (20, Hash256([2; 32])),
            (10, Hash256([3; 32])),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CheckpointError::NonIncreasingHeight {
                previous: 20,
                height: 10
            }
        );
    }

    #[test]
    fn table_accessors() {
        let data = test_data();
        assert_eq!(data.table.len(), 2);
        assert!(!data.table.is_empty());
        assert_eq!(data.table.get(10), Some(&Hash256([0xAA; 32])));
        assert_eq!(data.table.get(11), None);
        assert_eq!(data.table.last(), (50, Hash256([0xBB; 32])));
        let heights: Vec<u64> = data.table.iter().map(|(h, _)| *h).collect();
        assert_eq!(heights, vec![10, 50]);
        assert!(!data.table.is_placeholder());
    }

    #[test]
    fn placeholder_table_detected() {
        let table = CheckpointTable::new(vec![(0, Hash256::ZERO)]).unwrap();
        assert!(table.is_placeholder());
        assert_eq!(table.last_height(), 0);
    }

    #[test]
    fn static_table_is_borrowed() {
        const ENTRIES: &[(u64, Hash256)] = &[(0, Hash256::ZERO), (3, Hash256([3; 32]))];
        static TABLE: CheckpointTable = CheckpointTable::from_static(ENTRIES);
        assert_eq!(TABLE.len(), 2);
        assert_eq!(TABLE.get(3), Some(&Hash256([3; 32])));
    }

    // ------------------------------------------------------------------
    // verify / check
    // ------------------------------------------------------------------

    #[test]
    fn checkpoint_passes_for_matching_hash() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, true);
        assert!(cps.verify(10, &Hash256([0xAA; 32])));
        assert!(cps.verify(50, &Hash256([0xBB; 32])));
        assert!(cps.check(50, &Hash256([0xBB; 32])).is_ok());
    }

    #[test]
    fn checkpoint_fails_for_wrong_hash() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, true);
        let wrong = Hash256([0xFF; 32]);
        assert!(!cps.verify(10, &wrong));
        assert_eq!(
            cps.check(10, &wrong).unwrap_err(),
            CheckpointError::Mismatch {
                height: 10,
                expected: Hash256([0xAA; 32]),
                got: wrong,
            }
        );
        // The hash pinned at another height is still wrong here.
        assert!(!cps.verify(50, &Hash256([0xAA; 32])));
    }

    #[test]
    fn no_checkpoint_at_height_passes() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, true);
        let arbitrary = Hash256([0xDE; 32]);
        for height in [0, 5, 11, 49, 51, u64::MAX] {
            assert!(
                cps.verify(height, &arbitrary),
                "height {height} should pass with no checkpoint"
            );
            assert!(cps.check(height, &arbitrary).is_ok());
        }
    }

    #[test]
    fn disabled_enforcement_accepts_everything() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, false);
        assert!(!cps.is_enforced());
        assert!(cps.verify(10, &Hash256([0xFF; 32])));
        assert!(cps.check(50, &Hash256::ZERO).is_ok());
    }

    // ------------------------------------------------------------------
    // total_blocks_estimate / is_below_checkpoint
    // ------------------------------------------------------------------

    #[test]
    fn total_blocks_estimate_is_last_height() {
        let data = test_data();
        assert_eq!(Checkpoints::with_data(&data, true).total_blocks_estimate(), 50);
        assert_eq!(Checkpoints::with_data(&data, false).total_blocks_estimate(), 0);
    }

    #[test]
    fn is_below_checkpoint_works() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, true);
        assert!(cps.is_below_checkpoint(0));
        assert!(cps.is_below_checkpoint(10));
        assert!(cps.is_below_checkpoint(50));
        assert!(!cps.is_below_checkpoint(51));

        let disabled = Checkpoints::with_data(&data, false);
        assert!(!disabled.is_below_checkpoint(0));
    }

    #[test]
    fn genesis_only_table_freezes_nothing() {
        let data = CheckpointData {
            table: CheckpointTable::new(vec![(0, Hash256::ZERO)]).unwrap(),
            last_checkpoint_time: 0,
            last_checkpoint_tx_count: 0,
            tx_per_day: 0.0,
        };
        let cps = Checkpoints::with_data(&data, true);
        assert!(!cps.is_below_checkpoint(0));
        assert!(!cps.is_below_checkpoint(u64::MAX));
    }

    // ------------------------------------------------------------------
    // last_checkpoint
    // ------------------------------------------------------------------

    #[test]
    fn last_checkpoint_prefers_highest() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, true);
        let low = entry(10, Hash256([0xAA; 32]));
        let high = entry(50, Hash256([0xBB; 32]));
        let other = entry(30, Hash256([0x30; 32]));
        let index: HashMap<Hash256, BlockIndexEntry> =
            [low, high, other].into_iter().map(|e| (e.hash, e)).collect();
        assert_eq!(cps.last_checkpoint(&index), Some(&high));
    }

    #[test]
    fn last_checkpoint_falls_back_to_lower() {
        let data = test_data();
        let cps = Checkpoints::with_data(&data, true);
        let low = entry(10, Hash256([0xAA; 32]));
        let index: HashMap<Hash256, BlockIndexEntry> = [(low.hash, low)].into_iter().collect();
        assert_eq!(cps.last_checkpoint(&index).map(|e| e.height), Some(10));
    }

    #[test]
    fn last_checkpoint_none_when_absent_or_disabled() {
        let data = test_data();
        let other = entry(30, Hash256([0x30; 32]));
        let index: HashMap<Hash256, BlockIndexEntry> = [(other.hash, other)].into_iter().collect();
        assert!(Checkpoints::with_data(&data, true).last_checkpoint(&index).is_none());

        let high = entry(50, Hash256([0xBB; 32]));
        let index: HashMap<Hash256, BlockIndexEntry> = [(high.hash, high)].into_iter().collect();
        assert!(Checkpoints::with_data(&data, false).last_checkpoint(&index).is_none());
    }

    // ------------------------------------------------------------------
    // network selection
    // ------------------------------------------------------------------

    #[test]
    fn new_selects_network_table() {
        let main = Checkpoints::new(NetworkType::Mainnet, true);
        let test = Checkpoints::new(NetworkType::Testnet, true);
        assert!(std::ptr::eq(main.data(), checkpoint_data(NetworkType::Mainnet)));
        assert!(std::ptr::eq(test.data(), checkpoint_data(NetworkType::Testnet)));
        assert_ne!(main.total_blocks_estimate(), test.total_blocks_estimate());
    }

    #[test]
    fn from_config_honours_toggle() {
        let cfg = CheckpointConfig {
            network: NetworkType::Mainnet,
            checkpoints: false,
        };
        let cps = Checkpoints::from_config(&cfg);
        assert!(!cps.is_enforced());
        assert_eq!(cps.total_blocks_estimate(), 0);
    }
}
