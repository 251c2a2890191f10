//! Verification progress estimation.
//!
//! Work is measured in transactions: 1.0 per transaction at or before the last
//! checkpoint, and [`SIGCHECK_VERIFICATION_FACTOR`] per transaction after it,
//! since post-checkpoint history needs full signature checking. Transactions
//! not yet seen are extrapolated from the network's expected daily rate.
//!
//! # Edge cases
//!
//! - An empty total (nothing done, nothing left) reports `1.0`.
//! - Elapsed time is not floored, so a clock behind the reference timestamp
//!   yields negative remaining work. The fraction is clamped into `[0, 1]`,
//!   and a negative total reports `0.0` so a skewed clock never shows a node
//!   as synced.

use cairn_core::constants::{SECONDS_PER_DAY, SIGCHECK_VERIFICATION_FACTOR};
use cairn_core::types::BlockIndexEntry;

use crate::checkpoint::CheckpointData;

/// Work done up to a block and work estimated to remain after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkEstimate {
    pub work_before: f64,
    pub work_after: f64,
}

impl WorkEstimate {
    /// Fraction of the total work already done, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        let total = self.work_before + self.work_after;
        if total.is_nan() || total == 0.0 {
            return 1.0;
        }
        if total < 0.0 {
            return 0.0;
        }
        (self.work_before / total).clamp(0.0, 1.0)
    }
}

/// Days from `since` to `now`. Negative when `now` is earlier.
fn elapsed_days(since: u64, now: u64) -> f64 {
    (now as f64 - since as f64) / SECONDS_PER_DAY
}

/// Split the verification work around `node`.
pub fn estimate_work(node: &BlockIndexEntry, now: u64, data: &CheckpointData) -> WorkEstimate {
    let checkpoint_tx = data.last_checkpoint_tx_count;

    if node.chain_tx <= checkpoint_tx {
        let cheap_before = node.chain_tx as f64;
        let cheap_after = (checkpoint_tx - node.chain_tx) as f64;
        let expensive_after = elapsed_days(data.last_checkpoint_time, now) * data.tx_per_day;
        WorkEstimate {
            work_before: cheap_before,
            work_after: cheap_after + expensive_after * SIGCHECK_VERIFICATION_FACTOR,
        }
    } else {
        let cheap_before = checkpoint_tx as f64;
        let expensive_before = (node.chain_tx - checkpoint_tx) as f64;
        let expensive_after = elapsed_days(node.time, now) * data.tx_per_day;
        WorkEstimate {
            work_before: cheap_before + expensive_before * SIGCHECK_VERIFICATION_FACTOR,
            work_after: expensive_after * SIGCHECK_VERIFICATION_FACTOR,
        }
    }
}

/// Guess how far verification has progressed at `node`.
///
/// `now` is the caller's wall-clock sample in Unix seconds. Returns `0.0` for
/// no block, otherwise a value in `[0, 1]`.
pub fn guess_verification_progress(
    node: Option<&BlockIndexEntry>,
    now: u64,
    data: &CheckpointData,
) -> f64 {
    match node {
        Some(node) => estimate_work(node, now, data).fraction(),
        None => 0.0,
    }
}
