//! # cairn-checkpoints — Checkpoint gate and sync-progress estimation.
//!
//! Holds the compiled-in, per-network checkpoint tables and answers the
//! questions a full node asks of them:
//!
//! - does a block at a pinned height carry the pinned hash ([`Checkpoints::verify`])
//! - how long is the chain at least ([`Checkpoints::total_blocks_estimate`])
//! - which checkpoint has the local index already reached ([`Checkpoints::last_checkpoint`])
//! - how far along is verification ([`guess_verification_progress`])
//!
//! Network selection and the enforcement toggle are injected through
//! [`CheckpointConfig`] or [`Checkpoints::new`]; nothing here reads global state.

pub mod checkpoint;
pub mod config;
pub mod networks;
pub mod progress;

pub use checkpoint::{CheckpointData, CheckpointTable, Checkpoints};
pub use config::CheckpointConfig;
pub use networks::checkpoint_data;
pub use progress::{WorkEstimate, estimate_work, guess_verification_progress};
