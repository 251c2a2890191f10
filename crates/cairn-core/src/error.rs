//! Error types for the Cairn checkpoint gate.
use thiserror::Error;

use crate::types::Hash256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint mismatch at height {height}: expected {expected}, got {got}")]
    Mismatch { height: u64, expected: Hash256, got: Hash256 },
    #[error("checkpoint table is empty")] EmptyTable,
    #[error("checkpoint heights not strictly increasing: {height} follows {previous}")]
    NonIncreasingHeight { previous: u64, height: u64 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    #[error("invalid hex character at offset {index}")] InvalidCharacter { index: usize },
    #[error("too many hex digits: {digits} > 64")] TooLong { digits: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config: {0}")] Load(String),
}
