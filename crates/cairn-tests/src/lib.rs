//! Property and adversarial test suite for the Cairn checkpoint gate.
//!
//! Integration tests under `tests/` check every gate invariant against both
//! the compiled-in tables and randomly generated ones.

pub mod helpers;
