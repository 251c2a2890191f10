//! # cairn-core
//! Foundation types and traits shared by the checkpoint gate and its callers.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
