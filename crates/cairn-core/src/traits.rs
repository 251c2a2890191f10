//! Trait interfaces between the checkpoint gate and the node's block index.
//!
//! The gate never owns the block index. Callers hand in a read-only view for
//! the duration of a single call and keep it stable for that call.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::types::{BlockIndexEntry, Hash256};

/// Read-only lookup of block-index entries by block hash.
///
/// Implemented for the standard map types so a node can pass its in-memory
/// index directly. Storage-backed indexes implement it over their own cache.
pub trait BlockIndex {
    /// Look up the index entry for `hash`. Returns `None` if the block is unknown.
    fn lookup(&self, hash: &Hash256) -> Option<&BlockIndexEntry>;
}

impl<S: BuildHasher> BlockIndex for HashMap<Hash256, BlockIndexEntry, S> {
    fn lookup(&self, hash: &Hash256) -> Option<&BlockIndexEntry> {
        self.get(hash)
    }
}

impl BlockIndex for BTreeMap<Hash256, BlockIndexEntry> {
    fn lookup(&self, hash: &Hash256) -> Option<&BlockIndexEntry> {
        self.get(hash)
    }
}

impl<T: BlockIndex + ?Sized> BlockIndex for &T {
    fn lookup(&self, hash: &Hash256) -> Option<&BlockIndexEntry> {
        (**self).lookup(hash)
    }
}
