use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The set of original instruction offsets a node (or subtree) was
/// reconstructed from.
///
/// A node created purely synthetically (an inserted cast, a synthesized
/// constant) owns an empty range. Subtree ranges are computed by unioning
/// child ranges into an accumulator via `Exprent::fill_bytecode_range`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytecodeRange {
    offsets: BTreeSet<u32>,
}

impl BytecodeRange {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_offsets(offsets: impl IntoIterator<Item = u32>) -> Self {
        Self { offsets: offsets.into_iter().collect() }
    }

    pub fn insert(&mut self, offset: u32) {
        self.offsets.insert(offset);
    }

    /// Union `other` into `self` (the "measure" merge).
    pub fn union_with(&mut self, other: &BytecodeRange) {
        self.offsets.extend(other.offsets.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.offsets.contains(&offset)
    }

    pub fn min(&self) -> Option<u32> {
        self.offsets.first().copied()
    }

    pub fn max(&self) -> Option<u32> {
        self.offsets.last().copied()
    }

    /// Offsets in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.offsets.iter().copied()
    }
}
