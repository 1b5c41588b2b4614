use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bytecode::BytecodeRange;

/// Append-only recorder of bytecode-offset to emitted-line correspondences.
///
/// Owned by the top-level render call and threaded `&mut` through the whole
/// subtree traversal of one render. Nodes report their own bytecode range as
/// they emit text; the statement printer advances the line counter as it
/// writes newlines. The final table feeds downstream debug-info and
/// step-mapping consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytecodeMappingTracer {
    current_line: u32,
    mapping: BTreeMap<u32, u32>,
}

impl BytecodeMappingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_line(line: u32) -> Self {
        Self { current_line: line, mapping: BTreeMap::new() }
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    pub fn increment_line(&mut self, n: u32) {
        self.current_line += n;
    }

    /// Record one offset against the current line. First report wins so the
    /// mapping points at the line where the offset's text began.
    pub fn add_mapping(&mut self, offset: u32) {
        self.mapping.entry(offset).or_insert(self.current_line);
    }

    /// Record every offset of `range` against the current line.
    pub fn add_range(&mut self, range: &BytecodeRange) {
        for offset in range.iter() {
            self.add_mapping(offset);
        }
    }

    /// The accumulated offset -> line table.
    pub fn mapping(&self) -> &BTreeMap<u32, u32> {
        &self.mapping
    }
}
